use std::env;

/// Process configuration, read once at startup and handed to the
/// components that need it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub database_name: String,
    pub collection_name: String,
    pub admin_secret_code: String,
    pub bcrypt_cost: u32,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = var("PORT", "8000")
            .parse::<u16>()
            .map_err(|e| format!("PORT must be a valid port number: {}", e))?;

        let admin_secret_code = lookup("ADMIN_SECRET_CODE")
            .filter(|code| !code.is_empty())
            .ok_or_else(|| "ADMIN_SECRET_CODE must be set".to_string())?;

        let bcrypt_cost = var("BCRYPT_COST", &bcrypt::DEFAULT_COST.to_string())
            .parse::<u32>()
            .map_err(|e| format!("BCRYPT_COST must be an integer: {}", e))?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(format!("BCRYPT_COST must be between 4 and 31, got {}", bcrypt_cost));
        }

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            host: var("HOST", "0.0.0.0"),
            port,
            mongodb_uri: var("MONGODB_URI", "mongodb://localhost:27017"),
            database_name: var("MONGODB_DATABASE", "MyDatabase"),
            collection_name: var("MONGODB_COLLECTION", "MyCollection"),
            admin_secret_code,
            bcrypt_cost,
            cors_allowed_origins,
        })
    }
}
