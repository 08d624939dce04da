use mongodb::bson::{doc, Document};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use std::error::Error;
use std::time::Duration;

use crate::config::AppConfig;
use crate::models::UserDocument;

pub const EMAIL_INDEX: &str = "email_unique";
pub const PHONE_INDEX: &str = "phone_unique";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
    users_collection: String,
}

impl MongoDB {
    pub async fn new(config: &AppConfig) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(&config.mongodb_uri).await?;

        client_options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(Duration::from_secs(300));
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(&config.database_name);

        let mongodb = Self {
            db,
            users_collection: config.collection_name.clone(),
        };

        mongodb.ping().await?;
        mongodb.ensure_indexes().await;

        Ok(mongodb)
    }

    /// Unique indexes backing the email and phone rules. `phone` is optional
    /// for students, so its index only covers documents that carry one.
    async fn ensure_indexes(&self) {
        log::info!("🔧 Creating database indexes...");

        let users = self.users();

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .name(EMAIL_INDEX.to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index ready: {}(email)", self.users_collection),
            Err(e) => log::warn!("   ⚠️  Could not create email index: {}", e),
        }

        let phone_index = IndexModel::builder()
            .keys(doc! { "phone": 1 })
            .options(
                IndexOptions::builder()
                    .name(PHONE_INDEX.to_string())
                    .unique(true)
                    .partial_filter_expression(doc! { "phone": { "$type": "string" } })
                    .build(),
            )
            .build();

        match users.create_index(phone_index).await {
            Ok(_) => log::info!("   ✅ Index ready: {}(phone)", self.users_collection),
            Err(e) => log::warn!("   ⚠️  Could not create phone index: {}", e),
        }

        log::info!("✅ Database indexes ready");
    }

    pub async fn ping(&self) -> Result<(), mongodb::error::Error> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    pub fn users(&self) -> Collection<UserDocument> {
        self.db.collection(&self.users_collection)
    }

    /// Untyped view of the same collection, for reads that must tolerate
    /// records not written by this service
    pub fn raw_users(&self) -> Collection<Document> {
        self.db.collection(&self.users_collection)
    }
}
