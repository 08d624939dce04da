use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};

/// Role a user registered under. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    Admin,
    Student,
    #[serde(alias = "school/college")]
    SchoolCollege,
    Promoter,
}

impl RoleKind {
    /// Literal stored in the `user_type` field
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleKind::Admin => "admin",
            RoleKind::Student => "student",
            RoleKind::SchoolCollege => "school_college",
            RoleKind::Promoter => "promoter",
        }
    }

    /// Every `user_type` value that means this role. Older records wrote
    /// institutions as `school/college`.
    pub fn stored_literals(&self) -> &'static [&'static str] {
        match self {
            RoleKind::Admin => &["admin"],
            RoleKind::Student => &["student"],
            RoleKind::SchoolCollege => &["school_college", "school/college"],
            RoleKind::Promoter => &["promoter"],
        }
    }

    pub fn from_literal(literal: &str) -> Option<Self> {
        [
            RoleKind::Admin,
            RoleKind::Student,
            RoleKind::SchoolCollege,
            RoleKind::Promoter,
        ]
        .into_iter()
        .find(|kind| kind.stored_literals().iter().any(|known| *known == literal))
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            RoleKind::Admin => "Admin registered successfully!",
            RoleKind::Student => "Student registered successfully!",
            RoleKind::SchoolCollege => "School/College registered successfully!",
            RoleKind::Promoter => "Promoter registered successfully!",
        }
    }
}

impl std::fmt::Display for RoleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role-specific fields of a validated signup
#[derive(Debug, Clone, PartialEq)]
pub enum RoleProfile {
    Admin {
        name: String,
    },
    Student {
        name: String,
        institution_name: String,
    },
    SchoolCollege {
        institute_name: String,
        address: String,
        head_of_institute: Option<String>,
    },
    Promoter {
        name: String,
    },
}

impl RoleProfile {
    pub fn kind(&self) -> RoleKind {
        match self {
            RoleProfile::Admin { .. } => RoleKind::Admin,
            RoleProfile::Student { .. } => RoleKind::Student,
            RoleProfile::SchoolCollege { .. } => RoleKind::SchoolCollege,
            RoleProfile::Promoter { .. } => RoleKind::Promoter,
        }
    }
}

/// A signup that passed schema validation. Holds the plaintext password
/// until the service hashes it; never persisted as is.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub profile: RoleProfile,
}

/// Document stored in the users collection (one collection, all roles)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    pub email: String,
    /// Absent when read through the listing projection
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub password_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phone: Option<String>,
    pub user_type: RoleKind,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub institution_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub institute_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub head_of_institute: Option<String>,
}

fn default_true() -> bool {
    true
}

impl UserDocument {
    /// Shapes the stored document for the user's role. Optional fields the
    /// caller left out stay absent.
    pub fn from_new_user(user: NewUser, password_hash: String) -> Self {
        let user_type = user.profile.kind();
        let mut document = Self {
            id: None,
            email: user.email,
            password_hash: Some(password_hash),
            phone: user.phone,
            user_type,
            is_active: true,
            name: None,
            institution_name: None,
            institute_name: None,
            address: None,
            head_of_institute: None,
        };

        match user.profile {
            RoleProfile::Admin { name } | RoleProfile::Promoter { name } => {
                document.name = Some(name);
            }
            RoleProfile::Student {
                name,
                institution_name,
            } => {
                document.name = Some(name);
                document.institution_name = Some(institution_name);
            }
            RoleProfile::SchoolCollege {
                institute_name,
                address,
                head_of_institute,
            } => {
                document.institute_name = Some(institute_name);
                document.address = Some(address);
                document.head_of_institute = head_of_institute;
            }
        }

        document
    }
}

/// User as returned by the listing endpoint. Built from the raw stored
/// document so records of any shape in the collection can be listed; only
/// known profile keys are copied, never a credential.
#[derive(Debug, Serialize, Clone, PartialEq, utoipa::ToSchema)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Role literal; unknown values are passed through unchanged
    pub user_type: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institute_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_of_institute: Option<String>,
}

impl From<Document> for UserRecord {
    fn from(document: Document) -> Self {
        let text = |key: &str| document.get_str(key).ok().map(str::to_string);

        let id = match document.get("_id") {
            Some(Bson::ObjectId(id)) => id.to_hex(),
            Some(Bson::String(id)) => id.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };

        let user_type = text("user_type")
            .map(|raw| match RoleKind::from_literal(&raw) {
                Some(kind) => kind.as_str().to_string(),
                None => raw,
            })
            .unwrap_or_default();

        Self {
            id,
            email: text("email").unwrap_or_default(),
            phone: text("phone"),
            user_type,
            is_active: document.get_bool("is_active").unwrap_or(true),
            name: text("name"),
            institution_name: text("institution_name"),
            institute_name: text("institute_name"),
            address: text("address"),
            head_of_institute: text("head_of_institute"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub user_type: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, utoipa::ToSchema)]
pub struct UserCounts {
    pub total_users: u64,
    pub admins: u64,
    pub students: u64,
    pub schools_colleges: u64,
    pub promoters: u64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserListResponse {
    pub total_users: usize,
    pub users: Vec<UserRecord>,
}
