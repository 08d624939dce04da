use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::{
    AdminSignup, NewUser, PromoterSignup, RoleKind, SchoolCollegeSignup, StudentSignup,
    UserCounts, UserDocument, UserRecord, UserResponse,
};
use crate::services::registry_store::RegistryStore;
use crate::utils::crypto::{secret_matches, CredentialHasher};
use crate::utils::error::{AppError, StoreError, UniqueField};

const REGISTRATION_FAILED: &str = "Registration failed";

/// Signup payload for one of the four roles
#[derive(Debug, Clone)]
pub enum SignupRequest {
    Admin(AdminSignup),
    Student(StudentSignup),
    SchoolCollege(SchoolCollegeSignup),
    Promoter(PromoterSignup),
}

impl SignupRequest {
    pub fn kind(&self) -> RoleKind {
        match self {
            SignupRequest::Admin(_) => RoleKind::Admin,
            SignupRequest::Student(_) => RoleKind::Student,
            SignupRequest::SchoolCollege(_) => RoleKind::SchoolCollege,
            SignupRequest::Promoter(_) => RoleKind::Promoter,
        }
    }
}

/// Registers users of every role and serves the read-only user queries.
///
/// Email and phone uniqueness is checked before insert for a fast, precise
/// answer; the store's unique indexes stay authoritative, so a duplicate
/// that slips past the lookups still ends as [`AppError::Conflict`].
pub struct RegistrationService {
    store: Arc<dyn RegistryStore>,
    hasher: CredentialHasher,
    admin_secret_code: String,
}

impl RegistrationService {
    pub fn new(
        store: Arc<dyn RegistryStore>,
        hasher: CredentialHasher,
        admin_secret_code: impl Into<String>,
    ) -> Self {
        Self {
            store,
            hasher,
            admin_secret_code: admin_secret_code.into(),
        }
    }

    pub fn from_config(store: Arc<dyn RegistryStore>, config: &AppConfig) -> Self {
        Self::new(
            store,
            CredentialHasher::new(config.bcrypt_cost),
            config.admin_secret_code.clone(),
        )
    }

    pub async fn register(&self, request: SignupRequest) -> Result<UserResponse, AppError> {
        let user = match request {
            SignupRequest::Admin(payload) => {
                let candidate = payload.validate()?;
                if !secret_matches(&candidate.admin_code, &self.admin_secret_code) {
                    return Err(AppError::Forbidden(
                        "Invalid admin code. Access denied!".to_string(),
                    ));
                }
                candidate.user
            }
            SignupRequest::Student(payload) => payload.validate()?,
            SignupRequest::SchoolCollege(payload) => payload.validate()?,
            SignupRequest::Promoter(payload) => payload.validate()?,
        };

        self.insert_user(user).await
    }

    /// Uniqueness gate, hashing, insert. `user` is already validated.
    async fn insert_user(&self, user: NewUser) -> Result<UserResponse, AppError> {
        if self
            .store
            .find_by_email(&user.email)
            .await
            .map_err(|e| AppError::store(REGISTRATION_FAILED, e))?
            .is_some()
        {
            return Err(AppError::Conflict(UniqueField::Email));
        }

        if let Some(phone) = &user.phone {
            if self
                .store
                .find_by_phone(phone)
                .await
                .map_err(|e| AppError::store(REGISTRATION_FAILED, e))?
                .is_some()
            {
                return Err(AppError::Conflict(UniqueField::Phone));
            }
        }

        let password_hash = self.hash_password(user.password.clone()).await?;
        let document = UserDocument::from_new_user(user, password_hash);

        let id = self.store.insert(&document).await.map_err(|e| match e {
            StoreError::Duplicate(field) => AppError::Conflict(field),
            other => AppError::store(REGISTRATION_FAILED, other),
        })?;

        log::debug!("Inserted {} user {}", document.user_type, id);

        Ok(UserResponse {
            id,
            email: document.email,
            user_type: document.user_type.as_str().to_string(),
            message: document.user_type.success_message().to_string(),
        })
    }

    /// bcrypt is CPU bound; keep it off the async workers
    async fn hash_password(&self, password: String) -> Result<String, AppError> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::store(REGISTRATION_FAILED, e))?
            .map_err(|e| AppError::store(REGISTRATION_FAILED, e))
    }

    pub async fn count_by_type(&self) -> Result<UserCounts, AppError> {
        let count = |kind: Option<RoleKind>| async move {
            self.store
                .count(kind)
                .await
                .map_err(|e| AppError::store("Failed to fetch user count", e))
        };

        let (total_users, admins, students, schools_colleges, promoters) = futures::try_join!(
            count(None),
            count(Some(RoleKind::Admin)),
            count(Some(RoleKind::Student)),
            count(Some(RoleKind::SchoolCollege)),
            count(Some(RoleKind::Promoter)),
        )?;

        Ok(UserCounts {
            total_users,
            admins,
            students,
            schools_colleges,
            promoters,
        })
    }

    pub async fn list_all(&self) -> Result<Vec<UserRecord>, AppError> {
        let documents = self
            .store
            .list_all()
            .await
            .map_err(|e| AppError::store("Failed to fetch users", e))?;

        Ok(documents.into_iter().map(UserRecord::from).collect())
    }

    pub async fn store_healthy(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Store health check failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::memory_store::MemoryStore;

    const ADMIN_CODE: &str = "ADMIN2024SECRET";

    fn service(store: Arc<MemoryStore>) -> RegistrationService {
        RegistrationService::new(store, CredentialHasher::new(4), ADMIN_CODE)
    }

    fn admin(email: &str, phone: &str, code: &str) -> SignupRequest {
        SignupRequest::Admin(AdminSignup {
            email: Some(email.to_string()),
            password: Some("admin12345".to_string()),
            phone: Some(phone.to_string()),
            name: Some("Admin User".to_string()),
            admin_code: Some(code.to_string()),
        })
    }

    fn student(email: &str, phone: Option<&str>) -> SignupRequest {
        SignupRequest::Student(StudentSignup {
            email: Some(email.to_string()),
            password: Some("student123".to_string()),
            phone: phone.map(str::to_string),
            name: Some("Ahmed Ali".to_string()),
            institution_name: Some("ABC School".to_string()),
        })
    }

    fn school(email: &str, phone: &str) -> SignupRequest {
        SignupRequest::SchoolCollege(SchoolCollegeSignup {
            email: Some(email.to_string()),
            password: Some("school123".to_string()),
            phone: Some(phone.to_string()),
            institute_name: Some("XYZ College".to_string()),
            address: Some("Karachi, Pakistan".to_string()),
            head_of_institute: None,
        })
    }

    fn promoter(email: &str, phone: &str) -> SignupRequest {
        SignupRequest::Promoter(PromoterSignup {
            email: Some(email.to_string()),
            password: Some("promoter123".to_string()),
            phone: Some(phone.to_string()),
            name: Some("Promoter Name".to_string()),
        })
    }

    #[tokio::test]
    async fn test_admin_registration_persists_active_record() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone());

        let response = svc
            .register(admin("admin@example.com", "+92 12345678910", ADMIN_CODE))
            .await
            .unwrap();

        assert_eq!(response.user_type, "admin");
        assert_eq!(response.email, "admin@example.com");
        assert_eq!(response.message, "Admin registered successfully!");

        let docs = store.documents().await;
        assert_eq!(docs.len(), 1);
        assert!(docs[0].is_active);
        assert_eq!(docs[0].id.unwrap().to_hex(), response.id);
    }

    #[tokio::test]
    async fn test_stored_password_is_hashed_and_verifies() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone());
        svc.register(student("student@example.com", None)).await.unwrap();

        let stored = store.documents().await.remove(0);
        let hash = stored.password_hash.unwrap();
        assert_ne!(hash, "student123");
        assert!(CredentialHasher::new(4).verify("student123", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_wrong_admin_code_is_forbidden() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone());

        let err = svc
            .register(admin("admin@example.com", "+92 12345678910", "admin2024secret"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(store.len().await, 0);
        assert_eq!(store.lookups(), 0);
    }

    #[tokio::test]
    async fn test_admin_code_prefix_is_forbidden() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone());

        for code in ["ADMIN2024", "ADMIN2024SECRETX", "ADMIN2024SECRE "] {
            let err = svc
                .register(admin("admin@example.com", "+92 12345678910", code))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Forbidden(_)), "code {:?}", code);
        }
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_validation_fails_before_store_access() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone());

        let mut request = student("student@example.com", None);
        if let SignupRequest::Student(payload) = &mut request {
            payload.password = Some("short".to_string());
        }

        let err = svc.register(request).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.lookups(), 0);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_email_across_roles() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone());

        svc.register(student("shared@example.com", None)).await.unwrap();
        let err = svc
            .register(promoter("Shared@Example.com", "+92 12345678910"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(UniqueField::Email)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_phone() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone());

        svc.register(promoter("one@example.com", "+92 12345678910"))
            .await
            .unwrap();
        let err = svc
            .register(school("two@example.com", "+92 12345678910"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(UniqueField::Phone)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_email_checked_before_phone() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone());

        svc.register(promoter("one@example.com", "+92 12345678910"))
            .await
            .unwrap();
        let err = svc
            .register(promoter("one@example.com", "+92 12345678910"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(UniqueField::Email)));
    }

    #[tokio::test]
    async fn test_students_without_phone_do_not_conflict() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone());

        svc.register(student("a@example.com", None)).await.unwrap();
        svc.register(student("b@example.com", None)).await.unwrap();

        let docs = store.documents().await;
        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(|d| d.phone.is_none()));
    }

    #[tokio::test]
    async fn test_store_constraint_is_authoritative() {
        let store = Arc::new(MemoryStore::racing());
        let svc = service(store.clone());

        svc.register(promoter("race@example.com", "+92 12345678910"))
            .await
            .unwrap();
        let err = svc
            .register(student("race@example.com", None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(UniqueField::Email)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_failure_maps_to_store_error() {
        let svc = service(Arc::new(MemoryStore::failing()));

        let err = svc
            .register(promoter("p@example.com", "+92 12345678910"))
            .await
            .unwrap_err();

        match err {
            AppError::Store { public, detail } => {
                assert_eq!(public, REGISTRATION_FAILED);
                assert!(detail.contains("connection refused"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_count_by_type_one_of_each() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store);

        svc.register(admin("admin@example.com", "+92 10000000001", ADMIN_CODE))
            .await
            .unwrap();
        svc.register(student("student@example.com", None)).await.unwrap();
        svc.register(school("school@example.com", "+92 10000000002"))
            .await
            .unwrap();
        svc.register(promoter("promoter@example.com", "+92 10000000003"))
            .await
            .unwrap();

        let counts = svc.count_by_type().await.unwrap();
        assert_eq!(
            counts,
            UserCounts {
                total_users: 4,
                admins: 1,
                students: 1,
                schools_colleges: 1,
                promoters: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_list_all_strips_credentials() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store);

        svc.register(student("student@example.com", Some("+92 12345678910")))
            .await
            .unwrap();
        svc.register(promoter("promoter@example.com", "+92 10000000003"))
            .await
            .unwrap();

        let users = svc.list_all().await.unwrap();
        assert_eq!(users.len(), 2);
        for user in users {
            let json = serde_json::to_value(&user).unwrap();
            assert!(json.get("password").is_none());
            assert!(json.get("password_hash").is_none());
        }
    }

    fn legacy_institution() -> mongodb::bson::Document {
        mongodb::bson::doc! {
            "_id": mongodb::bson::oid::ObjectId::new(),
            "email": "legacy@example.com",
            "password": "$2b$12$legacyhashlegacyhashlegacyhashlegacyhashlegacyhashle",
            "phone": "+92 19999999999",
            "user_type": "school/college",
            "is_active": true,
            "institute_name": "Old College",
            "address": "Lahore, Pakistan",
        }
    }

    #[tokio::test]
    async fn test_legacy_record_email_conflicts() {
        let store = Arc::new(MemoryStore::new());
        store.seed(legacy_institution()).await;
        let svc = service(store.clone());

        let err = svc
            .register(student("Legacy@Example.com", None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(UniqueField::Email)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_legacy_record_phone_conflicts() {
        let store = Arc::new(MemoryStore::new());
        store.seed(legacy_institution()).await;
        let svc = service(store.clone());

        let err = svc
            .register(promoter("promoter@example.com", "+92 19999999999"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(UniqueField::Phone)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_legacy_records_are_listed_and_counted() {
        let store = Arc::new(MemoryStore::new());
        store.seed(legacy_institution()).await;
        store
            .seed(mongodb::bson::doc! { "_id": "imported-1", "user_type": "teacher" })
            .await;
        let svc = service(store);

        svc.register(school("school@example.com", "+92 10000000002"))
            .await
            .unwrap();

        let users = svc.list_all().await.unwrap();
        assert_eq!(users.len(), 3);

        let legacy = users
            .iter()
            .find(|u| u.email == "legacy@example.com")
            .unwrap();
        assert_eq!(legacy.user_type, "school_college");
        let json = serde_json::to_value(legacy).unwrap();
        assert!(json.get("password").is_none());
        assert!(users.iter().any(|u| u.user_type == "teacher"));

        let counts = svc.count_by_type().await.unwrap();
        assert_eq!(counts.total_users, 3);
        assert_eq!(counts.schools_colleges, 2);
    }

    #[test]
    fn test_signup_request_kind() {
        assert_eq!(
            SignupRequest::SchoolCollege(SchoolCollegeSignup::default()).kind(),
            RoleKind::SchoolCollege
        );
    }
}
