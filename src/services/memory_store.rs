//! In-process [`RegistryStore`] for tests. Enforces the same unique rules
//! as the MongoDB indexes.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

use crate::models::{RoleKind, UserDocument};
use crate::services::registry_store::RegistryStore;
use crate::utils::error::{StoreError, UniqueField};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<Document>>,
    lookups: AtomicUsize,
    skip_lookups: bool,
    fail: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookups report nothing, so only the insert-time rules catch duplicates
    pub fn racing() -> Self {
        Self {
            skip_lookups: true,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Stores a raw record as is, bypassing validation
    pub async fn seed(&self, record: Document) {
        self.users.lock().await.push(record);
    }

    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }

    /// Records written by this service, decoded
    pub async fn documents(&self) -> Vec<UserDocument> {
        self.users
            .lock()
            .await
            .iter()
            .filter_map(|record| mongodb::bson::from_document(record.clone()).ok())
            .collect()
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }

    async fn find_id(&self, key: &str, value: &str) -> Result<Option<Document>, StoreError> {
        self.check()?;
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.skip_lookups {
            return Ok(None);
        }
        let users = self.users.lock().await;
        Ok(users
            .iter()
            .find(|record| record.get_str(key).ok() == Some(value))
            .map(|record| match record.get("_id") {
                Some(id) => doc! { "_id": id.clone() },
                None => Document::new(),
            }))
    }
}

#[async_trait]
impl RegistryStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Document>, StoreError> {
        self.find_id("email", email).await
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Document>, StoreError> {
        self.find_id("phone", phone).await
    }

    async fn insert(&self, document: &UserDocument) -> Result<String, StoreError> {
        self.check()?;
        let mut users = self.users.lock().await;

        if users
            .iter()
            .any(|u| u.get_str("email").ok() == Some(document.email.as_str()))
        {
            return Err(StoreError::Duplicate(UniqueField::Email));
        }
        if let Some(phone) = &document.phone {
            if users
                .iter()
                .any(|u| u.get_str("phone").ok() == Some(phone.as_str()))
            {
                return Err(StoreError::Duplicate(UniqueField::Phone));
            }
        }

        let id = ObjectId::new();
        let mut stored = mongodb::bson::to_document(document)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        stored.insert("_id", id);
        users.push(stored);

        Ok(id.to_hex())
    }

    async fn count(&self, user_type: Option<RoleKind>) -> Result<u64, StoreError> {
        self.check()?;
        let users = self.users.lock().await;
        let count = users
            .iter()
            .filter(|u| match user_type {
                Some(kind) => u
                    .get_str("user_type")
                    .map_or(false, |literal| RoleKind::from_literal(literal) == Some(kind)),
                None => true,
            })
            .count();
        Ok(count as u64)
    }

    async fn list_all(&self) -> Result<Vec<Document>, StoreError> {
        self.check()?;
        let users = self.users.lock().await;
        Ok(users
            .iter()
            .cloned()
            .map(|mut u| {
                u.remove("password");
                u.remove("password_hash");
                u
            })
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }
}
