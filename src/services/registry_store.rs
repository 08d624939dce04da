use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::error::{ErrorKind, WriteFailure};

use crate::database::{MongoDB, PHONE_INDEX};
use crate::models::{RoleKind, UserDocument};
use crate::utils::error::{StoreError, UniqueField};

/// MongoDB duplicate key error code
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Persistence seam for registered users. All roles share one collection.
///
/// Reads return raw documents: the collection may hold records written by
/// other tools, so nothing here assumes they match [`UserDocument`].
#[async_trait]
pub trait RegistryStore: Send + Sync {
    /// The matching record reduced to its `_id`, if any
    async fn find_by_email(&self, email: &str) -> Result<Option<Document>, StoreError>;

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Document>, StoreError>;

    /// Inserts the document and returns the generated id as a hex string.
    /// A unique index hit surfaces as [`StoreError::Duplicate`].
    async fn insert(&self, document: &UserDocument) -> Result<String, StoreError>;

    /// Counts users of one role, or all users when `user_type` is `None`
    async fn count(&self, user_type: Option<RoleKind>) -> Result<u64, StoreError>;

    /// Every stored record with `password` and `password_hash` projected out
    async fn list_all(&self) -> Result<Vec<Document>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait]
impl RegistryStore for MongoDB {
    async fn find_by_email(&self, email: &str) -> Result<Option<Document>, StoreError> {
        Ok(self
            .raw_users()
            .find_one(doc! { "email": email })
            .projection(doc! { "_id": 1 })
            .await?)
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Document>, StoreError> {
        Ok(self
            .raw_users()
            .find_one(doc! { "phone": phone })
            .projection(doc! { "_id": 1 })
            .await?)
    }

    async fn insert(&self, document: &UserDocument) -> Result<String, StoreError> {
        let result = self.users().insert_one(document).await.map_err(|e| {
            match duplicate_field(&e) {
                Some(field) => StoreError::Duplicate(field),
                None => StoreError::from(e),
            }
        })?;

        Ok(result
            .inserted_id
            .as_object_id()
            .map(|id| id.to_hex())
            .unwrap_or_else(|| result.inserted_id.to_string()))
    }

    async fn count(&self, user_type: Option<RoleKind>) -> Result<u64, StoreError> {
        let filter = match user_type {
            Some(kind) => doc! { "user_type": { "$in": kind.stored_literals().to_vec() } },
            None => Document::new(),
        };
        Ok(self.users().count_documents(filter).await?)
    }

    async fn list_all(&self) -> Result<Vec<Document>, StoreError> {
        let cursor = self
            .raw_users()
            .find(doc! {})
            .projection(doc! { "password": 0, "password_hash": 0 })
            .await?;

        let users: Vec<Document> = cursor.try_collect().await?;
        Ok(users)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(MongoDB::ping(self).await?)
    }
}

/// Maps a duplicate key write error to the field whose index rejected it
fn duplicate_field(err: &mongodb::error::Error) -> Option<UniqueField> {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE =>
        {
            Some(field_from_duplicate_message(&write_error.message))
        }
        _ => None,
    }
}

fn field_from_duplicate_message(message: &str) -> UniqueField {
    if message.contains(PHONE_INDEX) || message.contains("dup key: { phone") {
        UniqueField::Phone
    } else {
        UniqueField::Email
    }
}
