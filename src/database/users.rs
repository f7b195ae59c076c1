use super::MongoDB;
use crate::models::{NewUser, UserRecord};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::Collection;

pub const COLLECTION: &str = "users";

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("user validation failed: {0}")]
    Validation(String),
    #[error("a user named '{0}' already exists")]
    Duplicate(String),
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

/// Persistence contract for user records. Records are create-only.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Exact-match lookup. No match is an empty vec, not an error.
    async fn find_by_name(&self, name: &str) -> Result<Vec<UserRecord>, StoreError>;

    async fn list_all(&self) -> Result<Vec<UserRecord>, StoreError>;

    /// Validates the shape, assigns `_id`/`createdAt`/`__v` and writes the record.
    async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError>;
}

/// Shape validation shared by every `UserStore` implementation.
pub(crate) fn prepare_record(user: NewUser) -> Result<UserRecord, StoreError> {
    user.validate().map_err(StoreError::Validation)?;
    Ok(user.into_record())
}

pub struct MongoUserStore {
    users: Collection<UserRecord>,
}

impl MongoUserStore {
    pub fn new(db: &MongoDB) -> Self {
        Self {
            users: db.collection(COLLECTION),
        }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find_by_name(&self, name: &str) -> Result<Vec<UserRecord>, StoreError> {
        let cursor = self.users.find(doc! { "name": name }).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn list_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        let cursor = self.users.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let record = prepare_record(user)?;

        match self.users.insert_one(&record).await {
            Ok(_) => Ok(record),
            Err(e) if is_duplicate_key(&e) => Err(StoreError::Duplicate(record.name)),
            Err(e) => Err(e.into()),
        }
    }
}

/// Only raised when the unique index on `users.name` exists.
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}
