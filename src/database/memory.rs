use super::users::{prepare_record, StoreError, UserStore};
use crate::models::{NewUser, UserRecord};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// `UserStore` kept in process memory, with the same semantics as the
/// MongoDB store. `unique_names` mirrors the optional unique index.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<UserRecord>>,
    unique_names: bool,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unique_names() -> Self {
        Self {
            unique_names: true,
            ..Self::default()
        }
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_name(&self, name: &str) -> Result<Vec<UserRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().filter(|user| user.name == name).cloned().collect())
    }

    async fn list_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        Ok(self.users.read().await.clone())
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let record = prepare_record(user)?;
        let mut users = self.users.write().await;

        if self.unique_names && users.iter().any(|existing| existing.name == record.name) {
            return Err(StoreError::Duplicate(record.name));
        }

        users.push(record.clone());
        Ok(record)
    }
}

/// Store whose every operation fails as if the server were unreachable.
pub struct UnreachableStore;

fn unreachable_error() -> StoreError {
    StoreError::Database(mongodb::error::Error::from(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "connection refused",
    )))
}

#[async_trait]
impl UserStore for UnreachableStore {
    async fn find_by_name(&self, _name: &str) -> Result<Vec<UserRecord>, StoreError> {
        Err(unreachable_error())
    }

    async fn list_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        Err(unreachable_error())
    }

    async fn insert(&self, _user: NewUser) -> Result<UserRecord, StoreError> {
        Err(unreachable_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_by_name_is_exact() {
        let store = InMemoryUserStore::new();
        store.insert(NewUser::new("Ada", 30.0)).await.unwrap();
        store.insert(NewUser::new("Ada Lovelace", 36.0)).await.unwrap();

        let found = store.find_by_name("Ada").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].age, 30.0);
        assert!(store.find_by_name("ada").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_allows_duplicates_without_unique_index() {
        let store = InMemoryUserStore::new();
        store.insert(NewUser::new("Ada", 30.0)).await.unwrap();
        store.insert(NewUser::new("Ada", 31.0)).await.unwrap();
        assert_eq!(store.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unique_names_reject_second_insert() {
        let store = InMemoryUserStore::with_unique_names();
        store.insert(NewUser::new("Ada", 30.0)).await.unwrap();

        let err = store.insert(NewUser::new("Ada", 31.0)).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(name) if name == "Ada"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_insert_validates_shape() {
        let store = InMemoryUserStore::new();
        let err = store.insert(NewUser::new("", 30.0)).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.len().await, 0);
    }
}
