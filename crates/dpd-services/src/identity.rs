//! Anonymous client identity, created once per storage namespace.

use std::sync::Arc;

use dpd_core::error::{AppError, Result};
use dpd_core::traits::KeyValueStore;
use tokio::sync::OnceCell;
use uuid::Uuid;

pub const DEFAULT_CLIENT_ID_KEY: &str = "dpd_user_id";

const ID_PREFIX: &str = "user_";
const ID_LEN: usize = 13;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub struct ClientIdentity {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    cached: OnceCell<String>,
}

impl ClientIdentity {
    pub fn new(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            cached: OnceCell::new(),
        }
    }

    /// Returns the stored identifier, generating and persisting one on first use.
    /// Concurrent first callers share a single generated value.
    pub async fn get_or_create(&self) -> Result<String> {
        self.cached
            .get_or_try_init(|| async {
                if let Some(existing) = self.storage.get(&self.key).await? {
                    let existing = existing.trim().to_string();
                    if !existing.is_empty() {
                        return Ok::<_, AppError>(existing);
                    }
                }
                let id = generate_client_id();
                self.storage.set(&self.key, &id).await?;
                tracing::info!(client_id = %id, "generated new client identity");
                Ok(id)
            })
            .await
            .cloned()
    }
}

/// `user_` followed by 13 base-36 characters of a random v4 UUID.
pub fn generate_client_id() -> String {
    let mut n = Uuid::new_v4().as_u128();
    let mut id = String::with_capacity(ID_PREFIX.len() + ID_LEN);
    id.push_str(ID_PREFIX);
    for _ in 0..ID_LEN {
        id.push(BASE36[(n % 36) as usize] as char);
        n /= 36;
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpd_core::traits::MockKeyValueStore;
    use dpd_storage_local::MemoryKeyValueStore;

    #[test]
    fn generated_ids_are_prefixed_and_distinct() {
        let a = generate_client_id();
        let b = generate_client_id();
        assert!(a.starts_with("user_"));
        assert_eq!(a.len(), 18);
        assert!(a[5..].chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn identity_is_stable_across_sessions() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());

        let first = ClientIdentity::new(storage.clone(), DEFAULT_CLIENT_ID_KEY)
            .get_or_create()
            .await
            .unwrap();
        // A fresh provider on the same namespace models a new session.
        let second = ClientIdentity::new(storage.clone(), DEFAULT_CLIENT_ID_KEY)
            .get_or_create()
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(storage.get(DEFAULT_CLIENT_ID_KEY).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn cleared_storage_yields_a_new_identity() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let first = ClientIdentity::new(storage.clone(), "id").get_or_create().await.unwrap();
        storage.remove("id").await.unwrap();
        let second = ClientIdentity::new(storage, "id").get_or_create().await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn storage_is_read_once_per_provider() {
        let mut storage = MockKeyValueStore::new();
        storage
            .expect_get()
            .times(1)
            .returning(|_| Ok(Some("user_fixed".to_string())));
        storage.expect_set().never();

        let identity = ClientIdentity::new(Arc::new(storage), "id");
        assert_eq!(identity.get_or_create().await.unwrap(), "user_fixed");
        assert_eq!(identity.get_or_create().await.unwrap(), "user_fixed");
    }

    #[tokio::test]
    async fn unavailable_storage_is_reported() {
        let mut storage = MockKeyValueStore::new();
        storage
            .expect_get()
            .returning(|_| Err(AppError::Persistence("disk gone".into())));

        let identity = ClientIdentity::new(Arc::new(storage), "id");
        tokio_test::assert_err!(identity.get_or_create().await);
    }
}
