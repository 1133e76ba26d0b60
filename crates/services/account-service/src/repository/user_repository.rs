//! User repository with an in-memory implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::entities::UserRecord;
use common::{AppError, AppResult};
use domain::{Email, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Implementations store aggregate state only; pending domain events are
/// not persisted.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by normalized email address
    async fn find_by_email(&self, email: &Email) -> AppResult<Option<User>>;

    /// Insert or replace the user's state.
    ///
    /// Fails with `Conflict` when another user already holds the email.
    async fn save(&self, user: &User) -> AppResult<()>;
}

/// Process-local store keyed by user id.
#[derive(Default)]
pub struct InMemoryUserStore {
    rows: RwLock<HashMap<Uuid, UserRecord>>,
}

impl InMemoryUserStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let record = self.rows.read().await.get(&id).cloned();
        record.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AppResult<Option<User>> {
        let record = self
            .rows
            .read()
            .await
            .values()
            .find(|row| row.email == email.as_str())
            .cloned();
        record.map(User::try_from).transpose()
    }

    async fn save(&self, user: &User) -> AppResult<()> {
        let record = UserRecord::from(user);
        let mut rows = self.rows.write().await;

        // Checked under the write lock so concurrent saves cannot both claim
        // the same address.
        if rows
            .values()
            .any(|row| row.email == record.email && row.id != record.id)
        {
            tracing::warn!(user_id = %user.id(), "save rejected: email already taken");
            return Err(AppError::conflict("Email"));
        }

        rows.insert(record.id, record);
        tracing::debug!(user_id = %user.id(), "user saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use domain::{OsTokenGenerator, Password, Phone};

    use super::*;

    fn create_test_user(email: &str) -> User {
        User::create(
            Email::new(email).unwrap(),
            Password::new("Senha123!").unwrap(),
            Phone::new("11999999999").unwrap(),
            &OsTokenGenerator,
        )
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let store = InMemoryUserStore::new();
        let user = create_test_user("test@example.com");
        store.save(&user).await.unwrap();

        let by_id = store.find_by_id(user.id()).await.unwrap().unwrap();
        assert_eq!(by_id, user);

        let by_email = store
            .find_by_email(&Email::new("TEST@example.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email, user);
    }

    #[tokio::test]
    async fn test_missing_user() {
        let store = InMemoryUserStore::new();
        assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
        assert!(store
            .find_by_email(&Email::new("nobody@example.com").unwrap())
            .await
            .unwrap()
            .is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_save_replaces_existing_row() {
        let store = InMemoryUserStore::new();
        let mut user = create_test_user("test@example.com");
        store.save(&user).await.unwrap();

        user.update_password("Senha123!", "NovaSenha456!").unwrap();
        store.save(&user).await.unwrap();

        assert_eq!(store.len().await, 1);
        let stored = store.find_by_id(user.id()).await.unwrap().unwrap();
        assert!(stored.password().verify("NovaSenha456!"));
        assert!(stored.domain_events().is_empty());
    }

    #[tokio::test]
    async fn test_save_rejects_email_held_by_other_user() {
        let store = InMemoryUserStore::new();
        let first = create_test_user("test@example.com");
        store.save(&first).await.unwrap();

        let second = create_test_user("Test@Example.com");
        let result = store.save(&second).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(store.len().await, 1);
        assert!(store.find_by_id(second.id()).await.unwrap().is_none());
    }
}
