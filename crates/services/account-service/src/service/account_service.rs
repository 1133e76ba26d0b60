//! Account service - use cases around the user aggregate.
//!
//! Every mutation follows the same unit of work: load the aggregate, run one
//! domain operation, save the new state, then dispatch the raised events in
//! order. Nothing is saved or dispatched when the operation is rejected.
//! Units of work on the same account run one at a time.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{DomainEvent, DomainResult, Email, Password, Phone, TokenGenerator, User, VerificationToken};

use super::locks::AggregateLocks;
use crate::events::EventDispatcher;
use crate::repository::UserRepository;

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Register a new account from raw input
    async fn register(&self, email: &str, password: &str, phone: &str) -> AppResult<User>;

    /// Get account by ID
    async fn get_account(&self, id: Uuid) -> AppResult<User>;

    /// Current verification token, for hand-off to the delivery channel
    async fn verification_token(&self, id: Uuid) -> AppResult<VerificationToken>;

    /// Replace the phone number (token-gated)
    async fn update_phone(&self, id: Uuid, phone: &str, token: &str) -> AppResult<User>;

    /// Replace the email address (token-gated)
    async fn update_email(&self, id: Uuid, email: &str, token: &str) -> AppResult<User>;

    /// Change the password by proving the current one
    async fn change_password(&self, id: Uuid, current: &str, new: &str) -> AppResult<()>;

    /// Replace the password through a verification token
    async fn reset_password(&self, id: Uuid, token: &str, new: &str) -> AppResult<()>;
}

/// Concrete implementation of AccountService.
///
/// Writers to one account are serialized within this manager. Email
/// uniqueness across accounts is left to the repository's `save`.
pub struct AccountManager {
    repo: Arc<dyn UserRepository>,
    dispatcher: Arc<dyn EventDispatcher>,
    tokens: Arc<dyn TokenGenerator>,
    locks: AggregateLocks,
}

impl AccountManager {
    /// Create new account service with its collaborators
    pub fn new(
        repo: Arc<dyn UserRepository>,
        dispatcher: Arc<dyn EventDispatcher>,
        tokens: Arc<dyn TokenGenerator>,
    ) -> Self {
        Self {
            repo,
            dispatcher,
            tokens,
            locks: AggregateLocks::default(),
        }
    }

    async fn load(&self, id: Uuid) -> AppResult<User> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    /// Lock, load, apply `operation`, save, dispatch.
    async fn mutate<F>(&self, id: Uuid, operation: F) -> AppResult<User>
    where
        F: FnOnce(&mut User, &dyn TokenGenerator) -> DomainResult + Send,
    {
        let _guard = self.locks.acquire(id).await;
        let mut user = self.load(id).await?;
        operation(&mut user, self.tokens.as_ref())?;
        self.commit(&mut user).await?;
        Ok(user)
    }

    async fn commit(&self, user: &mut User) -> AppResult<()> {
        self.repo.save(user).await?;
        self.publish(user).await;
        Ok(())
    }

    async fn publish(&self, user: &mut User) {
        for event in user.take_domain_events() {
            if let Err(e) = self.dispatcher.dispatch(&event).await {
                tracing::error!(
                    event = event.name(),
                    event_id = %event.event_id(),
                    error = %e,
                    "failed to dispatch domain event"
                );
            }
        }
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn register(&self, email: &str, password: &str, phone: &str) -> AppResult<User> {
        let email = Email::new(email)?;
        let phone = Phone::new(phone)?;

        // Check if email already exists
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }

        let password = Password::new(password)?;
        let user = User::create(email, password, phone, self.tokens.as_ref());
        self.repo.save(&user).await?;

        tracing::info!(user_id = %user.id(), "account registered");
        Ok(user)
    }

    async fn get_account(&self, id: Uuid) -> AppResult<User> {
        self.load(id).await
    }

    async fn verification_token(&self, id: Uuid) -> AppResult<VerificationToken> {
        Ok(self.load(id).await?.verification_token().clone())
    }

    async fn update_phone(&self, id: Uuid, phone: &str, token: &str) -> AppResult<User> {
        let phone = Phone::new(phone)?;
        self.mutate(id, |user, tokens| user.update_phone(phone, token, tokens))
            .await
    }

    async fn update_email(&self, id: Uuid, email: &str, token: &str) -> AppResult<User> {
        let email = Email::new(email)?;

        let _guard = self.locks.acquire(id).await;
        let mut user = self.load(id).await?;

        // Token before the ownership lookup: without it a caller must not
        // learn whether the address is registered.
        user.check_token(token)?;

        if let Some(owner) = self.repo.find_by_email(&email).await? {
            // Same account falls through to the aggregate's no-change rule.
            if owner.id() != id {
                return Err(AppError::conflict("Email"));
            }
        }

        user.update_email(email, token, self.tokens.as_ref())?;
        self.commit(&mut user).await?;
        Ok(user)
    }

    async fn change_password(&self, id: Uuid, current: &str, new: &str) -> AppResult<()> {
        self.mutate(id, |user, _| user.update_password(current, new))
            .await?;
        Ok(())
    }

    async fn reset_password(&self, id: Uuid, token: &str, new: &str) -> AppResult<()> {
        self.mutate(id, |user, tokens| user.reset_password(token, new, tokens))
            .await?;
        Ok(())
    }
}
