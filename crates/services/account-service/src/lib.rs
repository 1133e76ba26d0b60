//! Account Service Library
//!
//! Thin application shell around the `domain` user aggregate: persistence
//! behind [`repository::UserRepository`], event delivery behind
//! [`events::EventDispatcher`], and the use cases in [`service`].

pub mod config;
pub mod events;
pub mod repository;
pub mod service;

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use common::AppResult;
use domain::UserResponse;

use crate::config::AccountServiceConfig;
use crate::events::LoggingDispatcher;
use crate::repository::{InMemoryUserStore, UserRepository};
use crate::service::{AccountManager, AccountService};

/// Build the account service over the given store, with logged events and
/// the configured token generator.
pub fn account_manager(
    config: &AccountServiceConfig,
    repo: Arc<dyn UserRepository>,
) -> AccountManager {
    AccountManager::new(repo, Arc::new(LoggingDispatcher), config.token_generator())
}

/// Input for a scripted walk through the account lifecycle.
#[derive(Debug, Clone)]
pub struct DemoInput {
    pub email: String,
    pub password: String,
    pub phone: String,
    pub new_phone: String,
    pub new_email: String,
    pub new_password: String,
}

/// Account state after one lifecycle step.
#[derive(Debug, Clone, Serialize)]
pub struct DemoStep {
    pub action: &'static str,
    pub account: UserResponse,
}

/// Register an account in a fresh in-memory store, then change its phone,
/// email and password (by current password and by reset token), reading the
/// verification token from the service before each gated step.
pub async fn run_demo(config: &AccountServiceConfig, input: DemoInput) -> AppResult<Vec<DemoStep>> {
    let store = Arc::new(InMemoryUserStore::new());
    let service = account_manager(config, store);
    let mut steps = Vec::new();

    let user = service
        .register(&input.email, &input.password, &input.phone)
        .await?;
    let id = user.id();
    steps.push(DemoStep {
        action: "register",
        account: UserResponse::from(&user),
    });

    let token = service.verification_token(id).await?;
    let user = service
        .update_phone(id, &input.new_phone, token.as_str())
        .await?;
    steps.push(DemoStep {
        action: "update_phone",
        account: UserResponse::from(&user),
    });

    let token = service.verification_token(id).await?;
    let user = service
        .update_email(id, &input.new_email, token.as_str())
        .await?;
    steps.push(DemoStep {
        action: "update_email",
        account: UserResponse::from(&user),
    });

    service
        .change_password(id, &input.password, &input.new_password)
        .await?;
    steps.push(DemoStep {
        action: "change_password",
        account: UserResponse::from(&service.get_account(id).await?),
    });

    let token = service.verification_token(id).await?;
    service
        .reset_password(id, token.as_str(), &input.password)
        .await?;
    steps.push(DemoStep {
        action: "reset_password",
        account: UserResponse::from(&service.get_account(id).await?),
    });

    info!(user_id = %id, steps = steps.len(), "demo finished");
    Ok(steps)
}
