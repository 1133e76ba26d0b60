//! Account service tests against the in-memory store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use account_service_lib::config::AccountServiceConfig;
use account_service_lib::events::EventDispatcher;
use account_service_lib::repository::{InMemoryUserStore, UserRepository};
use account_service_lib::service::{AccountManager, AccountService};
use account_service_lib::{run_demo, DemoInput};
use common::{AppError, AppResult};
use domain::{DomainError, DomainEvent, Email, Field, SeededTokenGenerator, User, UserEvent};

/// Keeps every dispatched event for inspection.
#[derive(Default)]
struct RecordingDispatcher {
    events: Mutex<Vec<UserEvent>>,
}

impl RecordingDispatcher {
    fn names(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|e| e.name()).collect()
    }
}

#[async_trait]
impl EventDispatcher for RecordingDispatcher {
    async fn dispatch(&self, event: &UserEvent) -> AppResult<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Store that yields to the scheduler after every read, so concurrent
/// requests interleave between their load and their save.
#[derive(Default)]
struct YieldingStore {
    inner: InMemoryUserStore,
}

#[async_trait]
impl UserRepository for YieldingStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let found = self.inner.find_by_id(id).await;
        tokio::task::yield_now().await;
        found
    }

    async fn find_by_email(&self, email: &Email) -> AppResult<Option<User>> {
        let found = self.inner.find_by_email(email).await;
        tokio::task::yield_now().await;
        found
    }

    async fn save(&self, user: &User) -> AppResult<()> {
        self.inner.save(user).await
    }
}

struct Fixture {
    store: Arc<InMemoryUserStore>,
    dispatcher: Arc<RecordingDispatcher>,
    service: AccountManager,
}

fn fixture() -> Fixture {
    let store = Arc::new(InMemoryUserStore::new());
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let service = AccountManager::new(
        store.clone(),
        dispatcher.clone(),
        Arc::new(SeededTokenGenerator::new(2024)),
    );
    Fixture {
        store,
        dispatcher,
        service,
    }
}

fn yielding_fixture() -> (Arc<YieldingStore>, Arc<RecordingDispatcher>, AccountManager) {
    let store = Arc::new(YieldingStore::default());
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let service = AccountManager::new(
        store.clone(),
        dispatcher.clone(),
        Arc::new(SeededTokenGenerator::new(2024)),
    );
    (store, dispatcher, service)
}

async fn register(fx: &Fixture) -> Uuid {
    fx.service
        .register("test@example.com", "Senha123!", "11999999999")
        .await
        .unwrap()
        .id()
}

#[tokio::test]
async fn test_register_persists_account() {
    let fx = fixture();
    let id = register(&fx).await;

    let stored = fx.store.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.email().as_str(), "test@example.com");
    assert!(stored.password().verify("Senha123!"));
    assert!(fx.dispatcher.names().is_empty());
}

#[tokio::test]
async fn test_register_rejects_duplicate_email_case_insensitively() {
    let fx = fixture();
    register(&fx).await;

    let result = fx
        .service
        .register("TEST@example.com", "Outra123!", "21988887777")
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(fx.store.len().await, 1);
}

#[tokio::test]
async fn test_register_reports_value_errors() {
    let fx = fixture();

    let phone = fx
        .service
        .register("test@example.com", "Senha123!", "(00) 1234-5678")
        .await;
    assert!(matches!(phone, Err(AppError::Domain(DomainError::InvalidAreaCode))));

    let password = fx
        .service
        .register("test@example.com", "12345", "11999999999")
        .await;
    assert!(matches!(password, Err(AppError::Domain(DomainError::TooShort))));
    assert!(fx.store.is_empty().await);
}

#[tokio::test]
async fn test_token_is_single_use_across_requests() {
    let fx = fixture();
    let id = register(&fx).await;
    let token = fx.service.verification_token(id).await.unwrap();

    fx.service
        .update_phone(id, "(47) 9.9999-1234", token.as_str())
        .await
        .unwrap();

    let replay = fx
        .service
        .update_email(id, "novo@example.com", token.as_str())
        .await;
    assert!(matches!(replay, Err(AppError::Domain(DomainError::InvalidToken))));

    let stored = fx.service.get_account(id).await.unwrap();
    assert_eq!(stored.phone().to_string(), "(47) 99999-1234");
    assert_eq!(stored.email().as_str(), "test@example.com");
    assert_ne!(stored.verification_token(), &token);
    assert_eq!(fx.dispatcher.names(), ["user.phone_updated"]);
}

#[tokio::test]
async fn test_concurrent_updates_cannot_share_a_token() {
    let (store, dispatcher, service) = yielding_fixture();
    let id = service
        .register("test@example.com", "Senha123!", "11999999999")
        .await
        .unwrap()
        .id();
    let token = service.verification_token(id).await.unwrap();

    let (phone, email) = tokio::join!(
        service.update_phone(id, "11988887777", token.as_str()),
        service.update_email(id, "novo@example.com", token.as_str()),
    );

    assert_eq!(
        [phone.is_ok(), email.is_ok()].iter().filter(|ok| **ok).count(),
        1
    );
    let stored = store.find_by_id(id).await.unwrap().unwrap();
    match (phone, email) {
        (Ok(_), Err(AppError::Domain(DomainError::InvalidToken))) => {
            assert_eq!(stored.phone().number(), "11988887777");
            assert_eq!(stored.email().as_str(), "test@example.com");
            assert_eq!(dispatcher.names(), ["user.phone_updated"]);
        }
        (Err(AppError::Domain(DomainError::InvalidToken)), Ok(_)) => {
            assert_eq!(stored.phone().number(), "11999999999");
            assert_eq!(stored.email().as_str(), "novo@example.com");
            assert_eq!(dispatcher.names(), ["user.email_updated"]);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_ne!(stored.verification_token(), &token);
}

#[tokio::test]
async fn test_concurrent_registrations_keep_email_unique() {
    let (store, _, service) = yielding_fixture();

    let (first, second) = tokio::join!(
        service.register("same@example.com", "Senha123!", "11999999999"),
        service.register("SAME@example.com", "Outra123!", "21988887777"),
    );

    let conflicts = [&first, &second]
        .iter()
        .filter(|r| matches!(r, Err(AppError::Conflict(_))))
        .count();
    assert!(first.is_ok() || second.is_ok());
    assert_eq!(conflicts, 1);
    assert_eq!(store.inner.len().await, 1);
}

#[tokio::test]
async fn test_concurrent_email_updates_keep_email_unique() {
    let (store, _, service) = yielding_fixture();
    let a = service
        .register("a@example.com", "Senha123!", "11999999999")
        .await
        .unwrap();
    let b = service
        .register("b@example.com", "Senha123!", "21988887777")
        .await
        .unwrap();

    let (ra, rb) = tokio::join!(
        service.update_email(a.id(), "wanted@example.com", a.verification_token().as_str()),
        service.update_email(b.id(), "wanted@example.com", b.verification_token().as_str()),
    );

    assert_eq!(
        [&ra, &rb]
            .iter()
            .filter(|r| matches!(r, Err(AppError::Conflict(_))))
            .count(),
        1
    );
    let wanted = Email::new("wanted@example.com").unwrap();
    let owner = store.find_by_email(&wanted).await.unwrap().unwrap();
    let winner = if ra.is_ok() { a.id() } else { b.id() };
    assert_eq!(owner.id(), winner);
}

#[tokio::test]
async fn test_update_email_with_wrong_token_hides_taken_address() {
    let fx = fixture();
    let id = register(&fx).await;
    fx.service
        .register("taken@example.com", "Senha123!", "21988887777")
        .await
        .unwrap();

    let result = fx
        .service
        .update_email(id, "taken@example.com", "000000")
        .await;

    assert!(matches!(result, Err(AppError::Domain(DomainError::InvalidToken))));
}

#[tokio::test]
async fn test_update_email_to_same_address_is_no_change() {
    let fx = fixture();
    let id = register(&fx).await;
    let token = fx.service.verification_token(id).await.unwrap();

    let result = fx
        .service
        .update_email(id, "Test@Example.com", token.as_str())
        .await;

    assert!(matches!(
        result,
        Err(AppError::Domain(DomainError::NoChange(Field::Email)))
    ));
    assert!(fx.dispatcher.names().is_empty());
    // The unused token still works.
    assert_eq!(fx.service.verification_token(id).await.unwrap(), token);
}

#[tokio::test]
async fn test_update_email_taken_by_other_account() {
    let fx = fixture();
    let id = register(&fx).await;
    fx.service
        .register("taken@example.com", "Senha123!", "21988887777")
        .await
        .unwrap();
    let token = fx.service.verification_token(id).await.unwrap();

    let result = fx
        .service
        .update_email(id, "taken@example.com", token.as_str())
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_password_flows() {
    let fx = fixture();
    let id = register(&fx).await;

    let wrong = fx
        .service
        .change_password(id, "Errada123!", "NovaSenha456!")
        .await;
    assert!(matches!(
        wrong,
        Err(AppError::Domain(DomainError::WrongCurrentPassword))
    ));

    let token_before = fx.service.verification_token(id).await.unwrap();
    fx.service
        .change_password(id, "Senha123!", "NovaSenha456!")
        .await
        .unwrap();
    // Changing the password by the current one leaves the token alone.
    assert_eq!(fx.service.verification_token(id).await.unwrap(), token_before);

    fx.service
        .reset_password(id, token_before.as_str(), "Resetada789!")
        .await
        .unwrap();

    let stored = fx.service.get_account(id).await.unwrap();
    assert!(stored.password().verify("Resetada789!"));
    assert!(!stored.password().verify("NovaSenha456!"));
    assert_ne!(stored.verification_token(), &token_before);
    assert_eq!(
        fx.dispatcher.names(),
        ["user.password_updated", "user.password_reset"]
    );
}

#[tokio::test]
async fn test_unknown_account() {
    let fx = fixture();
    let result = fx
        .service
        .update_phone(Uuid::new_v4(), "11988887777", "123456")
        .await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_demo_runs_full_lifecycle() {
    let config = AccountServiceConfig {
        token_seed: Some(7),
        ..Default::default()
    };
    let input = DemoInput {
        email: "usuario@example.com".to_string(),
        password: "Senha123!".to_string(),
        phone: "(11) 98765-4321".to_string(),
        new_phone: "4733334444".to_string(),
        new_email: "Novo@Example.com".to_string(),
        new_password: "NovaSenha456!".to_string(),
    };

    let steps = run_demo(&config, input).await.unwrap();

    let actions: Vec<_> = steps.iter().map(|s| s.action).collect();
    assert_eq!(
        actions,
        ["register", "update_phone", "update_email", "change_password", "reset_password"]
    );
    let last = &steps[4].account;
    assert_eq!(last.email, "novo@example.com");
    assert_eq!(last.phone_display, "(47) 3333-4444");
    assert!(steps.iter().all(|s| s.account.id == steps[0].account.id));
}
