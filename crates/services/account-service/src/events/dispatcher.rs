//! Event dispatcher seam.

use async_trait::async_trait;

use common::{AppError, AppResult};
use domain::{DomainEvent, UserEvent};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Delivers user events once the aggregate state has been saved.
///
/// Delivery is best effort: callers log failures and move on.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EventDispatcher: Send + Sync {
    async fn dispatch(&self, event: &UserEvent) -> AppResult<()>;
}

/// Writes every event to the log as structured JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingDispatcher;

#[async_trait]
impl EventDispatcher for LoggingDispatcher {
    async fn dispatch(&self, event: &UserEvent) -> AppResult<()> {
        let payload = serde_json::to_string(event)
            .map_err(|e| AppError::internal(format!("event serialization failed: {}", e)))?;
        tracing::info!(
            event = event.name(),
            event_id = %event.event_id(),
            user_id = %event.aggregate_id(),
            %payload,
            "domain event"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use domain::{EventMetadata, PasswordReset};
    use uuid::Uuid;

    use super::*;

    #[tokio::test]
    async fn test_logging_dispatcher_accepts_events() {
        let event = UserEvent::from(PasswordReset {
            user_id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            metadata: EventMetadata::new(),
        });

        tokio_test::assert_ok!(LoggingDispatcher.dispatch(&event).await);
    }
}
