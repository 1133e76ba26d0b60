//! Domain events raised by the user aggregate.
//!
//! Events are inert data: they are collected on the aggregate and delivered by
//! an outer layer after the new state has been persisted. They only carry
//! public-safe values (never password hashes or verification tokens).

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Common accessors for every domain event.
pub trait DomainEvent {
    /// Unique identifier of this occurrence
    fn event_id(&self) -> Uuid;

    /// When the event was raised
    fn occurred_on(&self) -> DateTime<Utc>;

    /// Aggregate the event belongs to
    fn aggregate_id(&self) -> Uuid;

    /// Stable event name for routing
    fn name(&self) -> &'static str;
}

/// Identity and timestamp of an event occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventMetadata {
    pub event_id: Uuid,
    pub occurred_on: DateTime<Utc>,
}

impl EventMetadata {
    pub fn new() -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_on: Utc::now(),
        }
    }
}

impl Default for EventMetadata {
    fn default() -> Self {
        Self::new()
    }
}

/// The user's email address was replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailUpdated {
    pub user_id: Uuid,
    pub email: String,
    #[serde(flatten)]
    pub metadata: EventMetadata,
}

/// The user's phone number was replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneUpdated {
    pub user_id: Uuid,
    pub phone: String,
    #[serde(flatten)]
    pub metadata: EventMetadata,
}

/// The user changed their password by proving the current one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordUpdated {
    pub user_id: Uuid,
    pub email: String,
    #[serde(flatten)]
    pub metadata: EventMetadata,
}

/// The user replaced their password through a verification token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordReset {
    pub user_id: Uuid,
    pub email: String,
    #[serde(flatten)]
    pub metadata: EventMetadata,
}

macro_rules! impl_domain_event {
    ($event:ty, $name:literal) => {
        impl DomainEvent for $event {
            fn event_id(&self) -> Uuid {
                self.metadata.event_id
            }

            fn occurred_on(&self) -> DateTime<Utc> {
                self.metadata.occurred_on
            }

            fn aggregate_id(&self) -> Uuid {
                self.user_id
            }

            fn name(&self) -> &'static str {
                $name
            }
        }
    };
}

impl_domain_event!(EmailUpdated, "user.email_updated");
impl_domain_event!(PhoneUpdated, "user.phone_updated");
impl_domain_event!(PasswordUpdated, "user.password_updated");
impl_domain_event!(PasswordReset, "user.password_reset");

/// Any event raised by the user aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserEvent {
    EmailUpdated(EmailUpdated),
    PhoneUpdated(PhoneUpdated),
    PasswordUpdated(PasswordUpdated),
    PasswordReset(PasswordReset),
}

impl UserEvent {
    fn inner(&self) -> &dyn DomainEvent {
        match self {
            UserEvent::EmailUpdated(e) => e,
            UserEvent::PhoneUpdated(e) => e,
            UserEvent::PasswordUpdated(e) => e,
            UserEvent::PasswordReset(e) => e,
        }
    }
}

impl DomainEvent for UserEvent {
    fn event_id(&self) -> Uuid {
        self.inner().event_id()
    }

    fn occurred_on(&self) -> DateTime<Utc> {
        self.inner().occurred_on()
    }

    fn aggregate_id(&self) -> Uuid {
        self.inner().aggregate_id()
    }

    fn name(&self) -> &'static str {
        self.inner().name()
    }
}

impl From<EmailUpdated> for UserEvent {
    fn from(event: EmailUpdated) -> Self {
        UserEvent::EmailUpdated(event)
    }
}

impl From<PhoneUpdated> for UserEvent {
    fn from(event: PhoneUpdated) -> Self {
        UserEvent::PhoneUpdated(event)
    }
}

impl From<PasswordUpdated> for UserEvent {
    fn from(event: PasswordUpdated) -> Self {
        UserEvent::PasswordUpdated(event)
    }
}

impl From<PasswordReset> for UserEvent {
    fn from(event: PasswordReset) -> Self {
        UserEvent::PasswordReset(event)
    }
}
