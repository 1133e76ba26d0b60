//! Domain layer - account identity core.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the email, phone and password value objects, verification tokens, the
//! domain events, and the `User` aggregate that ties them together.
//! Expected validation failures are returned as [`DomainError`], never panics.

pub mod aggregate;
pub mod constants;
pub mod email;
pub mod error;
pub mod events;
pub mod password;
pub mod phone;
pub mod token;
pub mod user;

pub use aggregate::DomainEvents;
pub use constants::*;
pub use email::Email;
pub use error::{DomainError, DomainResult, Field};
pub use events::{
    DomainEvent, EmailUpdated, EventMetadata, PasswordReset, PasswordUpdated, PhoneUpdated,
    UserEvent,
};
pub use password::Password;
pub use phone::Phone;
pub use token::{OsTokenGenerator, SeededTokenGenerator, TokenGenerator, VerificationToken};
pub use user::{User, UserResponse};
