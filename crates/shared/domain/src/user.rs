//! User aggregate root and related types.
//!
//! The aggregate owns the account's email, phone and password. Changes to
//! sensitive fields are gated by a single-use verification token that rotates
//! after every accepted change, so a consumed token never works twice.
//!
//! The aggregate is a plain in-memory value: callers load, mutate and persist
//! it within one request, then drain and dispatch its events.

use serde::Serialize;
use uuid::Uuid;

use crate::aggregate::DomainEvents;
use crate::email::Email;
use crate::error::{DomainError, DomainResult, Field};
use crate::events::{
    EmailUpdated, EventMetadata, PasswordReset, PasswordUpdated, PhoneUpdated, UserEvent,
};
use crate::password::Password;
use crate::phone::Phone;
use crate::token::{TokenGenerator, VerificationToken};

/// User aggregate root
#[derive(Debug, Clone)]
pub struct User {
    id: Uuid,
    email: Email,
    password: Password,
    phone: Phone,
    verification_token: VerificationToken,
    events: DomainEvents<UserEvent>,
}

impl User {
    /// Create a new user from already validated values.
    ///
    /// Assigns a fresh id and issues the first verification token. Creation
    /// itself raises no event.
    pub fn create<G>(email: Email, password: Password, phone: Phone, tokens: &G) -> Self
    where
        G: TokenGenerator + ?Sized,
    {
        let user = Self {
            id: Uuid::new_v4(),
            email,
            password,
            phone,
            verification_token: tokens.generate(),
            events: DomainEvents::new(),
        };
        tracing::debug!(user_id = %user.id, "user created");
        user
    }

    /// Rehydrate a persisted user. No events are raised.
    pub fn restore(
        id: Uuid,
        email: Email,
        password: Password,
        phone: Phone,
        verification_token: VerificationToken,
    ) -> Self {
        Self {
            id,
            email,
            password,
            phone,
            verification_token,
            events: DomainEvents::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &Password {
        &self.password
    }

    pub fn phone(&self) -> &Phone {
        &self.phone
    }

    /// Current verification token, to be delivered out of band.
    pub fn verification_token(&self) -> &VerificationToken {
        &self.verification_token
    }

    /// Events raised since creation or load, oldest first.
    pub fn domain_events(&self) -> &[UserEvent] {
        self.events.as_slice()
    }

    /// Drain the raised events for dispatch.
    pub fn take_domain_events(&mut self) -> Vec<UserEvent> {
        self.events.take()
    }

    pub fn remove_domain_event(&mut self, event_id: Uuid) -> bool {
        self.events.remove(event_id)
    }

    pub fn clear_domain_events(&mut self) {
        self.events.clear();
    }

    /// Replace the phone number.
    ///
    /// # Errors
    /// * `InvalidToken` if `token` is not the current verification token
    /// * `NoChange` if `phone` equals the current phone
    pub fn update_phone<G>(&mut self, phone: Phone, token: &str, tokens: &G) -> DomainResult
    where
        G: TokenGenerator + ?Sized,
    {
        self.check_token(token)?;

        if self.phone == phone {
            return Err(DomainError::NoChange(Field::Phone));
        }

        self.phone = phone;
        self.events.push(PhoneUpdated {
            user_id: self.id,
            phone: self.phone.number().to_string(),
            metadata: EventMetadata::new(),
        });
        self.rotate_token(tokens);

        tracing::debug!(user_id = %self.id, "phone updated");
        Ok(())
    }

    /// Replace the email address.
    ///
    /// # Errors
    /// * `InvalidToken` if `token` is not the current verification token
    /// * `NoChange` if `email` equals the current address
    pub fn update_email<G>(&mut self, email: Email, token: &str, tokens: &G) -> DomainResult
    where
        G: TokenGenerator + ?Sized,
    {
        self.check_token(token)?;

        if self.email == email {
            return Err(DomainError::NoChange(Field::Email));
        }

        self.email = email;
        self.events.push(EmailUpdated {
            user_id: self.id,
            email: self.email.as_str().to_string(),
            metadata: EventMetadata::new(),
        });
        self.rotate_token(tokens);

        tracing::debug!(user_id = %self.id, "email updated");
        Ok(())
    }

    /// Change the password by proving knowledge of the current one.
    ///
    /// Not token-gated, and the verification token is left as is.
    ///
    /// # Errors
    /// * `WrongCurrentPassword` if `current` does not verify
    /// * `NoChange` if `new` equals `current`
    /// * any `Password::new` error for an invalid `new`
    pub fn update_password(&mut self, current: &str, new: &str) -> DomainResult {
        if !self.password.verify(current) {
            tracing::warn!(user_id = %self.id, "password change rejected: wrong current password");
            return Err(DomainError::WrongCurrentPassword);
        }

        if current == new {
            return Err(DomainError::NoChange(Field::Password));
        }

        self.password = Password::new(new)?;
        self.events.push(PasswordUpdated {
            user_id: self.id,
            email: self.email.as_str().to_string(),
            metadata: EventMetadata::new(),
        });

        tracing::debug!(user_id = %self.id, "password updated");
        Ok(())
    }

    /// Replace the password through a verification token.
    ///
    /// # Errors
    /// * `InvalidToken` if `token` is not the current verification token
    /// * any `Password::new` error for an invalid `new`
    pub fn reset_password<G>(&mut self, token: &str, new: &str, tokens: &G) -> DomainResult
    where
        G: TokenGenerator + ?Sized,
    {
        self.check_token(token)?;

        self.password = Password::new(new)?;
        self.rotate_token(tokens);
        self.events.push(PasswordReset {
            user_id: self.id,
            email: self.email.as_str().to_string(),
            metadata: EventMetadata::new(),
        });

        tracing::debug!(user_id = %self.id, "password reset");
        Ok(())
    }

    /// Check `supplied` against the current verification token without
    /// spending it.
    ///
    /// # Errors
    /// * `InvalidToken` on mismatch
    pub fn check_token(&self, supplied: &str) -> DomainResult {
        if self.verification_token.matches(supplied) {
            Ok(())
        } else {
            tracing::warn!(user_id = %self.id, "verification token rejected");
            Err(DomainError::InvalidToken)
        }
    }

    fn rotate_token<G>(&mut self, tokens: &G)
    where
        G: TokenGenerator + ?Sized,
    {
        self.verification_token = VerificationToken::rotate(&self.verification_token, tokens);
    }
}

/// Entity equality: same non-nil id.
impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        !self.id.is_nil() && self.id == other.id
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    /// Unique user identifier
    pub id: Uuid,
    /// Normalized email address
    pub email: String,
    /// Phone digits
    pub phone: String,
    /// Phone grouped for display
    pub phone_display: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.as_str().to_string(),
            phone: user.phone.number().to_string(),
            phone_display: user.phone.to_string(),
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse::from(&user)
    }
}
