//! Stored form of the user aggregate.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{Email, Password, Phone, User, VerificationToken};

/// One persisted account row, primitive columns only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub verification_token: String,
}

/// Convert domain aggregate to storage row
impl From<&User> for UserRecord {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            email: user.email().as_str().to_string(),
            password_hash: user.password().as_str().to_string(),
            phone: user.phone().number().to_string(),
            verification_token: user.verification_token().as_str().to_string(),
        }
    }
}

/// Convert storage row back to domain aggregate, revalidating every column
impl TryFrom<UserRecord> for User {
    type Error = AppError;

    fn try_from(record: UserRecord) -> AppResult<Self> {
        let corrupt = |column: &str, e: domain::DomainError| {
            AppError::internal(format!("corrupt user record {} ({}): {}", record.id, column, e))
        };

        let email = Email::new(&record.email).map_err(|e| corrupt("email", e))?;
        let password =
            Password::from_hash(record.password_hash.as_str()).map_err(|e| corrupt("password_hash", e))?;
        let phone = Phone::new(&record.phone).map_err(|e| corrupt("phone", e))?;
        let token = VerificationToken::parse(&record.verification_token)
            .map_err(|e| corrupt("verification_token", e))?;

        Ok(User::restore(record.id, email, password, phone, token))
    }
}
