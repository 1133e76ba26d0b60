//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, gRPC, database).
//! The `Display` text is the user-facing message and must stay stable.

use thiserror::Error;

/// Field of the account that an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Email,
    Phone,
    Password,
    VerificationToken,
}

impl Field {
    /// Wire name, as used in error responses.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Password => "password",
            Field::VerificationToken => "verification_token",
        }
    }

    fn empty_message(self) -> &'static str {
        match self {
            Field::Email => "Endereço de email não pode ser vazio",
            Field::Phone => "Telefone não pode ser vazio",
            Field::Password => "Senha não pode ser vazia",
            Field::VerificationToken => "Token de verificação não pode ser vazio",
        }
    }

    fn invalid_format_message(self) -> &'static str {
        match self {
            Field::Email => "Formato de email inválido",
            Field::Phone => "Formato de telefone inválido",
            Field::Password => "Formato de hash de senha inválido",
            Field::VerificationToken => "Formato de token de verificação inválido",
        }
    }

    fn no_change_message(self) -> &'static str {
        match self {
            Field::Email => "O novo e-mail precisa ser diferente do e-mail atual",
            Field::Phone => "O novo número de telefone precisa ser diferente do número atual",
            Field::Password => "A nova senha deve ser diferente da atual",
            Field::VerificationToken => "O novo token precisa ser diferente do token atual",
        }
    }
}

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Raw input was missing or blank
    #[error("{}", .0.empty_message())]
    EmptyInput(Field),

    /// Raw input did not have the expected shape
    #[error("{}", .0.invalid_format_message())]
    InvalidFormat(Field),

    /// Phone number does not have 10 or 11 digits
    #[error("Telefone deve conter 10 ou 11 dígitos")]
    InvalidLength,

    /// Phone number starts with an unknown area code
    #[error("DDD inválido")]
    InvalidAreaCode,

    /// Password shorter than the minimum length
    #[error("A senha deve ter pelo menos 6 caracteres")]
    TooShort,

    /// Password longer than the maximum length
    #[error("A senha deve ter menos de 73 caracteres")]
    TooLong,

    /// The hashing backend failed
    #[error("Erro ao processar a senha")]
    HashingError,

    /// Supplied verification token does not match the current one
    #[error("Token de verificação inválido")]
    InvalidToken,

    /// Attempted update value equals the current value
    #[error("{}", .0.no_change_message())]
    NoChange(Field),

    /// Current password check failed
    #[error("Senha atual incorreta")]
    WrongCurrentPassword,
}

impl DomainError {
    /// Stable machine-readable code for outer layers
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::EmptyInput(_) => "EMPTY_INPUT",
            DomainError::InvalidFormat(_) => "INVALID_FORMAT",
            DomainError::InvalidLength => "INVALID_LENGTH",
            DomainError::InvalidAreaCode => "INVALID_AREA_CODE",
            DomainError::TooShort => "TOO_SHORT",
            DomainError::TooLong => "TOO_LONG",
            DomainError::HashingError => "HASHING_ERROR",
            DomainError::InvalidToken => "INVALID_TOKEN",
            DomainError::NoChange(_) => "NO_CHANGE",
            DomainError::WrongCurrentPassword => "WRONG_CURRENT_PASSWORD",
        }
    }

    /// Field the error refers to, when there is one
    pub fn field(&self) -> Option<Field> {
        match self {
            DomainError::EmptyInput(field)
            | DomainError::InvalidFormat(field)
            | DomainError::NoChange(field) => Some(*field),
            DomainError::InvalidLength | DomainError::InvalidAreaCode => Some(Field::Phone),
            DomainError::TooShort
            | DomainError::TooLong
            | DomainError::HashingError
            | DomainError::WrongCurrentPassword => Some(Field::Password),
            DomainError::InvalidToken => Some(Field::VerificationToken),
        }
    }
}

/// Result type alias for domain operations.
///
/// `Ok` is a success (optionally carrying a value), `Err` a failure carrying
/// the reason; the value can only be read on success.
pub type DomainResult<T = ()> = Result<T, DomainError>;
