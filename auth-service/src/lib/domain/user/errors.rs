use thiserror::Error;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Error for Password policy failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Error for revocation store operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RevocationStoreError {
    #[error("Revocation store unavailable: {0}")]
    Unavailable(String),

    #[error("Revocation store command failed: {0}")]
    CommandFailed(String),
}

/// Top-level error for all user and session operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserError {
    // Input validation errors (automatically converted via #[from])
    #[error("Invalid username: {0}")]
    BadUsername(#[from] UsernameError),

    #[error("Invalid password: {0}")]
    BadPassword(#[from] PasswordPolicyError),

    // Domain-level errors
    #[error("Username already exists: {0}")]
    UsernameConflict(String),

    /// Same message for unknown user and wrong password.
    #[error("Invalid credentials")]
    AuthenticationFailed,

    // Infrastructure errors
    #[error("Password error: {0}")]
    Password(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Revocation store error: {0}")]
    RevocationStore(#[from] RevocationStoreError),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        UserError::Unknown(err.to_string())
    }
}
