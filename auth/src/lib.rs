//! Authentication utilities library
//!
//! Provides the token lifecycle and credential primitives used by the auth service:
//! - Password hashing (Argon2id, fresh salt per hash)
//! - Session token issuance, validation and remaining-lifetime computation (HS256 JWT)
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{TokenConfig, TokenProvider};
//!
//! let config = TokenConfig::new(
//!     b"secret_key_at_least_32_bytes_long!".to_vec(),
//!     chrono::Duration::hours(1),
//! )
//! .unwrap();
//! let provider = TokenProvider::new(config);
//!
//! let token = provider.issue("alice").unwrap();
//! assert!(provider.validate(&token));
//! assert!(provider.remaining_lifetime(&token).is_some());
//! assert!(!provider.validate("garbage"));
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, TokenConfig};
//!
//! let config = TokenConfig::new(
//!     b"secret_key_at_least_32_bytes_long!".to_vec(),
//!     chrono::Duration::hours(1),
//! )
//! .unwrap();
//! let auth = Authenticator::new(config);
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let token = auth.authenticate("password123", &hash, "alice").unwrap();
//!
//! // Validate token
//! assert_eq!(auth.token_subject(&token).unwrap(), "alice");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::Clock;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::SystemClock;
pub use jwt::TokenConfig;
pub use jwt::TokenProvider;
pub use password::PasswordError;
pub use password::PasswordHasher;
