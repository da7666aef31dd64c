//! Authentication module
//!
//! - bcrypt password hashing
//! - JWT access/refresh token issuance and verification
//! - Username/password login against the account store

mod jwt;
mod password;
mod service;

pub use jwt::{Claims, JwtError, TokenIssuer, TokenPair, TokenType, TokenVerifier};
pub use password::{hash_password, verify_password, PasswordError, PasswordHasher};
pub use service::{AuthError, AuthService, ACCOUNT_UNAVAILABLE, INVALID_CREDENTIALS};
