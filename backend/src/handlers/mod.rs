//! API handlers for the business registry

pub mod auth;
pub mod business;
pub mod health;
pub mod user;

pub use auth::*;
pub use business::*;
pub use health::health_check;
pub use user::*;

// Re-export AuthenticatedUser from middleware for handler use
pub use crate::middleware::auth::AuthenticatedUser;
