//! Business registry backend library
//!
//! User accounts with password login and JWT sessions, plus CRUD over
//! soft-deletable business records.

pub mod accounts;
pub mod auth;
pub mod business;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod validation;

pub use routes::app;
pub use state::AppState;
