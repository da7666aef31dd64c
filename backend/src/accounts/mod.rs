//! User accounts
//!
//! Registration, profile updates and soft deletion of the accounts that log
//! in to the API.

mod model;
mod service;

pub use model::{
    Account, AccountResponse, AccountSummary, CreateAccountRequest, UpdateAccountRequest,
};
pub use service::{AccountError, AccountService};
