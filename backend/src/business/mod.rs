//! Business records
//!
//! Lifecycle of registered businesses: `BIZ-` identifier assignment,
//! partial updates and soft deletion.

mod model;
mod service;

pub use model::{
    Business, BusinessDraft, BusinessPatch, CreateBusinessRequest, NewBusiness,
    UpdateBusinessRequest,
};
pub use service::{generate_unique_id, BusinessError, BusinessService, MAX_UNIQUE_ID_ATTEMPTS};
