//! Business lifecycle service

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use super::model::{Business, CreateBusinessRequest, UpdateBusinessRequest};
use crate::store::{fields, BusinessStore, StoreError};
use crate::validation::FieldError;

/// Attempts at finding a free `BIZ-` identifier before giving up
pub const MAX_UNIQUE_ID_ATTEMPTS: usize = 5;

/// `BIZ-` followed by the first 8 hex digits of a v4 UUID
pub fn generate_unique_id() -> String {
    format!("BIZ-{:08x}", Uuid::new_v4().as_fields().0)
}

type IdGenerator = Arc<dyn Fn() -> String + Send + Sync>;

/// Business service errors
#[derive(Error, Debug)]
pub enum BusinessError {
    #[error("Validation failed on {}: {}", .0.field, .0.message)]
    Validation(FieldError),

    #[error("Business not found")]
    NotFound,

    #[error("Duplicate value for {0}")]
    Duplicate(&'static str),

    #[error("No free unique id after {0} attempts")]
    UniqueIdExhausted(usize),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for BusinessError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(field) => BusinessError::Duplicate(field),
            other => BusinessError::Store(other),
        }
    }
}

/// Business record lifecycle
#[derive(Clone)]
pub struct BusinessService {
    store: Arc<dyn BusinessStore>,
    generate_id: IdGenerator,
}

impl BusinessService {
    pub fn new(store: Arc<dyn BusinessStore>) -> Self {
        Self {
            store,
            generate_id: Arc::new(generate_unique_id),
        }
    }

    /// Replace the `BIZ-` identifier source
    pub fn with_id_generator<F>(mut self, generate_id: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.generate_id = Arc::new(generate_id);
        self
    }

    /// Non-deleted businesses ordered by id
    pub async fn list(&self) -> Result<Vec<Business>, BusinessError> {
        Ok(self.store.list().await?)
    }

    pub async fn get(&self, unique_id: &str) -> Result<Business, BusinessError> {
        self.store
            .find_by_unique_id(unique_id)
            .await?
            .ok_or(BusinessError::NotFound)
    }

    /// Validate and insert, regenerating the identifier on collision
    pub async fn create(&self, request: CreateBusinessRequest) -> Result<Business, BusinessError> {
        let draft = request.into_draft().map_err(BusinessError::Validation)?;

        for attempt in 1..=MAX_UNIQUE_ID_ATTEMPTS {
            let unique_id = (self.generate_id)();
            let record = draft.clone().into_new(unique_id, Utc::now());

            match self.store.insert(record).await {
                Ok(business) => {
                    tracing::info!(
                        unique_id = %business.unique_id,
                        id = business.id,
                        "Business created"
                    );
                    return Ok(business);
                }
                Err(StoreError::Duplicate(field)) if field == fields::UNIQUE_ID => {
                    tracing::warn!(attempt, "Business unique id collision, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::error!(
            attempts = MAX_UNIQUE_ID_ATTEMPTS,
            "Could not allocate a business unique id"
        );
        Err(BusinessError::UniqueIdExhausted(MAX_UNIQUE_ID_ATTEMPTS))
    }

    /// Merge the supplied fields into the live record
    pub async fn update(
        &self,
        unique_id: &str,
        request: UpdateBusinessRequest,
    ) -> Result<Business, BusinessError> {
        let patch = request.into_patch().map_err(BusinessError::Validation)?;
        let now = Utc::now();

        let business = self
            .store
            .update(
                unique_id,
                Box::new(move |business: &mut Business| {
                    patch.apply_to(business);
                    business.updated_at = business.updated_at.max(now);
                }),
            )
            .await?
            .ok_or(BusinessError::NotFound)?;

        tracing::info!(unique_id = %business.unique_id, "Business updated");
        Ok(business)
    }

    pub async fn soft_delete(&self, unique_id: &str) -> Result<(), BusinessError> {
        if !self.store.soft_delete(unique_id, Utc::now()).await? {
            return Err(BusinessError::NotFound);
        }

        tracing::info!(unique_id, "Business soft-deleted");
        Ok(())
    }
}
