//! PostgreSQL store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    fields, AccountStore, AccountUpdate, BusinessStore, BusinessUpdate, HealthCheck, StoreError,
};
use crate::accounts::Account;
use crate::business::{Business, NewBusiness};

const ACCOUNT_COLUMNS: &str = "id, username, password_hash, email, first_name, last_name, \
     phone_number, date_of_birth, is_active, is_deleted, created_at, updated_at";

const BUSINESS_COLUMNS: &str = "id, unique_id, user_name, legal_name, organization_name, \
     gst_number, website, documents, logo, is_active, is_deleted, created_at, updated_at";

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                if let Some(field) = db.constraint().and_then(field_for_constraint) {
                    return StoreError::Duplicate(field);
                }
            }
        }
        StoreError::Database(e.to_string())
    }
}

fn field_for_constraint(constraint: &str) -> Option<&'static str> {
    match constraint {
        "users_username_active_key" => Some(fields::USERNAME),
        "businesses_unique_id_key" => Some(fields::UNIQUE_ID),
        "businesses_user_name_active_key" => Some(fields::USER_NAME),
        "businesses_legal_name_active_key" => Some(fields::LEGAL_NAME),
        "businesses_organization_name_active_key" => Some(fields::ORGANIZATION_NAME),
        "businesses_gst_number_active_key" => Some(fields::GST_NUMBER),
        _ => None,
    }
}

/// Store backed by a connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users \
             WHERE username = $1 AND is_active AND NOT is_deleted"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = $1 AND NOT is_deleted"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn insert(&self, account: Account) -> Result<Account, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            r#"
            INSERT INTO users (id, username, password_hash, email, first_name, last_name,
                               phone_number, date_of_birth, is_active, is_deleted,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, FALSE, $10, $11)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(account.id)
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(&account.email)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.phone_number)
        .bind(account.date_of_birth)
        .bind(account.is_active)
        .bind(account.created_at)
        .bind(account.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(account)
    }

    async fn update(
        &self,
        id: Uuid,
        update: AccountUpdate,
    ) -> Result<Option<Account>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = $1 AND NOT is_deleted FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut account) = current else {
            return Ok(None);
        };
        update(&mut account);

        let account = sqlx::query_as::<_, Account>(&format!(
            r#"
            UPDATE users
            SET username = $2, password_hash = $3, email = $4, first_name = $5,
                last_name = $6, phone_number = $7, date_of_birth = $8,
                is_active = $9, updated_at = $10
            WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(&account.email)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.phone_number)
        .bind(account.date_of_birth)
        .bind(account.is_active)
        .bind(account.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(account))
    }

    async fn soft_delete(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_deleted = TRUE, updated_at = GREATEST(updated_at, $2)
            WHERE id = $1 AND NOT is_deleted
            "#,
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl BusinessStore for PgStore {
    async fn list(&self) -> Result<Vec<Business>, StoreError> {
        let businesses = sqlx::query_as::<_, Business>(&format!(
            "SELECT {BUSINESS_COLUMNS} FROM businesses WHERE NOT is_deleted ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(businesses)
    }

    async fn find_by_unique_id(&self, unique_id: &str) -> Result<Option<Business>, StoreError> {
        let business = sqlx::query_as::<_, Business>(&format!(
            "SELECT {BUSINESS_COLUMNS} FROM businesses WHERE unique_id = $1 AND NOT is_deleted"
        ))
        .bind(unique_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(business)
    }

    async fn insert(&self, business: NewBusiness) -> Result<Business, StoreError> {
        let business = sqlx::query_as::<_, Business>(&format!(
            r#"
            INSERT INTO businesses (unique_id, user_name, legal_name, organization_name,
                                    gst_number, website, documents, logo, is_active,
                                    is_deleted, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, FALSE, $10, $11)
            RETURNING {BUSINESS_COLUMNS}
            "#
        ))
        .bind(&business.unique_id)
        .bind(&business.user_name)
        .bind(&business.legal_name)
        .bind(&business.organization_name)
        .bind(&business.gst_number)
        .bind(&business.website)
        .bind(&business.documents)
        .bind(&business.logo)
        .bind(business.is_active)
        .bind(business.created_at)
        .bind(business.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(business)
    }

    async fn update(
        &self,
        unique_id: &str,
        update: BusinessUpdate,
    ) -> Result<Option<Business>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Business>(&format!(
            "SELECT {BUSINESS_COLUMNS} FROM businesses \
             WHERE unique_id = $1 AND NOT is_deleted FOR UPDATE"
        ))
        .bind(unique_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut business) = current else {
            return Ok(None);
        };
        let id = business.id;
        update(&mut business);

        let business = sqlx::query_as::<_, Business>(&format!(
            r#"
            UPDATE businesses
            SET user_name = $2, legal_name = $3, organization_name = $4, gst_number = $5,
                website = $6, documents = $7, logo = $8, is_active = $9, updated_at = $10
            WHERE id = $1
            RETURNING {BUSINESS_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&business.user_name)
        .bind(&business.legal_name)
        .bind(&business.organization_name)
        .bind(&business.gst_number)
        .bind(&business.website)
        .bind(&business.documents)
        .bind(&business.logo)
        .bind(business.is_active)
        .bind(business.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(business))
    }

    async fn soft_delete(&self, unique_id: &str, at: DateTime<Utc>) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE businesses
            SET is_deleted = TRUE, updated_at = GREATEST(updated_at, $2)
            WHERE unique_id = $1 AND NOT is_deleted
            "#,
        )
        .bind(unique_id)
        .bind(at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl HealthCheck for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_names_map_to_fields() {
        assert_eq!(
            field_for_constraint("users_username_active_key"),
            Some(fields::USERNAME)
        );
        assert_eq!(
            field_for_constraint("businesses_unique_id_key"),
            Some(fields::UNIQUE_ID)
        );
        assert_eq!(
            field_for_constraint("businesses_gst_number_active_key"),
            Some(fields::GST_NUMBER)
        );
        assert_eq!(field_for_constraint("users_pkey"), None);
    }
}
