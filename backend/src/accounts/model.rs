use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{string_or_number, trim_field};
use crate::validation::{validate_handle, validate_phone_number};

/// Stored user account. Never serialized directly; the password hash stays
/// inside the service layer.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public projection returned by login
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email: account.email.clone(),
            phone_number: account.phone_number.clone(),
        }
    }
}

/// Profile returned by the user endpoints
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub dob: NaiveDate,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            phone_number: account.phone_number,
            dob: account.date_of_birth,
            is_active: account.is_active,
            is_deleted: account.is_deleted,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Registration payload
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateAccountRequest {
    #[serde(default)]
    #[validate(
        required(message = "This field is required."),
        length(min = 3, max = 25, message = "Ensure this field has 3 to 25 characters."),
        custom = "validate_handle"
    )]
    pub username: Option<String>,

    #[serde(default)]
    #[validate(
        required(message = "This field is required."),
        length(min = 3, max = 35, message = "Ensure this field has 3 to 35 characters.")
    )]
    pub first_name: Option<String>,

    #[serde(default)]
    #[validate(
        required(message = "This field is required."),
        length(min = 3, max = 35, message = "Ensure this field has 3 to 35 characters.")
    )]
    pub last_name: Option<String>,

    #[serde(default)]
    #[validate(
        required(message = "This field is required."),
        length(min = 3, max = 35, message = "Ensure this field has 3 to 35 characters.")
    )]
    pub password: Option<String>,

    #[serde(default)]
    #[validate(
        required(message = "This field is required."),
        email(message = "Enter a valid email address.")
    )]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "string_or_number")]
    #[validate(
        required(message = "This field is required."),
        custom = "validate_phone_number"
    )]
    pub phone_number: Option<String>,

    #[serde(default, alias = "dob")]
    #[validate(required(message = "This field is required."))]
    pub date_of_birth: Option<NaiveDate>,
}

impl CreateAccountRequest {
    pub const FIELD_ORDER: &'static [&'static str] = &[
        "username",
        "first_name",
        "last_name",
        "password",
        "email",
        "phone_number",
        "date_of_birth",
    ];

    /// Trim surrounding whitespace. Passwords are taken verbatim.
    pub fn normalized(mut self) -> Self {
        trim_field(&mut self.username);
        trim_field(&mut self.first_name);
        trim_field(&mut self.last_name);
        trim_field(&mut self.email);
        trim_field(&mut self.phone_number);
        self
    }
}

/// Partial profile update. Passwords are not changed through this path.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    #[serde(default)]
    #[validate(
        length(min = 3, max = 25, message = "Ensure this field has 3 to 25 characters."),
        custom = "validate_handle"
    )]
    pub username: Option<String>,

    #[serde(default)]
    #[validate(length(min = 3, max = 35, message = "Ensure this field has 3 to 35 characters."))]
    pub first_name: Option<String>,

    #[serde(default)]
    #[validate(length(min = 3, max = 35, message = "Ensure this field has 3 to 35 characters."))]
    pub last_name: Option<String>,

    #[serde(default)]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "string_or_number")]
    #[validate(custom = "validate_phone_number")]
    pub phone_number: Option<String>,

    #[serde(default, alias = "dob")]
    pub date_of_birth: Option<NaiveDate>,
}

impl UpdateAccountRequest {
    pub const FIELD_ORDER: &'static [&'static str] = &[
        "username",
        "first_name",
        "last_name",
        "email",
        "phone_number",
        "date_of_birth",
    ];

    pub fn normalized(mut self) -> Self {
        trim_field(&mut self.username);
        trim_field(&mut self.first_name);
        trim_field(&mut self.last_name);
        trim_field(&mut self.email);
        trim_field(&mut self.phone_number);
        self
    }

    /// Merge the supplied fields into `account`
    pub fn apply_to(self, account: &mut Account) {
        if let Some(username) = self.username {
            account.username = username;
        }
        if let Some(first_name) = self.first_name {
            account.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            account.last_name = last_name;
        }
        if let Some(email) = self.email {
            account.email = email;
        }
        if let Some(phone_number) = self.phone_number {
            account.phone_number = phone_number;
        }
        if let Some(date_of_birth) = self.date_of_birth {
            account.date_of_birth = date_of_birth;
        }
    }
}
