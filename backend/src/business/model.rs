use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{blank_to_none, double_option};
use crate::validation::{first_error, validate_company_name, validate_handle, FieldError};

/// Stored business record, serialized with the `businesses_` field prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Business {
    #[serde(rename = "businesses_id")]
    pub id: i64,
    #[serde(rename = "businesses_unique_id")]
    pub unique_id: String,
    #[serde(rename = "businesses_user_name")]
    pub user_name: Option<String>,
    #[serde(rename = "businesses_legal_name")]
    pub legal_name: String,
    #[serde(rename = "businesses_organization_name")]
    pub organization_name: Option<String>,
    #[serde(rename = "businesses_gst_number")]
    pub gst_number: Option<String>,
    #[serde(rename = "businesses_website")]
    pub website: Option<String>,
    #[serde(rename = "businesses_documents")]
    pub documents: Option<String>,
    #[serde(rename = "businesses_logo")]
    pub logo: Option<String>,
    #[serde(rename = "businesses_is_active")]
    pub is_active: bool,
    #[serde(rename = "businesses_is_deleted")]
    pub is_deleted: bool,
    #[serde(rename = "businesses_created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "businesses_updated_at")]
    pub updated_at: DateTime<Utc>,
}

/// Insert payload: everything except the store-assigned sequential id
#[derive(Debug, Clone)]
pub struct NewBusiness {
    pub unique_id: String,
    pub user_name: Option<String>,
    pub legal_name: String,
    pub organization_name: Option<String>,
    pub gst_number: Option<String>,
    pub website: Option<String>,
    pub documents: Option<String>,
    pub logo: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload as received on the wire
#[derive(Debug, Default, Deserialize)]
pub struct CreateBusinessRequest {
    #[serde(default)]
    pub businesses_user_name: Option<String>,
    #[serde(default)]
    pub businesses_legal_name: Option<String>,
    #[serde(default)]
    pub businesses_organization_name: Option<String>,
    #[serde(default)]
    pub businesses_gst_number: Option<String>,
    #[serde(default)]
    pub businesses_website: Option<String>,
    #[serde(default)]
    pub businesses_documents: Option<String>,
    #[serde(default)]
    pub businesses_logo: Option<String>,
    #[serde(default)]
    pub businesses_is_active: Option<bool>,
}

/// Partial update payload. `null` clears an optional field; an absent key
/// leaves it untouched. Identity and delete flags are not accepted.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBusinessRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub businesses_user_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub businesses_legal_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub businesses_organization_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub businesses_gst_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub businesses_website: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub businesses_documents: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub businesses_logo: Option<Option<String>>,
    #[serde(default)]
    pub businesses_is_active: Option<bool>,
}

/// Validated create fields
#[derive(Debug, Clone)]
pub struct BusinessDraft {
    pub user_name: Option<String>,
    pub legal_name: String,
    pub organization_name: Option<String>,
    pub gst_number: Option<String>,
    pub website: Option<String>,
    pub documents: Option<String>,
    pub logo: Option<String>,
    pub is_active: bool,
}

/// Validated update fields
#[derive(Debug, Clone, Default)]
pub struct BusinessPatch {
    pub user_name: Option<Option<String>>,
    pub legal_name: Option<String>,
    pub organization_name: Option<Option<String>>,
    pub gst_number: Option<Option<String>>,
    pub website: Option<Option<String>>,
    pub documents: Option<Option<String>>,
    pub logo: Option<Option<String>>,
    pub is_active: Option<bool>,
}

const LEGAL_NAME: &str = "businesses_legal_name";

const FIELD_ORDER: &[&str] = &[
    "businesses_user_name",
    "businesses_legal_name",
    "businesses_organization_name",
    "businesses_gst_number",
    "businesses_website",
];

/// Format checks shared by create and update
#[derive(Debug, Default, Validate)]
struct BusinessFields {
    #[validate(
        length(max = 255, message = "Ensure this field has no more than 255 characters."),
        custom = "validate_handle"
    )]
    businesses_user_name: Option<String>,

    #[validate(
        length(max = 255, message = "Ensure this field has no more than 255 characters."),
        custom = "validate_company_name"
    )]
    businesses_legal_name: Option<String>,

    #[validate(
        length(max = 255, message = "Ensure this field has no more than 255 characters."),
        custom = "validate_company_name"
    )]
    businesses_organization_name: Option<String>,

    #[validate(length(max = 255, message = "Ensure this field has no more than 255 characters."))]
    businesses_gst_number: Option<String>,

    #[validate(
        length(max = 255, message = "Ensure this field has no more than 255 characters."),
        url(message = "Enter a valid URL.")
    )]
    businesses_website: Option<String>,
}

impl BusinessFields {
    fn check(self) -> Result<(), FieldError> {
        self.validate()
            .map_err(|errors| first_error(&errors, FIELD_ORDER))
    }
}

fn patch_value(value: Option<Option<String>>) -> Option<Option<String>> {
    value.map(blank_to_none)
}

impl CreateBusinessRequest {
    /// Trim, drop blank optionals and validate
    pub fn into_draft(self) -> Result<BusinessDraft, FieldError> {
        let legal_name = match self.businesses_legal_name {
            None => return Err(FieldError::required(LEGAL_NAME)),
            Some(name) => blank_to_none(Some(name)).ok_or_else(|| FieldError::blank(LEGAL_NAME))?,
        };

        let draft = BusinessDraft {
            user_name: blank_to_none(self.businesses_user_name),
            legal_name,
            organization_name: blank_to_none(self.businesses_organization_name),
            gst_number: blank_to_none(self.businesses_gst_number),
            website: blank_to_none(self.businesses_website),
            documents: blank_to_none(self.businesses_documents),
            logo: blank_to_none(self.businesses_logo),
            is_active: self.businesses_is_active.unwrap_or(true),
        };

        BusinessFields {
            businesses_user_name: draft.user_name.clone(),
            businesses_legal_name: Some(draft.legal_name.clone()),
            businesses_organization_name: draft.organization_name.clone(),
            businesses_gst_number: draft.gst_number.clone(),
            businesses_website: draft.website.clone(),
        }
        .check()?;

        Ok(draft)
    }
}

impl UpdateBusinessRequest {
    /// Trim, map blank optionals to `null` and validate the supplied fields
    pub fn into_patch(self) -> Result<BusinessPatch, FieldError> {
        let legal_name = match self.businesses_legal_name {
            None => None,
            Some(None) => {
                return Err(FieldError::new(LEGAL_NAME, "This field may not be null."));
            }
            Some(Some(name)) => {
                Some(blank_to_none(Some(name)).ok_or_else(|| FieldError::blank(LEGAL_NAME))?)
            }
        };

        let patch = BusinessPatch {
            user_name: patch_value(self.businesses_user_name),
            legal_name,
            organization_name: patch_value(self.businesses_organization_name),
            gst_number: patch_value(self.businesses_gst_number),
            website: patch_value(self.businesses_website),
            documents: patch_value(self.businesses_documents),
            logo: patch_value(self.businesses_logo),
            is_active: self.businesses_is_active,
        };

        BusinessFields {
            businesses_user_name: patch.user_name.clone().flatten(),
            businesses_legal_name: patch.legal_name.clone(),
            businesses_organization_name: patch.organization_name.clone().flatten(),
            businesses_gst_number: patch.gst_number.clone().flatten(),
            businesses_website: patch.website.clone().flatten(),
        }
        .check()?;

        Ok(patch)
    }
}

impl BusinessDraft {
    pub fn into_new(self, unique_id: String, now: DateTime<Utc>) -> NewBusiness {
        NewBusiness {
            unique_id,
            user_name: self.user_name,
            legal_name: self.legal_name,
            organization_name: self.organization_name,
            gst_number: self.gst_number,
            website: self.website,
            documents: self.documents,
            logo: self.logo,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

impl BusinessPatch {
    /// Merge the supplied fields into `business`. Identity fields and the
    /// delete flag are never touched.
    pub fn apply_to(self, business: &mut Business) {
        if let Some(user_name) = self.user_name {
            business.user_name = user_name;
        }
        if let Some(legal_name) = self.legal_name {
            business.legal_name = legal_name;
        }
        if let Some(organization_name) = self.organization_name {
            business.organization_name = organization_name;
        }
        if let Some(gst_number) = self.gst_number {
            business.gst_number = gst_number;
        }
        if let Some(website) = self.website {
            business.website = website;
        }
        if let Some(documents) = self.documents {
            business.documents = documents;
        }
        if let Some(logo) = self.logo {
            business.logo = logo;
        }
        if let Some(is_active) = self.is_active {
            business.is_active = is_active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(json: serde_json::Value) -> Result<BusinessDraft, FieldError> {
        serde_json::from_value::<CreateBusinessRequest>(json)
            .unwrap()
            .into_draft()
    }

    fn update(json: serde_json::Value) -> Result<BusinessPatch, FieldError> {
        serde_json::from_value::<UpdateBusinessRequest>(json)
            .unwrap()
            .into_patch()
    }

    #[test]
    fn test_create_requires_legal_name() {
        let err = create(serde_json::json!({"businesses_user_name": "acme"})).unwrap_err();
        assert_eq!(err, FieldError::required("businesses_legal_name"));

        let err = create(serde_json::json!({"businesses_legal_name": "   "})).unwrap_err();
        assert_eq!(err, FieldError::blank("businesses_legal_name"));
    }

    #[test]
    fn test_create_trims_and_drops_blank_optionals() {
        let draft = create(serde_json::json!({
            "businesses_legal_name": "  Acme Corp  ",
            "businesses_gst_number": "",
            "businesses_website": "   ",
        }))
        .unwrap();

        assert_eq!(draft.legal_name, "Acme Corp");
        assert_eq!(draft.gst_number, None);
        assert_eq!(draft.website, None);
        assert!(draft.is_active);
    }

    #[test]
    fn test_create_reports_first_invalid_field() {
        let err = create(serde_json::json!({
            "businesses_legal_name": "Acme <Corp>",
            "businesses_user_name": "acme corp",
            "businesses_website": "not a url",
        }))
        .unwrap_err();

        assert_eq!(err.field, "businesses_user_name");
    }

    #[test]
    fn test_create_rejects_bad_website() {
        let err = create(serde_json::json!({
            "businesses_legal_name": "Acme Corp",
            "businesses_website": "not a url",
        }))
        .unwrap_err();

        assert_eq!(err, FieldError::new("businesses_website", "Enter a valid URL."));
    }

    #[test]
    fn test_update_distinguishes_null_absent_and_blank() {
        let patch = update(serde_json::json!({
            "businesses_website": null,
            "businesses_gst_number": "  ",
        }))
        .unwrap();

        assert_eq!(patch.website, Some(None));
        assert_eq!(patch.gst_number, Some(None));
        assert_eq!(patch.user_name, None);
        assert_eq!(patch.legal_name, None);

        let err = update(serde_json::json!({"businesses_legal_name": null})).unwrap_err();
        assert_eq!(err.field, "businesses_legal_name");
    }

    #[test]
    fn test_update_ignores_identity_fields() {
        let patch = update(serde_json::json!({
            "businesses_unique_id": "BIZ-00000000",
            "businesses_is_deleted": true,
            "businesses_is_active": false,
        }))
        .unwrap();

        assert_eq!(patch.is_active, Some(false));
    }

    #[test]
    fn test_business_serializes_with_prefix() {
        let now = Utc::now();
        let business = Business {
            id: 1,
            unique_id: "BIZ-0a1b2c3d".to_string(),
            user_name: None,
            legal_name: "Acme Corp".to_string(),
            organization_name: None,
            gst_number: None,
            website: None,
            documents: None,
            logo: None,
            is_active: true,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&business).unwrap();
        assert_eq!(json["businesses_legal_name"], "Acme Corp");
        assert_eq!(json["businesses_unique_id"], "BIZ-0a1b2c3d");
        assert_eq!(json["businesses_is_deleted"], false);
    }
}
