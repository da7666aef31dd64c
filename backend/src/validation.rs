//! Field validation helpers shared by the account and business models

use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors};

/// The first offending field of a failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn required(field: impl Into<String>) -> Self {
        Self::new(field, "This field is required.")
    }

    pub fn blank(field: impl Into<String>) -> Self {
        Self::new(field, "This field may not be blank.")
    }
}

/// Pick the first failing field, in declaration order.
///
/// `validator` collects errors into a map, so the caller supplies the field
/// order to keep the reported field deterministic.
pub fn first_error(errors: &ValidationErrors, order: &[&'static str]) -> FieldError {
    let field_errors = errors.field_errors();

    let field = order
        .iter()
        .copied()
        .find(|field| field_errors.contains_key(field))
        .or_else(|| field_errors.keys().min().copied())
        .unwrap_or("non_field_errors");

    let message = field_errors
        .get(field)
        .and_then(|errors| errors.first())
        .map(|error| match &error.message {
            Some(message) => message.to_string(),
            None => format!("Invalid value ({})", error.code),
        })
        .unwrap_or_else(|| "Invalid input".to_string());

    FieldError::new(field, message)
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Letters, numbers, underscores, dots and hyphens
pub fn validate_handle(value: &str) -> Result<(), ValidationError> {
    if value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        Ok(())
    } else {
        Err(invalid(
            "handle",
            "Only letters, numbers, underscores, dots, or hyphens are allowed.",
        ))
    }
}

/// Letters, numbers, whitespace and `.,&()-`
pub fn validate_company_name(value: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| {
        c.is_ascii_alphanumeric()
            || c.is_whitespace()
            || matches!(c, '.' | ',' | '&' | '(' | ')' | '-')
    };
    if value.chars().all(allowed) {
        Ok(())
    } else {
        Err(invalid("company_name", "Name contains invalid characters."))
    }
}

/// Exactly ten digits
pub fn validate_phone_number(value: &str) -> Result<(), ValidationError> {
    if value.len() == 10 && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(invalid("phone_number", "Please enter a valid phone number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 3, message = "too short"))]
        zeta: String,
        #[validate(custom = "validate_handle")]
        alpha: String,
    }

    #[test]
    fn test_first_error_follows_declaration_order() {
        let sample = Sample {
            zeta: "x".to_string(),
            alpha: "bad name!".to_string(),
        };
        let errors = sample.validate().unwrap_err();

        let first = first_error(&errors, &["zeta", "alpha"]);
        assert_eq!(first, FieldError::new("zeta", "too short"));

        let first = first_error(&errors, &["alpha", "zeta"]);
        assert_eq!(first.field, "alpha");
    }

    #[test]
    fn test_handle_charset() {
        assert!(validate_handle("acme_corp.in-1").is_ok());
        assert!(validate_handle("acme corp").is_err());
        assert!(validate_handle("acme$").is_err());
    }

    #[test]
    fn test_company_name_charset() {
        assert!(validate_company_name("Acme Corp (India) Pvt. Ltd, & Co-op").is_ok());
        assert!(validate_company_name("Acme <script>").is_err());
    }

    #[test]
    fn test_phone_number() {
        assert!(validate_phone_number("9876543210").is_ok());
        assert!(validate_phone_number("987654321").is_err());
        assert!(validate_phone_number("98765432100").is_err());
        assert!(validate_phone_number("98765x3210").is_err());
    }
}
