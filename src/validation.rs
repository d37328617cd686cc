use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::error::AppResult;

static POSTAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}$").expect("postal code pattern"));

// Local 0XXXXXXXXX or international +27XXXXXXXXX.
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0|\+27)[0-9]{9}$").expect("phone pattern"));

/// South African postal codes are exactly four digits.
pub fn is_valid_postal_code(value: &str) -> bool {
    POSTAL_CODE.is_match(value)
}

pub fn validate_postal_code(value: &str) -> Result<(), ValidationError> {
    if is_valid_postal_code(value) {
        Ok(())
    } else {
        Err(ValidationError::new("postal_code"))
    }
}

pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if PHONE.is_match(&compact) {
        Ok(())
    } else {
        Err(ValidationError::new("phone"))
    }
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("required"))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct ShippingForm {
    #[validate(custom(function = "not_blank"))]
    pub full_name: String,
    #[validate(custom(function = "not_blank"))]
    pub street: String,
    #[validate(custom(function = "not_blank"))]
    pub city: String,
    #[validate(custom(function = "not_blank"))]
    pub province: String,
    #[validate(custom(function = "validate_postal_code"))]
    pub postal_code: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
}

impl ShippingForm {
    /// Runs every field rule; the error names all offending fields.
    pub fn check(&self) -> AppResult<()> {
        self.validate()?;
        Ok(())
    }

    pub fn address_line(&self) -> String {
        format!(
            "{}, {}, {}, {}, {} (tel. {})",
            self.full_name.trim(),
            self.street.trim(),
            self.city.trim(),
            self.province.trim(),
            self.postal_code,
            self.phone.trim()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn form() -> ShippingForm {
        ShippingForm {
            full_name: "Thandi Nkosi".into(),
            street: "12 Long Street".into(),
            city: "Cape Town".into(),
            province: "Western Cape".into(),
            postal_code: "8001".into(),
            phone: "082 555 0199".into(),
        }
    }

    #[test]
    fn postal_code_is_exactly_four_digits() {
        assert!(is_valid_postal_code("0001"));
        assert!(is_valid_postal_code("8001"));
        assert!(!is_valid_postal_code("123"));
        assert!(!is_valid_postal_code("12345"));
        assert!(!is_valid_postal_code("abcd"));
        assert!(!is_valid_postal_code(""));
        assert!(!is_valid_postal_code("12 3"));
    }

    #[test]
    fn phone_accepts_local_and_international_forms() {
        assert!(validate_phone("0825550199").is_ok());
        assert!(validate_phone("+27 82 555 0199").is_ok());
        assert!(validate_phone("825550199").is_err());
        assert!(validate_phone("+2782555019").is_err());
    }

    #[test]
    fn complete_form_passes() {
        assert!(form().check().is_ok());
    }

    #[test]
    fn reports_every_bad_field() {
        let mut bad = form();
        bad.city = "   ".into();
        bad.postal_code = "12345".into();
        match bad.check() {
            Err(AppError::ValidationFailed(msg)) => {
                assert!(msg.contains("city"), "{msg}");
                assert!(msg.contains("postal_code"), "{msg}");
                assert!(!msg.contains("street"), "{msg}");
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn address_line_joins_trimmed_fields() {
        assert_eq!(
            form().address_line(),
            "Thandi Nkosi, 12 Long Street, Cape Town, Western Cape, 8001 (tel. 082 555 0199)"
        );
    }
}
