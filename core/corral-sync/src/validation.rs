//! Required-field checks run before a create is submitted.

use crate::error::{FieldError, ValidationError};
use corral_types::CattleFields;

fn blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|s| s.trim().is_empty())
}

/// Checks the cattle creation form.
///
/// `earTag` and `breed` must be non-empty, `age` at least zero, `weight`
/// positive and `sex` chosen. All failing fields are reported together.
pub fn validate_cattle(fields: &CattleFields) -> Result<(), ValidationError> {
    let mut errors = Vec::new();

    if blank(&fields.ear_tag) {
        errors.push(FieldError::new("earTag", "ear tag is required"));
    }
    if blank(&fields.breed) {
        errors.push(FieldError::new("breed", "breed is required"));
    }
    match fields.age {
        None => errors.push(FieldError::new("age", "age is required")),
        Some(age) if !age.is_finite() || age < 0.0 => {
            errors.push(FieldError::new("age", "age must be zero or more"))
        }
        Some(_) => {}
    }
    match fields.weight {
        None => errors.push(FieldError::new("weight", "weight is required")),
        Some(weight) if !weight.is_finite() || weight <= 0.0 => {
            errors.push(FieldError::new("weight", "weight must be greater than zero"))
        }
        Some(_) => {}
    }
    if fields.sex.is_none() {
        errors.push(FieldError::new("sex", "sex is required"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { fields: errors })
    }
}
