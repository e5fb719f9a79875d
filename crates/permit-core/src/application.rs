//! # Permit Application Fields
//!
//! [`PermitApplication`] is the validated input of a new permit: applicant
//! name, license plate, and residential address. Each must contain at least
//! one non-whitespace character. Values are stored exactly as submitted.

use serde::Serialize;

use crate::error::ValidationError;

/// Validated applicant input for a new permit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermitApplication {
    name: String,
    license_plate: String,
    address: String,
}

impl PermitApplication {
    /// Validate and assemble a permit application.
    ///
    /// Fields are checked in declaration order; the first failure wins.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] naming the offending field.
    pub fn new(
        name: impl Into<String>,
        license_plate: impl Into<String>,
        address: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: validate_field("name", name.into())?,
            license_plate: validate_field("license_plate", license_plate.into())?,
            address: validate_field("address", address.into())?,
        })
    }

    /// Applicant name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Vehicle license plate.
    pub fn license_plate(&self) -> &str {
        &self.license_plate
    }

    /// Residential address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Decompose into `(name, license_plate, address)`.
    pub fn into_parts(self) -> (String, String, String) {
        (self.name, self.license_plate, self.address)
    }
}

fn validate_field(field: &'static str, value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(value)
}
