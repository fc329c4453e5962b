//! Supplier account model.
//!
//! Suppliers are only referenced by this crate: the delivery-location
//! records hold their `user_name` as a foreign key.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// Validation failures for supplier writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplierValidationError {
    /// `user_name` is the primary key and cannot be empty.
    EmptyUserName,
}

impl Display for SupplierValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUserName => write!(f, "supplier user_name cannot be empty"),
        }
    }
}

impl Error for SupplierValidationError {}

/// Supplier account that owns zero or more delivery locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    /// Unique account key.
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    /// Stored as given; never serialized outward.
    #[serde(skip_serializing, default)]
    pub password: String,
    pub business_name: String,
}

impl Supplier {
    pub fn new(
        user_name: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        password: impl Into<String>,
        business_name: impl Into<String>,
    ) -> Self {
        Self {
            user_name: user_name.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            password: password.into(),
            business_name: business_name.into(),
        }
    }

    /// Checks invariants required before persistence.
    pub fn validate(&self) -> Result<(), SupplierValidationError> {
        if self.user_name.is_empty() {
            return Err(SupplierValidationError::EmptyUserName);
        }
        Ok(())
    }
}

impl PartialEq for Supplier {
    fn eq(&self, other: &Self) -> bool {
        self.user_name == other.user_name
    }
}

impl Eq for Supplier {}

impl Hash for Supplier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.user_name.hash(state);
    }
}
