//! Delivery location model.
//!
//! # Responsibility
//! - Define the (supplier, place name, date) association record.
//! - Provide the non-empty location check enforced on add.
//!
//! # Invariants
//! - `id` is `None` until the store assigns one, and is never chosen by callers.
//! - `owner` always names exactly one supplier.
//! - Equality follows persisted identity: two records with the same `id` are
//!   the same record even if one of them holds stale field values.

use crate::model::supplier::Supplier;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// Store-assigned row identifier.
pub type DeliveryLocationId = i64;

/// Validation failures for delivery location writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryLocationValidationError {
    /// `location` is an empty string.
    EmptyLocation,
    /// `owner` is an empty supplier key.
    MissingOwner,
}

impl Display for DeliveryLocationValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyLocation => write!(f, "delivery location cannot be empty"),
            Self::MissingOwner => write!(f, "delivery location must reference a supplier"),
        }
    }
}

impl Error for DeliveryLocationValidationError {}

/// A place name and date a supplier delivers to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryLocation {
    id: Option<DeliveryLocationId>,
    /// `user_name` of the owning supplier.
    pub owner: String,
    /// Place name, e.g. `Haifa`.
    pub location: String,
    pub date: NaiveDate,
}

impl DeliveryLocation {
    /// Creates an unsaved record owned by `owner`.
    pub fn new(owner: &Supplier, location: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: None,
            owner: owner.user_name.clone(),
            location: location.into(),
            date,
        }
    }

    pub(crate) fn from_row(
        id: DeliveryLocationId,
        owner: String,
        location: String,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Some(id),
            owner,
            location,
            date,
        }
    }

    /// Returns the store-assigned id, or `None` while unsaved.
    pub fn id(&self) -> Option<DeliveryLocationId> {
        self.id
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Returns whether `supplier` owns this record.
    pub fn is_owned_by(&self, supplier: &Supplier) -> bool {
        self.owner == supplier.user_name
    }

    pub(crate) fn set_id(&mut self, id: Option<DeliveryLocationId>) {
        self.id = id;
    }

    /// Checks invariants required before the record is added.
    ///
    /// Only an exactly empty location is rejected; whitespace is kept as-is.
    pub fn validate(&self) -> Result<(), DeliveryLocationValidationError> {
        if self.owner.is_empty() {
            return Err(DeliveryLocationValidationError::MissingOwner);
        }
        if self.location.is_empty() {
            return Err(DeliveryLocationValidationError::EmptyLocation);
        }
        Ok(())
    }
}

impl PartialEq for DeliveryLocation {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(left), Some(right)) => left == right,
            (None, None) => {
                self.owner == other.owner
                    && self.location == other.location
                    && self.date == other.date
            }
            _ => false,
        }
    }
}

impl Eq for DeliveryLocation {}

impl Hash for DeliveryLocation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.id {
            Some(id) => id.hash(state),
            None => {
                self.owner.hash(state);
                self.location.hash(state);
                self.date.hash(state);
            }
        }
    }
}
