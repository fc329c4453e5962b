//! Domain model for suppliers and their delivery locations.
//!
//! # Responsibility
//! - Define the records persisted by the repository layer.
//! - Own field-level validation that must pass before a write.
//!
//! # Invariants
//! - A `Supplier` is identified by its `user_name`.
//! - A persisted `DeliveryLocation` is identified by its store-assigned id.

pub mod delivery_location;
pub mod supplier;
