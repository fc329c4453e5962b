//! Core data-access logic for supplier delivery locations.
//! This crate owns the record invariants and the SQLite persistence behind them.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::delivery_location::{
    DeliveryLocation, DeliveryLocationId, DeliveryLocationValidationError,
};
pub use model::supplier::{Supplier, SupplierValidationError};
pub use repo::delivery_location_repo::{
    DeliveryLocationQuery, DeliveryLocationRepository, RepoError, RepoResult,
    SqliteDeliveryLocationRepository,
};
pub use repo::supplier_repo::{SqliteSupplierRepository, SupplierRepository};
pub use service::delivery_location_service::{DeliveryLocationService, LocationFilter};
pub use service::supplier_service::SupplierService;

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
