//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the delivery location lifecycle API.
//! - Keep callers decoupled from storage details.

pub mod delivery_location_service;
pub mod supplier_service;
