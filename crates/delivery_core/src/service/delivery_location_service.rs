//! Delivery location use-case service.
//!
//! # Responsibility
//! - Expose the add/remove/lookup/filter/update lifecycle of delivery locations.
//! - Keep the in-memory record in sync with what was committed.
//!
//! # Invariants
//! - `add_delivery_location` validates before the store is touched.
//! - `update_location` does not re-validate; an empty place name can be stored
//!   this way. Callers that need the add-time rule must check it themselves.
//! - A record is only mutated in memory after its write has committed.

use crate::model::delivery_location::{DeliveryLocation, DeliveryLocationId};
use crate::model::supplier::Supplier;
use crate::repo::delivery_location_repo::{
    DeliveryLocationQuery, DeliveryLocationRepository, RepoError, RepoResult,
};
use chrono::NaiveDate;
use log::{debug, info, warn};

/// Selector accepted by [`DeliveryLocationService::filter_by_location`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationFilter<'a> {
    /// Every record owned by this supplier.
    Supplier(&'a Supplier),
    /// Every record whose place name equals this text exactly.
    Place(&'a str),
}

impl<'a> From<&'a Supplier> for LocationFilter<'a> {
    fn from(value: &'a Supplier) -> Self {
        Self::Supplier(value)
    }
}

impl<'a> From<&'a str> for LocationFilter<'a> {
    fn from(value: &'a str) -> Self {
        Self::Place(value)
    }
}

impl<'a> From<&'a String> for LocationFilter<'a> {
    fn from(value: &'a String) -> Self {
        Self::Place(value.as_str())
    }
}

impl LocationFilter<'_> {
    fn to_query(self) -> DeliveryLocationQuery {
        match self {
            Self::Supplier(supplier) => DeliveryLocationQuery::owned_by(supplier.user_name.clone()),
            Self::Place(location) => DeliveryLocationQuery::at_location(location),
        }
    }
}

/// Lifecycle manager for delivery location records.
pub struct DeliveryLocationService<R: DeliveryLocationRepository> {
    repo: R,
}

impl<R: DeliveryLocationRepository> DeliveryLocationService<R> {
    /// Creates a service over the given persistence collaborator.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and persists `record`, writing the assigned id back into it.
    ///
    /// A record that already has an id is saved over its row, owner included.
    /// If that row is gone the record is inserted again under a new id.
    ///
    /// # Errors
    /// - `RepoError::Validation` when `location` is empty; nothing is written.
    /// - `RepoError::UnknownSupplier` when the owner was never saved.
    pub fn add_delivery_location(
        &self,
        record: &mut DeliveryLocation,
    ) -> RepoResult<DeliveryLocationId> {
        if let Err(err) = record.validate() {
            warn!("event=delivery_location_add module=service status=rejected reason={err}");
            return Err(err.into());
        }

        if let Some(id) = record.id() {
            match self.repo.update_delivery_location(record) {
                Ok(()) => {
                    info!(
                        "event=delivery_location_add module=service status=ok mode=resave id={id}"
                    );
                    return Ok(id);
                }
                Err(RepoError::NotFound(Some(_))) => {
                    debug!("event=delivery_location_add module=service status=stale_id id={id}");
                }
                Err(err) => return Err(err),
            }
        }

        let id = self.repo.insert_delivery_location(record)?;
        record.set_id(Some(id));
        info!("event=delivery_location_add module=service status=ok mode=insert id={id}");
        Ok(id)
    }

    /// Deletes the row bound to `record` and marks the record unsaved.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when the record was never persisted or is
    ///   already gone.
    pub fn remove_delivery_location(&self, record: &mut DeliveryLocation) -> RepoResult<()> {
        let id = record.id().ok_or(RepoError::NotFound(None))?;
        self.remove_delivery_location_by_id(id)?;
        record.set_id(None);
        Ok(())
    }

    /// Deletes the record with `id`.
    pub fn remove_delivery_location_by_id(&self, id: DeliveryLocationId) -> RepoResult<()> {
        self.repo.delete_delivery_location(id)?;
        info!("event=delivery_location_remove module=service status=ok id={id}");
        Ok(())
    }

    /// Loads the record with `id`, failing with `RepoError::NotFound` if absent.
    pub fn get_delivery_location_by_id(
        &self,
        id: DeliveryLocationId,
    ) -> RepoResult<DeliveryLocation> {
        self.repo
            .get_delivery_location(id)?
            .ok_or(RepoError::NotFound(Some(id)))
    }

    /// Lists records owned by `supplier` whose place name equals `location`.
    pub fn filter_by_supplier_and_location(
        &self,
        supplier: &Supplier,
        location: &str,
    ) -> RepoResult<Vec<DeliveryLocation>> {
        let query = DeliveryLocationQuery {
            owner: Some(supplier.user_name.clone()),
            location: Some(location.to_string()),
            ..DeliveryLocationQuery::default()
        };
        let records = self.repo.list_delivery_locations(&query)?;
        debug!(
            "event=delivery_location_filter module=service status=ok by=supplier_and_location count={}",
            records.len()
        );
        Ok(records)
    }

    /// Lists records by owning supplier or by exact place name.
    ///
    /// - `&Supplier`: every record the supplier owns, whatever the place name.
    /// - `&str`: every record at that place; unknown names yield an empty list.
    pub fn filter_by_location<'a>(
        &self,
        filter: impl Into<LocationFilter<'a>>,
    ) -> RepoResult<Vec<DeliveryLocation>> {
        let filter = filter.into();
        let records = self.repo.list_delivery_locations(&filter.to_query())?;
        debug!(
            "event=delivery_location_filter module=service status=ok by={} count={}",
            match filter {
                LocationFilter::Supplier(_) => "supplier",
                LocationFilter::Place(_) => "location",
            },
            records.len()
        );
        Ok(records)
    }

    /// Lists every stored record in insertion order.
    pub fn all_delivery_locations(&self) -> RepoResult<Vec<DeliveryLocation>> {
        self.list_delivery_locations(&DeliveryLocationQuery::default())
    }

    /// Lists records using an arbitrary typed query.
    pub fn list_delivery_locations(
        &self,
        query: &DeliveryLocationQuery,
    ) -> RepoResult<Vec<DeliveryLocation>> {
        self.repo.list_delivery_locations(query)
    }

    /// Sets and commits a new date.
    pub fn update_date(&self, record: &mut DeliveryLocation, date: NaiveDate) -> RepoResult<()> {
        let mut updated = record.clone();
        updated.date = date;
        self.commit_update(record, updated, "date")
    }

    /// Sets and commits a new place name without validating it.
    pub fn update_location(
        &self,
        record: &mut DeliveryLocation,
        location: impl Into<String>,
    ) -> RepoResult<()> {
        let mut updated = record.clone();
        updated.location = location.into();
        self.commit_update(record, updated, "location")
    }

    fn commit_update(
        &self,
        record: &mut DeliveryLocation,
        updated: DeliveryLocation,
        field: &'static str,
    ) -> RepoResult<()> {
        self.repo.update_delivery_location(&updated)?;
        info!(
            "event=delivery_location_update module=service status=ok field={field} id={}",
            updated.id().unwrap_or_default()
        );
        *record = updated;
        Ok(())
    }
}
