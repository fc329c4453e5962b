//! Supplier use-case service.
//!
//! Thin wrapper that lets callers save the suppliers delivery locations
//! point at. Suppliers have no other lifecycle here.

use crate::model::supplier::Supplier;
use crate::repo::delivery_location_repo::RepoResult;
use crate::repo::supplier_repo::SupplierRepository;
use log::info;

pub struct SupplierService<R: SupplierRepository> {
    repo: R,
}

impl<R: SupplierRepository> SupplierService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists `supplier` so delivery locations can reference it.
    pub fn save_supplier(&self, supplier: &Supplier) -> RepoResult<()> {
        self.repo.save_supplier(supplier)?;
        info!("event=supplier_save module=service status=ok");
        Ok(())
    }

    pub fn get_supplier(&self, user_name: &str) -> RepoResult<Option<Supplier>> {
        self.repo.get_supplier(user_name)
    }

    pub fn supplier_exists(&self, user_name: &str) -> RepoResult<bool> {
        self.repo.supplier_exists(user_name)
    }
}
