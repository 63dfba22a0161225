//! Equipment lookup by scanned code
//!
//! - `rest`: record store point query over HTTP
//! - `catalog`: local JSON file of records

pub mod catalog;
pub mod rest;

pub use catalog::CatalogEquipmentStore;
pub use rest::RestEquipmentStore;

use baseconnect_core::prelude::*;
use baseconnect_core::Equipment;

use crate::config::{LookupBackend, LookupSettings};

/// Point lookup of an equipment record by its printed code.
///
/// `Ok(None)` means no record has this code; `Err` is a transient failure
/// (network, backend) the user can retry.
#[trait_variant::make(EquipmentLookup: Send)]
pub trait LocalEquipmentLookup {
    async fn find_by_code(&self, code: &str) -> Result<Option<Equipment>>;
}

/// The configured lookup backend
#[derive(Debug)]
pub enum EquipmentStore {
    Rest(RestEquipmentStore),
    Catalog(CatalogEquipmentStore),
}

impl EquipmentStore {
    /// Build the backend selected by `[lookup] backend`
    pub fn from_settings(settings: &LookupSettings) -> Result<Self> {
        match settings.backend {
            LookupBackend::Rest => Ok(Self::Rest(RestEquipmentStore::from_settings(settings)?)),
            LookupBackend::Catalog => {
                let path = settings.catalog_path.as_deref().ok_or_else(|| {
                    Error::config("lookup.catalog_path is required for the catalog backend")
                })?;
                Ok(Self::Catalog(CatalogEquipmentStore::load(path)?))
            }
        }
    }

    pub fn backend(&self) -> LookupBackend {
        match self {
            Self::Rest(_) => LookupBackend::Rest,
            Self::Catalog(_) => LookupBackend::Catalog,
        }
    }
}

impl EquipmentLookup for EquipmentStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Equipment>> {
        match self {
            Self::Rest(store) => EquipmentLookup::find_by_code(store, code).await,
            Self::Catalog(store) => EquipmentLookup::find_by_code(store, code).await,
        }
    }
}
