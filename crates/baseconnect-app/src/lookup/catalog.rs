//! Local JSON catalog of equipment records

use std::collections::HashMap;
use std::path::Path;

use baseconnect_core::prelude::*;
use baseconnect_core::Equipment;

use super::EquipmentLookup;

/// Records indexed by `code_barre`.
///
/// The file holds either an array of rows or `{ "epis": [...] }`, in the
/// record store's row shape.
#[derive(Debug, Clone, Default)]
pub struct CatalogEquipmentStore {
    by_code: HashMap<String, Equipment>,
}

impl CatalogEquipmentStore {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::CatalogNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&content)?;

        let rows = match value {
            serde_json::Value::Array(rows) => rows,
            serde_json::Value::Object(mut map) => match map.remove("epis") {
                Some(serde_json::Value::Array(rows)) => rows,
                _ => {
                    return Err(Error::config(format!(
                        "{}: expected an array of records or an \"epis\" array",
                        path.display()
                    )))
                }
            },
            _ => {
                return Err(Error::config(format!(
                    "{}: expected an array of records",
                    path.display()
                )))
            }
        };

        let records = rows
            .into_iter()
            .map(serde_json::from_value::<Equipment>)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let store = Self::from_records(records);
        info!(
            "Loaded {} equipment records from {}",
            store.len(),
            path.display()
        );
        Ok(store)
    }

    /// Records without a code cannot be scanned and are skipped.
    pub fn from_records(records: impl IntoIterator<Item = Equipment>) -> Self {
        let mut by_code = HashMap::new();
        for record in records {
            let code = record
                .barcode
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string);
            match code {
                Some(code) => {
                    if by_code.insert(code.clone(), record).is_some() {
                        warn!("Duplicate code {:?} in catalog, keeping the last record", code);
                    }
                }
                None => trace!("Skipping record {} without code", record.id),
            }
        }
        Self { by_code }
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

impl EquipmentLookup for CatalogEquipmentStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Equipment>> {
        Ok(self.by_code.get(code).cloned())
    }
}
