// In-memory dataset slot
// Author: Gabriel Demetrios Lafis

use std::sync::{Arc, RwLock};

use log::info;

use crate::data::{DataSource, Dataset};
use super::StorageError;

/// Holds the dataset every request reads
///
/// The slot is filled once at startup. Readers clone the `Arc` and release
/// the lock before running a query, so queries never hold it.
#[derive(Debug, Default)]
pub struct DatasetSlot {
    dataset: RwLock<Option<Arc<Dataset>>>,
}

impl DatasetSlot {
    /// Create a new empty slot
    pub fn new() -> Self {
        DatasetSlot {
            dataset: RwLock::new(None),
        }
    }

    /// Create a slot that already holds a dataset
    pub fn with_dataset(dataset: Dataset) -> Self {
        DatasetSlot {
            dataset: RwLock::new(Some(Arc::new(dataset))),
        }
    }

    /// Install the dataset; fails if one is already installed
    pub fn install(&self, dataset: Dataset) -> Result<Arc<Dataset>, StorageError> {
        let mut slot = self.dataset.write().map_err(|_| {
            StorageError::Other("Failed to acquire write lock".to_string())
        })?;

        if slot.is_some() {
            return Err(StorageError::AlreadyInitialized);
        }

        let dataset = Arc::new(dataset);
        *slot = Some(dataset.clone());
        info!("Installed dataset with {} trips", dataset.len());

        Ok(dataset)
    }

    /// Read a source and install what it yields
    pub fn load(&self, source: &dyn DataSource) -> Result<Arc<Dataset>, StorageError> {
        info!("Loading dataset from {}", source.name());
        let dataset = source.read()?;
        self.install(dataset)
    }

    /// The installed dataset
    pub fn current(&self) -> Result<Arc<Dataset>, StorageError> {
        let slot = self.dataset.read().map_err(|_| {
            StorageError::Other("Failed to acquire read lock".to_string())
        })?;

        slot.clone().ok_or(StorageError::NotInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.current().is_ok()
    }
}
