use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::input::{InputError, LoadedDataset, load_dataset};

/// Process-scoped dataset holder: reads the file on first use, then hands out
/// the same shared instance for the rest of the process. Failed loads are not
/// remembered.
#[derive(Debug)]
pub struct DatasetStore {
    path: PathBuf,
    delimiter: u8,
    loaded: OnceLock<Arc<LoadedDataset>>,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>, delimiter: u8) -> Self {
        DatasetStore {
            path: path.into(),
            delimiter,
            loaded: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    pub fn load(&self) -> Result<Arc<LoadedDataset>, InputError> {
        if let Some(dataset) = self.loaded.get() {
            tracing::debug!(path = %self.path.display(), "dataset served from memory");
            return Ok(Arc::clone(dataset));
        }
        let dataset = Arc::new(load_dataset(&self.path, self.delimiter)?);
        Ok(Arc::clone(self.loaded.get_or_init(|| dataset)))
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/cache.rs"]
mod tests;
