//! JSON file adapter for the pump registry.
//!
//! Implements [`ConfigStore`] over a single pretty-printed JSON document.
//!
//! - Validation: duplicate pins are rejected on load, before the registry
//!   reaches the scheduler.
//! - Atomic writes: the new document goes to a sibling temp file that is
//!   renamed over the original, so a crash mid-save leaves either the old
//!   or the new file, never half of one.
//! - Unknown per-pump fields survive a load/save cycle.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::app::ports::{ConfigError, ConfigStore};
use crate::registry::PumpRegistry;

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn io_error(path: &Path, e: std::io::Error) -> ConfigError {
    warn!("{}: {}", path.display(), e);
    match e.kind() {
        ErrorKind::NotFound => ConfigError::NotFound,
        _ => ConfigError::IoError,
    }
}

impl ConfigStore for JsonFileStore {
    fn load(&self) -> Result<PumpRegistry, ConfigError> {
        let raw = fs::read_to_string(&self.path).map_err(|e| io_error(&self.path, e))?;
        let registry = PumpRegistry::from_json(&raw)?;
        debug!("read {} pumps from {}", registry.len(), self.path.display());
        Ok(registry)
    }

    fn save(&self, registry: &PumpRegistry) -> Result<(), ConfigError> {
        registry.validate()?;
        let json = registry.to_json()?;

        let tmp = self.temp_path();
        let mut file = fs::File::create(&tmp).map_err(|e| io_error(&tmp, e))?;
        file.write_all(json.as_bytes())
            .and_then(|()| file.write_all(b"\n"))
            .and_then(|()| file.sync_all())
            .map_err(|e| io_error(&tmp, e))?;
        drop(file);

        fs::rename(&tmp, &self.path).map_err(|e| io_error(&self.path, e))?;
        debug!("wrote {} pumps to {}", registry.len(), self.path.display());
        Ok(())
    }
}
