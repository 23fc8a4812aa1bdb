//! Common CLI utility functions shared across commands.

use std::path::Path;

use acesight_core::MapConfigStore;
use anyhow::{Context, Result};
use tracing::info;

/// Load map calibrations from a file, or the built-in set.
pub fn load_maps(path: Option<&Path>) -> Result<MapConfigStore> {
    match path {
        Some(path) => {
            let store = MapConfigStore::load(path)
                .with_context(|| format!("failed to load map configs from {}", path.display()))?;
            info!(tag = "RANGE", "loaded {} map configs from {}", store.len(), path.display());
            Ok(store)
        }
        None => Ok(MapConfigStore::builtin()),
    }
}
