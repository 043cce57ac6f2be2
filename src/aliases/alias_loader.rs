//! Alias file loading.
//!
//! This module provides the [`AliasLoader`] reading alias definitions from a
//! JSON file mapping alias names to definitions:
//!
//! ```json
//! {
//!   "srv": { "command": "info", "format": "1.2.3.4:27015" },
//!   "friends": { "command": "online", "format": "1.2.3.4:27015 %s" }
//! }
//! ```

use std::{collections::BTreeMap, io};

use log::info;
use thiserror::Error;
use tokio::fs;

use crate::aliases::alias::AliasDefinition;

/// Errors that can occur while loading the alias file.
#[derive(Debug, Error)]
pub enum AliasLoadError {
    /// The file could not be read.
    #[error("failed to read alias file {path}: {source}")]
    Read {
        /// Path of the alias file
        path: String,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The file is not a valid alias map.
    #[error("failed to parse alias file {path}: {source}")]
    Parse {
        /// Path of the alias file
        path: String,
        /// Underlying JSON error
        source: serde_json::Error,
    },
}

/// Reads alias definitions from disk.
///
/// Unlike a missing configuration value, a missing or corrupted alias file is
/// not recovered from: the caller is expected to stop.
///
/// # Examples
///
/// ```ignore
/// use crate::aliases::AliasLoader;
///
/// # async fn example() {
/// let loader = AliasLoader::new("aliases.json");
/// let definitions = loader.load().await.unwrap();
/// println!("Loaded {} aliases", definitions.len());
/// # }
/// ```
#[derive(Clone)]
pub struct AliasLoader {
    /// Path to the JSON alias file.
    path: String,
}

impl AliasLoader {
    /// Creates a new `AliasLoader` for the specified file path.
    pub fn new(path: impl Into<String>) -> Self {
        AliasLoader { path: path.into() }
    }

    /// Loads the alias definitions, sorted by alias name.
    ///
    /// # Errors
    ///
    /// - [`AliasLoadError::Read`] - The file is missing or unreadable
    /// - [`AliasLoadError::Parse`] - The content is not a JSON alias map
    pub async fn load(&self) -> Result<BTreeMap<String, AliasDefinition>, AliasLoadError> {
        let serialized_aliases =
            fs::read_to_string(&self.path)
                .await
                .map_err(|source| AliasLoadError::Read {
                    path: self.path.clone(),
                    source,
                })?;

        let definitions: BTreeMap<String, AliasDefinition> =
            serde_json::from_str(&serialized_aliases).map_err(|source| AliasLoadError::Parse {
                path: self.path.clone(),
                source,
            })?;

        info!("loaded {} alias definitions from {}", definitions.len(), self.path);

        Ok(definitions)
    }
}
