//! User-defined command aliases.
//!
//! This module loads alias definitions from disk and resolves them against the
//! [`CommandRegistry`]. It consists of three components:
//!
//! - [`AliasDefinition`] and [`Alias`]: an alias before and after resolution
//! - [`AliasRegistry`]: the resolved aliases, built once at startup
//! - [`AliasLoader`]: reads the JSON alias file
//!
//! # Resolution
//!
//! Resolution is all or nothing: a single alias referring to an unknown
//! command, or named like a command, fails the whole resolution and the bot
//! does not start.
//!
//! # Example Usage
//!
//! ```ignore
//! use crate::aliases::{AliasLoader, AliasRegistry};
//! use crate::commands::CommandRegistry;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let commands = CommandRegistry::new();
//! let definitions = AliasLoader::new("aliases.json").load().await?;
//! let aliases = AliasRegistry::resolve(definitions, &commands)?;
//! println!("{} aliases", aliases.len());
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

use log::{debug, info};
use thiserror::Error;

use crate::commands::CommandRegistry;

mod alias;
mod alias_loader;

pub use crate::aliases::alias::{Alias, AliasDefinition};
pub use crate::aliases::alias_loader::{AliasLoadError, AliasLoader};

/// Errors that can occur while resolving alias definitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The alias refers to a command that is not registered.
    #[error("alias {alias} refers to unknown command {command}")]
    UnknownCommand {
        /// Name of the alias
        alias: String,
        /// Name of the missing command
        command: String,
    },

    /// The alias has the name of a registered command.
    #[error("alias {alias} has the name of a command")]
    ShadowsCommand {
        /// Name of the alias
        alias: String,
    },
}

/// Mapping from alias name to resolved alias.
///
/// Like the [`CommandRegistry`], it is read-only once built.
#[derive(Debug, Default, Clone)]
pub struct AliasRegistry {
    aliases: HashMap<String, Alias>,
}

impl AliasRegistry {
    /// Resolves every definition against `commands`.
    ///
    /// # Arguments
    ///
    /// * `definitions` - Alias definitions indexed by alias name
    /// * `commands` - The registry holding the referenced commands
    ///
    /// # Errors
    ///
    /// Stops at the first alias that cannot be resolved:
    /// - [`ResolveError::UnknownCommand`] - The referenced command is not registered
    /// - [`ResolveError::ShadowsCommand`] - A command already uses the alias name
    pub fn resolve(
        definitions: impl IntoIterator<Item = (String, AliasDefinition)>,
        commands: &CommandRegistry,
    ) -> Result<Self, ResolveError> {
        let mut aliases = HashMap::new();

        for (name, definition) in definitions {
            if commands.contains(&name) {
                return Err(ResolveError::ShadowsCommand { alias: name });
            }

            let Some(command) = commands.get(&definition.command) else {
                return Err(ResolveError::UnknownCommand {
                    alias: name,
                    command: definition.command,
                });
            };

            debug!(
                "resolved alias {} -> {} {:?}",
                name, definition.command, definition.format
            );
            aliases.insert(
                name,
                Alias {
                    command,
                    command_name: definition.command,
                    format: definition.format,
                },
            );
        }

        info!("resolved {} aliases", aliases.len());

        Ok(AliasRegistry { aliases })
    }

    /// Returns the alias registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Alias> {
        self.aliases.get(name)
    }

    /// Names of every alias, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.aliases.keys().map(String::as_str)
    }

    /// Number of aliases.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Whether there is no alias.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
