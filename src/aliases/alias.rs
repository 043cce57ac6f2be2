//! Alias definitions and resolved aliases.
//!
//! An alias binds a new name to an existing command plus a text template. For
//! example the definition
//!
//! ```json
//! { "srv": { "command": "info", "format": "1.2.3.4:27015" } }
//! ```
//!
//! makes `!srv` behave like `!info 1.2.3.4:27015`, and
//!
//! ```json
//! { "friends": { "command": "online", "format": "1.2.3.4:27015 %s" } }
//! ```
//!
//! makes `!friends Bob;Carl` behave like `!online 1.2.3.4:27015 Bob;Carl`.

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::commands::Command;

/// Marker replaced by the argument text when an alias is invoked.
pub const SUBSTITUTION_SLOT: &str = "%s";

/// An alias as written in the alias file, before its command is resolved.
///
/// Field names are also accepted capitalized (`Command`, `Format`).
///
/// # Examples
///
/// ```ignore
/// use crate::aliases::AliasDefinition;
///
/// let definition: AliasDefinition =
///     serde_json::from_str(r#"{"command": "info", "format": "%s"}"#).unwrap();
/// assert_eq!(definition.command, "info");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasDefinition {
    /// Name of the command the alias invokes
    #[serde(alias = "Command")]
    pub command: String,
    /// Text passed to the command, may contain one substitution slot
    #[serde(alias = "Format")]
    pub format: String,
}

/// An alias whose command has been resolved.
#[derive(Clone)]
pub struct Alias {
    /// Command invoked by the alias
    pub command: Arc<dyn Command>,
    /// Name of the command, kept for logs
    pub command_name: String,
    /// Text template passed to the command
    pub format: String,
}

impl Alias {
    /// Builds the argument text of the underlying command.
    ///
    /// The first substitution slot of the format is replaced by `args`. Other
    /// slots are left untouched. A format without slot is returned as is and
    /// `args` is discarded.
    pub fn expand(&self, args: &str) -> String {
        self.format.replacen(SUBSTITUTION_SLOT, args, 1)
    }
}

impl fmt::Debug for Alias {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Alias")
            .field("command", &self.command_name)
            .field("format", &self.format)
            .finish()
    }
}
