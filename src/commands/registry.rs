//! Registry of the commands known to the bot.

use std::{collections::HashMap, sync::Arc};

use log::debug;

use crate::commands::Command;

/// Mapping from command name to command.
///
/// The registry is filled once at startup and only read afterwards, it is
/// shared between dispatch tasks without locking.
///
/// # Examples
///
/// ```ignore
/// use std::sync::Arc;
///
/// use crate::commands::{AliasCommand, CommandRegistry};
///
/// let mut commands = CommandRegistry::new();
/// commands.register("alias", Arc::new(AliasCommand));
///
/// assert!(commands.contains("alias"));
/// assert!(commands.get("nope").is_none());
/// ```
#[derive(Default, Clone)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `command` under `name`, replacing any previous command of that name.
    pub fn register(&mut self, name: impl Into<String>, command: Arc<dyn Command>) {
        let name = name.into();
        debug!("register command {}", name);
        self.commands.insert(name, command);
    }

    /// Returns the command registered under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(name).cloned()
    }

    /// Whether a command is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Names of every registered command, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no command is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
