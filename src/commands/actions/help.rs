//! Help command handler.
//!
//! Displays the syntax of the built-in commands. This is a stateless command
//! that always returns the same message.

use async_trait::async_trait;
use log::debug;

use crate::commands::{Command, CommandContext, response::format_help};

/// Returns the usage summary of the built-in commands.
pub struct HelpCommand {
    /// Trigger shown in front of each command name
    trigger: String,
}

impl HelpCommand {
    /// Creates the help command for the given trigger.
    pub fn new(trigger: &str) -> Self {
        HelpCommand {
            trigger: trigger.to_owned(),
        }
    }
}

#[async_trait]
impl Command for HelpCommand {
    async fn execute(&self, context: &CommandContext) -> Option<String> {
        debug!("handling help command for {}", context.sender);

        Some(format_help(&self.trigger))
    }
}
