//! Alias command handler.
//!
//! Reserves the `alias` name for run-time alias management
//! (`alias set <name> <command> <format>`, `alias rm <name>`). Aliases are
//! only read from the alias file at startup for now, so the command answers
//! that it is not implemented.

use async_trait::async_trait;
use log::info;

use crate::commands::{Command, CommandContext, response::format_not_implemented};

/// Placeholder for run-time alias management.
pub struct AliasCommand;

#[async_trait]
impl Command for AliasCommand {
    async fn execute(&self, context: &CommandContext) -> Option<String> {
        info!(
            "{} tried to manage aliases with {:?}",
            context.sender, context.args
        );

        Some(format_not_implemented())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_alias_is_not_implemented() {
        let context = CommandContext {
            sender: "alice".to_string(),
            channel: "#chan".to_string(),
            args: "set i info 1.2.3.4:27015".to_string(),
        };

        assert_eq!(
            AliasCommand.execute(&context).await.as_deref(),
            Some("NOT IMPLEMENTED")
        );
    }
}
