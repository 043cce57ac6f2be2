//! Bot commands and their registry.
//!
//! This module provides the [`Command`] abstraction every chat command
//! implements, the [`CommandRegistry`] mapping names to commands, and the
//! built-in command handlers.
//!
//! # Overview
//!
//! A command receives a [`CommandContext`] holding who wrote the message,
//! where, and the argument text following the command name. It returns the
//! reply to post in the channel, or `None` to stay silent.
//!
//! ```text
//! "!info 1.2.3.4:27015"
//!      │
//!      ▼
//! ┌────────────┐   name "info"    ┌─────────────────┐
//! │ Dispatcher │ ───────────────▶ │ CommandRegistry │
//! └────────────┘                  └─────────────────┘
//!      │ args "1.2.3.4:27015"             │
//!      ▼                                  ▼
//! ┌─────────────┐                 ┌───────────────┐
//! │ InfoCommand │ ◀────────────── │ Arc<dyn Cmd>  │
//! └─────────────┘                 └───────────────┘
//!      │
//!      ▼
//! Some("7/10 on Alice playing de_dust2")
//! ```
//!
//! # Available Commands
//!
//! | Command | Arguments | Description |
//! |---------|-----------|-------------|
//! | `info` | `<address>` | Summarize a game server |
//! | `online` | `<address> <filter1;filterN>` | List matching players of a server |
//! | `help` | None | Display usage information |
//! | `alias` | Any | Reserved for alias management, not implemented |
//!
//! # Error Handling
//!
//! Commands never report failures in the channel: a failed query or invalid
//! arguments produce no reply and a log entry.

use async_trait::async_trait;
use mockall::automock;

mod actions;
mod registry;
mod response;

pub use crate::commands::actions::{AliasCommand, HelpCommand, InfoCommand, OnlineCommand};
pub use crate::commands::registry::CommandRegistry;

/// Runtime context of a command invocation.
///
/// # Examples
///
/// ```ignore
/// use crate::commands::CommandContext;
///
/// let context = CommandContext {
///     sender: "alice".to_string(),
///     channel: "#somechannel".to_string(),
///     args: "1.2.3.4:27015".to_string(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContext {
    /// Login name of the user who wrote the message
    pub sender: String,
    /// Channel the message was written in
    pub channel: String,
    /// Argument text following the command name, or the substituted alias text
    pub args: String,
}

/// A chat command.
///
/// Implementations are registered once at startup and shared between
/// concurrent invocations, so they must not keep per-call state.
#[automock]
#[async_trait]
pub trait Command: Send + Sync {
    /// Runs the command.
    ///
    /// # Returns
    ///
    /// * `Some(String)` - Reply to send to the channel
    /// * `None` - Nothing to say
    async fn execute(&self, context: &CommandContext) -> Option<String>;
}
