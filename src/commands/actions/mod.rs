//! Built-in command handlers.
//!
//! Each handler implements [`Command`](crate::commands::Command), receives a
//! [`CommandContext`](crate::commands::CommandContext) and returns the reply to
//! post, if any.
//!
//! # Available Handlers
//!
//! - [`InfoCommand`] - Summarize a game server from its rules
//! - [`OnlineCommand`] - List the players of a game server matching filters
//! - [`HelpCommand`] - Display usage information
//! - [`AliasCommand`] - Placeholder for alias management

mod alias;
mod help;
mod info;
mod online;

pub use crate::commands::actions::{
    alias::AliasCommand, help::HelpCommand, info::InfoCommand, online::OnlineCommand,
};
