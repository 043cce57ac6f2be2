//! Twitch chat integration for the bot.
//!
//! This module provides a minimal Twitch chat client speaking IRC over TCP:
//! - Authentication with an OAuth token
//! - Joining the configured channels
//! - Keep-alive (`PING`/`PONG`) and reconnection
//! - Receiving and sending channel messages
//!
//! # Architecture
//!
//! The module is structured around the [`TwitchClient`], which reads IRC lines
//! parsed by the message submodule and forwards channel messages to a callback
//! as [`ChatMessage`]s. Replies go through the [`Chat`] trait so that message
//! handling can be tested without a connection.
//!
//! # Examples
//!
//! ```ignore
//! use crate::twitch::{Credentials, TwitchClient};
//!
//! # async fn example() {
//! let credentials = Credentials {
//!     username: "servbot".to_string(),
//!     oauth: "token".to_string(),
//!     channels: vec!["somechannel".to_string()],
//!     host: "irc.chat.twitch.tv:6667".to_string(),
//! };
//!
//! let client = TwitchClient::new(credentials);
//! client.run(|message| println!("{}: {}", message.sender, message.text)).await;
//! # }
//! ```

use async_trait::async_trait;
use mockall::automock;

mod client;
mod message;

pub use crate::twitch::client::TwitchClient;

/// Credentials and channels of the Twitch account.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Login name of the bot account
    pub username: String,
    /// OAuth token, with or without its `oauth:` prefix
    pub oauth: String,
    /// Channels to join, with or without their leading `#`
    pub channels: Vec<String>,
    /// `host:port` of the chat server
    pub host: String,
}

/// A message posted in a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Login name of the author
    pub sender: String,
    /// Channel the message was posted in, with its leading `#`
    pub channel: String,
    /// Message text
    pub text: String,
}

/// Trait for sending text to a chat channel.
///
/// Failures are handled by the implementation, a reply is best effort.
#[automock]
#[async_trait]
pub trait Chat: Send + Sync {
    /// Sends `text` to `channel`.
    async fn say(&self, channel: &str, text: &str);
}
