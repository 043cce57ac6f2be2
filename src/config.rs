//! Configuration file structures for the servbot bot.
//!
//! This module defines the configuration file format using YAML. The configuration
//! is split into a Twitch account section, the command trigger and the optional
//! status query tuning.
//!
//! # Configuration File Format
//!
//! ```yaml
//! # Twitch account configuration
//! twitch:
//!   # Login name of the bot account
//!   username: "mybot"
//!   # OAuth token, the "oauth:" prefix is optional
//!   oauth: "token"
//!   # Channels to join
//!   channels: ["somechannel"]
//!   # Chat server, optional
//!   host: "irc.chat.twitch.tv:6667"
//!
//! # Prefix of the bot commands
//! command_char: "!"
//!
//! # Status query tuning, optional
//! query:
//!   attempts: 3
//!   retry_delay: 250   # milliseconds
//!   timeout: 2000      # milliseconds
//! ```
//!
//! # Environment Variable Overrides
//!
//! Every value can be overridden with a `SERVBOT_` prefixed environment
//! variable, nested keys being separated by `__`:
//!
//! ```bash
//! export SERVBOT_TWITCH__OAUTH="secret-from-env"
//! export SERVBOT_QUERY__ATTEMPTS=5
//! ```

use std::{fs, time::Duration};

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;

use crate::{query::RetryPolicy, twitch::Credentials};

/// Prefix of the environment variables overriding the configuration.
const ENV_PREFIX: &str = "SERVBOT_";

/// Root configuration structure for the servbot bot.
///
/// # Examples
///
/// ```ignore
/// use crate::config::Config;
///
/// let config = Config::load("config.yaml").unwrap();
/// println!("Joining {:?}", config.twitch.channels);
/// ```
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Twitch account configuration
    pub twitch: Twitch,
    /// Prefix introducing a command in a chat message
    #[serde(default = "default_command_char")]
    pub command_char: String,
    /// Status query configuration
    #[serde(default)]
    pub query: Query,
}

/// Twitch account configuration.
#[derive(Debug, Deserialize)]
pub struct Twitch {
    /// Login name of the bot account.
    pub username: String,

    /// OAuth token of the bot account.
    ///
    /// Prefer the `SERVBOT_TWITCH__OAUTH` environment variable to keep it out
    /// of the configuration file.
    pub oauth: String,

    /// Channels to join, with or without their leading `#`.
    pub channels: Vec<String>,

    /// `host:port` of the chat server.
    #[serde(default = "default_host")]
    pub host: String,
}

/// Status query configuration.
///
/// Delays are expressed in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Query {
    /// Total number of attempts of a query
    pub attempts: u32,
    /// Delay between two attempts
    pub retry_delay: u64,
    /// Maximum duration of a single attempt
    pub timeout: u64,
}

impl Default for Query {
    fn default() -> Self {
        Query {
            attempts: 3,
            retry_delay: 250,
            timeout: 2000,
        }
    }
}

fn default_command_char() -> String {
    "!".to_string()
}

fn default_host() -> String {
    "irc.chat.twitch.tv:6667".to_string()
}

impl Config {
    /// Loads the configuration from the YAML file at `path`, then applies the
    /// `SERVBOT_` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] when the file cannot be read, is invalid,
    /// or when a required value is missing from both the file and the
    /// environment. The file is required even if the environment holds every
    /// value.
    pub fn load(path: &str) -> Result<Self, figment::Error> {
        let content = fs::read_to_string(path).map_err(|e| {
            figment::Error::from(format!("failed to read config file {}: {}", path, e))
        })?;

        Figment::new()
            .merge(Yaml::string(&content))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }

    /// Credentials handed to the Twitch client.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.twitch.username.clone(),
            oauth: self.twitch.oauth.clone(),
            channels: self.twitch.channels.clone(),
            host: self.twitch.host.clone(),
        }
    }
}

impl Query {
    /// Retry policy of the status queries.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.attempts,
            delay: Duration::from_millis(self.retry_delay),
        }
    }

    /// Timeout of a single status query attempt.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }
}
