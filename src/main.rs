//! servbot - A Twitch chat bot reporting game server status.
//!
//! This is the main entry point for servbot, which answers chat commands with
//! live information queried from game servers speaking the A2S protocol.
//!
//! # Overview
//!
//! servbot joins Twitch channels and listens to messages starting with the
//! configured trigger. Known commands query the game server given as argument
//! and post a one-line summary in the channel.
//!
//! # Features
//!
//! - **Server Summary**: Player count, owner and map of a server
//! - **Player Search**: List the connected players whose name matches a filter
//! - **Aliases**: Shortcuts binding a name to a command and a text template
//! - **Retries**: Transient network failures are retried before giving up
//! - **Reconnection**: The chat connection is re-established when lost
//! - **YAML Configuration**: Simple configuration file format with environment variable support
//!
//! # Configuration
//!
//! Create a `config.yaml` file with your settings:
//!
//! ```yaml
//! twitch:
//!   username: "mybot"
//!   oauth: "your-oauth-token"
//!   channels: ["somechannel"]
//!
//! command_char: "!"
//! ```
//!
//! And an `aliases.json` file, possibly an empty object:
//!
//! ```json
//! {
//!   "srv": { "command": "info", "format": "1.2.3.4:27015" },
//!   "friends": { "command": "online", "format": "1.2.3.4:27015 %s" }
//! }
//! ```
//!
//! # Environment Variable Overrides
//!
//! Override any configuration value using environment variables with the `SERVBOT_` prefix:
//!
//! ```bash
//! export SERVBOT_TWITCH__USERNAME="mybot"
//! export SERVBOT_TWITCH__OAUTH="your-oauth-token"
//! ```
//!
//! # Usage
//!
//! ```bash
//! servbot --config config.yaml --aliases aliases.json
//! ```
//!
//! # Bot Commands
//!
//! - `!info <address>` - Summarize a game server
//! - `!online <address> <filter1;filterN>` - List the matching players of a server
//! - `!help` - Display the command syntax
//! - `!<alias> [text]` - Run the command bound to an alias
//!
//! # Architecture
//!
//! The bot consists of several modules:
//!
//! - [`aliases`] - Alias definitions, loading and resolution
//! - [`bot`] - Wiring of the chat client, the dispatcher and the commands
//! - [`commands`] - Command abstraction, registry and built-in handlers
//! - [`config`] - YAML configuration file structures and loading with environment variable support
//! - [`dispatcher`] - Command pattern and routing of chat messages
//! - [`query`] - A2S status query client and retry policy
//! - [`twitch`] - Twitch chat client
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)
//!   - Set to `debug` for verbose output
//!   - Set to `warn` or `error` for minimal logging

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::{bot::Bot, config::Config};

mod aliases;
mod bot;
mod commands;
mod config;
mod dispatcher;
mod query;
mod twitch;

/// Command-line arguments for servbot.
///
/// # Examples
///
/// ```bash
/// servbot --config config.yaml --aliases aliases.json
/// ```
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    ///
    /// The configuration file contains the Twitch account and the command
    /// trigger. See the [`config`] module for the expected format.
    #[arg(short, long)]
    config: String,

    /// Path to the JSON alias file.
    ///
    /// The file must exist, use `{}` for no alias. An alias referring to an
    /// unknown command prevents the bot from starting.
    #[arg(short, long, default_value = "aliases.json")]
    aliases: String,
}

/// Main entry point for servbot.
///
/// This function initializes the bot with the following steps:
///
/// 1. **Logging Setup**: Configures the logger with `info` level by default
///    (can be overridden with the `RUST_LOG` environment variable)
/// 2. **Argument Parsing**: Parses command-line arguments using `clap`
/// 3. **Configuration Loading**: Reads the YAML configuration file and the environment overrides
/// 4. **Bot Initialization**: Registers the commands, loads the aliases and builds the dispatcher
/// 5. **Bot Execution**: Connects to the chat and handles messages forever
///
/// # Exit Status
///
/// Any startup failure is logged and ends the process with status 1.
#[tokio::main]
async fn main() {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting servbot {}...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            std::process::exit(1);
        }
    };

    let bot = match Bot::new(config, args).await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to initialize bot: {:#}", e);
            std::process::exit(1);
        }
    };
    bot.start().await;
}
