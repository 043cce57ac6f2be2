//! Main bot orchestration.
//!
//! This module wires the configuration, the status query client, the commands,
//! the aliases and the Twitch chat client together.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  ChatMessage  ┌────────────┐  Route  ┌──────────────┐
//! │ TwitchClient │ ────────────▶ │ Dispatcher │ ──────▶ │   Command    │
//! └──────────────┘               └────────────┘         └──────────────┘
//!        ▲                                                    │
//!        │                     reply                          │ ServerQuery
//!        └────────────────────────────────────────────────────┘
//! ```
//!
//! Every chat message is handled in its own task, so a slow game server never
//! delays the read loop nor the other commands.

use std::sync::Arc;

use anyhow::Context;
use log::info;
use tokio::task::JoinHandle;

use crate::{
    Args,
    aliases::{AliasLoader, AliasRegistry},
    commands::{AliasCommand, CommandRegistry, HelpCommand, InfoCommand, OnlineCommand},
    config::Config,
    dispatcher::Dispatcher,
    query::{A2sClient, ServerQuery, StatusQuery},
    twitch::{Chat, ChatMessage, TwitchClient},
};

/// Main bot instance.
pub struct Bot {
    /// Twitch chat client, also used to send the replies
    twitch_client: Arc<TwitchClient>,

    /// Routes chat messages to commands
    dispatcher: Arc<Dispatcher>,
}

impl Bot {
    /// Creates a new bot instance.
    ///
    /// Registers the built-in commands, loads and resolves the aliases and
    /// builds the dispatcher. No connection is made until [`Bot::start`].
    ///
    /// # Arguments
    ///
    /// * `config` - Bot configuration
    /// * `args` - Command line arguments, holding the alias file path
    ///
    /// # Errors
    ///
    /// Fails when the alias file cannot be loaded, when an alias cannot be
    /// resolved, or when the command pattern cannot be built.
    pub async fn new(config: Config, args: Args) -> Result<Self, anyhow::Error> {
        let server_query = Arc::new(ServerQuery::new(
            A2sClient::new(config.query.timeout()),
            config.query.retry_policy(),
        ));
        let commands = build_commands(server_query, &config.command_char);

        let definitions = AliasLoader::new(&args.aliases)
            .load()
            .await
            .context("failed to load aliases")?;
        let aliases =
            AliasRegistry::resolve(definitions, &commands).context("failed to resolve aliases")?;

        let dispatcher = Dispatcher::new(&config.command_char, commands, aliases)
            .context("failed to build the command pattern")?;

        let twitch_client = Arc::new(TwitchClient::new(config.credentials()));

        Ok(Bot {
            twitch_client,
            dispatcher: Arc::new(dispatcher),
        })
    }

    /// Starts the bot.
    ///
    /// Connects to the chat and handles messages until the process is
    /// terminated. Lost connections are re-established by the client.
    pub async fn start(self) {
        info!("listening to chat messages");

        let twitch_client = Arc::clone(&self.twitch_client);
        let dispatcher = Arc::clone(&self.dispatcher);

        let on_message = move |message: ChatMessage| {
            handle_chat_message(Arc::clone(&twitch_client), Arc::clone(&dispatcher), message);
        };

        self.twitch_client.run(on_message).await;
    }
}

/// Registers the built-in commands.
///
/// # Arguments
///
/// * `server_query` - Query service shared by `info` and `online`
/// * `trigger` - Command prefix shown in the help text
fn build_commands<Q: StatusQuery + 'static>(
    server_query: Arc<ServerQuery<Q>>,
    trigger: &str,
) -> CommandRegistry {
    let mut commands = CommandRegistry::new();
    commands.register("info", Arc::new(InfoCommand::new(Arc::clone(&server_query))));
    commands.register("online", Arc::new(OnlineCommand::new(server_query)));
    commands.register("help", Arc::new(HelpCommand::new(trigger)));
    commands.register("alias", Arc::new(AliasCommand));
    commands
}

/// Dispatches `message` in a new task.
fn handle_chat_message<C: Chat + 'static>(
    chat: Arc<C>,
    dispatcher: Arc<Dispatcher>,
    message: ChatMessage,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        dispatcher.dispatch(chat.as_ref(), &message).await;
    })
}
