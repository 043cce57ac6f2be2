//! Routing of chat messages to commands.
//!
//! The [`Dispatcher`] owns the [`CommandRegistry`] and the [`AliasRegistry`]
//! and recognizes invocations with a single [`CommandPattern`] built over the
//! names of both. A matched message runs exactly one command: a registered
//! command with the raw argument text, or the command behind an alias with
//! the expanded alias format.
//!
//! # Example Usage
//!
//! ```ignore
//! use crate::aliases::AliasRegistry;
//! use crate::commands::CommandRegistry;
//! use crate::dispatcher::Dispatcher;
//!
//! let dispatcher = Dispatcher::new("!", CommandRegistry::new(), AliasRegistry::default()).unwrap();
//! if let Some(route) = dispatcher.route("!info 1.2.3.4:27015") {
//!     println!("{} {}", route.name, route.args);
//! }
//! ```

use std::sync::Arc;

use log::{debug, info};

use crate::{
    aliases::AliasRegistry,
    commands::{Command, CommandContext, CommandRegistry},
    twitch::{Chat, ChatMessage},
};

mod pattern;

pub use crate::dispatcher::pattern::{CommandPattern, PatternError};

/// The command a message resolves to.
pub struct Route {
    /// Command or alias name found in the message
    pub name: String,
    /// Command to execute
    pub command: Arc<dyn Command>,
    /// Argument text handed to the command
    pub args: String,
}

/// Matches chat messages and runs the invoked command.
pub struct Dispatcher {
    commands: CommandRegistry,
    aliases: AliasRegistry,
    pattern: CommandPattern,
}

impl Dispatcher {
    /// Creates a dispatcher recognizing every command and alias after `trigger`.
    ///
    /// # Arguments
    ///
    /// * `trigger` - Prefix introducing a command, `!` in most channels
    /// * `commands` - The registered commands
    /// * `aliases` - The resolved aliases, disjoint from the command names
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] when the trigger is empty or when there is
    /// nothing to match.
    pub fn new(
        trigger: &str,
        commands: CommandRegistry,
        aliases: AliasRegistry,
    ) -> Result<Self, PatternError> {
        let pattern = CommandPattern::build(trigger, commands.names().chain(aliases.names()))?;

        info!(
            "dispatching {} commands and {} aliases with trigger {:?}",
            commands.len(),
            aliases.len(),
            trigger
        );

        Ok(Dispatcher {
            commands,
            aliases,
            pattern,
        })
    }

    /// Resolves `text` to the command it invokes.
    ///
    /// # Returns
    ///
    /// * `Some(Route)` - The command to run and its argument text
    /// * `None` - The text is not an invocation
    pub fn route(&self, text: &str) -> Option<Route> {
        let (name, args) = self.pattern.captures(text)?;

        if let Some(command) = self.commands.get(name) {
            return Some(Route {
                name: name.to_owned(),
                command,
                args: args.to_owned(),
            });
        }

        let alias = self.aliases.get(name)?;
        debug!("alias {} expands to {}", name, alias.command_name);

        Some(Route {
            name: name.to_owned(),
            command: Arc::clone(&alias.command),
            args: alias.expand(args),
        })
    }

    /// Runs the command invoked by `message` and posts its reply.
    ///
    /// Messages that are not an invocation are ignored. The reply, if any, is
    /// sent to the channel the message came from.
    pub async fn dispatch(&self, chat: &dyn Chat, message: &ChatMessage) {
        let Some(route) = self.route(&message.text) else {
            return;
        };

        info!(
            "executing {} {:?} for user {} in {}",
            route.name, route.args, message.sender, message.channel
        );

        let context = CommandContext {
            sender: message.sender.clone(),
            channel: message.channel.clone(),
            args: route.args,
        };

        match route.command.execute(&context).await {
            Some(reply) => chat.say(&message.channel, &reply).await,
            None => debug!("no reply for {}", route.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::{
        aliases::AliasDefinition,
        commands::MockCommand,
        twitch::MockChat,
    };

    fn create_message(text: &str) -> ChatMessage {
        ChatMessage {
            sender: "alice".to_string(),
            channel: "#chan".to_string(),
            text: text.to_string(),
        }
    }

    fn create_definition(command: &str, format: &str) -> AliasDefinition {
        AliasDefinition {
            command: command.to_string(),
            format: format.to_string(),
        }
    }

    fn echo_command(expected_calls: usize) -> MockCommand {
        let mut command = MockCommand::new();
        command
            .expect_execute()
            .times(expected_calls)
            .returning(|context| Some(format!("echo {}", context.args)));
        command
    }

    fn create_dispatcher(
        commands: CommandRegistry,
        definitions: Vec<(String, AliasDefinition)>,
    ) -> Dispatcher {
        let aliases = AliasRegistry::resolve(definitions, &commands).unwrap();
        Dispatcher::new("!", commands, aliases).unwrap()
    }

    #[test]
    fn test_route_command() {
        let mut commands = CommandRegistry::new();
        commands.register("info", Arc::new(MockCommand::new()));
        commands.register("online", Arc::new(MockCommand::new()));
        let dispatcher = create_dispatcher(commands, Vec::new());

        let route = dispatcher.route("!info 1.2.3.4:27015").unwrap();
        assert_eq!(route.name, "info");
        assert_eq!(route.args, "1.2.3.4:27015");

        let route = dispatcher.route("!online 1.2.3.4:27015 Bob;Carl").unwrap();
        assert_eq!(route.name, "online");
        assert_eq!(route.args, "1.2.3.4:27015 Bob;Carl");

        assert!(dispatcher.route("hello").is_none());
        assert!(dispatcher.route("!information").is_none());
    }

    #[test]
    fn test_route_alias_expands_format() {
        let mut commands = CommandRegistry::new();
        commands.register("online", Arc::new(MockCommand::new()));
        let dispatcher = create_dispatcher(
            commands,
            vec![
                (
                    "friends".to_string(),
                    create_definition("online", "1.2.3.4:27015 %s"),
                ),
                (
                    "crew".to_string(),
                    create_definition("online", "1.2.3.4:27015 Bob;Carl"),
                ),
            ],
        );

        let route = dispatcher.route("!friends Bob;Carl").unwrap();
        assert_eq!(route.name, "friends");
        assert_eq!(route.args, "1.2.3.4:27015 Bob;Carl");

        let route = dispatcher.route("!crew whatever").unwrap();
        assert_eq!(route.args, "1.2.3.4:27015 Bob;Carl");
    }

    #[test]
    fn test_new_without_names_fails() {
        let result = Dispatcher::new("!", CommandRegistry::new(), AliasRegistry::default());

        assert!(matches!(result, Err(PatternError::NoNames)));
    }

    #[tokio::test]
    async fn test_dispatch_sends_reply() {
        let mut commands = CommandRegistry::new();
        commands.register("info", Arc::new(echo_command(1)));
        let dispatcher = create_dispatcher(commands, Vec::new());

        let mut chat = MockChat::new();
        chat.expect_say()
            .with(eq("#chan"), eq("echo 1.2.3.4:27015"))
            .times(1)
            .returning(|_, _| ());

        dispatcher
            .dispatch(&chat, &create_message("!info 1.2.3.4:27015"))
            .await;
    }

    #[tokio::test]
    async fn test_dispatch_alias_runs_command_once() {
        let mut commands = CommandRegistry::new();
        commands.register("info", Arc::new(echo_command(1)));
        let dispatcher = create_dispatcher(
            commands,
            vec![("srv".to_string(), create_definition("info", "1.2.3.4:27015"))],
        );

        let mut chat = MockChat::new();
        chat.expect_say()
            .with(eq("#chan"), eq("echo 1.2.3.4:27015"))
            .times(1)
            .returning(|_, _| ());

        dispatcher.dispatch(&chat, &create_message("!srv")).await;
    }

    #[tokio::test]
    async fn test_dispatch_ignores_other_messages() {
        let mut commands = CommandRegistry::new();
        commands.register("info", Arc::new(echo_command(0)));
        let dispatcher = create_dispatcher(commands, Vec::new());

        let mut chat = MockChat::new();
        chat.expect_say().times(0);

        dispatcher.dispatch(&chat, &create_message("hello")).await;
        dispatcher.dispatch(&chat, &create_message("!infos")).await;
    }

    #[tokio::test]
    async fn test_dispatch_silent_command() {
        let mut command = MockCommand::new();
        command
            .expect_execute()
            .withf(|context| context.sender == "alice" && context.channel == "#chan")
            .times(1)
            .returning(|_| None);
        let mut commands = CommandRegistry::new();
        commands.register("help", Arc::new(command));
        let dispatcher = create_dispatcher(commands, Vec::new());

        let mut chat = MockChat::new();
        chat.expect_say().times(0);

        dispatcher.dispatch(&chat, &create_message("!help")).await;
    }
}
