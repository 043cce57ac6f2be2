//! Reply formatters for bot commands.
//!
//! Twitch chat is plain text, replies are kept on a single line.

use crate::query::{Player, ServerInfo};

/// Formats the usage summary of the built-in commands.
///
/// # Arguments
///
/// * `trigger` - The command trigger configured for the bot
///
/// # Examples
///
/// ```ignore
/// use crate::commands::response::format_help;
///
/// let help = format_help("!");
/// assert!(help.contains("!info <address>"));
/// ```
pub fn format_help(trigger: &str) -> String {
    format!(
        "commands: {t}info <address> | {t}online <address> <filter1;filterN> | {t}help",
        t = trigger
    )
}

/// Formats a server summary as `<players>/<max> on <name> playing <map>`.
pub fn format_server_info(info: &ServerInfo) -> String {
    format!(
        "{}/{} on {} playing {}",
        info.players, info.max_players, info.name, info.map
    )
}

/// Formats player names, quoted and separated by tabs.
///
/// Returns `None` when there is no player, so that nothing is sent.
pub fn format_players(players: &[Player]) -> Option<String> {
    if players.is_empty() {
        return None;
    }

    Some(
        players
            .iter()
            .map(|player| format!("'{}'", player.name))
            .collect::<Vec<_>>()
            .join("\t"),
    )
}

/// Reply of commands that exist but do nothing yet.
pub fn format_not_implemented() -> String {
    "NOT IMPLEMENTED".to_owned()
}
