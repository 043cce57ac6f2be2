//! IRC line parsing.
//!
//! Twitch chat is IRC with a few extensions. A line has the shape
//!
//! ```text
//! [@tags] [:prefix] COMMAND [params...] [:trailing]
//! ```
//!
//! Tags are only sent when capabilities are requested, which the bot does not
//! do, but they are skipped anyway.

use crate::twitch::ChatMessage;

/// A parsed IRC line.
#[derive(Debug, PartialEq, Eq)]
pub struct IrcMessage {
    /// Origin of the message, usually `nick!user@host`
    pub prefix: Option<String>,
    /// Command or numeric reply
    pub command: String,
    /// Parameters, the trailing one included
    pub params: Vec<String>,
}

impl IrcMessage {
    /// Parses a line received from the server.
    ///
    /// Returns `None` for empty lines.
    pub fn parse(line: &str) -> Option<Self> {
        let mut rest = line.trim_end_matches(['\r', '\n']);

        if rest.starts_with('@') {
            rest = rest.split_once(' ').map_or("", |(_, rest)| rest);
        }

        let prefix = match rest.strip_prefix(':') {
            Some(stripped) => {
                let (prefix, tail) = stripped.split_once(' ').unwrap_or((stripped, ""));
                rest = tail;
                Some(prefix.to_owned())
            }
            None => None,
        };

        let rest = rest.trim_start_matches(' ');
        let (command, mut rest) = rest.split_once(' ').unwrap_or((rest, ""));
        if command.is_empty() {
            return None;
        }

        let mut params = Vec::new();
        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }
            if let Some(trailing) = rest.strip_prefix(':') {
                params.push(trailing.to_owned());
                break;
            }
            let (param, tail) = rest.split_once(' ').unwrap_or((rest, ""));
            params.push(param.to_owned());
            rest = tail;
        }

        Some(IrcMessage {
            prefix,
            command: command.to_ascii_uppercase(),
            params,
        })
    }

    /// Nickname part of the prefix.
    pub fn nick(&self) -> Option<&str> {
        let prefix = self.prefix.as_deref()?;
        Some(prefix.split_once('!').map_or(prefix, |(nick, _)| nick))
    }

    /// Converts a `PRIVMSG` into a [`ChatMessage`].
    ///
    /// Returns `None` for any other command or a `PRIVMSG` without sender,
    /// target or text.
    pub fn into_chat_message(self) -> Option<ChatMessage> {
        if self.command != "PRIVMSG" || self.params.len() < 2 {
            return None;
        }

        let sender = self.nick()?.to_owned();
        let mut params = self.params.into_iter();
        let channel = params.next()?;
        let text = params.next()?;

        Some(ChatMessage {
            sender,
            channel,
            text,
        })
    }
}
