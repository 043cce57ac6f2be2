//! Data structures returned by the server query layer.
//!
//! [`Rule`] and [`Player`] mirror the records of the A2S protocol, while
//! [`ServerInfo`] is the typed summary extracted from a rule list.

use std::{fmt, time::Duration};

/// An opaque key/value pair returned by an A2S_RULES query.
///
/// The protocol assigns no meaning to rules, they are interpreted by
/// convention (for example `p2` holds the current map on most servers).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Rule name
    pub name: String,
    /// Rule value, always transmitted as text
    pub value: String,
}

impl Rule {
    /// Creates a rule from any pair of string-like values.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Rule {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A player record returned by an A2S_PLAYER query.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Player's display name
    pub name: String,
    /// Score reported by the server
    pub score: i32,
    /// Time the player has been connected
    pub duration: Duration,
}

impl Player {
    /// Creates a player with a zero score and connection time.
    ///
    /// Mostly useful to build fixtures, real records come from
    /// [`decode_players`](crate::query::packet::decode_players).
    #[cfg(test)]
    pub fn named(name: &str) -> Self {
        Player {
            name: name.to_owned(),
            score: 0,
            duration: Duration::ZERO,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "name={}, score={}, duration={}s",
            self.name,
            self.score,
            self.duration.as_secs()
        )
    }
}

/// Typed summary of a server, built from its rule list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerInfo {
    /// Name of the player owning the session (`OwningPlayerName`)
    pub name: String,
    /// Current map (`p2`)
    pub map: String,
    /// Connected players, derived from the number of open slots
    pub players: i32,
    /// Public slots (`NumPublicConnections`)
    pub max_players: i32,
}

impl fmt::Display for ServerInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "name={}, map={}, players={}/{}",
            self.name, self.map, self.players, self.max_players
        )
    }
}
