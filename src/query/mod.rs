//! Game server status queries over the Steam A2S protocol.
//!
//! This module provides everything the bot needs to ask a game server about
//! its state, handling the unreliable UDP transport and the untyped replies.
//!
//! # Modules
//!
//! - `a2s` - UDP client implementing the [`StatusQuery`] trait
//! - `packet` - A2S request encoding and response decoding
//! - `retry` - Bounded retry combinator shared by every query
//! - `server_query` - Typed queries ([`ServerInfo`], filtered [`Player`] lists)
//! - `structs` - Public data structures returned by the queries
//!
//! # Error Model
//!
//! Transport problems (timeouts, socket errors, malformed datagrams) are
//! retryable and go through the [`RetryPolicy`]. A rule that cannot be
//! interpreted is a [`QueryError::Parse`] and aborts the query immediately.
//!
//! # Examples
//!
//! ```ignore
//! use crate::query::{A2sClient, RetryPolicy, ServerQuery};
//!
//! # async fn example() -> Result<(), crate::query::QueryError> {
//! let client = A2sClient::new(std::time::Duration::from_secs(2));
//! let server_query = ServerQuery::new(client, RetryPolicy::default());
//! let info = server_query.server_info("1.2.3.4:27015").await?;
//! println!("{}/{} on {}", info.players, info.max_players, info.map);
//! # Ok(())
//! # }
//! ```

use std::{io, time::Duration};

use thiserror::Error;

mod a2s;
mod packet;
mod retry;
mod server_query;
mod structs;

pub use crate::query::a2s::{A2sClient, StatusQuery};
#[cfg(test)]
pub use crate::query::a2s::MockStatusQuery;
pub use crate::query::retry::RetryPolicy;
pub use crate::query::server_query::ServerQuery;
pub use crate::query::structs::{Player, Rule, ServerInfo};

/// Errors that can occur while querying a game server.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The socket could not be created, connected, written or read.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// The server did not answer before the deadline.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// The server answered with a datagram that does not follow the protocol.
    #[error("malformed response: {0}")]
    Protocol(String),

    /// A rule expected to be numeric holds something else, or a number out of range.
    #[error("rule {rule} has an invalid value {value:?}")]
    Parse {
        /// Name of the offending rule
        rule: String,
        /// Raw value received from the server
        value: String,
    },
}

impl QueryError {
    /// Whether another attempt of the same request may succeed.
    ///
    /// Only transport failures are worth retrying: a parse error comes from
    /// the data the server holds and will be identical on the next attempt.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, QueryError::Parse { .. })
    }
}
