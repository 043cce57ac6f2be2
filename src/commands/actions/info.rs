//! Info command handler.
//!
//! Queries the rules of the game server given as argument and replies with a
//! one line summary: connected players, slots, session owner and map.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};

use crate::{
    commands::{Command, CommandContext, response::format_server_info},
    query::{ServerQuery, StatusQuery},
};

/// Summarizes the game server at the address given as argument.
pub struct InfoCommand<Q: StatusQuery> {
    server_query: Arc<ServerQuery<Q>>,
}

impl<Q: StatusQuery> InfoCommand<Q> {
    /// Creates the command on top of a shared [`ServerQuery`].
    pub fn new(server_query: Arc<ServerQuery<Q>>) -> Self {
        InfoCommand { server_query }
    }
}

#[async_trait]
impl<Q: StatusQuery> Command for InfoCommand<Q> {
    async fn execute(&self, context: &CommandContext) -> Option<String> {
        let address = context.args.trim();
        debug!("handling info command for {}", address);

        if address.is_empty() {
            debug!("info command without address");
            return None;
        }

        match self.server_query.server_info(address).await {
            Ok(info) => Some(format_server_info(&info)),
            Err(e) => {
                warn!("no info for {}: {}", address, e);
                None
            }
        }
    }
}
