//! Online command handler.
//!
//! Lists the players of a game server whose name contains any of the given
//! filters. The arguments are the server address and a `;` separated filter
//! list: `online 1.2.3.4:27015 Bob;Carl`.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};

use crate::{
    commands::{Command, CommandContext, response::format_players},
    query::{ServerQuery, StatusQuery},
};

/// Lists the matching players of the game server given as argument.
pub struct OnlineCommand<Q: StatusQuery> {
    server_query: Arc<ServerQuery<Q>>,
}

impl<Q: StatusQuery> OnlineCommand<Q> {
    /// Creates the command on top of a shared [`ServerQuery`].
    pub fn new(server_query: Arc<ServerQuery<Q>>) -> Self {
        OnlineCommand { server_query }
    }
}

#[async_trait]
impl<Q: StatusQuery> Command for OnlineCommand<Q> {
    async fn execute(&self, context: &CommandContext) -> Option<String> {
        debug!("handling online command {:?}", context.args);

        let Some((address, filters)) = parse_arguments(&context.args) else {
            debug!("invalid online arguments {:?}", context.args);
            return None;
        };

        match self.server_query.players(address, &filters).await {
            Ok(players) => format_players(&players),
            Err(e) => {
                warn!("no players for {}: {}", address, e);
                None
            }
        }
    }
}

/// Splits `<address> <filter1;filterN>` into the address and its filters.
///
/// Both parts are required. Empty filters, as in `Bob;;Carl` or `Bob;`, are
/// dropped: an empty term would be contained in every name, so a stray `;`
/// would list the whole server. Only a filter list made of empty terms alone,
/// such as `;`, ends up empty and keeps every player.
fn parse_arguments(args: &str) -> Option<(&str, Vec<String>)> {
    let (address, filters) = args.split_once(' ')?;
    if address.is_empty() || filters.is_empty() {
        return None;
    }

    let filters = filters
        .split(';')
        .filter(|filter| !filter.is_empty())
        .map(str::to_owned)
        .collect();

    Some((address, filters))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::query::{MockStatusQuery, Player, QueryError, RetryPolicy};

    fn create_context(args: &str) -> CommandContext {
        CommandContext {
            sender: "alice".to_string(),
            channel: "#chan".to_string(),
            args: args.to_string(),
        }
    }

    fn create_command(mock_status_query: MockStatusQuery) -> OnlineCommand<MockStatusQuery> {
        OnlineCommand::new(Arc::new(ServerQuery::new(
            mock_status_query,
            RetryPolicy::default(),
        )))
    }

    fn create_players() -> Vec<Player> {
        vec![
            Player::named("Bob"),
            Player::named("Dave"),
            Player::named("Carlos"),
        ]
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(
            parse_arguments("1.2.3.4:27015 Bob;Carl"),
            Some((
                "1.2.3.4:27015",
                vec!["Bob".to_string(), "Carl".to_string()]
            ))
        );
        assert_eq!(
            parse_arguments("1.2.3.4:27015 Bob;;Carl;"),
            Some((
                "1.2.3.4:27015",
                vec!["Bob".to_string(), "Carl".to_string()]
            ))
        );
        // Spaces belong to the filters
        assert_eq!(
            parse_arguments("1.2.3.4:27015 Big Bob"),
            Some(("1.2.3.4:27015", vec!["Big Bob".to_string()]))
        );
    }

    #[test]
    fn test_parse_arguments_invalid() {
        assert_eq!(parse_arguments(""), None);
        assert_eq!(parse_arguments("1.2.3.4:27015"), None);
        assert_eq!(parse_arguments("1.2.3.4:27015 "), None);
        assert_eq!(parse_arguments(" Bob"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_online_replies_matching_players() {
        let mut mock_status_query = MockStatusQuery::new();
        mock_status_query
            .expect_query_players()
            .with(mockall::predicate::eq("1.2.3.4:27015"))
            .times(1)
            .returning(|_| Ok(create_players()));

        let reply = create_command(mock_status_query)
            .execute(&create_context("1.2.3.4:27015 Bob;Carl"))
            .await;

        assert_eq!(reply.as_deref(), Some("'Bob'\t'Carlos'"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_online_trailing_separator_does_not_match_everyone() {
        let mut mock_status_query = MockStatusQuery::new();
        mock_status_query
            .expect_query_players()
            .times(1)
            .returning(|_| Ok(create_players()));

        let reply = create_command(mock_status_query)
            .execute(&create_context("1.2.3.4:27015 Bob;"))
            .await;

        assert_eq!(reply.as_deref(), Some("'Bob'"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_online_silent_without_match() {
        let mut mock_status_query = MockStatusQuery::new();
        mock_status_query
            .expect_query_players()
            .times(1)
            .returning(|_| Ok(create_players()));

        let reply = create_command(mock_status_query)
            .execute(&create_context("1.2.3.4:27015 Zed"))
            .await;

        assert_eq!(reply, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_online_silent_on_failure() {
        let mut mock_status_query = MockStatusQuery::new();
        mock_status_query
            .expect_query_players()
            .times(3)
            .returning(|_| Err(QueryError::Timeout(Duration::from_secs(2))));

        let reply = create_command(mock_status_query)
            .execute(&create_context("1.2.3.4:27015 Bob"))
            .await;

        assert_eq!(reply, None);
    }

    #[tokio::test]
    async fn test_online_invalid_arguments_skip_query() {
        let mut mock_status_query = MockStatusQuery::new();
        mock_status_query.expect_query_players().times(0);

        let reply = create_command(mock_status_query)
            .execute(&create_context("1.2.3.4:27015"))
            .await;

        assert_eq!(reply, None);
    }
}
