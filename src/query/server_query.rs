//! Typed queries on top of the raw A2S requests.
//!
//! This module provides the [`ServerQuery`] struct turning rule lists into
//! [`ServerInfo`] summaries and filtering player lists.

use log::{debug, info};

use crate::query::{
    QueryError, StatusQuery,
    retry::{RetryPolicy, retry},
    structs::{Player, Rule, ServerInfo},
};

/// Rule holding the name of the player owning the session.
const OWNING_PLAYER_NAME: &str = "OwningPlayerName";
/// Rule holding the number of free public slots.
const NUM_OPEN_PUBLIC_CONNECTIONS: &str = "NumOpenPublicConnections";
/// Rule holding the number of public slots.
const NUM_PUBLIC_CONNECTIONS: &str = "NumPublicConnections";
/// Rule conventionally holding the current map.
const MAP: &str = "p2";

/// Queries game servers with bounded retries.
///
/// It interacts with game servers through a [StatusQuery] implementation and
/// retries transport failures according to its [RetryPolicy].
///
/// # Examples
///
/// ```ignore
/// use crate::query::{A2sClient, RetryPolicy, ServerQuery};
///
/// # #[tokio::main]
/// # async fn main() {
/// let client = A2sClient::new(std::time::Duration::from_secs(2));
/// let server_query = ServerQuery::new(client, RetryPolicy::default());
/// let players = server_query
///     .players("1.2.3.4:27015", &["Bob".to_string()])
///     .await
///     .unwrap();
/// # }
/// ```
pub struct ServerQuery<Q: StatusQuery> {
    /// Status query used for every attempt
    status_query: Q,
    /// Retry policy of the transport calls
    policy: RetryPolicy,
}

impl<Q: StatusQuery> ServerQuery<Q> {
    /// Create a new [ServerQuery].
    ///
    /// # Arguments
    ///
    /// * `status_query` - An implementation of the [StatusQuery] trait to reach game servers.
    /// * `policy` - Attempts and delay applied to every transport call.
    pub fn new(status_query: Q, policy: RetryPolicy) -> Self {
        ServerQuery {
            status_query,
            policy,
        }
    }

    /// Queries the rules of a server and summarizes them.
    ///
    /// The rules request is retried on transport errors. Once rules are
    /// received, a non numeric or out of range player count aborts the query with
    /// [`QueryError::Parse`] without any further attempt.
    ///
    /// # Arguments
    ///
    /// * `address` - The `host:port` address of the game server.
    pub async fn server_info(&self, address: &str) -> Result<ServerInfo, QueryError> {
        let status_query = &self.status_query;
        let rules = retry(
            &self.policy,
            &format!("rules query of {}", address),
            move || status_query.query_rules(address),
        )
        .await?;

        let info = parse_server_info(&rules)?;
        info!("server info of {}: {}", address, info);

        Ok(info)
    }

    /// Queries the players of a server, keeping those matching a filter.
    ///
    /// A player is kept when its name contains any of the `filters`
    /// (case-sensitive). An empty filter list keeps every player. The order
    /// of the server reply is preserved.
    ///
    /// # Arguments
    ///
    /// * `address` - The `host:port` address of the game server.
    /// * `filters` - Substrings searched in player names.
    pub async fn players(
        &self,
        address: &str,
        filters: &[String],
    ) -> Result<Vec<Player>, QueryError> {
        let status_query = &self.status_query;
        let players = retry(
            &self.policy,
            &format!("players query of {}", address),
            move || status_query.query_players(address),
        )
        .await?;

        let total = players.len();
        let players = filter_players(players, filters);
        info!(
            "{} of {} players of {} match {:?}",
            players.len(),
            total,
            address,
            filters
        );

        Ok(players)
    }
}

/// Builds a [`ServerInfo`] from a rule list.
///
/// Unknown rules are ignored, missing ones leave their field at its default.
fn parse_server_info(rules: &[Rule]) -> Result<ServerInfo, QueryError> {
    let mut info = ServerInfo::default();
    let mut open_connections = 0;

    for rule in rules {
        match rule.name.as_str() {
            OWNING_PLAYER_NAME => info.name = rule.value.clone(),
            NUM_OPEN_PUBLIC_CONNECTIONS => open_connections = parse_number(rule)?,
            NUM_PUBLIC_CONNECTIONS => info.max_players = parse_number(rule)?,
            MAP => info.map = rule.value.clone(),
            _ => debug!("ignore rule {}={}", rule.name, rule.value),
        }
    }

    info.players = info
        .max_players
        .checked_sub(open_connections)
        .ok_or_else(|| QueryError::Parse {
            rule: NUM_OPEN_PUBLIC_CONNECTIONS.to_owned(),
            value: open_connections.to_string(),
        })?;

    Ok(info)
}

fn parse_number(rule: &Rule) -> Result<i32, QueryError> {
    rule.value.parse().map_err(|_| QueryError::Parse {
        rule: rule.name.clone(),
        value: rule.value.clone(),
    })
}

fn filter_players(players: Vec<Player>, filters: &[String]) -> Vec<Player> {
    if filters.is_empty() {
        return players;
    }

    players
        .into_iter()
        .filter(|player| {
            filters
                .iter()
                .any(|filter| player.name.contains(filter.as_str()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use crate::query::MockStatusQuery;

    const ADDRESS: &str = "1.2.3.4:27015";

    fn create_rules() -> Vec<Rule> {
        vec![
            Rule::new("OwningPlayerName", "Alice"),
            Rule::new("NumPublicConnections", "10"),
            Rule::new("NumOpenPublicConnections", "3"),
            Rule::new("p2", "de_dust2"),
        ]
    }

    fn timeout() -> QueryError {
        QueryError::Timeout(Duration::from_secs(2))
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_info() {
        let mut mock_status_query = MockStatusQuery::new();
        mock_status_query
            .expect_query_rules()
            .with(mockall::predicate::eq(ADDRESS))
            .times(1)
            .returning(|_| Ok(create_rules()));

        let server_query = ServerQuery::new(mock_status_query, RetryPolicy::default());
        let info = server_query.server_info(ADDRESS).await.unwrap();

        assert_eq!(
            info,
            ServerInfo {
                name: "Alice".to_string(),
                map: "de_dust2".to_string(),
                players: 7,
                max_players: 10,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_info_retries_three_times() {
        let mut mock_status_query = MockStatusQuery::new();
        mock_status_query
            .expect_query_rules()
            .times(3)
            .returning(|_| Err(timeout()));

        let server_query = ServerQuery::new(mock_status_query, RetryPolicy::default());
        let result = server_query.server_info(ADDRESS).await;

        assert!(matches!(result, Err(QueryError::Timeout(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_info_succeeds_on_second_attempt() {
        let mut mock_status_query = MockStatusQuery::new();
        let mut calls = 0;
        mock_status_query
            .expect_query_rules()
            .times(2)
            .returning(move |_| {
                calls += 1;
                if calls == 1 {
                    Err(timeout())
                } else {
                    Ok(create_rules())
                }
            });

        let server_query = ServerQuery::new(mock_status_query, RetryPolicy::default());
        let start = Instant::now();
        let info = server_query.server_info(ADDRESS).await.unwrap();

        // Exactly one delay between the two attempts
        assert_eq!(start.elapsed(), Duration::from_millis(250));
        assert_eq!(info.name, "Alice");
        assert_eq!(info.players, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_info_parse_error_is_not_retried() {
        let mut mock_status_query = MockStatusQuery::new();
        mock_status_query
            .expect_query_rules()
            .times(1)
            .returning(|_| Ok(vec![Rule::new("NumPublicConnections", "ten")]));

        let server_query = ServerQuery::new(mock_status_query, RetryPolicy::default());
        let result = server_query.server_info(ADDRESS).await;

        assert!(matches!(result, Err(QueryError::Parse { rule, value })
            if rule == "NumPublicConnections" && value == "ten"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_info_custom_policy() {
        let mut mock_status_query = MockStatusQuery::new();
        mock_status_query
            .expect_query_rules()
            .times(5)
            .returning(|_| Err(QueryError::Protocol("garbage".to_string())));

        let policy = RetryPolicy {
            attempts: 5,
            delay: Duration::from_millis(100),
        };
        let server_query = ServerQuery::new(mock_status_query, policy);
        let start = Instant::now();
        let result = server_query.server_info(ADDRESS).await;

        assert!(result.is_err());
        assert_eq!(start.elapsed(), Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_players_filters_by_substring() {
        let mut mock_status_query = MockStatusQuery::new();
        mock_status_query
            .expect_query_players()
            .with(mockall::predicate::eq(ADDRESS))
            .times(1)
            .returning(|_| {
                Ok(vec![
                    Player::named("Bob"),
                    Player::named("Dave"),
                    Player::named("Carlos"),
                ])
            });

        let server_query = ServerQuery::new(mock_status_query, RetryPolicy::default());
        let players = server_query
            .players(ADDRESS, &["Bob".to_string(), "Carl".to_string()])
            .await
            .unwrap();

        let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Carlos"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_players_retries_then_fails() {
        let mut mock_status_query = MockStatusQuery::new();
        mock_status_query
            .expect_query_players()
            .times(3)
            .returning(|_| Err(timeout()));

        let server_query = ServerQuery::new(mock_status_query, RetryPolicy::default());
        let result = server_query.players(ADDRESS, &["Bob".to_string()]).await;

        assert!(result.is_err());
    }

    #[test]
    fn test_parse_server_info_ignores_unknown_rules() {
        let rules = vec![
            Rule::new("bots", "4"),
            Rule::new("NumPublicConnections", "8"),
        ];

        let info = parse_server_info(&rules).unwrap();

        assert_eq!(info.name, "");
        assert_eq!(info.map, "");
        assert_eq!(info.max_players, 8);
        assert_eq!(info.players, 8);
    }

    #[test]
    fn test_parse_server_info_player_count_overflow() {
        let rules = vec![
            Rule::new("NumPublicConnections", "-2147483648"),
            Rule::new("NumOpenPublicConnections", "1"),
        ];

        let result = parse_server_info(&rules);

        assert!(matches!(result, Err(QueryError::Parse { rule, value })
            if rule == "NumOpenPublicConnections" && value == "1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_info_player_count_overflow_is_not_retried() {
        let mut mock_status_query = MockStatusQuery::new();
        mock_status_query
            .expect_query_rules()
            .times(1)
            .returning(|_| {
                Ok(vec![
                    Rule::new("NumPublicConnections", "2147483647"),
                    Rule::new("NumOpenPublicConnections", "-1"),
                ])
            });

        let server_query = ServerQuery::new(mock_status_query, RetryPolicy::default());
        let result = server_query.server_info(ADDRESS).await;

        assert!(matches!(result, Err(QueryError::Parse { .. })));
    }

    #[test]
    fn test_filter_players_is_case_sensitive() {
        let players = vec![Player::named("bob"), Player::named("Bobby")];

        let filtered = filter_players(players, &["Bob".to_string()]);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Bobby");
    }

    #[test]
    fn test_filter_players_empty_filters_keep_all() {
        let players = vec![Player::named("Bob"), Player::named("Dave")];

        let filtered = filter_players(players, &[]);

        assert_eq!(filtered.len(), 2);
    }
}
