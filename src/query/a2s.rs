//! UDP client for the Steam A2S server query protocol.
//!
//! This module provides the [`A2sClient`] struct issuing A2S_RULES and
//! A2S_PLAYER requests, and the [`StatusQuery`] trait it implements.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use mockall::automock;
use tokio::{net::UdpSocket, time};

use crate::query::{
    QueryError,
    packet::{
        CHALLENGE_RESPONSE, Datagram, NO_CHALLENGE, Request, SplitAssembler, decode_datagram,
        decode_players, decode_rules,
    },
    structs::{Player, Rule},
};

/// Largest datagram a server sends, split responses included.
const MAX_DATAGRAM_SIZE: usize = 1400;

/// Servers answer a request without challenge with a challenge, and the
/// request carrying it with the data. Anything longer is a misbehaving server.
const MAX_CHALLENGE_ROUNDS: usize = 2;

/// Trait for issuing status queries to a game server.
///
/// This trait abstracts the network operations for easier testing with mocks.
/// Each call is a single attempt, retries are handled by the caller.
#[automock]
#[async_trait]
pub trait StatusQuery: Send + Sync {
    /// Fetches the rule list of the server at `address`.
    async fn query_rules(&self, address: &str) -> Result<Vec<Rule>, QueryError>;
    /// Fetches the connected players of the server at `address`.
    async fn query_players(&self, address: &str) -> Result<Vec<Player>, QueryError>;
}

/// A2S client over UDP.
///
/// Every request opens its own ephemeral socket, so concurrent queries never
/// read each other's replies.
///
/// # Examples
///
/// ```ignore
/// use std::time::Duration;
///
/// use crate::query::{A2sClient, StatusQuery};
///
/// let client = A2sClient::new(Duration::from_secs(2));
/// let rules = client.query_rules("1.2.3.4:27015").await.unwrap();
/// println!("Rules: {:?}", rules);
/// ```
pub struct A2sClient {
    /// Deadline of a whole request, challenge round included
    timeout: Duration,
}

impl A2sClient {
    /// Create a new [A2sClient].
    ///
    /// # Arguments
    ///
    /// * `timeout` - How long a single request may wait for the server.
    pub fn new(timeout: Duration) -> Self {
        A2sClient { timeout }
    }

    /// Sends `request` to `address` and returns the reply payload, after its type byte.
    async fn request(&self, address: &str, request: Request) -> Result<Vec<u8>, QueryError> {
        debug!("request {:?} from {}", request, address);

        match time::timeout(self.timeout, self.exchange(address, request)).await {
            Ok(result) => result,
            Err(_) => Err(QueryError::Timeout(self.timeout)),
        }
    }

    async fn exchange(&self, address: &str, request: Request) -> Result<Vec<u8>, QueryError> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect(address).await?;

        let mut challenge = NO_CHALLENGE;
        for _ in 0..MAX_CHALLENGE_ROUNDS {
            socket.send(&request.encode(challenge)).await?;

            let message = Self::receive_message(&socket).await?;
            let Some((&kind, payload)) = message.split_first() else {
                return Err(QueryError::Protocol("empty message".to_owned()));
            };

            if kind == CHALLENGE_RESPONSE {
                let bytes: [u8; 4] = payload.get(..4).and_then(|b| b.try_into().ok()).ok_or_else(
                    || QueryError::Protocol("truncated challenge".to_owned()),
                )?;
                challenge = i32::from_le_bytes(bytes);
                debug!("received challenge {} from {}", challenge, address);
                continue;
            }

            if kind != request.response_header() {
                return Err(QueryError::Protocol(format!(
                    "unexpected message type {:#x}",
                    kind
                )));
            }

            return Ok(payload.to_vec());
        }

        Err(QueryError::Protocol(
            "server kept answering with challenges".to_owned(),
        ))
    }

    /// Receives datagrams until a whole message is available.
    async fn receive_message(socket: &UdpSocket) -> Result<Vec<u8>, QueryError> {
        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
        let mut assembler = SplitAssembler::default();

        loop {
            let len = socket.recv(&mut buf).await?;
            match decode_datagram(&buf[..len])? {
                Datagram::Single(message) => return Ok(message),
                Datagram::Split(fragment) => {
                    if let Some(message) = assembler.push(fragment)? {
                        return Ok(message);
                    }
                }
            }
        }
    }
}

#[async_trait]
impl StatusQuery for A2sClient {
    async fn query_rules(&self, address: &str) -> Result<Vec<Rule>, QueryError> {
        info!("request rules of {}", address);

        let rules = decode_rules(&self.request(address, Request::Rules).await?)?;

        debug!("response from {} -> {:?}", address, rules);

        Ok(rules)
    }

    async fn query_players(&self, address: &str) -> Result<Vec<Player>, QueryError> {
        info!("request players of {}", address);

        let players = decode_players(&self.request(address, Request::Players).await?)?;

        debug!("response from {} -> {:?}", address, players);

        Ok(players)
    }
}
