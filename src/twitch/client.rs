//! Twitch chat client over plain IRC.
//!
//! This module provides the [`TwitchClient`] struct, which keeps a connection
//! to the Twitch chat server alive and forwards channel messages to a callback.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt, stream::SplitSink};
use log::{debug, error, info, warn};
use tokio::{
    net::TcpStream,
    sync::Mutex,
    time::{self, Duration},
};
use tokio_util::codec::{Framed, LinesCodec};

use crate::twitch::{Chat, ChatMessage, Credentials, message::IrcMessage};

/// Longest line accepted from the server.
const MAX_LINE_LENGTH: usize = 8192;

/// Delay before reconnecting once a session ended.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

type LineSink = SplitSink<Framed<TcpStream, LinesCodec>, String>;

/// Twitch chat client.
///
/// The write half of the current connection is shared behind a mutex so that
/// replies can be sent from any task while the read loop runs.
pub struct TwitchClient {
    /// Account credentials and channels to join
    credentials: Credentials,
    /// Write half of the current session, `None` while disconnected
    writer: Mutex<Option<LineSink>>,
}

impl TwitchClient {
    /// Creates a new client. No connection is made until [`TwitchClient::run`].
    ///
    /// # Arguments
    ///
    /// * `credentials` - Username, OAuth token, channels and server address
    pub fn new(credentials: Credentials) -> Self {
        TwitchClient {
            credentials,
            writer: Mutex::new(None),
        }
    }

    /// Connects, joins the channels and forwards channel messages forever.
    ///
    /// When a session ends (server `RECONNECT`, closed socket, I/O error) the
    /// client waits a few seconds and connects again.
    ///
    /// # Arguments
    ///
    /// * `on_message` - Callback invoked for each channel message. It runs on
    ///   the read loop and must not block, spawn a task for slow work.
    pub async fn run<F>(&self, on_message: F)
    where
        F: Fn(ChatMessage),
    {
        loop {
            match self.session(&on_message).await {
                Ok(()) => info!("twitch session ended"),
                Err(e) => error!("twitch session ended with error: {:#}", e),
            }

            *self.writer.lock().await = None;

            info!("reconnecting in {} seconds", RECONNECT_DELAY.as_secs());
            time::sleep(RECONNECT_DELAY).await;
        }
    }

    /// Runs one connection until the server closes it.
    async fn session<F>(&self, on_message: &F) -> Result<()>
    where
        F: Fn(ChatMessage),
    {
        info!("connecting to {}", self.credentials.host);
        let stream = TcpStream::connect(&self.credentials.host)
            .await
            .with_context(|| format!("failed to connect to {}", self.credentials.host))?;

        let (sink, mut lines) =
            Framed::new(stream, LinesCodec::new_with_max_length(MAX_LINE_LENGTH)).split();
        *self.writer.lock().await = Some(sink);

        self.login().await?;

        while let Some(line) = lines.next().await {
            let line = line.context("failed to read from twitch")?;
            let Some(message) = IrcMessage::parse(&line) else {
                continue;
            };

            let command = message.command.clone();
            match command.as_str() {
                "PING" => {
                    let token = message.params.last().map_or("tmi.twitch.tv", String::as_str);
                    self.send_line(format!("PONG :{}", token)).await?;
                }
                "PRIVMSG" => {
                    if let Some(chat_message) = message.into_chat_message() {
                        debug!(
                            "[{}] {}: {}",
                            chat_message.channel, chat_message.sender, chat_message.text
                        );
                        on_message(chat_message);
                    }
                }
                "RECONNECT" => {
                    info!("server requested a reconnection");
                    return Ok(());
                }
                "NOTICE" => warn!("notice from twitch: {}", message.params.join(" ")),
                "JOIN" => {
                    if message.nick() == Some(self.username().as_str()) {
                        info!("joined {}", message.params.join(" "));
                    }
                }
                _ => debug!("ignore {}", line),
            }
        }

        Ok(())
    }

    /// Authenticates and joins every configured channel.
    async fn login(&self) -> Result<()> {
        let oauth = &self.credentials.oauth;
        let token = oauth.strip_prefix("oauth:").unwrap_or(oauth);

        self.send_line(format!("PASS oauth:{}", token)).await?;
        self.send_line(format!("NICK {}", self.username())).await?;

        for channel in &self.credentials.channels {
            info!("joining channel {}", channel);
            self.send_line(format!("JOIN {}", normalize_channel(channel)))
                .await?;
        }

        Ok(())
    }

    fn username(&self) -> String {
        self.credentials.username.to_lowercase()
    }

    async fn send_line(&self, line: String) -> Result<()> {
        // Keep the token out of the logs
        if !line.starts_with("PASS ") {
            debug!("send {}", line);
        }

        let mut writer = self.writer.lock().await;
        let sink = writer.as_mut().ok_or_else(|| anyhow!("not connected"))?;
        sink.send(line).await.context("failed to write to twitch")?;

        Ok(())
    }
}

#[async_trait]
impl Chat for TwitchClient {
    async fn say(&self, channel: &str, text: &str) {
        // A line break would end the IRC command early
        let text = text.replace(['\r', '\n'], " ");

        if let Err(e) = self
            .send_line(format!("PRIVMSG {} :{}", normalize_channel(channel), text))
            .await
        {
            error!("failed to send message to {}: {:#}", channel, e);
        }
    }
}

/// Lowercases a channel name and prefixes it with `#` when missing.
fn normalize_channel(channel: &str) -> String {
    format!("#{}", channel.trim_start_matches('#').to_lowercase())
}

#[cfg(test)]
mod tests {
    use tokio::{net::TcpListener, sync::mpsc};

    use super::*;

    fn create_credentials(host: String) -> Credentials {
        Credentials {
            username: "ServBot".to_string(),
            oauth: "oauth:secret".to_string(),
            channels: vec!["SomeChannel".to_string()],
            host,
        }
    }

    #[test]
    fn test_normalize_channel() {
        assert_eq!(normalize_channel("SomeChannel"), "#somechannel");
        assert_eq!(normalize_channel("#chan"), "#chan");
    }

    #[tokio::test]
    async fn test_say_while_disconnected_does_not_fail() {
        let client = TwitchClient::new(create_credentials("127.0.0.1:1".to_string()));
        client.say("#chan", "hello").await;
    }

    #[tokio::test]
    async fn test_session() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let host = listener.local_addr().unwrap().to_string();
        let (received_tx, mut received_rx) = mpsc::unbounded_channel();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut framed = Framed::new(stream, LinesCodec::new());

            assert_eq!(framed.next().await.unwrap().unwrap(), "PASS oauth:secret");
            assert_eq!(framed.next().await.unwrap().unwrap(), "NICK servbot");
            assert_eq!(framed.next().await.unwrap().unwrap(), "JOIN #somechannel");

            framed.send("PING :tmi.twitch.tv".to_string()).await.unwrap();
            assert_eq!(framed.next().await.unwrap().unwrap(), "PONG :tmi.twitch.tv");

            framed
                .send(":alice!alice@alice.tmi.twitch.tv PRIVMSG #somechannel :!help".to_string())
                .await
                .unwrap();
            framed
                .send(":tmi.twitch.tv RECONNECT".to_string())
                .await
                .unwrap();
        });

        let client = TwitchClient::new(create_credentials(host));
        client
            .session(&|message| received_tx.send(message).unwrap())
            .await
            .unwrap();
        server.await.unwrap();

        assert_eq!(
            received_rx.recv().await.unwrap(),
            ChatMessage {
                sender: "alice".to_string(),
                channel: "#somechannel".to_string(),
                text: "!help".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_say_writes_privmsg() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let host = listener.local_addr().unwrap().to_string();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut framed = Framed::new(stream, LinesCodec::new());

            // PASS, NICK, JOIN
            for _ in 0..3 {
                framed.next().await.unwrap().unwrap();
            }
            framed.next().await.unwrap().unwrap()
        });

        let client = TwitchClient::new(create_credentials(host));
        let stream = TcpStream::connect(&client.credentials.host).await.unwrap();
        let (sink, _lines) = Framed::new(stream, LinesCodec::new()).split();
        *client.writer.lock().await = Some(sink);
        client.login().await.unwrap();

        client.say("SomeChannel", "3/10 on\nAlice").await;

        assert_eq!(
            server.await.unwrap(),
            "PRIVMSG #somechannel :3/10 on Alice"
        );
    }
}
