//! WebSocket echo helpers
//!
//! A thin client for exchanging text, JSON and ping frames with an echo
//! endpoint. Each send and receive is its own suspension point; there is
//! never more than one operation in flight per connection.

use futures_util::{SinkExt, StreamExt};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

type Stream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket errors
#[derive(Debug, thiserror::Error)]
pub enum WebSocketError {
    #[error("Invalid WebSocket URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Connection to {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },

    #[error("Connection to {url} failed: {message}")]
    Connect { url: String, message: String },

    #[error("WebSocket connection is closed")]
    ConnectionClosed,

    #[error("Unexpected {0} frame")]
    UnexpectedMessage(&'static str),

    #[error("Invalid JSON message: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("WebSocket protocol error: {0}")]
    Protocol(String),
}

impl WebSocketError {
    fn from_connect(url: &str, error: tungstenite::Error) -> Self {
        match error {
            tungstenite::Error::Url(e) => WebSocketError::InvalidUrl {
                url: url.to_string(),
                message: e.to_string(),
            },
            tungstenite::Error::HttpFormat(e) => WebSocketError::InvalidUrl {
                url: url.to_string(),
                message: e.to_string(),
            },
            other => WebSocketError::Connect {
                url: url.to_string(),
                message: other.to_string(),
            },
        }
    }

    fn from_io(error: tungstenite::Error) -> Self {
        match error {
            tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
                WebSocketError::ConnectionClosed
            }
            other => WebSocketError::Protocol(other.to_string()),
        }
    }
}

/// A connection to a WebSocket echo endpoint
pub struct EchoSocket {
    url: String,
    stream: Option<Stream>,
    // Text frames that arrived while waiting for a pong
    pending: VecDeque<String>,
}

impl EchoSocket {
    /// Open a connection with the transport's default connect behaviour
    pub async fn connect(url: &str) -> Result<Self, WebSocketError> {
        let (stream, _) = connect_async(url)
            .await
            .map_err(|e| WebSocketError::from_connect(url, e))?;
        debug!("WebSocket connected to {}", url);

        Ok(Self {
            url: url.to_string(),
            stream: Some(stream),
            pending: VecDeque::new(),
        })
    }

    /// Open a connection, giving up after `after`
    pub async fn connect_with_timeout(url: &str, after: Duration) -> Result<Self, WebSocketError> {
        timeout(after, Self::connect(url))
            .await
            .map_err(|_| WebSocketError::Timeout {
                url: url.to_string(),
                after,
            })?
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    pub async fn send_text(&mut self, text: &str) -> Result<(), WebSocketError> {
        let stream = self.stream_mut()?;
        stream
            .send(Message::text(text.to_string()))
            .await
            .map_err(WebSocketError::from_io)
    }

    /// Wait for the next text frame
    pub async fn receive_text(&mut self) -> Result<String, WebSocketError> {
        if let Some(text) = self.pending.pop_front() {
            return Ok(text);
        }

        loop {
            match self.next_message().await? {
                Message::Text(text) => return Ok(text.as_str().to_string()),
                Message::Binary(_) => return Err(WebSocketError::UnexpectedMessage("binary")),
                // Pings are answered by the protocol layer
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
                Message::Close(_) => return Err(WebSocketError::ConnectionClosed),
            }
        }
    }

    pub async fn send_json<T: Serialize>(&mut self, value: &T) -> Result<(), WebSocketError> {
        let text = serde_json::to_string(value)?;
        self.send_text(&text).await
    }

    pub async fn receive_json<T: DeserializeOwned>(&mut self) -> Result<T, WebSocketError> {
        let text = self.receive_text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Send a ping and wait for the pong carrying the same payload
    pub async fn ping(&mut self, payload: &[u8]) -> Result<(), WebSocketError> {
        self.stream_mut()?
            .send(Message::Ping(payload.to_vec().into()))
            .await
            .map_err(WebSocketError::from_io)?;

        loop {
            match self.next_message().await? {
                Message::Pong(data) if &data[..] == payload => return Ok(()),
                Message::Text(text) => self.pending.push_back(text.as_str().to_string()),
                _ => continue,
            }
        }
    }

    /// Close the connection; closing twice is a no-op
    pub async fn close(&mut self) -> Result<(), WebSocketError> {
        if let Some(mut stream) = self.stream.take() {
            match stream.close(None).await {
                Ok(())
                | Err(tungstenite::Error::ConnectionClosed)
                | Err(tungstenite::Error::AlreadyClosed) => {}
                Err(e) => return Err(WebSocketError::Protocol(e.to_string())),
            }
            debug!("WebSocket connection to {} closed", self.url);
        }
        Ok(())
    }

    fn stream_mut(&mut self) -> Result<&mut Stream, WebSocketError> {
        self.stream.as_mut().ok_or(WebSocketError::ConnectionClosed)
    }

    /// Next frame; a close frame or end of stream marks the socket closed
    async fn next_message(&mut self) -> Result<Message, WebSocketError> {
        let stream = self.stream_mut()?;
        match stream.next().await {
            Some(Ok(Message::Close(_))) | None => {
                self.stream = None;
                Err(WebSocketError::ConnectionClosed)
            }
            Some(Ok(message)) => Ok(message),
            Some(Err(e)) => {
                self.stream = None;
                Err(WebSocketError::from_io(e))
            }
        }
    }
}
