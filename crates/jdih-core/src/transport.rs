//! Outbound side of a chat platform.
//!
//! Each transport owns its connection, turns inbound messages into
//! `Dispatcher::dispatch` calls, and sends the reply back through this trait.

use async_trait::async_trait;
use jdih_protocol::Platform;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport not connected")]
    NotConnected,

    #[error("send failed: {0}")]
    Send(String),

    #[error("platform API error: {0}")]
    Api(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError::Send(e.to_string())
    }
}

pub type TransportResult<T> = Result<T, TransportError>;

#[async_trait]
pub trait ChatTransport: Send + Sync {
    fn platform(&self) -> Platform;

    /// Largest message the platform accepts, in characters.
    fn max_message_chars(&self) -> usize;

    /// Send `text` to `conversation`, split into platform-sized chunks.
    async fn send_text(&self, conversation: &str, text: &str) -> TransportResult<()>;
}
