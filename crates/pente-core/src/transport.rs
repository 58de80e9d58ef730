//! Transport abstraction for network communication.
//!
//! Decouples the networking layer from the concrete socket type.
//! [`NetClient`](crate::net_client::NetClient) uses the [`Transport`] trait
//! to move the read and write halves into independent background tasks.

use std::future::Future;

use thiserror::Error;

/// Errors that can occur during transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Host name resolution failed. Reported separately from connection
    /// errors so the frontend can tell a typo from a dead server.
    #[error("address resolution failed: {0}")]
    Address(String),

    /// The remote peer closed the connection.
    #[error("connection closed")]
    ConnectionClosed,

    /// An I/O or protocol-level error.
    #[error("{0}")]
    Io(String),
}

/// Read half of a transport connection.
///
/// Implementations receive one text frame (a JSON message) per call.
pub trait TransportReader: Send + 'static {
    /// Receive the next text frame.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    fn recv(&mut self) -> impl Future<Output = Result<Option<String>, TransportError>> + Send;
}

/// Write half of a transport connection.
pub trait TransportWriter: Send + 'static {
    /// Send one text frame to the remote peer.
    fn send(&mut self, text: &str) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// A bidirectional transport that can be split into independent read and
/// write halves, so reader and writer can run in separate async tasks.
pub trait Transport: Send + 'static {
    /// The read half produced by [`split`](Transport::split).
    type Reader: TransportReader;
    /// The write half produced by [`split`](Transport::split).
    type Writer: TransportWriter;

    /// Split the transport into independent read and write halves.
    fn split(self) -> (Self::Reader, Self::Writer);
}
