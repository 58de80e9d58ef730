//! Framework-agnostic network client for the Pente server.
//!
//! Spawns background reader/writer tasks and exposes channels so that the
//! controller can send and receive messages without owning the socket
//! directly. Construct with [`NetClient::from_transport`] (generic) or the
//! convenience method [`connect`](NetClient::connect) (TCP).

use tokio::sync::mpsc;
use tracing::warn;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::tcp_transport::TcpTransport;
use crate::transport::{Transport, TransportError, TransportReader, TransportWriter};

// ---------------------------------------------------------------------------
// Wire-level parsing
// ---------------------------------------------------------------------------

/// Outcome of parsing one server line.
#[derive(Debug)]
pub enum ServerLine {
    /// A message this client understands, already deserialized.
    Message(ServerMessage),
    /// Empty / blank line — skip it.
    Empty,
    /// Couldn't parse the line (kept as raw text for logging).
    Unknown(String),
}

/// Parse a raw server line into a [`ServerLine`].
///
/// Unrecognised `type` values still parse (to [`ServerMessage::Unknown`]);
/// only syntactically broken JSON ends up in [`ServerLine::Unknown`].
pub fn parse_server_line(line: &str) -> ServerLine {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ServerLine::Empty;
    }
    match serde_json::from_str::<ServerMessage>(trimmed) {
        Ok(msg) => ServerLine::Message(msg),
        Err(_) => ServerLine::Unknown(trimmed.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Channel-based network events
// ---------------------------------------------------------------------------

/// High-level events produced by the background reader task.
#[derive(Debug)]
pub enum NetEvent {
    /// A successfully parsed [`ServerMessage`].
    Message(ServerMessage),
    /// An undecodable line from the server (kept for logging; the session
    /// continues — transient corruption must not kill a live match).
    Unknown(String),
    /// The server closed the connection cleanly.
    Disconnected,
    /// An I/O error occurred on the connection.
    Error(String),
}

// ---------------------------------------------------------------------------
// NetClient
// ---------------------------------------------------------------------------

/// A channel-based network client for the Pente server.
///
/// The returned client exposes:
/// - [`incoming`](NetClient::incoming) — an `mpsc::UnboundedReceiver<NetEvent>`
///   for server events, pollable without blocking via `try_recv`.
/// - [`send`](NetClient::send) — a non-async, non-blocking method to enqueue
///   a [`ClientMessage`] for transmission.
///
/// Background tasks handle the actual I/O. Dropping the client closes the
/// outgoing channel, which ends the writer task and the connection.
pub struct NetClient {
    /// Receive parsed server events.
    pub incoming: mpsc::UnboundedReceiver<NetEvent>,
    /// Send-side of the writer channel (kept for [`Self::send`]).
    outgoing: mpsc::UnboundedSender<ClientMessage>,
}

impl NetClient {
    /// Create a `NetClient` over any [`Transport`] implementation.
    ///
    /// Splits the transport into read/write halves and spawns background
    /// tasks. No handshake is sent — the caller sends `auth` afterwards.
    pub fn from_transport<T: Transport>(transport: T) -> Self {
        let (reader, writer) = transport.split();

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<ClientMessage>();

        Self::spawn_reader_task(reader, event_tx);
        Self::spawn_writer_task(writer, cmd_rx);

        Self {
            incoming: event_rx,
            outgoing: cmd_tx,
        }
    }

    /// Connect to the server at `host:port` over TCP and spawn the
    /// background I/O tasks.
    pub async fn connect(host: &str, port: u16) -> Result<Self, TransportError> {
        let transport = TcpTransport::connect(host, port).await?;
        Ok(Self::from_transport(transport))
    }

    /// Enqueue a [`ClientMessage`] for transmission to the server.
    ///
    /// Non-blocking — the message is written to a channel and the background
    /// writer task handles the actual I/O.
    pub fn send(&self, msg: ClientMessage) -> Result<(), mpsc::error::SendError<ClientMessage>> {
        self.outgoing.send(msg)
    }

    // ------------------------------------------------------------------
    // Private: background task spawners
    // ------------------------------------------------------------------

    fn spawn_reader_task<R: TransportReader>(
        mut reader: R,
        event_tx: mpsc::UnboundedSender<NetEvent>,
    ) {
        tokio::spawn(async move {
            loop {
                match reader.recv().await {
                    Ok(Some(line)) => match parse_server_line(&line) {
                        ServerLine::Message(msg) => {
                            if event_tx.send(NetEvent::Message(msg)).is_err() {
                                break;
                            }
                        }
                        ServerLine::Unknown(raw) => {
                            warn!(raw, "dropping undecodable server line");
                            if event_tx.send(NetEvent::Unknown(raw)).is_err() {
                                break;
                            }
                        }
                        ServerLine::Empty => {}
                    },
                    Ok(None) => {
                        let _ = event_tx.send(NetEvent::Disconnected);
                        break;
                    }
                    Err(e) => {
                        let _ = event_tx.send(NetEvent::Error(e.to_string()));
                        break;
                    }
                }
            }
        });
    }

    fn spawn_writer_task<W: TransportWriter>(
        mut writer: W,
        mut cmd_rx: mpsc::UnboundedReceiver<ClientMessage>,
    ) {
        tokio::spawn(async move {
            while let Some(msg) = cmd_rx.recv().await {
                let json = match serde_json::to_string(&msg) {
                    Ok(j) => j,
                    Err(_) => continue,
                };
                if writer.send(&json).await.is_err() {
                    break;
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Status;

    #[test]
    fn parse_skips_blank_lines() {
        assert!(matches!(parse_server_line("   "), ServerLine::Empty));
        assert!(matches!(parse_server_line(""), ServerLine::Empty));
    }

    #[test]
    fn parse_keeps_broken_json_for_logging() {
        let ServerLine::Unknown(raw) = parse_server_line("{not json") else {
            panic!("expected Unknown");
        };
        assert_eq!(raw, "{not json");
    }

    #[test]
    fn parse_accepts_unrecognised_kinds() {
        let ServerLine::Message(msg) =
            parse_server_line(r#"{"type":"chat_broadcast","text":"hi"}"#)
        else {
            panic!("expected Message");
        };
        assert_eq!(msg, ServerMessage::Unknown);
    }

    #[test]
    fn parse_decodes_known_kinds() {
        let ServerLine::Message(msg) =
            parse_server_line(r#"{"type":"disconnect_ack","status":1}"#)
        else {
            panic!("expected Message");
        };
        assert_eq!(
            msg,
            ServerMessage::DisconnectAck {
                status: Status::Success
            }
        );
    }
}
