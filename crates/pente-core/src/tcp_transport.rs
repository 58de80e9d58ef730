//! Plain TCP transport with newline-delimited JSON framing.
//!
//! TCP gives no message boundaries, so framing is explicit: every message
//! is one `\n`-terminated line, on both directions. The server's JSON
//! payloads never contain raw newlines, so this is transparent to it.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, lookup_host};

use crate::transport::{Transport, TransportError, TransportReader, TransportWriter};

/// TCP transport for the Pente server.
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// Connect to the server at `host:port`.
    ///
    /// Resolution failures map to [`TransportError::Address`]; everything
    /// else socket-level maps to [`TransportError::Io`].
    pub async fn connect(host: &str, port: u16) -> Result<Self, TransportError> {
        let mut addrs = lookup_host((host, port))
            .await
            .map_err(|e| TransportError::Address(e.to_string()))?;
        let addr = addrs
            .next()
            .ok_or_else(|| TransportError::Address(format!("no address for {host}")))?;

        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| TransportError::Io(e.to_string()))?;
        Ok(Self { stream })
    }
}

impl Transport for TcpTransport {
    type Reader = TcpReader;
    type Writer = TcpWriter;

    fn split(self) -> (Self::Reader, Self::Writer) {
        let (read_half, write_half) = self.stream.into_split();
        (
            TcpReader {
                reader: BufReader::new(read_half),
                line: String::new(),
            },
            TcpWriter { writer: write_half },
        )
    }
}

/// Read half of a TCP transport. Yields one line per `recv`.
pub struct TcpReader {
    reader: BufReader<OwnedReadHalf>,
    line: String,
}

impl TransportReader for TcpReader {
    async fn recv(&mut self) -> Result<Option<String>, TransportError> {
        self.line.clear();
        match self.reader.read_line(&mut self.line).await {
            // Zero bytes means the peer closed the connection. This is not
            // "no data yet" — a pending read simply stays pending.
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(self.line.trim_end_matches(['\r', '\n']).to_string())),
            Err(e) => Err(TransportError::Io(e.to_string())),
        }
    }
}

/// Write half of a TCP transport. Appends the line terminator and flushes.
pub struct TcpWriter {
    writer: OwnedWriteHalf,
}

impl TransportWriter for TcpWriter {
    async fn send(&mut self, text: &str) -> Result<(), TransportError> {
        self.writer
            .write_all(text.as_bytes())
            .await
            .map_err(|e| TransportError::Io(e.to_string()))?;
        self.writer
            .write_all(b"\n")
            .await
            .map_err(|e| TransportError::Io(e.to_string()))?;
        self.writer
            .flush()
            .await
            .map_err(|e| TransportError::Io(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn frames_are_newline_delimited_both_ways() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 64];
            let n = sock.read(&mut buf).await.unwrap();
            assert_eq!(&buf[..n], b"{\"type\":\"get_lobby\"}\n");
            sock.write_all(b"{\"type\":\"disconnect_ack\",\"status\":1}\n")
                .await
                .unwrap();
        });

        let transport = TcpTransport::connect("127.0.0.1", addr.port()).await.unwrap();
        let (mut reader, mut writer) = transport.split();

        writer.send("{\"type\":\"get_lobby\"}").await.unwrap();
        let line = reader.recv().await.unwrap().unwrap();
        assert_eq!(line, "{\"type\":\"disconnect_ack\",\"status\":1}");

        // Server closes after replying: reader reports a clean close.
        server.await.unwrap();
        assert!(reader.recv().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unresolvable_host_is_an_address_error() {
        let err = TcpTransport::connect("definitely-not-a-real-host.invalid", 55555)
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Address(_)));
    }
}
