//! Framework-agnostic client controller.
//!
//! Owns the [`NetClient`], the [`SessionState`], and the active [`Page`],
//! providing the shared run-loop logic:
//!
//! - Interpreting UI events through the page state machine.
//! - Processing incoming server messages through the dispatcher.
//! - Applying the resulting [`Step`]s (page moves, outbound requests) and
//!   handing the presentation effects back to the frontend.
//!
//! Frontends only need to:
//! 1. Call [`ClientController::connect`] to establish a connection.
//! 2. Feed user intents to [`ClientController::handle_ui`].
//! 3. Call [`ClientController::try_recv`] (poll) or
//!    [`ClientController::recv`] (await) once per loop iteration.

use pente_core::net_client::{NetClient, NetEvent};
use pente_core::transport::{Transport, TransportError};
use tracing::{info, warn};

use crate::dispatcher::dispatch;
use crate::pages::{Page, Step, UiEvent, handle_ui_event};
use crate::session::{Effect, SessionState};

/// Outcome of processing a single network event.
#[derive(Debug)]
pub enum PollResult {
    /// A server message was applied; the returned effects are for the
    /// presentation layer.
    Updated(Vec<Effect>),
    /// The connection is gone (peer closed or I/O error). Terminal.
    Disconnected,
    /// No event was available (channel empty).
    Empty,
}

/// Owns the network client, session state, and page state machine.
pub struct ClientController {
    net: NetClient,
    pub state: SessionState,
    page: Page,
    running: bool,
}

impl ClientController {
    /// Create a controller over any [`Transport`] implementation.
    ///
    /// The session starts on the login page; no handshake is sent.
    pub fn from_transport<T: Transport>(transport: T) -> Self {
        Self::with_net(NetClient::from_transport(transport))
    }

    /// Connect to the server at `host:port` over TCP.
    pub async fn connect(host: &str, port: u16) -> Result<Self, TransportError> {
        let net = NetClient::connect(host, port).await?;
        info!(host, port, "connected to server");
        Ok(Self::with_net(net))
    }

    fn with_net(net: NetClient) -> Self {
        Self {
            net,
            state: SessionState::new(),
            page: Page::Login,
            running: true,
        }
    }

    /// The currently active page.
    pub fn page(&self) -> Page {
        self.page
    }

    /// Whether the run loop should keep going.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Interpret one UI event on the active page.
    ///
    /// Returns the presentation effects for this step.
    pub fn handle_ui(&mut self, event: UiEvent) -> Vec<Effect> {
        let step = handle_ui_event(self.page, &mut self.state, event);
        self.apply(step)
    }

    /// Try to receive and process one network event (non-blocking).
    ///
    /// This is the per-iteration readiness poll: a message that has not
    /// fully arrived yet simply yields [`PollResult::Empty`] and is retried
    /// next iteration.
    pub fn try_recv(&mut self) -> PollResult {
        match self.net.incoming.try_recv() {
            Ok(event) => self.handle_net_event(event),
            Err(tokio::sync::mpsc::error::TryRecvError::Empty) => PollResult::Empty,
            Err(tokio::sync::mpsc::error::TryRecvError::Disconnected) => self.on_connection_lost(),
        }
    }

    /// Await the next network event. Useful in `tokio::select!` loops.
    pub async fn recv(&mut self) -> PollResult {
        match self.net.incoming.recv().await {
            Some(event) => self.handle_net_event(event),
            None => self.on_connection_lost(),
        }
    }

    // -- private -----------------------------------------------------------

    fn handle_net_event(&mut self, event: NetEvent) -> PollResult {
        match event {
            NetEvent::Message(msg) => {
                let step = dispatch(&msg, self.page, &mut self.state);
                PollResult::Updated(self.apply(step))
            }
            NetEvent::Unknown(raw) => {
                // Protocol fault: drop the message, keep the session.
                warn!(raw, "dropped undecodable server message");
                PollResult::Updated(Vec::new())
            }
            NetEvent::Disconnected | NetEvent::Error(_) => self.on_connection_lost(),
        }
    }

    fn on_connection_lost(&mut self) -> PollResult {
        // Transport faults are fatal to the session, never recovered here.
        self.state.connected = false;
        self.running = false;
        PollResult::Disconnected
    }

    fn apply(&mut self, step: Step) -> Vec<Effect> {
        for msg in step.outbound {
            if self.net.send(msg).is_err() {
                // Writer task is gone; the reader side will surface the
                // disconnect on the next poll.
                self.state.connected = false;
                self.running = false;
                break;
            }
        }
        if step.page != self.page {
            info!(from = ?self.page, to = ?step.page, "page transition");
            self.page = step.page;
        }
        if !step.running {
            self.running = false;
        }
        step.effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pente_core::transport::{TransportReader, TransportWriter};
    use std::sync::Arc;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    /// In-memory transport: the test scripts server lines and records
    /// everything the client writes.
    struct FakeTransport {
        inbound: mpsc::UnboundedReceiver<String>,
        written: Arc<Mutex<Vec<String>>>,
    }

    struct FakeReader {
        inbound: mpsc::UnboundedReceiver<String>,
    }

    struct FakeWriter {
        written: Arc<Mutex<Vec<String>>>,
    }

    impl Transport for FakeTransport {
        type Reader = FakeReader;
        type Writer = FakeWriter;

        fn split(self) -> (Self::Reader, Self::Writer) {
            (
                FakeReader {
                    inbound: self.inbound,
                },
                FakeWriter {
                    written: self.written,
                },
            )
        }
    }

    impl TransportReader for FakeReader {
        async fn recv(&mut self) -> Result<Option<String>, TransportError> {
            Ok(self.inbound.recv().await)
        }
    }

    impl TransportWriter for FakeWriter {
        async fn send(&mut self, text: &str) -> Result<(), TransportError> {
            self.written.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn harness() -> (
        ClientController,
        mpsc::UnboundedSender<String>,
        Arc<Mutex<Vec<String>>>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let written = Arc::new(Mutex::new(Vec::new()));
        let transport = FakeTransport {
            inbound: rx,
            written: Arc::clone(&written),
        };
        (ClientController::from_transport(transport), tx, written)
    }

    async fn drain_writes(written: &Arc<Mutex<Vec<String>>>, expected: usize) -> Vec<String> {
        // Writer runs in a background task; give it a few polls to catch up.
        for _ in 0..50 {
            if written.lock().unwrap().len() >= expected {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(2)).await;
        }
        written.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn login_flow_reaches_lobby_and_auto_requests_listing() {
        let (mut ctrl, server_tx, written) = harness();
        assert_eq!(ctrl.page(), Page::Login);

        ctrl.handle_ui(UiEvent::SubmitLogin {
            username: "alice".into(),
            password: "secret12345".into(),
        });

        let sent = drain_writes(&written, 1).await;
        assert!(sent[0].contains("\"type\":\"auth\""));

        server_tx
            .send(
                r#"{"type":"auth_response","status":1,
                    "player_stats":{"score":10,"wins":2,"losses":1,"forfeits":0,"games_played":3}}"#
                    .replace('\n', ""),
            )
            .unwrap();

        let PollResult::Updated(_) = ctrl.recv().await else {
            panic!("expected an update");
        };
        assert_eq!(ctrl.page(), Page::Lobby);
        assert_eq!(ctrl.state.stats.score, 10);

        // The follow-up get_lobby goes out automatically.
        let sent = drain_writes(&written, 2).await;
        assert!(sent[1].contains("\"type\":\"get_lobby\""));
    }

    #[tokio::test]
    async fn try_recv_reports_empty_when_no_data_is_ready() {
        let (mut ctrl, _server_tx, _written) = harness();
        assert!(matches!(ctrl.try_recv(), PollResult::Empty));
        assert!(ctrl.is_running());
    }

    #[tokio::test]
    async fn peer_close_terminates_the_session() {
        let (mut ctrl, server_tx, _written) = harness();
        drop(server_tx); // reader sees a clean close

        let result = ctrl.recv().await;
        assert!(matches!(result, PollResult::Disconnected));
        assert!(!ctrl.is_running());
        assert!(!ctrl.state.connected);
    }

    #[tokio::test]
    async fn undecodable_lines_are_dropped_without_killing_the_session() {
        let (mut ctrl, server_tx, _written) = harness();
        server_tx.send("{garbage".to_string()).unwrap();

        let PollResult::Updated(effects) = ctrl.recv().await else {
            panic!("expected an (empty) update");
        };
        assert!(effects.is_empty());
        assert!(ctrl.is_running());
    }

    #[tokio::test]
    async fn quit_event_stops_the_loop() {
        let (mut ctrl, _server_tx, _written) = harness();
        ctrl.handle_ui(UiEvent::Quit);
        assert!(!ctrl.is_running());
    }
}
