pub mod board;
pub mod net_client;
pub mod protocol;
pub mod tcp_transport;
pub mod transport;
