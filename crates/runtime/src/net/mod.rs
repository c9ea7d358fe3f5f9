//! Wire messages and the in-process transport between peers.

mod message;
mod transport;

pub use message::{Envelope, PeerId, ServerMessage};
pub use transport::LoopbackTransport;
