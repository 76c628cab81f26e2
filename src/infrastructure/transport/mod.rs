//! Transport adapters and the sentinel framer they share.

pub mod framer;
pub mod socket;
pub mod stream;

pub use framer::{frame, Framer, SENTINEL};
pub use socket::SocketTransport;
pub use stream::{StdioTransport, StreamTransport};
