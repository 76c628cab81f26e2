//! Domain layer: envelopes, requests, the closed command set, configuration
//! models, error taxonomy and the ports the application layer talks through.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{
    BridgeError, BridgeResult, CommandError, ProtocolError, ReasoningError, TransportError,
};
