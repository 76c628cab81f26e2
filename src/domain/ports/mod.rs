//! Port trait definitions (Hexagonal Architecture)
//!
//! - Transport: the duplex channel to the host application
//! - ReasoningEngine: chat completion with function calling
//! - EngineProvider: per-request engine construction
//!
//! The application layer depends on these traits only; infrastructure adapters
//! implement them.

pub mod reasoning_engine;
pub mod transport;

pub use reasoning_engine::{ChatMessage, EngineProvider, EngineReply, ReasoningEngine, ToolCall};
pub use transport::Transport;
