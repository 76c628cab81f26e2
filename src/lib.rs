//! Graph Bridge - tool-calling bridge between a reasoning loop and a host-owned graph
//!
//! A host application starts the bridge, writes one framed request on stdin and then
//! answers every `function` envelope the bridge emits. The bridge lets a
//! function-calling model decide which graph mutations to request, issues them one at
//! a time, and finishes with exactly one `response`, `exit` or `error` envelope.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): envelopes, requests, commands, errors and ports
//! - **Application Layer** (`application`): the bridge run, agent loop and dispatcher
//! - **Infrastructure Layer** (`infrastructure`): transports, provider client, config, logging
//! - **CLI Layer** (`cli`): command-line flags
//!
//! # Example
//!
//! ```ignore
//! use graph_bridge::application::Bridge;
//! use graph_bridge::infrastructure::openai::OpenAiEngineProvider;
//! use graph_bridge::infrastructure::transport::StdioTransport;
//!
//! let config = graph_bridge::ConfigLoader::load()?;
//! let provider = OpenAiEngineProvider::new(config.agent.clone(), config.provider.clone(), config.retry.clone());
//! let mut transport = StdioTransport::stdio(&config.channel);
//! Bridge::new(provider, config.agent.clone()).run(&mut transport).await?;
//! ```

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use application::{Bridge, RunStatus};
pub use domain::errors::{BridgeError, TransportError};
pub use domain::models::{Config, Envelope, GraphCommand, Request};
pub use domain::ports::{EngineProvider, ReasoningEngine, Transport};
pub use infrastructure::config::{ConfigError, ConfigLoader};
