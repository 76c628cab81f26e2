//! Infrastructure layer module
//!
//! This module contains the adapters behind the domain ports:
//! - Host transports (stdio and send-only socket) and the sentinel framer
//! - Chat-completions reasoning engine
//! - Configuration management
//! - Logging infrastructure
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod logging;
pub mod openai;
pub mod transport;
