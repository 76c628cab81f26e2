//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - stderr console output (json or pretty)
//! - Optional rolling JSON file
//! - Secret scrubbing of every record

pub mod logger;
pub mod secret_scrubbing;

pub use logger::LoggerImpl;
pub use secret_scrubbing::{scrub, ScrubbingMakeWriter, SecretScrubber};
