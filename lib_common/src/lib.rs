#![forbid(unsafe_code)]

// Declare the modules to re-export
pub mod alerts;
pub mod configs;
pub mod render;
pub mod retrieve;

// Re-export the types most callers need
pub use alerts::walker::{PageWalker, WalkError, WalkStats};
pub use configs::{ConfigError, RunConfig};
pub use render::TableRenderer;
pub use retrieve::transport::{RawResponse, SpTransport, Transport, TransportError};
