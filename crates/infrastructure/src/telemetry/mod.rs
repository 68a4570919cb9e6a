//! Logging infrastructure
//!
//! Installs the global `tracing` subscriber used by the server and the CLI.

mod logging;

pub use logging::{LoggingError, init_logging};
