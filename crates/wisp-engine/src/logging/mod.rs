//! Logging setup.
//!
//! Engine code only talks to the `log` facade; this module wires it to
//! `env_logger` once per process.

mod init;

pub use init::{init_logging, LoggingConfig};
