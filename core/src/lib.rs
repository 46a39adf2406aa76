#![forbid(unsafe_code)]

//! Shared ambient stack for `keyveil`: configuration, error taxonomy, logging.
//!
//! Kept intentionally small and dependency-light: neither the protocol logic
//! nor the device drivers that sit on top of this crate need an async runtime
//! (the event loop is single-threaded and blocking by design).

pub mod config;
pub mod error;
pub mod logging;

pub use config::RuntimeConfig;
pub use error::{Error, Result};
