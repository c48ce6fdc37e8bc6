#![forbid(unsafe_code)]

//! JSON log output.
//!
//! Every annotext crate logs through `tracing`. Hosts with their own
//! subscriber need nothing from here; others can install a JSON one.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("a global subscriber is already installed: {0}")]
    AlreadyInstalled(String),
}

/// Install a global JSON subscriber.
///
/// `RUST_LOG` wins over `filter` when it is set and parses.
pub fn init_json_logging(filter: &str) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(env) => env,
        Err(_) => EnvFilter::try_new(filter)?,
    };
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .try_init()
        .map_err(|err| LoggingError::AlreadyInstalled(err.to_string()))
}
