#![forbid(unsafe_code)]

use annotext_core::StructureError;
use annotext_text::SelectionError;
use thiserror::Error;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid annotations: {0}")]
    Structure(#[from] StructureError),

    #[error("selection rejected: {0}")]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Stable code for host error channels.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Structure(_) => "INVALID_ANNOTATIONS",
            Self::Selection(err) => err.code(),
            Self::Config(_) => "INVALID_CONFIG",
        }
    }
}
