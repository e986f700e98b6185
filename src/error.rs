//! Error types for the FUFI core
//!
//! Environment entry points return [`anyhow::Result`]; the underlying cause
//! is always a [`FufiError`], so callers that need to tell conditions apart
//! can `downcast_ref::<FufiError>()`.

use thiserror::Error;

/// Every failure the cart-pole core can surface
#[derive(Error, Debug)]
pub enum FufiError {
    /// Invalid constants, inverted reset bounds or an unknown mode string
    #[error("configuration error: {0}")]
    Config(String),

    /// Action index outside `[0, n)`
    #[error("invalid action {action}: expected an index in [0, {n})")]
    InvalidAction {
        /// Offending index
        action: i64,
        /// Size of the discrete action space
        n: usize,
    },

    /// `step` was called before any `reset`
    #[error("call reset before using step")]
    ResetRequired,

    /// Capability exists only as a seam (real hardware)
    #[error("{0} is not implemented yet")]
    NotImplemented(&'static str),

    /// Registry lookup failed
    #[error("no environment registered under id '{0}'")]
    UnknownEnv(String),

    /// Reading or writing a config file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config (de)serialization
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Encoding or saving a rendered frame
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl FufiError {
    /// Shorthand for [`FufiError::Config`]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
