//! # Error standards
//!
//! This module provides a standardised error enum and result type for this crate.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::path::PathBuf;

// -----------------------------------------------------------------------------------------------
// TYPES
// -----------------------------------------------------------------------------------------------

/// Standard result type used in the disparity crate.
pub type Result<T> = std::result::Result<T, Error>;

// -----------------------------------------------------------------------------------------------
// ENUMERATIONS
// -----------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Stereo images differ in size: left is {left:?}, right is {right:?}")]
    DimensionMismatch {
        left: (u32, u32),
        right: (u32, u32)
    },

    #[error("Invalid algorithm parameters: {0}")]
    InvalidParams(String),

    #[error("Could not load parameters from {path:?}: {reason}")]
    Config {
        path: PathBuf,
        reason: String
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "statistics")]
    #[error("Failed to plot statistics: {0}")]
    Statistics(String)
}
