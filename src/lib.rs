//! # Disparity Computation
//!
//! This crate provides disparity map computation for stereo computer vision using loopy belief
//! propagation on a pairwise Markov random field.
//!
//! Every pixel chooses one of a fixed set of disparity labels, trading a block matching data
//! cost against a truncated linear smoothness cost with its four neighbours. Min-sum messages
//! are swept across the grid in a fixed directional order for a fixed number of iterations,
//! after which each pixel takes the label with the lowest accumulated cost.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

mod disparity;
mod error;
pub mod belief_propagation;
pub mod cost;
pub mod decode;
pub mod message;
pub mod mrf;

// -----------------------------------------------------------------------------------------------
// CONSTANTS
// -----------------------------------------------------------------------------------------------

/// Default number of disparity labels, i.e. the maximum disparity search range.
pub const LABELS: usize = 16;

/// Default side length of the square data cost block. Must be odd.
pub const BLOCK_SIZE: usize = 5;

/// Default truncation of the linear smoothness penalty.
pub const TRUNCATION: u32 = 10;

// -----------------------------------------------------------------------------------------------
// EXPORTS
// -----------------------------------------------------------------------------------------------

pub use error::{Error, Result};

pub mod prelude {
    pub use crate::belief_propagation::{stereo_belief_propagation, BeliefPropagation, Params};
    pub use crate::disparity::{DisparityAlgorithm, DisparityMap, StereoFrame};
}
