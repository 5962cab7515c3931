//! # Cost model
//!
//! Local and pairwise costs of the stereo Markov random field. The data cost measures how well a
//! block in the left image matches the block `label` pixels to the left in the right image, the
//! smoothness cost penalises neighbouring pixels taking different labels.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use image::{GenericImageView, GrayImage};

use crate::TRUNCATION;

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Average absolute intensity difference between the `block_size` square block centred on
/// `(x, y)` in `left` and the block centred on `(x - label, y)` in `right`.
///
/// The average is truncated towards zero. Both blocks must lie inside their images, so callers
/// must stay `block_size / 2` away from every edge and a further `label` pixels away from the
/// left edge. Violating this panics.
pub fn data_cost(
    left: &GrayImage,
    right: &GrayImage,
    x: usize,
    y: usize,
    label: usize,
    block_size: usize
) -> u32 {
    let half = block_size / 2;

    assert!(
        y >= half && y + half < left.height() as usize && y + half < right.height() as usize,
        "data cost block at row {} leaves the image",
        y
    );
    assert!(
        x >= half + label && x + half < left.width() as usize,
        "data cost block at column {} with label {} leaves the image",
        x,
        label
    );

    let side = block_size as u32;
    let block_left = left.view((x - half) as u32, (y - half) as u32, side, side);
    let block_right = right.view((x - half - label) as u32, (y - half) as u32, side, side);

    let sad: u32 = block_left
        .pixels()
        .zip(block_right.pixels())
        .map(|((_, _, l), (_, _, r))| u32::from(l.0[0].abs_diff(r.0[0])))
        .sum();

    sad / (side * side)
}

/// Truncated linear penalty between two labels with the default truncation of
/// [`TRUNCATION`](crate::TRUNCATION).
pub fn smoothness_cost(a: usize, b: usize) -> u32 {
    truncated_linear(a, b, TRUNCATION)
}

/// `min(|a - b|, truncation)`.
///
/// Truncation caps the cost of a depth discontinuity so object boundaries are not smoothed away.
pub fn truncated_linear(a: usize, b: usize, truncation: u32) -> u32 {
    let diff = a.abs_diff(b);

    if diff >= truncation as usize {
        truncation
    }
    else {
        diff as u32
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
