//! # General disparity objects
//!
//! This module provides generic disparity traits and structures for use by different algorithms.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use image::{GrayImage, Luma};
use imageproc::map::map_subpixels;

use crate::error::*;

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// A rectified pair of grayscale images.
pub struct StereoFrame {
    pub left: GrayImage,
    pub right: GrayImage
}

/// A disparity map of integer labels.
pub struct DisparityMap {
    data: GrayImage,
    pub max_disp: Option<f32>,
    pub min_disp: Option<f32>,
    /// Energy of the labelling the map was extracted from, when the algorithm provides one.
    pub energy: Option<u64>
}

// -----------------------------------------------------------------------------------------------
// TRAITS
// -----------------------------------------------------------------------------------------------

pub trait DisparityAlgorithm {
    /// Compute the disparity map of the given stereo frame.
    fn compute(&mut self, frame: &StereoFrame) -> Result<DisparityMap>;
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl StereoFrame {
    pub fn new(left: GrayImage, right: GrayImage) -> Self {
        Self { left, right }
    }

    pub fn width(&self) -> u32 {
        self.left.width()
    }

    pub fn height(&self) -> u32 {
        self.left.height()
    }
}

impl DisparityMap {
    pub fn new(width: usize, height: usize) -> Self {
        Self::from_labels(GrayImage::new(width as u32, height as u32))
    }

    /// Wrap an image whose intensities are disparity labels.
    pub fn from_labels(data: GrayImage) -> Self {
        DisparityMap {
            data,
            min_disp: None,
            max_disp: None,
            energy: None
        }
    }

    pub fn width(&self) -> usize {
        self.data.width() as usize
    }

    pub fn height(&self) -> usize {
        self.data.height() as usize
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data.get_pixel(x as u32, y as u32).0[0]
    }

    pub fn put(&mut self, x: usize, y: usize, val: u8) {
        self.data.put_pixel(x as u32, y as u32, Luma([val]))
    }

    /// The raw label image.
    pub fn labels(&self) -> &GrayImage {
        &self.data
    }

    /// Converts the map into a Luma8 image holding the raw labels.
    pub fn to_luma(&self) -> GrayImage {
        self.data.clone()
    }

    /// Converts the map to a normalised GrayImage.
    ///
    /// Normalises by the maximum observed disparity in the map. If the maximum disparity is not
    /// set, or is zero, then the function is equivalent to `.to_luma()`.
    pub fn to_luma_normalised(&self) -> GrayImage {
        let mult = match self.max_disp {
            Some(d) if d > 0.0 => 255.0 / d,
            _ => 1.0
        };

        map_subpixels(&self.data, |val: u8| {
            let scaled = f32::from(val) * mult;

            if scaled > 255.0 {
                255
            }
            else {
                scaled as u8
            }
        })
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
