//! # Loopy belief propagation disparity computation
//!
//! This module wires the cost model, the Markov random field and min-sum message passing into a
//! stereo disparity algorithm, after Felzenszwalb and Huttenlocher ("Efficient Belief Propagation
//! for Early Vision") without the multi-scale refinement.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::fs;
use std::path::Path;

use image::{GrayImage, Luma};
use log::{debug, trace};
use serde::Deserialize;

use crate::decode::maximum_a_posteriori;
use crate::disparity::{DisparityAlgorithm, DisparityMap, StereoFrame};
use crate::error::*;
use crate::message::iterate;
use crate::mrf::{border_margin, initialize_data_cost_with, interior_range, MarkovRandomField};
use crate::{BLOCK_SIZE, LABELS, TRUNCATION};

#[cfg(feature = "statistics")]
use plotters::prelude::*;

// -----------------------------------------------------------------------------------------------
// CONSTANTS
// -----------------------------------------------------------------------------------------------

/// Labels are written into 8 bit images.
const MAX_LABELS: usize = 256;

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

pub struct BeliefPropagation {
    params: Params,
    #[cfg(feature = "statistics")]
    energy_history: Vec<u64>
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Params {
    /// Number of disparity labels, the search range is `0..labels`.
    pub labels: usize,
    /// Side of the square data cost block, must be odd.
    pub block_size: usize,
    /// Truncation of the linear smoothness cost.
    pub truncation: u32,
    /// Number of full belief propagation iterations.
    pub iterations: usize
}

/// Output of one inference run.
struct Inference {
    disparity: GrayImage,
    energy: u64,
    #[cfg(feature = "statistics")]
    energy_history: Vec<u64>
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            labels: LABELS,
            block_size: BLOCK_SIZE,
            truncation: TRUNCATION,
            iterations: 5
        }
    }
}

impl Params {
    /// Load parameters from a JSON file. Missing fields take their default value.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string()
        })?;

        let params: Params = serde_json::from_str(&contents).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string()
        })?;

        params.validate()?;

        Ok(params)
    }

    /// Check the parameters describe a runnable configuration.
    pub fn validate(&self) -> Result<()> {
        if self.labels == 0 || self.labels > MAX_LABELS {
            return Err(Error::InvalidParams(format!(
                "labels must be in 1..={}, got {}",
                MAX_LABELS, self.labels
            )));
        }

        if self.block_size % 2 == 0 {
            return Err(Error::InvalidParams(format!(
                "block size must be odd, got {}",
                self.block_size
            )));
        }

        if self.iterations == 0 {
            return Err(Error::InvalidParams("at least one iteration is required".into()));
        }

        Ok(())
    }

    /// Width of the image margin left without a disparity estimate.
    pub fn border(&self) -> usize {
        border_margin(self.labels, self.block_size)
    }
}

impl BeliefPropagation {
    /// Create a new instance of the algorithm with the given parameters.
    pub fn new(params: Params) -> Self {
        Self {
            params,
            #[cfg(feature = "statistics")]
            energy_history: Vec::new()
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Energy of the decoded labelling after each iteration of the last run.
    #[cfg(feature = "statistics")]
    pub fn energy_history(&self) -> &[u64] {
        &self.energy_history
    }

    #[cfg(feature = "statistics")]
    fn plot_energy(&self) -> Result<()> {
        fs::create_dir_all("plots/belief_propagation")?;

        let energy_plot = BitMapBackend::new(
            "plots/belief_propagation/energy.png",
            (800, 600)
        ).into_drawing_area();
        energy_plot.fill(&WHITE).map_err(plot_error)?;

        let max_energy = self.energy_history.iter().copied().max().unwrap_or(0) as f64;

        let mut chart = ChartBuilder::on(&energy_plot)
            .caption("Energy per iteration", ("sans-serif", 20).into_font())
            .margin(5)
            .x_label_area_size(30)
            .y_label_area_size(60)
            .build_ranged(
                1..self.energy_history.len() + 1,
                0f64..max_energy.max(1.0)
            ).map_err(plot_error)?;

        chart.configure_mesh().draw().map_err(plot_error)?;

        chart
            .draw_series(LineSeries::new(
                self.energy_history
                    .iter()
                    .enumerate()
                    .map(|(i, &e)| (i + 1, e as f64)),
                &RED
            )).map_err(plot_error)?;

        debug!("Energy plot written to plots/belief_propagation/energy.png");

        Ok(())
    }
}

impl DisparityAlgorithm for BeliefPropagation {
    /// Compute the disparity map for the given frame.
    fn compute(&mut self, frame: &StereoFrame) -> Result<DisparityMap> {
        self.params.validate()?;

        if frame.left.dimensions() != frame.right.dimensions() {
            return Err(Error::DimensionMismatch {
                left: frame.left.dimensions(),
                right: frame.right.dimensions()
            });
        }

        let inference = infer(&frame.left, &frame.right, &self.params);

        // ---- DISPARITY STATISTICS ----

        let border = self.params.border();
        let mut min_disp: Option<u8> = None;
        let mut max_disp: Option<u8> = None;

        for y in interior_range(frame.height() as usize, border) {
            for x in interior_range(frame.width() as usize, border) {
                let label = inference.disparity.get_pixel(x as u32, y as u32).0[0];
                min_disp = Some(min_disp.map_or(label, |d| d.min(label)));
                max_disp = Some(max_disp.map_or(label, |d| d.max(label)));
            }
        }

        let mut disp_map = DisparityMap::from_labels(inference.disparity);
        disp_map.min_disp = min_disp.map(f32::from);
        disp_map.max_disp = max_disp.map(f32::from);
        disp_map.energy = Some(inference.energy);

        // ---- PLOTTING ----
        #[cfg(feature = "statistics")]
        {
            self.energy_history = inference.energy_history;
            self.plot_energy()?;
        }

        Ok(disp_map)
    }
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Compute a disparity map with the default labels, block size and truncation.
///
/// Interior pixels hold their decoded label, pixels within the border margin are zero. The
/// images must have equal dimensions and at least one iteration must run.
pub fn stereo_belief_propagation(
    left: &GrayImage,
    right: &GrayImage,
    iterations: usize
) -> GrayImage {
    assert!(iterations > 0, "belief propagation needs at least one iteration");

    let params = Params {
        iterations,
        ..Params::default()
    };

    infer(left, right, &params).disparity
}

/// Run initialisation, message passing and decoding for one stereo pair.
fn infer(left: &GrayImage, right: &GrayImage, params: &Params) -> Inference {
    let mut mrf = initialize_data_cost_with(
        left,
        right,
        params.labels,
        params.block_size,
        params.truncation
    );

    #[cfg(feature = "statistics")]
    let mut energy_history = Vec::with_capacity(params.iterations);

    for i in 0..params.iterations {
        iterate(&mut mrf);

        #[cfg(feature = "statistics")]
        {
            let energy = maximum_a_posteriori(&mut mrf);
            trace!("Iteration {} energy {}", i + 1, energy);
            energy_history.push(energy);
        }

        trace!("Completed iteration {}/{}", i + 1, params.iterations);
    }

    let energy = maximum_a_posteriori(&mut mrf);
    debug!(
        "Belief propagation finished after {} iterations with energy {}",
        params.iterations, energy
    );

    Inference {
        disparity: extract_disparity(&mrf, params.border()),
        energy,
        #[cfg(feature = "statistics")]
        energy_history
    }
}

/// Write the decoded label of every cell inside the border into an image, zero elsewhere.
fn extract_disparity(mrf: &MarkovRandomField, border: usize) -> GrayImage {
    let mut disparity = GrayImage::new(mrf.width() as u32, mrf.height() as u32);

    for y in interior_range(mrf.height(), border) {
        for x in interior_range(mrf.width(), border) {
            let label = mrf
                .best_assignment(x, y)
                .expect("disparity extracted before the field was decoded");
            disparity.put_pixel(x as u32, y as u32, Luma([label as u8]));
        }
    }

    disparity
}

#[cfg(feature = "statistics")]
fn plot_error<E: std::fmt::Debug>(e: E) -> Error {
    Error::Statistics(format!("{:?}", e))
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
