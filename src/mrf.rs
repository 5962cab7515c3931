//! # Markov random field grid
//!
//! Per-pixel message store for belief propagation. Each cell holds five cost vectors of one entry
//! per label: the data term and the most recent message received from each of the four
//! neighbours. Cells also cache the label chosen by the decoder.
//!
//! All messages live in one flat buffer, indexed by
//! `(row * width + col) * 5 * labels + slot * labels + label`.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::ops::Range;

use image::GrayImage;
use log::debug;

use crate::cost::{data_cost, truncated_linear};
use crate::{BLOCK_SIZE, LABELS, TRUNCATION};

// -----------------------------------------------------------------------------------------------
// TYPES
// -----------------------------------------------------------------------------------------------

/// Message cost.
pub type Cost = u64;

// -----------------------------------------------------------------------------------------------
// ENUMERATIONS
// -----------------------------------------------------------------------------------------------

/// Message slot of a cell.
///
/// `Left`, `Right`, `Up` and `Down` hold the message *received from* the neighbour on that side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Data,
    Left,
    Right,
    Up,
    Down
}

/// Direction a message is sent in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down
}

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

pub struct MarkovRandomField {
    width: usize,
    height: usize,
    labels: usize,
    truncation: u32,
    messages: Vec<Cost>,
    best_assignment: Vec<Option<usize>>
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl Slot {
    pub const COUNT: usize = 5;

    pub const ALL: [Slot; Slot::COUNT] = [
        Slot::Data,
        Slot::Left,
        Slot::Right,
        Slot::Up,
        Slot::Down
    ];

    /// Position of the slot inside a cell.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl Direction {
    /// Order in which one belief propagation iteration sweeps the grid.
    pub const SCHEDULE: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Up,
        Direction::Down
    ];

    /// Slot of the receiving cell a message sent in this direction is written to.
    ///
    /// A message sent right arrives from the receiver's left, and so on.
    pub fn receiver_slot(self) -> Slot {
        match self {
            Direction::Right => Slot::Left,
            Direction::Left => Slot::Right,
            Direction::Up => Slot::Down,
            Direction::Down => Slot::Up
        }
    }

    /// Neighbour of `(x, y)` in this direction, if it lies on a `width` x `height` grid.
    pub fn neighbour(
        self,
        x: usize,
        y: usize,
        width: usize,
        height: usize
    ) -> Option<(usize, usize)> {
        match self {
            Direction::Right if x + 1 < width => Some((x + 1, y)),
            Direction::Left if x > 0 => Some((x - 1, y)),
            Direction::Up if y > 0 => Some((x, y - 1)),
            Direction::Down if y + 1 < height => Some((x, y + 1)),
            _ => None
        }
    }
}

impl MarkovRandomField {
    /// Create a grid with every message zeroed and no label assigned.
    pub fn new(width: usize, height: usize, labels: usize, truncation: u32) -> Self {
        assert!(labels > 0, "a markov random field needs at least one label");

        Self {
            width,
            height,
            labels,
            truncation,
            messages: vec![0; width * height * Slot::COUNT * labels],
            best_assignment: vec![None; width * height]
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn labels(&self) -> usize {
        self.labels
    }

    pub fn truncation(&self) -> u32 {
        self.truncation
    }

    /// Smoothness cost between two labels under this field's truncation.
    pub fn smoothness(&self, a: usize, b: usize) -> Cost {
        Cost::from(truncated_linear(a, b, self.truncation))
    }

    fn cell_len(&self) -> usize {
        Slot::COUNT * self.labels
    }

    fn cell_offset(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({}, {}) outside {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
        (y * self.width + x) * self.cell_len()
    }

    /// All five slots of a cell, slot after slot.
    pub fn cell(&self, x: usize, y: usize) -> &[Cost] {
        let start = self.cell_offset(x, y);
        &self.messages[start..start + self.cell_len()]
    }

    pub fn message(&self, x: usize, y: usize, slot: Slot) -> &[Cost] {
        let start = self.cell_offset(x, y) + slot.index() * self.labels;
        &self.messages[start..start + self.labels]
    }

    pub fn message_mut(&mut self, x: usize, y: usize, slot: Slot) -> &mut [Cost] {
        let start = self.cell_offset(x, y) + slot.index() * self.labels;
        let labels = self.labels;
        &mut self.messages[start..start + labels]
    }

    /// Borrow the cell `from` for reading and the distinct cell `to` for writing.
    pub fn cell_pair_mut(
        &mut self,
        from: (usize, usize),
        to: (usize, usize)
    ) -> (&[Cost], &mut [Cost]) {
        let len = self.cell_len();
        let src = self.cell_offset(from.0, from.1);
        let dst = self.cell_offset(to.0, to.1);
        assert_ne!(src, dst, "a cell cannot send a message to itself");

        if src < dst {
            let (head, tail) = self.messages.split_at_mut(dst);
            (&head[src..src + len], &mut tail[..len])
        }
        else {
            let (head, tail) = self.messages.split_at_mut(src);
            (&tail[..len], &mut head[dst..dst + len])
        }
    }

    /// Label chosen for the cell by the last decode, `None` before decoding.
    pub fn best_assignment(&self, x: usize, y: usize) -> Option<usize> {
        self.best_assignment[y * self.width + x]
    }

    pub(crate) fn set_best_assignment(&mut self, x: usize, y: usize, label: usize) {
        debug_assert!(label < self.labels);
        self.best_assignment[y * self.width + x] = Some(label);
    }
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// The `slot` part of a cell slice as returned by [`MarkovRandomField::cell`].
pub fn slot_of(cell: &[Cost], slot: Slot, labels: usize) -> &[Cost] {
    &cell[slot.index() * labels..(slot.index() + 1) * labels]
}

/// Width of the margin at every image edge without a valid data cost.
///
/// Blocks must fit inside both images for every label, so the margin covers the largest shift
/// plus half a block.
pub fn border_margin(labels: usize, block_size: usize) -> usize {
    labels + block_size / 2
}

/// Coordinates strictly inside the border along an axis of length `len`. Empty when the axis is
/// too short to have an interior.
pub fn interior_range(len: usize, border: usize) -> Range<usize> {
    border..len.saturating_sub(border)
}

/// Build a grid for the stereo pair using the default label count, block size and truncation.
pub fn initialize_data_cost(left: &GrayImage, right: &GrayImage) -> MarkovRandomField {
    initialize_data_cost_with(left, right, LABELS, BLOCK_SIZE, TRUNCATION)
}

/// Build a grid sized to `left` and fill the data term of every interior cell.
///
/// Border cells keep an all zero data term.
pub fn initialize_data_cost_with(
    left: &GrayImage,
    right: &GrayImage,
    labels: usize,
    block_size: usize,
    truncation: u32
) -> MarkovRandomField {
    assert_eq!(
        left.dimensions(),
        right.dimensions(),
        "stereo images must have equal dimensions"
    );

    let width = left.width() as usize;
    let height = left.height() as usize;
    let border = border_margin(labels, block_size);

    debug!(
        "Initialising {}x{} MRF with {} labels, block size {}, border {}",
        width, height, labels, block_size, border
    );

    let mut mrf = MarkovRandomField::new(width, height, labels, truncation);

    for y in interior_range(height, border) {
        for x in interior_range(width, border) {
            for (label, cost) in mrf.message_mut(x, y, Slot::Data).iter_mut().enumerate() {
                *cost = Cost::from(data_cost(left, right, x, y, label, block_size));
            }
        }
    }

    mrf
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
