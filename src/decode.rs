//! # MAP decoding
//!
//! Picks the label with the lowest accumulated cost for every cell once message passing is done,
//! and scores the decoded labelling.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use crate::mrf::{slot_of, Cost, Direction, MarkovRandomField, Slot};

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Assign every cell the label minimising the sum of its five slots and return the energy of the
/// resulting labelling.
///
/// Ties go to the lowest label. Only the best assignments are written, messages are untouched.
pub fn maximum_a_posteriori(mrf: &mut MarkovRandomField) -> u64 {
    let labels = mrf.labels();

    for y in 0..mrf.height() {
        for x in 0..mrf.width() {
            let cell = mrf.cell(x, y);
            let mut best = 0;
            let mut min_cost = Cost::MAX;

            for label in 0..labels {
                let cost = Slot::ALL
                    .iter()
                    .fold(0 as Cost, |acc, &slot| {
                        acc.saturating_add(slot_of(cell, slot, labels)[label])
                    });

                if cost < min_cost {
                    min_cost = cost;
                    best = label;
                }
            }

            mrf.set_best_assignment(x, y, best);
        }
    }

    energy(mrf)
}

/// Energy of the decoded labelling: the data cost of each cell's label plus the smoothness cost
/// towards each existing neighbour.
///
/// Every neighbouring pair is counted once from each side. Panics if the grid has not been
/// decoded.
pub fn energy(mrf: &MarkovRandomField) -> u64 {
    let width = mrf.width();
    let height = mrf.height();

    let label_at = |x: usize, y: usize| match mrf.best_assignment(x, y) {
        Some(label) => label,
        None => panic!("energy requested before cell ({}, {}) was decoded", x, y)
    };

    let mut energy: u64 = 0;

    for y in 0..height {
        for x in 0..width {
            let label = label_at(x, y);
            energy = energy.saturating_add(mrf.message(x, y, Slot::Data)[label]);

            for &direction in Direction::SCHEDULE.iter() {
                if let Some((nx, ny)) = direction.neighbour(x, y, width, height) {
                    energy = energy.saturating_add(mrf.smoothness(label, label_at(nx, ny)));
                }
            }
        }
    }

    energy
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
