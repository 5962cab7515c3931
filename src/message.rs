//! # Message passing
//!
//! Min-sum message computation between neighbouring cells and the directional sweeps that
//! schedule it. Messages are updated in place, so within one sweep a message can already depend
//! on the message sent by the previous cell along the sweep.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use crate::cost::truncated_linear;
use crate::mrf::{slot_of, Cost, Direction, MarkovRandomField, Slot};

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Send the message from cell `(x, y)` to its neighbour in `direction`.
///
/// For each label `l` the message is the minimum over sender labels `l2` of the smoothness cost
/// plus the sender's data term plus every message the sender holds except the one received from
/// the neighbour being sent to. The result is shifted so its smallest entry is zero, then
/// overwrites the receiver's slot facing the sender.
///
/// The shift subtracts one constant per message, so the argmin of every belief and hence the
/// decoded labelling are those of the unshifted messages. Entries never exceed the truncation.
///
/// Panics if the neighbour is off the grid.
pub fn send_message(mrf: &mut MarkovRandomField, x: usize, y: usize, direction: Direction) {
    let receiver = match direction.neighbour(x, y, mrf.width(), mrf.height()) {
        Some(r) => r,
        None => panic!("cell ({}, {}) has no neighbour to the {:?}", x, y, direction)
    };

    let labels = mrf.labels();
    let truncation = mrf.truncation();
    let (sender, receiver) = mrf.cell_pair_mut((x, y), receiver);

    let data = slot_of(sender, Slot::Data, labels);
    let left = slot_of(sender, Slot::Left, labels);
    let right = slot_of(sender, Slot::Right, labels);
    let up = slot_of(sender, Slot::Up, labels);
    let down = slot_of(sender, Slot::Down, labels);

    let out_start = direction.receiver_slot().index() * labels;
    let outgoing = &mut receiver[out_start..out_start + labels];

    for (l, out) in outgoing.iter_mut().enumerate() {
        let mut min_cost = Cost::MAX;

        for l2 in 0..labels {
            let mut cost = Cost::from(truncated_linear(l, l2, truncation))
                .saturating_add(data[l2]);

            if direction != Direction::Left {
                cost = cost.saturating_add(left[l2]);
            }
            if direction != Direction::Right {
                cost = cost.saturating_add(right[l2]);
            }
            if direction != Direction::Up {
                cost = cost.saturating_add(up[l2]);
            }
            if direction != Direction::Down {
                cost = cost.saturating_add(down[l2]);
            }

            min_cost = min_cost.min(cost);
        }

        *out = min_cost;
    }

    let floor = outgoing.iter().copied().min().unwrap_or(0);
    for out in outgoing.iter_mut() {
        *out -= floor;
    }
}

/// Sweep messages across the whole grid in `direction`.
///
/// Rightward messages chain from the left edge, leftward from the right edge, downward from the
/// top and upward from the bottom. Every cell with a neighbour in `direction` sends exactly once.
pub fn propagate_belief(mrf: &mut MarkovRandomField, direction: Direction) {
    let width = mrf.width();
    let height = mrf.height();

    match direction {
        Direction::Right => {
            for y in 0..height {
                for x in 0..width.saturating_sub(1) {
                    send_message(mrf, x, y, direction);
                }
            }
        },
        Direction::Left => {
            for y in 0..height {
                for x in (1..width).rev() {
                    send_message(mrf, x, y, direction);
                }
            }
        },
        Direction::Down => {
            for x in 0..width {
                for y in 0..height.saturating_sub(1) {
                    send_message(mrf, x, y, direction);
                }
            }
        },
        Direction::Up => {
            for x in 0..width {
                for y in (1..height).rev() {
                    send_message(mrf, x, y, direction);
                }
            }
        }
    }
}

/// One belief propagation iteration: a full sweep in each direction of
/// [`Direction::SCHEDULE`].
pub fn iterate(mrf: &mut MarkovRandomField) {
    for &direction in Direction::SCHEDULE.iter() {
        propagate_belief(mrf, direction);
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
