//! End to end disparity computation on synthetic stereo pairs.

mod common;

use common::synthetic_image::{constant, shifted_ramp_pair, steep_ramp, textured, with_noise};
use lbp_disparity::decode::maximum_a_posteriori;
use lbp_disparity::message::iterate;
use lbp_disparity::mrf::{border_margin, initialize_data_cost, interior_range, Cost, Slot};
use lbp_disparity::prelude::*;
use lbp_disparity::{Error, BLOCK_SIZE, LABELS, TRUNCATION};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn constant_pair_decodes_to_zero_with_zero_energy() {
    init_logging();

    let left = constant(64, 64, 120);
    let right = constant(64, 64, 120);

    for &iterations in &[1, 3] {
        let mut bp = BeliefPropagation::new(Params {
            iterations,
            ..Params::default()
        });
        let map = bp.compute(&StereoFrame::new(left.clone(), right.clone())).unwrap();

        assert!(map.labels().pixels().all(|p| p.0[0] == 0));
        assert_eq!(map.energy, Some(0));
        assert_eq!(map.min_disp, Some(0.0));
        assert_eq!(map.max_disp, Some(0.0));
    }
}

#[test]
fn shifted_pair_decodes_to_shift() {
    init_logging();

    let shift = 4;
    let (left, right) = shifted_ramp_pair(64, 64, shift);
    let disparity = stereo_belief_propagation(&left, &right, 2);
    let border = border_margin(LABELS, BLOCK_SIZE);

    assert_eq!(disparity.dimensions(), (64, 64));
    for y in interior_range(64, border) {
        for x in interior_range(64, border) {
            assert_eq!(
                disparity.get_pixel(x as u32, y as u32).0[0] as u32,
                shift,
                "pixel ({}, {})",
                x,
                y
            );
        }
    }
}

#[test]
fn border_is_always_zero() {
    init_logging();

    let left = textured(56, 50, 1);
    let right = textured(56, 50, 2);
    let mut bp = BeliefPropagation::new(Params {
        iterations: 2,
        ..Params::default()
    });

    let map = bp.compute(&StereoFrame::new(left, right)).unwrap();
    let border = bp.params().border();
    let xs = interior_range(56, border);
    let ys = interior_range(50, border);

    for (x, y, px) in map.labels().enumerate_pixels() {
        if !(xs.contains(&(x as usize)) && ys.contains(&(y as usize))) {
            assert_eq!(px.0[0], 0, "border pixel ({}, {})", x, y);
        }
        assert!((px.0[0] as usize) < LABELS);
    }
    assert!(map.energy.is_some());
    assert!(map.min_disp.unwrap() <= map.max_disp.unwrap());
}

#[test]
fn images_without_interior_give_empty_map() {
    let img = textured(30, 30, 3);
    let mut bp = BeliefPropagation::new(Params::default());

    let map = bp.compute(&StereoFrame::new(img.clone(), img)).unwrap();

    assert!(map.labels().pixels().all(|p| p.0[0] == 0));
    assert_eq!(map.min_disp, None);
    assert_eq!(map.max_disp, None);
}

#[test]
fn messages_stay_bounded_when_a_zero_cost_labelling_exists() {
    let (left, right) = shifted_ramp_pair(48, 48, 3);
    let mut mrf = initialize_data_cost(&left, &right);

    for _ in 0..4 {
        iterate(&mut mrf);

        for y in 0..48 {
            for x in 0..48 {
                for &slot in &[Slot::Left, Slot::Right, Slot::Up, Slot::Down] {
                    let msg = mrf.message(x, y, slot);
                    assert_eq!(msg[3], 0);
                    assert!(msg.iter().all(|&c| c <= u64::from(TRUNCATION)));
                }
            }
        }
    }
}

#[test]
fn noisy_shifted_pair_survives_many_iterations() {
    init_logging();

    let shift = 4;
    let left = with_noise(&steep_ramp(64, 64, 0), 2, 11);
    let right = with_noise(&steep_ramp(64, 64, shift), 2, 12);
    let border = border_margin(LABELS, BLOCK_SIZE);

    let mut mrf = initialize_data_cost(&left, &right);
    for _ in 0..12 {
        iterate(&mut mrf);
    }

    for y in 0..64 {
        for x in 0..64 {
            for &slot in &[Slot::Left, Slot::Right, Slot::Up, Slot::Down] {
                let msg = mrf.message(x, y, slot);
                assert!(msg.iter().all(|&c| c != Cost::MAX && c <= u64::from(TRUNCATION)));
            }
        }
    }

    maximum_a_posteriori(&mut mrf);
    for y in interior_range(64, border) {
        for x in interior_range(64, border) {
            assert_eq!(mrf.best_assignment(x, y), Some(shift as usize), "cell ({}, {})", x, y);
        }
    }

    let disparity = stereo_belief_propagation(&left, &right, 10);
    for y in interior_range(64, border) {
        for x in interior_range(64, border) {
            assert_eq!(disparity.get_pixel(x as u32, y as u32).0[0] as u32, shift);
        }
    }
}

#[test]
fn mismatched_pair_is_rejected() {
    let mut bp = BeliefPropagation::new(Params::default());
    let frame = StereoFrame::new(constant(40, 40, 0), constant(41, 40, 0));

    match bp.compute(&frame) {
        Err(Error::DimensionMismatch { left, right }) => {
            assert_eq!(left, (40, 40));
            assert_eq!(right, (41, 40));
        },
        other => panic!("expected dimension mismatch, got {:?}", other.map(|m| m.energy))
    }
}

#[test]
fn invalid_params_are_rejected_before_inference() {
    let mut bp = BeliefPropagation::new(Params {
        block_size: 6,
        ..Params::default()
    });
    let frame = StereoFrame::new(constant(40, 40, 0), constant(40, 40, 0));

    assert!(matches!(bp.compute(&frame), Err(Error::InvalidParams(_))));
}
