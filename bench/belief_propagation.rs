use criterion::{black_box, criterion_group, criterion_main, Criterion};

use image::{GrayImage, Luma};
use lbp_disparity::message::iterate;
use lbp_disparity::mrf::initialize_data_cost;
use lbp_disparity::prelude::*;

fn textured_pair(width: u32, height: u32, shift: u32) -> (GrayImage, GrayImage) {
    let texture = |x: u32, y: u32| {
        let h = x.wrapping_mul(73_856_093) ^ y.wrapping_mul(19_349_663);
        Luma([(h ^ (h >> 13)) as u8])
    };

    (
        GrayImage::from_fn(width, height, texture),
        GrayImage::from_fn(width, height, |x, y| texture(x + shift, y))
    )
}

fn belief_propagation_bench(c: &mut Criterion) {
    // Build stereo pair
    let (left, right) = textured_pair(96, 72, 6);

    // Build disparity alg
    let mut disp = BeliefPropagation::new(Params {
        iterations: 3,
        ..Params::default()
    });

    let frame = StereoFrame::new(left.clone(), right.clone());

    // Benchmark compute function
    c.bench_function("belief_propagation textured 96x72", |b| b.iter(|| disp.compute(&frame)));

    // Benchmark a single iteration of message passing
    let mut mrf = initialize_data_cost(&left, &right);
    c.bench_function("iterate textured 96x72", |b| b.iter(|| iterate(black_box(&mut mrf))));
}

criterion_group!(benches, belief_propagation_bench);
criterion_main!(benches);
