#![allow(dead_code)]

use folio::{BlockContent, BlockMetrics, Color, InMemoryMeasurementOracle, Raster, SourceBlock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn block_id(i: usize) -> String {
    format!("block-{}", i)
}

/// Solid grey blocks `block-0..` with the given heights, plus an oracle that
/// reports exactly those heights.
pub fn fill_blocks(heights: &[f32]) -> (Vec<SourceBlock>, InMemoryMeasurementOracle) {
    let mut oracle = InMemoryMeasurementOracle::new();
    let blocks = heights
        .iter()
        .enumerate()
        .map(|(i, h)| {
            oracle.insert(block_id(i), BlockMetrics::with_height(*h));
            SourceBlock::new(block_id(i), BlockContent::Fill(Color::gray(200)))
        })
        .collect();
    (blocks, oracle)
}

/// Heights drawn from a fixed seed; about one in ten exceeds `budget`.
pub fn random_heights(seed: u64, count: usize, budget: f32) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            if rng.random_bool(0.1) {
                rng.random_range(budget + 1.0..budget * 2.5)
            } else {
                rng.random_range(10.0..budget)
            }
        })
        .collect()
}

/// A raster with a distinct grey level per row band, so strips can be told
/// apart after slicing.
pub fn banded_raster(width: u32, height: u32, band: u32) -> Raster {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for row in 0..height {
        let level = ((row / band.max(1)) * 40 % 256) as u8;
        for _ in 0..width {
            pixels.extend_from_slice(&[level, level, level, 255]);
        }
    }
    Raster::new(width, height, pixels).expect("buffer matches dimensions")
}
