//! Grids and configurations shared by the integration tests.

#![allow(dead_code)]

use rand::{rngs::SmallRng, Rng, SeedableRng};
use string_art::{canvas::WHITE, geometry::Point, image::PixelData, Config, Grid};

pub fn config(nail_count: usize, iterations: usize, nails_to_skip: usize) -> Config {
    Config {
        nail_count,
        iterations,
        nails_to_skip,
        threads: 1,
        ..Config::default()
    }
}

pub fn white(size: usize) -> PixelData<u8> {
    PixelData::filled(WHITE, Grid::square(size))
}

/// Reproducible noise.
pub fn noise(size: usize, seed: u64) -> PixelData<u8> {
    let mut rng = SmallRng::seed_from_u64(seed);
    PixelData::new(|_| rng.gen::<u8>(), Grid::square(size))
}

pub fn darken(data: &mut PixelData<u8>, points: impl IntoIterator<Item = Point<usize>>) {
    for point in points {
        if let Some(pixel) = data.get_mut(point) {
            *pixel = 0;
        }
    }
}
