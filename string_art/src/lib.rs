//! Greedy string art.
//!
//! Nails are spread over the circle inscribed in a square brightness grid.
//! Starting at nail 0, every iteration winds the thread to the nail whose
//! chord is darkest on average, then whitens that chord's pixels so the
//! same ink is never used twice.

pub mod geometry {
    pub mod point;
    pub mod segment;

    pub use point::Point;
    pub use segment::Segment;
}

mod algorithm;
pub mod canvas;
pub mod config;
pub mod grid;
pub mod image;
pub mod nail_distancer;
pub mod nail_table;
pub mod raster;
mod selector;
pub mod verboser;

pub use algorithm::*;
pub use canvas::Canvas;
pub use config::{Config, LineColor};
pub use grid::Grid;
pub use nail_distancer::NailDistancer;
pub use nail_table::NailTable;
pub use selector::*;
