use std::ops::Index;

use crate::{
    geometry::Point,
    grid::Grid,
    verboser::{Message, Verboser},
};

/// Nails evenly spread over the circle inscribed in a square canvas.
///
/// Nail `i` sits at angle `2πi/N`, so index 0 is always the rightmost nail
/// and indices grow with the angle. Coordinates rounding onto the far edge
/// are pulled back onto the last row or column, so every nail is a canvas
/// pixel.
#[derive(Clone, Debug)]
pub struct NailTable {
    nails: Vec<Point<usize>>,
    grid: Grid,
}

impl NailTable {
    pub fn circular(
        size: usize,
        nail_count: usize,
        verboser: &mut impl Verboser,
    ) -> Result<Self, Error> {
        if size == 0 {
            return Err(Error::EmptyCanvas);
        }
        if nail_count < 2 {
            return Err(Error::MinNailCount(nail_count));
        }
        let radius = size as f64 / 2.0;
        let last = size - 1;
        let nails = (0..nail_count)
            .map(|i| {
                verboser.verbose(Message::CreatingNail(i));
                let theta = std::f64::consts::TAU * i as f64 / nail_count as f64;
                Point {
                    x: round(radius + radius * theta.cos()).min(last),
                    y: round(radius + radius * theta.sin()).min(last),
                }
            })
            .collect();
        verboser.verbose(Message::CreatingNail(nail_count));
        Ok(Self {
            nails,
            grid: Grid::square(size),
        })
    }

    pub fn nails(&self) -> &[Point<usize>] {
        &self.nails
    }

    pub fn len(&self) -> usize {
        self.nails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nails.is_empty()
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }
}

impl Index<usize> for NailTable {
    type Output = Point<usize>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.nails[index]
    }
}

// Half-way values go to the even neighbour so mirrored nails stay mirrored.
fn round(value: f64) -> usize {
    value.round_ties_even().max(0.0) as usize
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Nail count must be greater or equal to 2, got {0}")]
    MinNailCount(usize),
    #[error("Canvas size must be greater than 0")]
    EmptyCanvas,
}
