use crate::{geometry::Point, image::PixelData, raster::CoverageMask, Grid};

/// Brightness of a pixel whose ink has been used up.
pub const WHITE: u8 = u8::MAX;

/// Reference brightness grid and the working copy the threads are
/// subtracted from.
///
/// The working grid only ever gets brighter: [`Canvas::consume`] is its
/// single mutation and sets pixels to [`WHITE`].
#[derive(Clone, Debug)]
pub struct Canvas {
    reference: PixelData<u8>,
    working: PixelData<u8>,
}

impl Canvas {
    pub fn new(reference: PixelData<u8>) -> Result<Self, Error> {
        let grid = *reference.grid();
        if grid.is_empty() {
            return Err(Error::Empty);
        }
        if !grid.is_square() {
            return Err(Error::NotSquare(grid));
        }
        Ok(Self {
            working: reference.clone(),
            reference,
        })
    }

    /// Side length in pixels.
    pub fn size(&self) -> usize {
        self.reference.width
    }

    pub fn grid(&self) -> Grid {
        *self.reference.grid()
    }

    pub fn reference(&self) -> &PixelData<u8> {
        &self.reference
    }

    pub fn working(&self) -> &PixelData<u8> {
        &self.working
    }

    pub fn into_reference(self) -> PixelData<u8> {
        self.reference
    }

    /// Mean working brightness under `mask`. Lower is darker.
    pub fn brightness(&self, mask: &CoverageMask) -> Result<f64, Error> {
        if mask.is_empty() {
            return Err(Error::EmptyMask);
        }
        let pixels = self.working.pixels();
        let sum: u64 = mask.indexes().iter().map(|&index| pixels[index] as u64).sum();
        Ok(sum as f64 / mask.len() as f64)
    }

    /// Removes the ink under `mask` from the working grid.
    pub(crate) fn consume(&mut self, mask: &CoverageMask) {
        let pixels = self.working.pixels_mut();
        for &index in mask.indexes() {
            pixels[index] = WHITE;
        }
    }

    pub fn is_consumed(&self, point: Point<usize>) -> bool {
        self.working.get(point) == Some(&WHITE)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("The canvas must be square, got {}x{}", .0.width, .0.height)]
    NotSquare(Grid),
    #[error("The canvas has no pixels")]
    Empty,
    #[error("The chord covers no pixel of the canvas")]
    EmptyMask,
}
