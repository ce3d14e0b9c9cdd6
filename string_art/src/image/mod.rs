//! Loading a photo into a square, circle-masked brightness grid.

use std::{ops::Deref, path::Path};

use ::image::{imageops, DynamicImage, GrayImage, ImageError, Luma};

use crate::{canvas::WHITE, geometry::Point, Grid};

/// Row-major pixel buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelData<T> {
    pixels: Vec<T>,
    grid: Grid,
}

impl<T> PixelData<T> {
    /// Wraps `pixels`, returning `None` when their count does not match `grid`.
    pub fn from_raw(pixels: Vec<T>, grid: Grid) -> Option<Self> {
        (pixels.len() == grid.len()).then_some(Self { pixels, grid })
    }

    pub fn new(mut builder: impl FnMut(Point<usize>) -> T, grid: Grid) -> Self {
        let pixels = (0..grid.len())
            .map(|index| builder(grid.point_of(index)))
            .collect();
        Self { pixels, grid }
    }

    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    pub fn get(&self, point: Point<usize>) -> Option<&T> {
        self.grid
            .index_of(point)
            .and_then(|index| self.pixels.get(index))
    }

    pub fn get_mut(&mut self, point: Point<usize>) -> Option<&mut T> {
        self.grid
            .index_of(point)
            .and_then(|index| self.pixels.get_mut(index))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

impl<T: Clone> PixelData<T> {
    pub fn filled(value: T, grid: Grid) -> Self {
        Self {
            pixels: vec![value; grid.len()],
            grid,
        }
    }
}

impl<T> Deref for PixelData<T> {
    type Target = Grid;

    fn deref(&self) -> &Self::Target {
        &self.grid
    }
}

impl From<&GrayImage> for PixelData<u8> {
    fn from(value: &GrayImage) -> Self {
        Self {
            pixels: value.pixels().map(|pixel| pixel.0[0]).collect(),
            grid: Grid {
                height: value.height() as usize,
                width: value.width() as usize,
            },
        }
    }
}

impl From<&PixelData<u8>> for GrayImage {
    fn from(value: &PixelData<u8>) -> Self {
        GrayImage::from_fn(value.width as u32, value.height as u32, |x, y| {
            Luma([value.pixels[y as usize * value.width + x as usize]])
        })
    }
}

/// Opens the image at `path` and turns it into a brightness grid, see [`prepare`].
pub fn open(
    path: impl AsRef<Path>,
    resolution: Option<u32>,
    inverted: bool,
) -> Result<PixelData<u8>, Error> {
    let image = ::image::open(path)?;
    prepare(&image, resolution, inverted)
}

/// Grayscale, square crop around the center, optional resize to
/// `resolution` pixels per side, optional inversion and circular mask.
pub fn prepare(
    image: &DynamicImage,
    resolution: Option<u32>,
    inverted: bool,
) -> Result<PixelData<u8>, Error> {
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::Empty);
    }
    let mut gray = match resolution {
        Some(0) => return Err(Error::Empty),
        Some(side) => image
            .resize_to_fill(side, side, imageops::FilterType::Lanczos3)
            .to_luma8(),
        None => crop_square(&image.to_luma8()),
    };
    if inverted {
        imageops::invert(&mut gray);
    }
    let mut data = PixelData::from(&gray);
    mask_circle(&mut data);
    Ok(data)
}

fn crop_square(image: &GrayImage) -> GrayImage {
    let side = image.width().min(image.height());
    let left = (image.width() - side) / 2;
    let top = (image.height() - side) / 2;
    imageops::crop_imm(image, left, top, side, side).to_image()
}

/// Paints white every pixel whose center falls outside the inscribed circle.
pub fn mask_circle(data: &mut PixelData<u8>) {
    let grid = *data.grid();
    let center = Point {
        x: grid.width as f64 / 2.0,
        y: grid.height as f64 / 2.0,
    };
    let sq_radius = center.x.min(center.y).powi(2);
    for (index, pixel) in data.pixels_mut().iter_mut().enumerate() {
        let point = grid.point_of(index).as_::<f64>() + Point { x: 0.5, y: 0.5 };
        if point.sq_distance(&center) > sq_radius {
            *pixel = WHITE;
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] ImageError),
    #[error("The image has no pixels")]
    Empty,
}
