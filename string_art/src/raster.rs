//! Chord rasterization.
//!
//! A [`Rasterizer`] turns the segment between two nails into the set of
//! canvas pixels it covers. [`ThinLine`] walks the segment with integer
//! Bresenham steps, [`ThickLine`] strokes it with round caps into a scratch
//! layer. [`Stroke`] picks one of both once per run.

use ::image::{GrayImage, Luma};

use crate::{
    geometry::{Point, Segment},
    grid::Grid,
};

pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, segment: Segment<usize>, grid: Grid) -> Result<CoverageMask, Error>;
}

/// Pixels covered by a chord, as row-major indexes into the canvas.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoverageMask {
    indexes: Vec<usize>,
}

impl CoverageMask {
    pub fn indexes(&self) -> &[usize] {
        &self.indexes
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    pub fn points(&self, grid: Grid) -> impl Iterator<Item = Point<usize>> + '_ {
        self.indexes.iter().map(move |&index| grid.point_of(index))
    }
}

impl FromIterator<usize> for CoverageMask {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self {
            indexes: iter.into_iter().collect(),
        }
    }
}

/// Integer Bresenham walk from `start` to `end`, both included, in
/// traversal order.
///
/// Endpoints are ordered along the dominant axis before stepping, so both
/// directions cover exactly the same pixels.
pub fn bresenham(start: Point<isize>, end: Point<isize>) -> Vec<Point<isize>> {
    let steep = (end.y - start.y).abs() > (end.x - start.x).abs();
    let (mut a, mut b) = if steep {
        (start.transpose(), end.transpose())
    } else {
        (start, end)
    };
    let reversed = a.x > b.x;
    if reversed {
        core::mem::swap(&mut a, &mut b);
    }

    let dx = b.x - a.x;
    let dy = (b.y - a.y).abs();
    let y_step = if a.y < b.y { 1 } else { -1 };
    let mut error = dx / 2;
    let mut y = a.y;

    let mut points = Vec::with_capacity(dx as usize + 1);
    for x in a.x..=b.x {
        let point = Point { x, y };
        points.push(if steep { point.transpose() } else { point });
        error -= dy;
        if error < 0 {
            y += y_step;
            error += dx;
        }
    }

    if reversed {
        points.reverse();
    }
    points
}

/// One pixel wide chords.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThinLine;

impl Rasterizer for ThinLine {
    fn rasterize(&self, segment: Segment<usize>, grid: Grid) -> Result<CoverageMask, Error> {
        check(segment, grid)?;
        Ok(bresenham(segment.start.as_(), segment.end.as_())
            .into_iter()
            .filter_map(|point| point.cast::<usize>().and_then(|point| grid.index_of(point)))
            .collect())
    }
}

/// Chords stroked `thickness` pixels wide with round caps.
///
/// Strictly slower than [`ThinLine`], and always a superset of its pixels.
#[derive(Clone, Copy, Debug)]
pub struct ThickLine {
    thickness: u32,
}

impl ThickLine {
    pub fn new(thickness: u32) -> Result<Self, Error> {
        if thickness == 0 {
            Err(Error::ZeroThickness)
        } else {
            Ok(Self { thickness })
        }
    }

    pub fn thickness(&self) -> u32 {
        self.thickness
    }
}

impl Rasterizer for ThickLine {
    fn rasterize(&self, segment: Segment<usize>, grid: Grid) -> Result<CoverageMask, Error> {
        check(segment, grid)?;
        let radius = self.thickness as f64 / 2.0;
        let reach = radius.ceil() as usize;
        let max = Point {
            x: grid.width.saturating_sub(1),
            y: grid.height.saturating_sub(1),
        };
        let origin = Point {
            x: segment.start.x.min(segment.end.x).saturating_sub(reach).min(max.x),
            y: segment.start.y.min(segment.end.y).saturating_sub(reach).min(max.y),
        };
        let corner = Point {
            x: (segment.start.x.max(segment.end.x) + reach).min(max.x),
            y: (segment.start.y.max(segment.end.y) + reach).min(max.y),
        };

        // Scratch layer covering the stroke's bounding box.
        let mut layer = GrayImage::new(
            (corner.x - origin.x + 1) as u32,
            (corner.y - origin.y + 1) as u32,
        );
        let mut paint = |point: Point<usize>| {
            if point.x >= origin.x && point.y >= origin.y && point.x <= corner.x && point.y <= corner.y
            {
                layer.put_pixel(
                    (point.x - origin.x) as u32,
                    (point.y - origin.y) as u32,
                    Luma([u8::MAX]),
                );
            }
        };

        for point in bresenham(segment.start.as_(), segment.end.as_()) {
            if let Some(point) = point.cast::<usize>() {
                paint(point);
            }
        }
        // Same float operations whichever way the chord is walked.
        let line = if (segment.start.x, segment.start.y) <= (segment.end.x, segment.end.y) {
            segment
        } else {
            segment.reversed()
        }
        .as_::<f64>();
        let sq_radius = radius * radius;
        for y in origin.y..=corner.y {
            for x in origin.x..=corner.x {
                let point = Point { x, y };
                if line.sq_distance_to(&point.as_()) <= sq_radius {
                    paint(point);
                }
            }
        }

        Ok(layer
            .enumerate_pixels()
            .filter(|(_, _, pixel)| pixel.0[0] != 0)
            .filter_map(|(x, y, _)| {
                grid.index_of(Point {
                    x: origin.x + x as usize,
                    y: origin.y + y as usize,
                })
            })
            .collect())
    }
}

/// Rasterization strategy chosen once from the configured line thickness.
#[derive(Clone, Copy, Debug)]
pub enum Stroke {
    Thin(ThinLine),
    Thick(ThickLine),
}

impl Stroke {
    pub fn from_thickness(thickness: u32) -> Result<Self, Error> {
        match thickness {
            0 => Err(Error::ZeroThickness),
            1 => Ok(Self::Thin(ThinLine)),
            _ => ThickLine::new(thickness).map(Self::Thick),
        }
    }

    pub fn thickness(&self) -> u32 {
        match self {
            Self::Thin(_) => 1,
            Self::Thick(line) => line.thickness(),
        }
    }
}

impl Default for Stroke {
    fn default() -> Self {
        Self::Thin(ThinLine)
    }
}

impl Rasterizer for Stroke {
    fn rasterize(&self, segment: Segment<usize>, grid: Grid) -> Result<CoverageMask, Error> {
        match self {
            Self::Thin(line) => line.rasterize(segment, grid),
            Self::Thick(line) => line.rasterize(segment, grid),
        }
    }
}

// One endpoint on the canvas is enough, the rest is clipped.
fn check(segment: Segment<usize>, grid: Grid) -> Result<(), Error> {
    if segment.start == segment.end {
        return Err(Error::ZeroLength(segment.start));
    }
    let outside = |point: Point<usize>| point.x >= grid.width || point.y >= grid.height;
    if outside(segment.start) && outside(segment.end) {
        return Err(Error::OutOfBounds(segment));
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Chord starting and ending at {0} has no length")]
    ZeroLength(Point<usize>),
    #[error("Chord {0} lies outside of the canvas")]
    OutOfBounds(Segment<usize>),
    #[error("Line thickness must be at least 1")]
    ZeroThickness,
}
