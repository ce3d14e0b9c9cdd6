use num_traits::Unsigned;

use crate::geometry::Point;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid<T = usize> {
    pub height: T,
    pub width: T,
}

impl<T> Grid<T> {
    pub fn new(height: T, width: T) -> Self {
        Self { height, width }
    }
}

impl<T: Copy> Grid<T> {
    pub fn square(size: T) -> Self {
        Self {
            height: size,
            width: size,
        }
    }
}

impl<T: Unsigned + PartialOrd + Copy> Grid<T> {
    pub fn index_of(&self, point: Point<T>) -> Option<T> {
        if self.contains(point) {
            Some(point.y * self.width + point.x)
        } else {
            None
        }
    }

    pub fn contains(&self, point: Point<T>) -> bool {
        point.x < self.width && point.y < self.height
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

impl Grid<usize> {
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inverse of [`Grid::index_of`].
    pub fn point_of(&self, index: usize) -> Point<usize> {
        Point {
            x: index % self.width,
            y: index / self.width,
        }
    }
}
