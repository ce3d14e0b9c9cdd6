use std::fmt;

use bresenham::Bresenham;
use num_traits::AsPrimitive;

use super::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment<T> {
    pub start: Point<T>,
    pub end: Point<T>,
}

impl<T: fmt::Display> fmt::Display for Segment<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

impl<T> Segment<T> {
    pub fn new(start: Point<T>, end: Point<T>) -> Self {
        Self { start, end }
    }

    pub fn reversed(self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }
}

impl<T: num_traits::NumCast> Segment<T> {
    pub fn cast<I: num_traits::NumCast>(self) -> Option<Segment<I>> {
        self.start
            .cast()
            .and_then(|start| self.end.cast().map(|end| Segment { start, end }))
    }
}

impl<T> Segment<T> {
    pub fn as_<S: Copy + 'static>(self) -> Segment<S>
    where
        T: AsPrimitive<S>,
    {
        Segment {
            start: self.start.as_(),
            end: self.end.as_(),
        }
    }
}

impl<T: num_traits::Float> Segment<T> {
    /// Squared distance from `point` to the closest point of the segment.
    pub fn sq_distance_to(&self, point: &Point<T>) -> T {
        let dir = self.end - self.start;
        let sq_len = dir.x * dir.x + dir.y * dir.y;
        if sq_len == T::zero() {
            return self.start.sq_distance(point);
        }
        let t = ((point.x - self.start.x) * dir.x + (point.y - self.start.y) * dir.y) / sq_len;
        let t = t.max(T::zero()).min(T::one());
        (self.start + dir * t).sq_distance(point)
    }
}

impl Segment<isize> {
    /// Every pixel between both ends, both included.
    pub fn points_between(&self) -> impl Iterator<Item = Point<isize>> {
        // The bresenham crate stops right before the end point.
        Bresenham::new((self.start.x, self.start.y), (self.end.x, self.end.y))
            .map(|(x, y)| Point { x, y })
            .chain(core::iter::once(self.end))
    }
}
