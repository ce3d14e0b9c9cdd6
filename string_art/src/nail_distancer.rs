use thiserror::Error;

/// Exclusion band around the current nail.
///
/// Candidates for nail `c` are scanned from `(c + skip) % count` up to, but
/// not including, `(c - skip) % count`. A zero band still excludes `c`
/// itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NailDistancer {
    count: usize,
    skip: usize,
    min: usize,
    max: usize,
}

impl NailDistancer {
    pub fn new(count: usize, skip: usize) -> Result<Self, Error> {
        let min = skip.max(1);
        match count.checked_sub(skip) {
            Some(max) if max > min => Ok(Self {
                count,
                skip,
                min,
                max,
            }),
            _ => Err(Error { count, skip }),
        }
    }

    /// Number of candidates scanned for every nail.
    pub fn distance(&self) -> usize {
        self.max - self.min
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn skip(&self) -> usize {
        self.skip
    }

    /// Candidate nails for `current`, in scan order.
    pub fn candidates(&self, current: usize) -> impl ExactSizeIterator<Item = usize> + Clone {
        let count = self.count;
        (self.min..self.max).map(move |offset| (current + offset) % count)
    }

    /// Whether `to` would be scanned as a candidate from `from`.
    pub fn is_valid(&self, from: usize, to: usize) -> bool {
        if from >= self.count || to >= self.count {
            return false;
        }
        let offset = (to + self.count - from) % self.count;
        offset >= self.min && offset < self.max
    }
}

#[derive(Debug, Error)]
#[error("A skip band of {skip} nails leaves no candidate among {count} nails.")]
pub struct Error {
    pub count: usize,
    pub skip: usize,
}
