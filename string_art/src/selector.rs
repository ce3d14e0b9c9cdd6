use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    canvas::Canvas,
    config,
    geometry::{Point, Segment},
    nail_distancer::{self, NailDistancer},
    raster::{CoverageMask, Rasterizer},
    Error, NailTable,
};

/// Darkest chord found from one nail.
#[derive(Clone, Debug)]
pub struct Selection {
    pub from: usize,
    pub to: usize,
    pub position: Point<usize>,
    pub mask: CoverageMask,
    pub brightness: f64,
}

/// Greedy scan over every chord leaving a nail.
///
/// Candidates are visited in [`NailDistancer::candidates`] order and the
/// first strictly darkest one wins, so ties go to the candidate closest to
/// `from + skip`. The scan only reads the canvas.
pub struct Selector<'a, R> {
    table: &'a NailTable,
    distancer: NailDistancer,
    rasterizer: &'a R,
}

impl<'a, R: Rasterizer> Selector<'a, R> {
    pub fn new(table: &'a NailTable, distancer: NailDistancer, rasterizer: &'a R) -> Self {
        debug_assert_eq!(table.len(), distancer.count());
        Self {
            table,
            distancer,
            rasterizer,
        }
    }

    pub fn chord_mask(&self, from: usize, to: usize, canvas: &Canvas) -> Result<CoverageMask, Error> {
        let segment = Segment::new(self.table[from], self.table[to]);
        Ok(self.rasterizer.rasterize(segment, canvas.grid())?)
    }

    /// Mean brightness under the chord `from -> to`.
    pub fn evaluate(&self, from: usize, to: usize, canvas: &Canvas) -> Result<f64, Error> {
        Ok(canvas.brightness(&self.chord_mask(from, to, canvas)?)?)
    }

    pub fn darkest(&self, from: usize, canvas: &Canvas) -> Result<Selection, Error> {
        let mut best: Option<(usize, CoverageMask, f64)> = None;
        for to in self.distancer.candidates(from) {
            let mask = self.chord_mask(from, to, canvas)?;
            let brightness = canvas.brightness(&mask)?;
            if best.as_ref().map_or(true, |(_, _, darkest)| brightness < *darkest) {
                best = Some((to, mask, brightness));
            }
        }
        let (to, mask, brightness) = best.ok_or_else(|| self.empty_band())?;
        Ok(self.selection(from, to, mask, brightness))
    }

    /// Same result as [`Selector::darkest`], evaluating candidates on the
    /// current rayon pool.
    pub fn par_darkest(&self, from: usize, canvas: &Canvas) -> Result<Selection, Error> {
        let weights = self
            .distancer
            .candidates(from)
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|to| self.evaluate(from, to, canvas).map(|brightness| (to, brightness)))
            .collect::<Result<Vec<_>, Error>>()?;

        // Reduced in scan order to keep the first darkest candidate.
        let mut best: Option<(usize, f64)> = None;
        for (to, brightness) in weights {
            if best.map_or(true, |(_, darkest)| brightness < darkest) {
                best = Some((to, brightness));
            }
        }
        let (to, brightness) = best.ok_or_else(|| self.empty_band())?;
        let mask = self.chord_mask(from, to, canvas)?;
        Ok(self.selection(from, to, mask, brightness))
    }

    fn selection(&self, from: usize, to: usize, mask: CoverageMask, brightness: f64) -> Selection {
        Selection {
            from,
            to,
            position: self.table[to],
            mask,
            brightness,
        }
    }

    fn empty_band(&self) -> Error {
        config::Error::SkipBand(nail_distancer::Error {
            count: self.distancer.count(),
            skip: self.distancer.skip(),
        })
        .into()
    }
}
