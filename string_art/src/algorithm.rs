use std::{fs, io, path::Path, time::Instant};

use ::image::{imageops, GrayImage, ImageResult, Luma};
use log::{debug, trace};
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

use crate::{
    canvas::{self, Canvas, WHITE},
    config::{self, Config, LineColor},
    geometry::{Point, Segment},
    image::{self, PixelData},
    nail_distancer::NailDistancer,
    nail_table,
    raster::{self, Rasterizer, Stroke},
    selector::{Selection, Selector},
    verboser::{Message, Verboser},
    NailTable,
};

/// Runs a whole computation on an already loaded brightness grid.
///
/// The configuration is validated before any nail or grid work.
pub fn compute(
    config: &Config,
    reference: PixelData<u8>,
    verboser: &mut impl Verboser,
) -> Result<Computation, Error> {
    config.validate()?;
    let canvas = Canvas::new(reference)?;
    Algorithm::new(config, canvas, verboser)?.compute(verboser)
}

/// A thread wound from one nail to another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chord {
    pub from: usize,
    pub from_position: Point<usize>,
    pub to: usize,
    pub to_position: Point<usize>,
}

impl Chord {
    pub fn segment(&self) -> Segment<usize> {
        Segment::new(self.from_position, self.to_position)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Idle,
    Running,
    Done,
}

/// Iteration driver.
///
/// Owns the working canvas for the whole run. Every [`Algorithm::step`]
/// selects the darkest chord leaving the last reached nail (nail 0 on the
/// first step), records it and consumes its pixels.
pub struct Algorithm<R = Stroke> {
    table: NailTable,
    distancer: NailDistancer,
    canvas: Canvas,
    rasterizer: R,
    pool: Option<ThreadPool>,
    iterations: usize,
    steps: Vec<Chord>,
    line_color: LineColor,
    line_thickness: u32,
}

impl Algorithm<Stroke> {
    pub fn new(config: &Config, canvas: Canvas, verboser: &mut impl Verboser) -> Result<Self, Error> {
        let stroke = config.stroke()?;
        Self::with_rasterizer(config, canvas, stroke, verboser)
    }
}

impl<R: Rasterizer> Algorithm<R> {
    pub fn with_rasterizer(
        config: &Config,
        canvas: Canvas,
        rasterizer: R,
        verboser: &mut impl Verboser,
    ) -> Result<Self, Error> {
        let distancer = config.distancer()?;
        let table = NailTable::circular(canvas.size(), config.nail_count, verboser)?;
        let pool = if config.threads > 1 {
            Some(ThreadPoolBuilder::new().num_threads(config.threads).build()?)
        } else {
            None
        };
        debug!(
            "{} nails on a {}px canvas, {} candidates per nail, {} iterations on {} thread(s)",
            table.len(),
            canvas.size(),
            distancer.distance(),
            config.iterations,
            config.threads,
        );
        Ok(Self {
            table,
            distancer,
            canvas,
            rasterizer,
            pool,
            iterations: config.iterations,
            steps: Vec::with_capacity(config.iterations),
            line_color: config.line_color,
            line_thickness: config.line_thickness,
        })
    }

    pub fn state(&self) -> State {
        match self.steps.len() {
            0 => State::Idle,
            done if done < self.iterations => State::Running,
            _ => State::Done,
        }
    }

    /// Nail the next chord starts from.
    pub fn current_nail(&self) -> usize {
        self.steps.last().map_or(0, |chord| chord.to)
    }

    /// Darkest chord from the current nail, without touching the canvas.
    pub fn select(&self) -> Result<Selection, Error> {
        let from = self.current_nail();
        let selector = Selector::new(&self.table, self.distancer, &self.rasterizer);
        match &self.pool {
            Some(pool) => pool.install(|| selector.par_darkest(from, &self.canvas)),
            None => selector.darkest(from, &self.canvas),
        }
    }

    /// Winds one more chord. Returns `None` once every iteration is done.
    pub fn step(&mut self) -> Result<Option<&Chord>, Error> {
        if self.state() == State::Done {
            return Ok(None);
        }
        let selection = self.select()?;
        self.canvas.consume(&selection.mask);
        let chord = Chord {
            from: selection.from,
            from_position: self.table[selection.from],
            to: selection.to,
            to_position: selection.position,
        };
        trace!(
            "chord {}: {} -> {} (brightness {:.2})",
            self.steps.len() + 1,
            chord.from,
            chord.to,
            selection.brightness
        );
        self.steps.push(chord);
        Ok(self.steps.last())
    }

    /// Runs every remaining iteration.
    pub fn compute(mut self, verboser: &mut impl Verboser) -> Result<Computation, Error> {
        self.run(verboser, || true)?;
        Ok(self.into_computation())
    }

    /// Runs iterations until done or until `deadline` passes, checked
    /// between iterations. The chords wound so far are kept either way.
    pub fn compute_until(
        mut self,
        deadline: Instant,
        verboser: &mut impl Verboser,
    ) -> Result<Computation, Error> {
        self.run(verboser, || Instant::now() < deadline)?;
        Ok(self.into_computation())
    }

    fn run(
        &mut self,
        verboser: &mut impl Verboser,
        mut keep_going: impl FnMut() -> bool,
    ) -> Result<(), Error> {
        verboser.verbose(Message::Computing {
            done: self.steps.len(),
            total: self.iterations,
            chord: self.steps.last(),
        });
        while self.state() != State::Done && keep_going() {
            self.step()?;
            verboser.verbose(Message::Computing {
                done: self.steps.len(),
                total: self.iterations,
                chord: self.steps.last(),
            });
        }
        Ok(())
    }

    pub fn table(&self) -> &NailTable {
        &self.table
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn steps(&self) -> &[Chord] {
        &self.steps
    }

    pub fn into_computation(self) -> Computation {
        Computation {
            table: self.table,
            steps: self.steps,
            reference: self.canvas.into_reference(),
            line_color: self.line_color,
            line_thickness: self.line_thickness,
        }
    }
}

/// Finished (or interrupted) run: the chords in winding order and the
/// untouched reference grid.
pub struct Computation {
    table: NailTable,
    steps: Vec<Chord>,
    reference: PixelData<u8>,
    line_color: LineColor,
    line_thickness: u32,
}

impl Computation {
    pub fn steps(&self) -> &[Chord] {
        &self.steps
    }

    pub fn table(&self) -> &NailTable {
        &self.table
    }

    pub fn reference(&self) -> &PixelData<u8> {
        &self.reference
    }

    pub fn into_steps(self) -> Vec<Chord> {
        self.steps
    }

    /// One line per chord, numbered from 1.
    pub fn build_instructions(&self) -> String {
        self.steps
            .iter()
            .enumerate()
            .map(|(idx, chord)| {
                format!("string {} // start: {}, end: {}\n", idx + 1, chord.from, chord.to)
            })
            .collect()
    }

    pub fn build_svg(&self, stroke_width: f32) -> svg::Document {
        let size = self.reference.width as f32;
        let shade = self.line_color.value();
        let mut doc = svg::Document::new()
            .set("viewBox", (0.0, 0.0, size, size))
            .add(
                svg::node::element::Rectangle::new()
                    .set("width", size)
                    .set("height", size)
                    .set("fill", "white"),
            );
        for step in self.steps.iter() {
            doc = doc.add(
                svg::node::element::Line::new()
                    .set("x1", step.from_position.x as f32)
                    .set("y1", step.from_position.y as f32)
                    .set("x2", step.to_position.x as f32)
                    .set("y2", step.to_position.y as f32)
                    .set("stroke", format!("rgb({shade}, {shade}, {shade})"))
                    .set("stroke-width", format!("{:.4}", stroke_width * self.line_thickness as f32))
                    .set("opacity", 0.8),
            );
        }
        for nail in self.table.nails() {
            doc = doc.add(
                svg::node::element::Circle::new()
                    .set("cx", nail.x as f32)
                    .set("cy", nail.y as f32)
                    .set("r", (size / 400.0).max(0.5))
                    .set("fill", "black"),
            );
        }
        doc
    }

    /// Chords drawn one pixel wide over a white canvas.
    pub fn build_image(&self) -> GrayImage {
        let size = self.reference.width as u32;
        let mut image = GrayImage::from_pixel(size, size, Luma([WHITE]));
        let pixel = Luma([self.line_color.value()]);
        for step in self.steps.iter() {
            for point in step.segment().as_::<isize>().points_between() {
                if let Some(point) = point.cast::<u32>() {
                    if point.x < size && point.y < size {
                        image.put_pixel(point.x, point.y, pixel);
                    }
                }
            }
        }
        image
    }

    /// Reference grid on the left, [`Computation::build_image`] on the right.
    pub fn build_comparison(&self) -> GrayImage {
        let size = self.reference.width as u32;
        let mut image = GrayImage::from_pixel(2 * size, size, Luma([WHITE]));
        imageops::replace(&mut image, &GrayImage::from(&self.reference), 0, 0);
        imageops::replace(&mut image, &self.build_image(), size as i64, 0);
        image
    }

    pub fn save_instructions(&self, path: impl AsRef<Path>) -> io::Result<()> {
        fs::write(path, self.build_instructions())
    }

    pub fn save_svg(&self, path: impl AsRef<Path>, stroke_width: f32) -> io::Result<()> {
        svg::save(path, &self.build_svg(stroke_width))
    }

    pub fn save_image(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        self.build_comparison().save(path)
    }
}

/// Broad category of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Geometry,
    EmptyMask,
    Input,
    Runtime,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] config::Error),
    #[error(transparent)]
    NailTable(#[from] nail_table::Error),
    #[error(transparent)]
    Raster(#[from] raster::Error),
    #[error(transparent)]
    Canvas(#[from] canvas::Error),
    #[error(transparent)]
    Image(#[from] image::Error),
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) | Self::Raster(raster::Error::ZeroThickness) => ErrorKind::Configuration,
            Self::NailTable(_) | Self::Raster(_) => ErrorKind::Geometry,
            Self::Canvas(canvas::Error::EmptyMask) => ErrorKind::EmptyMask,
            Self::Canvas(_) | Self::Image(_) => ErrorKind::Input,
            Self::ThreadPool(_) => ErrorKind::Runtime,
        }
    }
}
