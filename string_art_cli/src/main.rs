use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use string_art::{
    verboser::{Message, Verboser},
    Algorithm, Canvas, Config, LineColor,
};

/// Approximates an image with straight threads wound around nails on a circle.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input file path.
    #[arg()]
    input: PathBuf,

    /// Output folder. Defaults to an `output` folder next to the input.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with a base configuration. Flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of nails surrounding the image (at least 50).
    #[arg(short, long)]
    nails: Option<usize>,

    /// Number of threads to wind.
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Thread thickness in pixels. Values above 1 are noticeably slower.
    #[arg(short, long)]
    line_thickness: Option<u32>,

    /// Nails on each side of the current one that can not be linked to it.
    #[arg(short, long)]
    skip: Option<usize>,

    /// Size in pixels of the square the image is resized to.
    #[arg(short, long)]
    resolution: Option<u32>,

    /// Worker threads scanning candidate chords.
    #[arg(short, long)]
    threads: Option<usize>,

    /// Invert the colors of the image.
    #[arg(long)]
    invert: bool,

    /// Gray level of the thread in the previews, clamped to 0..=255.
    #[arg(long, allow_hyphen_values = true)]
    line_color: Option<i64>,

    /// Stroke width of the threads in the svg preview.
    #[arg(long, default_value_t = 0.5)]
    stroke_width: f32,

    /// Stop winding after this many seconds, keeping the threads found so far.
    #[arg(long)]
    time_limit: Option<u64>,
}

impl Args {
    fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => Config::default(),
        };
        if let Some(nails) = self.nails {
            config.nail_count = nails;
        }
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(thickness) = self.line_thickness {
            config.line_thickness = thickness;
        }
        if let Some(skip) = self.skip {
            config.nails_to_skip = skip;
        }
        if self.resolution.is_some() {
            config.resolution = self.resolution;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if self.invert {
            config.inverted = true;
        }
        if let Some(color) = self.line_color {
            config.line_color = LineColor::new(color);
        }
        Ok(config)
    }

    fn output_folder(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            self.input
                .parent()
                .unwrap_or(Path::new("."))
                .join("output")
        })
    }
}

/// Forwards progress to the logger, with a time estimate once the first
/// thread is wound.
struct Progress {
    start: Instant,
    report_every: usize,
}

impl Progress {
    fn new(iterations: usize) -> Self {
        Self {
            start: Instant::now(),
            report_every: (iterations / 20).max(1),
        }
    }
}

impl Verboser for Progress {
    fn verbose(&mut self, message: Message) {
        match message {
            Message::CreatingNail(idx) => debug!("creating nail {idx}"),
            Message::Computing {
                done: 0, total, ..
            } => {
                self.start = Instant::now();
                info!("winding {total} threads");
            }
            Message::Computing { done, total, chord } => {
                if let Some(chord) = chord {
                    debug!("thread {done}: {} -> {}", chord.from, chord.to);
                }
                if done == 1 {
                    let estimate = self.start.elapsed().mul_f64(total as f64);
                    info!("estimated time: {}s", estimate.as_secs().max(1));
                }
                if done % self.report_every == 0 || done == total {
                    info!("{} iterations left", total - done);
                }
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let started = Instant::now();

    let config = args.config()?;
    config.validate().context("invalid configuration")?;

    let data = string_art::image::open(&args.input, config.resolution, config.inverted)
        .with_context(|| format!("loading {}", args.input.display()))?;
    let canvas = Canvas::new(data).context("preparing the canvas")?;
    info!("image size: {0} x {0}", canvas.size());

    let mut progress = Progress::new(config.iterations);
    let algorithm = Algorithm::new(&config, canvas, &mut progress)?;
    info!("calculated positions of {} nails", algorithm.table().len());
    let computation = match args.time_limit {
        Some(seconds) => {
            algorithm.compute_until(Instant::now() + Duration::from_secs(seconds), &mut progress)?
        }
        None => algorithm.compute(&mut progress)?,
    };
    if computation.steps().len() < config.iterations {
        info!(
            "time limit reached after {} of {} threads",
            computation.steps().len(),
            config.iterations
        );
    }

    let folder = args.output_folder();
    fs::create_dir_all(&folder)
        .with_context(|| format!("creating output folder {}", folder.display()))?;
    let stem = args
        .input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("string_art");

    let instructions = folder.join(format!("{stem}_instructions.txt"));
    computation
        .save_instructions(&instructions)
        .with_context(|| format!("saving {}", instructions.display()))?;
    let svg = folder.join(format!("{stem}.svg"));
    computation
        .save_svg(&svg, args.stroke_width)
        .with_context(|| format!("saving {}", svg.display()))?;
    let png = folder.join(format!("{stem}.png"));
    computation
        .save_image(&png)
        .with_context(|| format!("saving {}", png.display()))?;

    info!("execution time: {}s", started.elapsed().as_secs());
    info!("saved {}, {} and {}", instructions.display(), svg.display(), png.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "string_art",
            "photo.jpg",
            "-n",
            "120",
            "-s",
            "4",
            "--invert",
            "--line-color",
            "-5",
        ]);
        let config = args.config().unwrap();
        assert_eq!(config.nail_count, 120);
        assert_eq!(config.nails_to_skip, 4);
        assert!(config.inverted);
        assert_eq!(config.line_color, LineColor::new(0));
        assert_eq!(config.iterations, Config::default().iterations);
        assert_eq!(args.output_folder(), PathBuf::from("output"));
    }

    #[test]
    fn too_few_nails_are_rejected_before_loading() {
        let args = Args::parse_from(["string_art", "missing.jpg", "-n", "49"]);
        assert!(args.config().unwrap().validate().is_err());
    }
}
