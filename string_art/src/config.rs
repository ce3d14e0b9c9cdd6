use serde::{Deserialize, Serialize};

use crate::{
    nail_distancer::{self, NailDistancer},
    raster::Stroke,
};

pub const MIN_NAIL_COUNT: usize = 50;

/// Gray level of the thread in rendered previews.
///
/// Always within `0..=255`: out of range values are clamped when the color
/// is built, including when it is deserialized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct LineColor(u8);

impl LineColor {
    pub const BLACK: Self = Self(0);

    pub fn new(value: i64) -> Self {
        Self(value.clamp(0, u8::MAX as i64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<i64> for LineColor {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<LineColor> for i64 {
    fn from(value: LineColor) -> Self {
        value.0 as i64
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub nail_count: usize,
    pub iterations: usize,
    /// Nails on each side of the current one that can not be linked to it.
    pub nails_to_skip: usize,
    pub line_thickness: u32,
    /// Swap dark and bright when loading the image.
    pub inverted: bool,
    pub line_color: LineColor,
    /// Side length the input is resized to, in pixels.
    pub resolution: Option<u32>,
    /// Worker threads scanning candidates. `1` scans sequentially.
    pub threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nail_count: 250,
            iterations: 1000,
            nails_to_skip: 10,
            line_thickness: 1,
            inverted: false,
            line_color: LineColor::BLACK,
            resolution: None,
            threads: num_cpus::get(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), Error> {
        self.distancer().map(|_| ())
    }

    /// Validates the whole configuration and builds the exclusion band.
    pub fn distancer(&self) -> Result<NailDistancer, Error> {
        if self.nail_count < MIN_NAIL_COUNT {
            return Err(Error::MinNailCount(self.nail_count));
        }
        if self.iterations == 0 {
            return Err(Error::NoIterations);
        }
        if self.line_thickness == 0 {
            return Err(Error::ZeroThickness);
        }
        if self.threads == 0 {
            return Err(Error::NoThreads);
        }
        NailDistancer::new(self.nail_count, self.nails_to_skip).map_err(Error::SkipBand)
    }

    pub fn stroke(&self) -> Result<Stroke, Error> {
        Stroke::from_thickness(self.line_thickness).map_err(|_| Error::ZeroThickness)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Nail count must be at least {min}, got {0}", min = MIN_NAIL_COUNT)]
    MinNailCount(usize),
    #[error("Iteration count must be at least 1")]
    NoIterations,
    #[error("Line thickness must be at least 1")]
    ZeroThickness,
    #[error("Thread count must be at least 1")]
    NoThreads,
    #[error(transparent)]
    SkipBand(nail_distancer::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.nails_to_skip, 10);
        assert_eq!(config.line_thickness, 1);
    }

    #[test]
    fn rejects_too_few_nails() {
        let config = Config {
            nail_count: 49,
            ..Config::default()
        };
        let error = config.validate().unwrap_err();
        assert!(matches!(error, Error::MinNailCount(49)));
        assert_eq!(error.to_string(), "Nail count must be at least 50, got 49");
    }

    #[test]
    fn rejects_bands_without_candidates() {
        let config = Config {
            nail_count: 60,
            nails_to_skip: 30,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::SkipBand(_))));
    }

    #[test]
    fn rejects_empty_runs() {
        let config = Config {
            iterations: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::NoIterations)));
        let config = Config {
            line_thickness: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::ZeroThickness)));
    }

    #[test]
    fn line_color_is_clamped() {
        assert_eq!(LineColor::new(-20).value(), 0);
        assert_eq!(LineColor::new(300).value(), 255);
        assert_eq!(LineColor::new(128).value(), 128);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "nail_count": 120, "line_color": 999 }"#).unwrap();
        assert_eq!(config.nail_count, 120);
        assert_eq!(config.line_color, LineColor::new(255));
        assert_eq!(config.iterations, 1000);
    }
}
