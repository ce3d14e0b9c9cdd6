mod common;

use std::collections::BTreeSet;

use common::{config, darken, noise, white};
use string_art::{
    canvas::{Canvas, WHITE},
    config::Error as ConfigError,
    geometry::{Point, Segment},
    raster::{Rasterizer, ThinLine},
    verboser::Silent,
    Algorithm, ErrorKind, NailDistancer, NailTable, Selector, State,
};

fn mean(canvas: &Canvas, points: &[Point<usize>]) -> f64 {
    let sum: u64 = points
        .iter()
        .map(|&point| *canvas.working().get(point).unwrap() as u64)
        .sum();
    sum as f64 / points.len() as f64
}

#[test]
fn single_dark_pixel_attracts_the_first_chord_once() {
    let mut data = white(100);
    darken(&mut data, [Point::new(50, 50)]);
    let canvas = Canvas::new(data).unwrap();
    let mut algorithm = Algorithm::new(&config(50, 3, 10), canvas, &mut Silent).unwrap();

    let first = *algorithm.step().unwrap().unwrap();
    assert_eq!((first.from, first.to), (0, 25));
    assert!(algorithm.canvas().is_consumed(Point::new(50, 50)));

    let distancer = NailDistancer::new(50, 10).unwrap();
    let selector = Selector::new(algorithm.table(), distancer, &ThinLine);
    let again = selector.darkest(0, algorithm.canvas()).unwrap();
    assert_ne!(again.to, 25);
    assert_eq!(again.brightness, WHITE as f64);

    algorithm.step().unwrap();
    algorithm.step().unwrap();
    assert_eq!(algorithm.state(), State::Done);
    assert_eq!(algorithm.steps().len(), 3);
}

#[test]
fn selected_chord_is_never_brighter_than_another_candidate() {
    let canvas = Canvas::new(noise(90, 7)).unwrap();
    let table = NailTable::circular(90, 64, &mut Silent).unwrap();
    let distancer = NailDistancer::new(64, 6).unwrap();
    let selector = Selector::new(&table, distancer, &ThinLine);

    for from in [0, 9, 31, 63] {
        let selection = selector.darkest(from, &canvas).unwrap();
        for to in distancer.candidates(from) {
            let points: Vec<_> = string_art::raster::bresenham(table[from].as_(), table[to].as_())
                .into_iter()
                .filter_map(|point| point.cast::<usize>())
                .filter(|point| point.x < 90 && point.y < 90)
                .collect();
            assert!(selection.brightness <= mean(&canvas, &points));
        }
    }
}

#[test]
fn ties_go_to_the_first_candidate_in_scan_order() {
    let table = NailTable::circular(100, 50, &mut Silent).unwrap();
    let distancer = NailDistancer::new(50, 10).unwrap();
    let grid = string_art::Grid::square(100);

    let mut data = white(100);
    for to in [25, 2] {
        let mask = ThinLine
            .rasterize(Segment::new(table[40], table[to]), grid)
            .unwrap();
        darken(&mut data, mask.points(grid));
    }
    let canvas = Canvas::new(data).unwrap();
    let selector = Selector::new(&table, distancer, &ThinLine);

    assert_eq!(selector.evaluate(40, 2, &canvas).unwrap(), 0.0);
    assert_eq!(selector.evaluate(40, 25, &canvas).unwrap(), 0.0);
    // Scan from nail 40 starts at nail 0 and wraps, reaching 2 before 25.
    assert_eq!(selector.darkest(40, &canvas).unwrap().to, 2);
    assert_eq!(selector.par_darkest(40, &canvas).unwrap().to, 2);
}

#[test]
fn uniform_canvas_ties_resolve_to_the_band_edge() {
    let table = NailTable::circular(100, 50, &mut Silent).unwrap();
    let canvas = Canvas::new(white(100)).unwrap();
    for skip in [0, 1, 10, 24] {
        let distancer = NailDistancer::new(50, skip).unwrap();
        let selector = Selector::new(&table, distancer, &ThinLine);
        assert_eq!(selector.darkest(7, &canvas).unwrap().to, (7 + skip.max(1)) % 50);
    }
}

#[test]
fn working_grid_only_gets_brighter() {
    for thickness in [1, 3] {
        let reference = noise(80, 11);
        let mut run = config(60, 40, 5);
        run.line_thickness = thickness;
        let canvas = Canvas::new(reference.clone()).unwrap();
        let mut algorithm = Algorithm::new(&run, canvas, &mut Silent).unwrap();

        let mut consumed = BTreeSet::new();
        let grid = string_art::Grid::square(80);
        let stroke = run.stroke().unwrap();
        while let Some(chord) = algorithm.step().unwrap().copied() {
            consumed.extend(stroke.rasterize(chord.segment(), grid).unwrap().indexes().to_vec());
        }

        let working = algorithm.canvas().working().pixels();
        assert!(working.iter().zip(reference.pixels()).all(|(w, r)| w >= r));
        assert!(consumed.iter().all(|&index| working[index] == WHITE));
        assert_eq!(algorithm.canvas().reference(), &reference);
    }
}

#[test]
fn endpoints_stay_out_of_the_band() {
    let skip = 12;
    let computation = string_art::compute(&config(75, 60, skip), noise(120, 3), &mut Silent).unwrap();
    assert_eq!(computation.steps().len(), 60);
    let distancer = NailDistancer::new(75, skip).unwrap();
    for chord in computation.steps() {
        assert!(distancer.is_valid(chord.from, chord.to));
        let offset = (chord.to + 75 - chord.from) % 75;
        assert!(offset >= skip && 75 - offset > skip);
    }
}

#[test]
fn run_length_matches_the_configuration() {
    for iterations in [1, 2, 17] {
        let computation =
            string_art::compute(&config(50, iterations, 10), noise(64, 5), &mut Silent).unwrap();
        assert_eq!(computation.steps().len(), iterations);
    }
}

#[test]
fn narrow_bands_run_to_completion() {
    for (size, nails) in [(100, 50), (100, 250), (500, 250), (800, 300)] {
        for skip in [0, 1, 2] {
            let data = string_art::image::PixelData::filled(0u8, string_art::Grid::square(size));
            let computation = string_art::compute(&config(nails, 3, skip), data, &mut Silent)
                .unwrap_or_else(|error| panic!("{size}px, {nails} nails, skip {skip}: {error}"));
            let distancer = NailDistancer::new(nails, skip).unwrap();
            assert_eq!(computation.steps().len(), 3);
            assert!(computation
                .steps()
                .iter()
                .all(|chord| distancer.is_valid(chord.from, chord.to)));
        }
    }
}

#[test]
fn parallel_runs_match_sequential_runs() {
    let sequential = string_art::compute(&config(80, 30, 8), noise(100, 21), &mut Silent).unwrap();
    let mut parallel_config = config(80, 30, 8);
    parallel_config.threads = 4;
    let parallel = string_art::compute(&parallel_config, noise(100, 21), &mut Silent).unwrap();
    assert_eq!(sequential.steps(), parallel.steps());
}

#[test]
fn thick_lines_still_find_the_dark_stripe() {
    let mut data = white(100);
    darken(&mut data, (0..100).map(|x| Point::new(x, 50)));
    let mut run = config(50, 1, 10);
    run.line_thickness = 3;
    let computation = string_art::compute(&run, data, &mut Silent).unwrap();
    assert_eq!(computation.steps()[0].to, 25);
}

#[test]
fn too_few_nails_fail_before_touching_the_grid() {
    // The grid is not even square: only the configuration is looked at.
    let data = string_art::image::PixelData::filled(0u8, string_art::Grid::new(10, 30));
    let error = string_art::compute(&config(49, 3, 10), data, &mut Silent)
        .err()
        .unwrap();
    assert!(matches!(
        error,
        string_art::Error::Config(ConfigError::MinNailCount(49))
    ));
    assert_eq!(error.kind(), ErrorKind::Configuration);
}

#[test]
fn band_without_candidates_is_a_configuration_error() {
    let canvas = Canvas::new(white(100)).unwrap();
    let error = Algorithm::new(&config(50, 3, 25), canvas, &mut Silent)
        .err()
        .unwrap();
    assert!(matches!(
        error,
        string_art::Error::Config(ConfigError::SkipBand(_))
    ));
}
