//! Turn an image into a numbered bead pattern with a small palette.
//!
//! Beads are placed in concentric rings around a start point, in a rectangular grid, or both.
//! The image color under each bead is sampled and the samples are reduced to a palette with k-means.
//! Every bead is then given the palette color nearest to its sample.
//!
//! # Examples
//!
//! ## Generate rings around the middle of an image.
//!
//! ```no_run
//! use beadwork::{Config, PixelBuffer, Point};
//!
//! let image = image::open("some image").unwrap().into_rgba8();
//! let pixels = PixelBuffer::try_from(image).unwrap();
//!
//! let (width, height) = pixels.dimensions();
//! let config = Config {
//! 	start_point: Some(Point::new(width as f32 / 2.0, height as f32 / 2.0)),
//! 	..Config::default()
//! };
//!
//! let pattern = beadwork::generate(&pixels, &config, 0).unwrap();
//! for bead in pattern.beads() {
//! 	println!("{} {:?}", bead.number, pattern.color_of(bead));
//! }
//! ```
//!
//! ## Edit the palette of a generated pattern.
//!
//! ```
//! use beadwork::{Config, GridSize, Layout, PixelBuffer, Session, Srgb};
//! use rand::SeedableRng;
//! use std::sync::atomic::AtomicBool;
//!
//! let pixels = PixelBuffer::from_fn(40, 40, |x, y| Srgb::new(x as u8 * 6, y as u8 * 6, 100)).unwrap();
//! let config = Config {
//! 	layout: Layout::Rectangular,
//! 	grid_size: Some(GridSize::new(8, 8)),
//! 	color_count: 4,
//! 	..Config::default()
//! };
//!
//! let mut session = Session::new(pixels);
//! let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(42);
//! session.generate(&config, &mut rng, &AtomicBool::new(false)).unwrap();
//!
//! session.add_colors([Srgb::new(255, 255, 255)]).unwrap();
//! session.apply_palette().unwrap();
//! session.delete_color(0).unwrap();
//! ```
//!
//! # Options
//!
//! All options live in [`Config`], which is checked by [`Config::validate`] before any work is done.
//!
//! ## Bead Spacing
//!
//! The distance between neighboring beads, in image pixels.
//! Rings are this far apart, and each ring holds about as many beads as fit around it at this spacing.
//! Without an explicit [`GridSize`], the rectangular grid also uses this as its cell size.
//!
//! ## Color Count
//!
//! The maximum number of palette colors.
//! Fewer colors are returned if the sampled colors form fewer clusters.
//!
//! With `limit_colors` off, the color count is ignored
//! and every distinct sampled color becomes a palette entry.
//!
//! ## Color Diversity
//!
//! The minimum distance between palette colors, as a percentage of the largest possible RGB distance.
//!
//! When enabled, k-means produces up to three times as many clusters as needed,
//! and the palette is chosen from the largest clusters that are far enough apart.
//! This brings out small but distinct details, like the eyes in a portrait.
//! If too few clusters are far enough apart, the largest remaining clusters fill the palette.
//!
//! ## Seed
//!
//! The initial k-means centroids are drawn at random,
//! so the palette depends on the random source.
//! [`generate`] seeds it from a `u64`, and [`generate_with`] accepts any [`rand::Rng`].

#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::cargo)]
#![warn(clippy::use_debug, clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
#![warn(clippy::unwrap_used, clippy::unwrap_in_result)]
#![warn(clippy::unneeded_field_pattern, clippy::rest_pat_in_fully_bound_structs)]
#![warn(clippy::unnecessary_self_imports)]
#![warn(clippy::str_to_string, clippy::string_to_string, clippy::string_slice)]
#![warn(missing_docs, clippy::missing_docs_in_private_items, rustdoc::all)]
#![warn(clippy::float_cmp_const, clippy::lossy_float_literal)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::enum_glob_use)]
#![allow(clippy::unreadable_literal)]

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::sync::atomic::{AtomicBool, Ordering};

pub mod color;
mod config;
mod display;
mod edit;
mod error;
pub mod grid;
mod map;
mod pattern;
mod pick;
mod pixels;
mod quantize;
mod sample;
mod session;

pub use config::{Config, Layout};
pub use display::{DisplayTransform, Rect};
pub use error::{ConfigError, Error};
pub use grid::{BeadPosition, GridSize, Placement, Point};
pub use map::map_to_palette;
pub use palette::Srgb;
pub use pattern::{Bead, Palette, Pattern, MIN_PALETTE_LEN};
pub use pick::{area_colors, pick_color};
pub use pixels::PixelBuffer;
pub use quantize::{quantize, select_diverse, ColorCounts, QuantizeOptions};
pub use sample::{sample, Sample};
pub use session::Session;

/// Generate a pattern, seeding the random source from `seed`
///
/// The same pixels, config, and seed always give the same pattern.
///
/// # Errors
/// Returns [`Error::InvalidConfiguration`] if `config` is invalid.
pub fn generate(pixels: &PixelBuffer, config: &Config, seed: u64) -> Result<Pattern, Error> {
	let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
	match generate_with(pixels, config, &mut rng, &AtomicBool::new(false))? {
		Some(pattern) => Ok(pattern),
		None => unreachable!("a generation without a set cancel flag always completes"),
	}
}

/// Generate a pattern using `rng` for the initial k-means centroids
///
/// `cancel` is checked once per ring or grid row and once more before beads are assigned colors.
/// If it is set, the work done so far is discarded and `Ok(None)` is returned.
///
/// # Errors
/// Returns [`Error::InvalidConfiguration`] if `config` is invalid.
pub fn generate_with(
	pixels: &PixelBuffer,
	config: &Config,
	rng: &mut impl Rng,
	cancel: &AtomicBool,
) -> Result<Option<Pattern>, Error> {
	config.validate()?;

	let (width, height) = pixels.dimensions();
	let mut positions = Vec::new();

	if config.layout.has_rings() {
		let center = config.start_point.ok_or(ConfigError::MissingStartPoint)?;
		let Some(rings) = grid::radial(center, width, height, config.bead_spacing, cancel) else {
			return Ok(None);
		};
		positions.extend(rings);
	}

	if config.layout.has_grid() {
		let size = config.grid_size_for(width, height);
		let Some(cells) = grid::rectangular(size, width, height, cancel) else {
			return Ok(None);
		};
		positions.extend(cells);
	}

	let samples = sample(pixels, positions);
	let colors = samples.iter().map(|sample| sample.color).collect::<Vec<_>>();
	let palette = quantize(&colors, config.quantize_options(), rng);

	if cancel.load(Ordering::Relaxed) {
		return Ok(None);
	}

	let beads = map_to_palette(&samples, &palette);

	log::info!(
		"generated {} {} beads with {} colors from a {width}x{height} image",
		beads.len(),
		config.layout,
		palette.len()
	);

	Ok(Some(Pattern::new(beads, palette)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
	use super::*;

	const RED: Srgb<u8> = Srgb::new(255, 0, 0);

	fn solid_red() -> PixelBuffer {
		PixelBuffer::from_fn(100, 100, |_, _| RED).unwrap()
	}

	#[allow(clippy::cast_possible_truncation)]
	fn gradient() -> PixelBuffer {
		PixelBuffer::from_fn(120, 80, |x, y| Srgb::new((x * 2) as u8, (y * 3) as u8, ((x + y) / 2) as u8)).unwrap()
	}

	#[test]
	fn solid_image_gives_one_color() {
		let config = Config {
			color_count: 1,
			layout: Layout::Rectangular,
			grid_size: Some(GridSize::new(10, 10)),
			..Config::default()
		};
		let pattern = generate(&solid_red(), &config, 0).unwrap();

		assert_eq!(pattern.len(), 100);
		assert_eq!(pattern.palette().colors(), &[RED]);
		assert_eq!(pattern.palette().counts(), &[100]);
		assert!(pattern.beads().iter().all(|bead| bead.color_index == 0));
		assert_eq!(pattern.beads().iter().map(|bead| bead.number).collect::<Vec<_>>(), (1..=100).collect::<Vec<_>>());
	}

	#[test]
	fn two_color_palette_cannot_shrink() {
		let pixels = PixelBuffer::from_fn(100, 100, |x, _| if x < 50 { RED } else { Srgb::new(0, 0, 255) }).unwrap();
		let config = Config {
			color_count: 2,
			layout: Layout::Rectangular,
			grid_size: Some(GridSize::new(10, 10)),
			..Config::default()
		};
		let mut pattern = generate(&pixels, &config, 0).unwrap();
		assert_eq!(pattern.palette().len(), 2);

		let before = pattern.clone();
		assert_eq!(pattern.delete_color(1, &pixels), Err(Error::TooFewColors));
		assert_eq!(pattern, before);
	}

	#[test]
	fn invalid_config_is_rejected() {
		let config = Config { start_point: None, layout: Layout::Both, ..Config::default() };
		assert_eq!(
			generate(&solid_red(), &config, 0),
			Err(Error::InvalidConfiguration(ConfigError::MissingStartPoint))
		);

		let config = Config { start_point: Some(Point::new(f32::INFINITY, 10.0)), ..Config::default() };
		assert!(matches!(
			generate(&solid_red(), &config, 0),
			Err(Error::InvalidConfiguration(ConfigError::InvalidStartPoint(_)))
		));

		let config = Config { bead_spacing: 0.0, layout: Layout::Rectangular, ..Config::default() };
		assert!(matches!(
			generate(&solid_red(), &config, 0),
			Err(Error::InvalidConfiguration(ConfigError::InvalidSpacing(_)))
		));
	}

	#[test]
	fn same_seed_same_pattern() {
		let config = Config { start_point: Some(Point::new(60.0, 40.0)), bead_spacing: 6.0, ..Config::default() };
		let pixels = gradient();
		assert_eq!(generate(&pixels, &config, 123).unwrap(), generate(&pixels, &config, 123).unwrap());
	}

	#[test]
	fn both_layouts_share_one_palette() {
		let pixels = gradient();
		let rings = Config {
			color_count: 5,
			start_point: Some(Point::new(30.0, 30.0)),
			bead_spacing: 10.0,
			..Config::default()
		};
		let grid = Config { layout: Layout::Rectangular, ..rings.clone() };
		let both = Config { layout: Layout::Both, ..rings.clone() };

		let num_rings = generate(&pixels, &rings, 1).unwrap().len();
		let num_grid = generate(&pixels, &grid, 1).unwrap().len();
		let pattern = generate(&pixels, &both, 1).unwrap();

		assert_eq!(num_grid, 12 * 8);
		assert_eq!(pattern.len(), num_rings + num_grid);
		assert!(pattern.palette().len() <= 5);

		// rings first, then the grid, numbered straight through
		let split = pattern.beads().iter().position(|bead| bead.position.is_grid()).unwrap();
		assert_eq!(split, num_rings);
		assert!(pattern.beads()[split..].iter().all(|bead| bead.position.is_grid()));
		assert!(pattern.beads().iter().zip(1..).all(|(bead, n)| bead.number == n));
	}

	#[test]
	fn radial_center_is_first_bead() {
		let config = Config { start_point: Some(Point::new(-5.0, 20.0)), bead_spacing: 10.0, ..Config::default() };
		let pattern = generate(&gradient(), &config, 0).unwrap();

		let first = pattern.beads()[0];
		assert_eq!(first.number, 1);
		assert_eq!(first.position.point, Point::new(-5.0, 20.0));
		assert_eq!(first.position.key(), (0, 0));
		assert!(pattern.palette().len() <= 10);
	}

	#[test]
	fn cancelled_generation_returns_nothing() {
		let config = Config { start_point: Some(Point::new(50.0, 50.0)), ..Config::default() };
		let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
		assert_eq!(generate_with(&solid_red(), &config, &mut rng, &AtomicBool::new(true)), Ok(None));
	}
}
