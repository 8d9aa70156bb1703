//! Specifies the CLI and handles arg parsing

use beadwork::{GridSize, Point, Rect, Srgb};
use clap::{Parser, ValueEnum};
use std::{
	fmt::{Debug, Display},
	num::ParseFloatError,
	ops::{Bound, RangeBounds},
	path::PathBuf,
	str::FromStr,
};

/// Supported output formats for the palette colors
#[derive(Copy, Clone, ValueEnum)]
pub enum FormatOutput {
	/// sRGB hexcode
	Hex,
	/// sRGB (r,g,b) triple
	Rgb,
	/// Whitespace with true color background
	Swatch,
}

/// Ways to colorize the output text
#[derive(Copy, Clone, ValueEnum)]
pub enum ColorizeOutput {
	/// Foreground
	Fg,
	/// Background
	Bg,
}

/// Bead layouts
#[derive(Copy, Clone, ValueEnum)]
pub enum LayoutArg {
	/// Concentric rings around the start point
	Radial,
	/// Rows and columns covering the whole image
	Rectangular,
	/// Rings followed by the rectangular grid
	Both,
}

impl From<LayoutArg> for beadwork::Layout {
	fn from(layout: LayoutArg) -> Self {
		match layout {
			LayoutArg::Radial => Self::Radial,
			LayoutArg::Rectangular => Self::Rectangular,
			LayoutArg::Both => Self::Both,
		}
	}
}

/// A `--replace` edit
#[derive(Debug, Clone, Copy)]
pub struct Replacement {
	/// 1-based palette number
	pub number: usize,
	/// The new color
	pub color: Srgb<u8>,
}

/// An `--exclude` edit
#[derive(Debug, Clone, Copy)]
pub struct Exclusion {
	/// 1-based palette number
	pub number: usize,
	/// Region in display coordinates
	pub region: Rect,
}

/// Generate a numbered bead pattern from an image.
///
/// Beads are laid out in rings around a start point, in a rectangular grid, or both,
/// and the colors under them are reduced to a small palette with k-means.
///
/// Palette edits are applied in this order: --replace, --add, --exclude, and then --delete.
/// Palette numbers start at 1 and always refer to the palette as printed without edits,
/// except that colors added with --add are numbered after the generated colors.
#[allow(clippy::struct_excessive_bools)]
#[derive(Parser)]
#[command(version)]
pub struct Options {
	/// The path to the input image
	pub image: PathBuf,

	/// The format to print the colors in
	#[arg(short, long, default_value = "hex")]
	pub output: FormatOutput,

	/// Color the foreground or background for each printed color
	#[arg(short, long)]
	pub colorize: Option<ColorizeOutput>,

	/// Print every bead: its number, layout position, pixel position, and palette number
	#[arg(long)]
	pub beads: bool,

	/// The maximum number of palette colors
	#[arg(short, default_value_t = 10, value_parser = clap::value_parser!(u8).range(1..))]
	pub k: u8,

	/// The minimum distance between palette colors, as a percentage of the largest RGB distance
	///
	/// Higher values bring out small, distinct details at the cost of the most common shades.
	#[arg(short, long, default_value_t = 30, value_parser = clap::value_parser!(u8).range(0..=100))]
	pub diversity: u8,

	/// Pick the largest color clusters without regard for their distance from each other
	#[arg(long)]
	pub no_diversity: bool,

	/// Keep every distinct sampled color instead of reducing them to k colors
	#[arg(long)]
	pub all_colors: bool,

	/// The distance between neighboring beads, in pixels
	#[arg(short, long, default_value_t = 20.0, value_parser = parse_valid_spacing)]
	pub spacing: f32,

	/// The center of the rings as X,Y in pixels, which defaults to the middle of the image
	#[arg(long, allow_hyphen_values = true, value_parser = parse_point)]
	pub start: Option<Point>,

	/// Which bead layouts to generate
	#[arg(short, long, default_value = "radial")]
	pub layout: LayoutArg,

	/// The rectangular grid size as COLUMNSxROWS, which defaults to one cell per spacing
	#[arg(short, long, value_parser = parse_grid_size)]
	pub grid: Option<GridSize>,

	/// Added to each RGB channel before sampling, in [-255, 255]
	#[arg(long, default_value_t = 0.0, allow_negative_numbers = true, value_parser = parse_valid_brightness)]
	pub brightness: f32,

	/// Contrast adjustment applied before sampling, in (-100, 100)
	#[arg(long, default_value_t = 0.0, allow_negative_numbers = true, value_parser = parse_valid_contrast)]
	pub contrast: f32,

	/// Replace a palette color, given as NUMBER=HEX
	#[arg(long, value_parser = parse_replacement)]
	pub replace: Vec<Replacement>,

	/// Add a color given as HEX to the palette
	#[arg(long, value_parser = parse_color)]
	pub add: Vec<Srgb<u8>>,

	/// Recolor the beads of a palette color inside a region, given as NUMBER@X,Y,WIDTH,HEIGHT
	///
	/// The region is in display coordinates, see --display-scale.
	#[arg(long, value_parser = parse_exclusion)]
	pub exclude: Vec<Exclusion>,

	/// The scale the pattern is drawn at, used to place --exclude regions
	///
	/// The drawing leaves a margin of three bead spacings above and to the left of the pattern.
	#[arg(long, default_value_t = 1.0, value_parser = parse_valid_scale)]
	pub display_scale: f32,

	/// Delete a palette color, recoloring its beads with the nearest remaining color
	#[arg(long, value_parser = parse_number)]
	pub delete: Vec<usize>,

	/// The seed value used for the random number generator
	#[arg(long, default_value_t = 0)]
	pub seed: u64,

	/// The number of threads to use
	///
	/// A value of 0 indicates to automatically choose the number of threads.
	#[cfg(feature = "threads")]
	#[arg(short, long, default_value_t = 0)]
	pub threads: u8,

	/// Print additional information, such as step timings and the number of beads
	#[arg(long)]
	pub verbose: bool,
}

/// Parse a float value and ensure it in the provided, valid range
fn parse_float_in_range<T>(s: &str, range: impl RangeBounds<T> + Debug) -> Result<T, String>
where
	T: FromStr<Err = ParseFloatError> + Display + PartialOrd,
{
	let value: T = s.parse().map_err(|e| format!("{e}"))?;
	if range.contains(&value) {
		Ok(value)
	} else {
		Err(format!("{value} is not in {range:?}"))
	}
}

/// A range bounded by exclusive ends
fn open_range(min: f32, max: f32) -> (Bound<f32>, Bound<f32>) {
	(Bound::Excluded(min), Bound::Excluded(max))
}

/// Parse a bead spacing and ensure it is positive and finite
fn parse_valid_spacing(s: &str) -> Result<f32, String> {
	parse_float_in_range(s, open_range(0.0, f32::INFINITY))
}

/// Parse a display scale and ensure it is positive and finite
fn parse_valid_scale(s: &str) -> Result<f32, String> {
	parse_float_in_range(s, open_range(0.0, f32::INFINITY))
}

/// Parse a brightness offset and ensure it is in `-255.0..=255.0`
fn parse_valid_brightness(s: &str) -> Result<f32, String> {
	parse_float_in_range(s, -255.0..=255.0)
}

/// Parse a contrast percentage and ensure it is strictly between `-100.0` and `100.0`
fn parse_valid_contrast(s: &str) -> Result<f32, String> {
	parse_float_in_range(s, open_range(-100.0, 100.0))
}

/// Split `s` on `delimiter` into exactly `N` parts
fn split_n<'a, const N: usize>(s: &'a str, delimiter: char, expected: &str) -> Result<[&'a str; N], String> {
	let parts = s.split(delimiter).map(str::trim).collect::<Vec<_>>();
	parts
		.try_into()
		.map_err(|_| format!("expected {expected}, got '{s}'"))
}

/// Parse a finite coordinate
fn parse_coordinate(s: &str) -> Result<f32, String> {
	parse_float_in_range(s, f32::MIN..=f32::MAX)
}

/// Parse an `X,Y` point
fn parse_point(s: &str) -> Result<Point, String> {
	let [x, y] = split_n(s, ',', "X,Y")?;
	Ok(Point::new(parse_coordinate(x)?, parse_coordinate(y)?))
}

/// Parse a `COLUMNSxROWS` grid size with at least one row and column
fn parse_grid_size(s: &str) -> Result<GridSize, String> {
	let [columns, rows] = split_n(s, 'x', "COLUMNSxROWS")?;
	let parse = |n: &str| match n.parse::<u32>() {
		Ok(0) => Err("the grid needs at least one row and column".to_owned()),
		Ok(n) => Ok(n),
		Err(e) => Err(format!("{e}")),
	};
	Ok(GridSize::new(parse(columns)?, parse(rows)?))
}

/// Parse a hex color, with or without a leading `#`
fn parse_color(s: &str) -> Result<Srgb<u8>, String> {
	s.trim().parse().map_err(|e| format!("invalid color '{s}': {e}"))
}

/// Parse a 1-based palette number
fn parse_number(s: &str) -> Result<usize, String> {
	match s.parse::<usize>() {
		Ok(0) => Err("palette numbers start at 1".to_owned()),
		Ok(n) => Ok(n),
		Err(e) => Err(format!("{e}")),
	}
}

/// Parse a `NUMBER=HEX` replacement
fn parse_replacement(s: &str) -> Result<Replacement, String> {
	let [number, color] = split_n(s, '=', "NUMBER=HEX")?;
	Ok(Replacement { number: parse_number(number)?, color: parse_color(color)? })
}

/// Parse a `NUMBER@X,Y,WIDTH,HEIGHT` exclusion
fn parse_exclusion(s: &str) -> Result<Exclusion, String> {
	let [number, region] = split_n(s, '@', "NUMBER@X,Y,WIDTH,HEIGHT")?;
	let [x, y, width, height] = split_n(region, ',', "X,Y,WIDTH,HEIGHT")?;
	let length = |n: &str| parse_float_in_range(n, 0.0..=f32::MAX);
	Ok(Exclusion {
		number: parse_number(number)?,
		region: Rect { x: parse_coordinate(x)?, y: parse_coordinate(y)?, width: length(width)?, height: length(height)? },
	})
}
