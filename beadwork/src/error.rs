//! Error types for pattern generation and editing

use crate::{Point, MIN_PALETTE_LEN};
use thiserror::Error;

/// Reasons a [`Config`](crate::Config) is rejected before any work is done
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
	/// The bead spacing was zero, negative, or not finite
	#[error("bead spacing must be a positive number of pixels, got {0}")]
	InvalidSpacing(f32),
	/// At least one palette color must be requested
	#[error("the color count must be at least 1")]
	ZeroColorCount,
	/// Diversity is a percentage
	#[error("color diversity must be in 0..=100, got {0}")]
	DiversityOutOfRange(u8),
	/// Radial rings need a center
	#[error("the radial layout needs a start point")]
	MissingStartPoint,
	/// The ring center had an infinite or NaN coordinate
	#[error("the start point must have finite coordinates, got ({}, {})", .0.x, .0.y)]
	InvalidStartPoint(Point),
	/// An explicit grid size had zero rows or columns
	#[error("a rectangular grid needs at least one row and one column")]
	EmptyGrid,
}

/// Errors returned by the public operations of this crate
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
	/// The configuration is invalid
	#[error("invalid configuration: {0}")]
	InvalidConfiguration(#[from] ConfigError),
	/// The pixel data does not match the given dimensions
	#[error("a {width}x{height} RGBA buffer needs {expected} bytes, but {actual} were given")]
	BufferSize {
		/// Width in pixels
		width: u32,
		/// Height in pixels
		height: u32,
		/// Required number of bytes
		expected: usize,
		/// Provided number of bytes
		actual: usize,
	},
	/// The image has no pixels to sample
	#[error("the image has no pixels")]
	EmptyImage,
	/// Deleting a color would leave too small a palette
	#[error("the palette must keep at least {MIN_PALETTE_LEN} colors")]
	TooFewColors,
	/// An edit was requested before any pattern was generated
	#[error("no pattern has been generated yet")]
	NoPattern,
}
