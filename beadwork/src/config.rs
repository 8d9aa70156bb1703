//! Options for generating a pattern

use crate::{ConfigError, GridSize, Point, QuantizeOptions};
use std::fmt::{self, Display};

/// Which bead layouts to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
	/// Concentric rings around the start point
	#[default]
	Radial,
	/// A uniform grid of rows and columns
	Rectangular,
	/// Rings followed by a grid, sharing one palette
	Both,
}

impl Layout {
	/// Whether the layout includes rings
	#[must_use]
	pub const fn has_rings(self) -> bool {
		matches!(self, Self::Radial | Self::Both)
	}

	/// Whether the layout includes a grid
	#[must_use]
	pub const fn has_grid(self) -> bool {
		matches!(self, Self::Rectangular | Self::Both)
	}
}

impl Display for Layout {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(match self {
			Self::Radial => "radial",
			Self::Rectangular => "rectangular",
			Self::Both => "radial and rectangular",
		})
	}
}

/// Everything that controls a generation pass
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
	/// Maximum number of palette colors
	pub color_count: u8,
	/// Minimum distance between palette colors, as a percentage of the largest RGB distance
	pub color_diversity: u8,
	/// Whether `color_diversity` is applied
	pub diversity_enabled: bool,
	/// Whether to reduce colors at all
	///
	/// When off, every distinct sampled color becomes a palette entry.
	pub limit_colors: bool,
	/// Distance between neighboring beads, in pixels
	pub bead_spacing: f32,
	/// Center of the rings, required by the radial layouts
	pub start_point: Option<Point>,
	/// The layouts to generate
	pub layout: Layout,
	/// Explicit grid dimensions, otherwise derived from `bead_spacing`
	pub grid_size: Option<GridSize>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			color_count: 10,
			color_diversity: 30,
			diversity_enabled: true,
			limit_colors: true,
			bead_spacing: 20.0,
			start_point: None,
			layout: Layout::Radial,
			grid_size: None,
		}
	}
}

impl Config {
	/// Check that the options describe a pattern that can be generated
	///
	/// # Errors
	/// Returns the first problem found.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if !(self.bead_spacing.is_finite() && self.bead_spacing > 0.0) {
			return Err(ConfigError::InvalidSpacing(self.bead_spacing));
		}
		if self.color_count == 0 {
			return Err(ConfigError::ZeroColorCount);
		}
		if self.color_diversity > 100 {
			return Err(ConfigError::DiversityOutOfRange(self.color_diversity));
		}
		if self.layout.has_rings() {
			match self.start_point {
				None => return Err(ConfigError::MissingStartPoint),
				Some(point) if !(point.x.is_finite() && point.y.is_finite()) => {
					return Err(ConfigError::InvalidStartPoint(point));
				}
				Some(_) => (),
			}
		}
		if matches!(self.grid_size, Some(size) if size.cells() == 0) {
			return Err(ConfigError::EmptyGrid);
		}
		Ok(())
	}

	/// The grid used for an image of the given size
	#[must_use]
	pub fn grid_size_for(&self, width: u32, height: u32) -> GridSize {
		self.grid_size
			.unwrap_or_else(|| GridSize::from_spacing(width, height, self.bead_spacing))
	}

	/// The quantizer settings taken from this config
	#[must_use]
	pub const fn quantize_options(&self) -> QuantizeOptions {
		QuantizeOptions {
			k: self.color_count,
			diversity: self.color_diversity,
			diversity_enabled: self.diversity_enabled,
			limit_colors: self.limit_colors,
		}
	}
}
