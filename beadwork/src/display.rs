//! Geometry shared with whatever draws a pattern, used to map on-screen selections back to beads

use crate::{Pattern, Point};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
	/// Left edge
	pub x: f32,
	/// Top edge
	pub y: f32,
	/// Width, never negative
	pub width: f32,
	/// Height, never negative
	pub height: f32,
}

impl Rect {
	/// The rectangle spanned by two opposite corners given in any order, such as the ends of a drag
	#[must_use]
	pub fn from_corners(a: Point, b: Point) -> Self {
		Self {
			x: a.x.min(b.x),
			y: a.y.min(b.y),
			width: (a.x - b.x).abs(),
			height: (a.y - b.y).abs(),
		}
	}

	/// Whether `point` lies inside or on the edge of the rectangle
	#[must_use]
	pub fn contains(&self, point: Point) -> bool {
		point.x >= self.x && point.x <= self.x + self.width && point.y >= self.y && point.y <= self.y + self.height
	}

	/// Whether the rectangle covers no area
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.width <= 0.0 || self.height <= 0.0
	}
}

/// Maps pixel-space bead positions to display space by scaling and then shifting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayTransform {
	/// Display units per image pixel
	pub scale: f32,
	/// Shift applied after scaling
	pub offset: Point,
}

impl DisplayTransform {
	/// Display coordinates equal pixel coordinates
	pub const IDENTITY: Self = Self { scale: 1.0, offset: Point::new(0.0, 0.0) };

	/// Padding around a drawn pattern, in display bead sizes
	pub const PADDING_BEADS: f32 = 3.0;

	/// Create a new transform
	#[must_use]
	pub const fn new(scale: f32, offset: Point) -> Self {
		Self { scale, offset }
	}

	/// The transform used to draw `pattern` at `scale`,
	/// which leaves a margin of three bead sizes above and left of the top-left-most bead
	#[must_use]
	pub fn fit(pattern: &Pattern, bead_spacing: f32, scale: f32) -> Self {
		let padding = bead_spacing * scale * Self::PADDING_BEADS;
		let min = pattern.bounds().map_or(Point::default(), |(min, _)| min);
		Self { scale, offset: Point::new(padding - min.x * scale, padding - min.y * scale) }
	}

	/// Map a pixel-space point to display space
	#[must_use]
	pub fn apply(&self, point: Point) -> Point {
		Point::new(point.x * self.scale + self.offset.x, point.y * self.scale + self.offset.y)
	}

	/// The display size needed to draw `pattern` with this transform, including the margin on all sides
	#[must_use]
	pub fn canvas_size(&self, pattern: &Pattern, bead_spacing: f32) -> (u32, u32) {
		let padding = bead_spacing * self.scale * Self::PADDING_BEADS;
		let (min, max) = pattern.bounds().unwrap_or_default();
		// ceil of a non-negative value
		#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
		let size = |extent: f32| ((extent * self.scale).ceil() + 2.0 * padding).ceil() as u32;
		(size(max.x - min.x), size(max.y - min.y))
	}
}

impl Default for DisplayTransform {
	fn default() -> Self {
		Self::IDENTITY
	}
}
