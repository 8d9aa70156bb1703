//! Generates bead positions for the radial and rectangular layouts

use std::{
	f32::consts::TAU,
	sync::atomic::{AtomicBool, Ordering},
};

/// The minimum number of beads placed on a ring
const MIN_RING_BEADS: u32 = 6;

/// A real-valued position in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
	/// Pixels from the left edge
	pub x: f32,
	/// Pixels from the top edge
	pub y: f32,
}

impl Point {
	/// Create a new point
	#[must_use]
	pub const fn new(x: f32, y: f32) -> Self {
		Self { x, y }
	}

	/// Euclidean distance to another point
	#[must_use]
	pub fn distance(self, other: Self) -> f32 {
		(self.x - other.x).hypot(self.y - other.y)
	}
}

/// Layout-specific address of a bead
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
	/// A bead on a ring around the start point
	Radial {
		/// Ring number, with `0` being the center bead
		ring: u32,
		/// Position around the ring, counted from angle `0`
		index: u32,
		/// Angle in radians
		angle: f32,
		/// Distance from the center in pixels
		radius: f32,
	},
	/// A bead in a cell of the rectangular grid
	Grid {
		/// Zero-based row
		row: u32,
		/// Zero-based column
		col: u32,
	},
}

/// Where a bead sits, both in pixel space and in its layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeadPosition {
	/// Location in the source image
	pub point: Point,
	/// Ring or grid address
	pub placement: Placement,
}

impl BeadPosition {
	/// The ring/position or row/column pair, usable as a key for connecting neighboring beads
	#[must_use]
	pub const fn key(&self) -> (u32, u32) {
		match self.placement {
			Placement::Radial { ring, index, .. } => (ring, index),
			Placement::Grid { row, col } => (row, col),
		}
	}

	/// Angle around the center, or `0` for grid beads
	#[must_use]
	pub const fn angle(&self) -> f32 {
		match self.placement {
			Placement::Radial { angle, .. } => angle,
			Placement::Grid { .. } => 0.0,
		}
	}

	/// Distance from the center, or `0` for grid beads
	#[must_use]
	pub const fn radius(&self) -> f32 {
		match self.placement {
			Placement::Radial { radius, .. } => radius,
			Placement::Grid { .. } => 0.0,
		}
	}

	/// Whether this bead belongs to the rectangular grid
	#[must_use]
	pub const fn is_grid(&self) -> bool {
		matches!(self.placement, Placement::Grid { .. })
	}
}

/// Number of beads across and down a rectangular grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
	/// Beads per row
	pub columns: u32,
	/// Beads per column
	pub rows: u32,
}

impl GridSize {
	/// Create a new grid size
	#[must_use]
	pub const fn new(columns: u32, rows: u32) -> Self {
		Self { columns, rows }
	}

	/// The largest grid whose cells are at least `spacing` pixels wide and tall, and at least 1x1
	#[must_use]
	pub fn from_spacing(width: u32, height: u32, spacing: f32) -> Self {
		// floor of a non-negative value, saturating on overflow
		#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
		let cells = |len: u32| ((len as f32 / spacing).floor() as u32).max(1);
		Self { columns: cells(width), rows: cells(height) }
	}

	/// Total number of cells
	#[must_use]
	pub const fn cells(self) -> u64 {
		self.columns as u64 * self.rows as u64
	}
}

/// Whether `point` lies within `[0, width) x [0, height)`
fn in_bounds(point: Point, width: f32, height: f32) -> bool {
	(0.0..width).contains(&point.x) && (0.0..height).contains(&point.y)
}

/// Concentric rings of beads around `center`, spaced `spacing` pixels apart
///
/// Ring `n` has radius `n * spacing` and holds `max(6, floor(2 pi r / spacing))` evenly spaced beads,
/// of which only those inside the image are kept.
/// Ring numbers advance even when a whole ring falls outside the image,
/// so rings near the corners can be sparse or missing.
/// The center bead is always included, even if `center` lies outside the image.
/// `center` must be finite.
///
/// Returns `None` if `cancel` is set before the walk finishes.
/// It is checked once per ring.
#[must_use]
pub fn radial(center: Point, width: u32, height: u32, spacing: f32, cancel: &AtomicBool) -> Option<Vec<BeadPosition>> {
	debug_assert!(spacing > 0.0);
	debug_assert!(center.x.is_finite() && center.y.is_finite());

	#[allow(clippy::cast_precision_loss)]
	let (w, h) = (width as f32, height as f32);

	let max_radius = [Point::new(0.0, 0.0), Point::new(w, 0.0), Point::new(0.0, h), Point::new(w, h)]
		.into_iter()
		.map(|corner| center.distance(corner))
		.fold(0.0, f32::max);

	// rings with a smaller radius than this miss the image entirely
	let min_radius = (-center.x)
		.max(center.x - w)
		.max(0.0)
		.hypot((-center.y).max(center.y - h).max(0.0));

	#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
	let first_ring = ((min_radius / spacing).floor() as u32).max(1);

	let mut positions = vec![BeadPosition {
		point: center,
		placement: Placement::Radial { ring: 0, index: 0, angle: 0.0, radius: 0.0 },
	}];

	for ring in first_ring.. {
		#[allow(clippy::cast_precision_loss)]
		let radius = spacing * ring as f32;
		if radius > max_radius {
			break;
		}

		if cancel.load(Ordering::Relaxed) {
			return None;
		}

		#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
		let beads = ((TAU * radius / spacing).floor() as u32).max(MIN_RING_BEADS);

		for index in 0..beads {
			#[allow(clippy::cast_precision_loss)]
			let angle = index as f32 / beads as f32 * TAU;
			let point = Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin());
			if in_bounds(point, w, h) {
				positions.push(BeadPosition {
					point,
					placement: Placement::Radial { ring, index, angle, radius },
				});
			}
		}
	}

	Some(positions)
}

/// One bead at the center of every cell of a `size` grid stretched over the image, in row-major order
///
/// Returns `None` if `cancel` is set before the walk finishes.
/// It is checked once per row.
#[must_use]
pub fn rectangular(size: GridSize, width: u32, height: u32, cancel: &AtomicBool) -> Option<Vec<BeadPosition>> {
	debug_assert!(size.columns > 0 && size.rows > 0);

	#[allow(clippy::cast_precision_loss)]
	let (step_x, step_y) = (width as f32 / size.columns as f32, height as f32 / size.rows as f32);

	let mut positions = Vec::with_capacity(usize::try_from(size.cells()).unwrap_or(0));
	for row in 0..size.rows {
		if cancel.load(Ordering::Relaxed) {
			return None;
		}

		for col in 0..size.columns {
			#[allow(clippy::cast_precision_loss)]
			let point = Point::new(col as f32 * step_x + step_x / 2.0, row as f32 * step_y + step_y / 2.0);
			positions.push(BeadPosition { point, placement: Placement::Grid { row, col } });
		}
	}

	Some(positions)
}
