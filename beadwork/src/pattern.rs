//! The generated pattern: beads and the palette they reference by index

use crate::{BeadPosition, Point};
use palette::Srgb;

/// The smallest palette that deleting a color may leave behind
pub const MIN_PALETTE_LEN: usize = 2;

/// An ordered list of colors, each with the number of samples it represented when it was quantized
///
/// Colors added or replaced after quantization have a count of `0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
	/// Palette colors
	colors: Vec<Srgb<u8>>,
	/// Cluster mass of each color
	counts: Vec<u32>,
}

impl Palette {
	/// Create a palette from colors that did not come from quantization
	#[must_use]
	pub fn new(colors: Vec<Srgb<u8>>) -> Self {
		let counts = vec![0; colors.len()];
		Self { colors, counts }
	}

	/// Create a palette from `(color, count)` pairs
	pub(crate) fn from_pairs(pairs: impl IntoIterator<Item = (Srgb<u8>, u32)>) -> Self {
		let (colors, counts) = pairs.into_iter().unzip();
		Self { colors, counts }
	}

	/// The palette colors
	#[must_use]
	pub fn colors(&self) -> &[Srgb<u8>] {
		&self.colors
	}

	/// The number of samples each color represented when it was quantized
	#[must_use]
	pub fn counts(&self) -> &[u32] {
		&self.counts
	}

	/// The color at `index`, if any
	#[must_use]
	pub fn get(&self, index: usize) -> Option<Srgb<u8>> {
		self.colors.get(index).copied()
	}

	/// Number of colors
	#[must_use]
	pub fn len(&self) -> usize {
		self.colors.len()
	}

	/// Whether the palette has no colors
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	/// Whether the palette already holds this exact color
	#[must_use]
	pub fn contains(&self, color: Srgb<u8>) -> bool {
		self.colors.contains(&color)
	}

	/// `(color, count)` pairs in palette order
	pub fn iter(&self) -> impl Iterator<Item = (Srgb<u8>, u32)> + '_ {
		self.colors.iter().copied().zip(self.counts.iter().copied())
	}

	/// Append a color
	pub(crate) fn push(&mut self, color: Srgb<u8>) {
		self.colors.push(color);
		self.counts.push(0);
	}

	/// Overwrite the color at `index`, resetting its count
	pub(crate) fn set(&mut self, index: usize, color: Srgb<u8>) {
		self.colors[index] = color;
		self.counts[index] = 0;
	}

	/// Remove the color at `index`, shifting later colors down
	pub(crate) fn remove(&mut self, index: usize) -> Srgb<u8> {
		self.counts.remove(index);
		self.colors.remove(index)
	}
}

/// One colored bead of a pattern
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bead {
	/// Where the bead sits
	pub position: BeadPosition,
	/// 1-based order in which the bead was generated
	pub number: u32,
	/// Index into the pattern's palette
	pub color_index: usize,
}

/// Beads and the palette their `color_index` values point into
///
/// The palette lives inside the pattern so that every palette change
/// also remaps or re-derives the bead indices that depend on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
	/// Beads in generation order
	pub(crate) beads: Vec<Bead>,
	/// Colors referenced by the beads
	pub(crate) palette: Palette,
}

impl Pattern {
	/// Bundle beads with the palette they were mapped onto
	pub(crate) fn new(beads: Vec<Bead>, palette: Palette) -> Self {
		debug_assert!(beads.iter().all(|bead| bead.color_index < palette.len()));
		Self { beads, palette }
	}

	/// The beads in generation order
	#[must_use]
	pub fn beads(&self) -> &[Bead] {
		&self.beads
	}

	/// The palette the beads refer to
	#[must_use]
	pub fn palette(&self) -> &Palette {
		&self.palette
	}

	/// Number of beads
	#[must_use]
	pub fn len(&self) -> usize {
		self.beads.len()
	}

	/// Whether the pattern has no beads
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.beads.is_empty()
	}

	/// The color of a bead
	///
	/// # Panics
	/// Panics if the bead does not belong to this pattern's palette.
	#[must_use]
	pub fn color_of(&self, bead: &Bead) -> Srgb<u8> {
		self.palette.colors[bead.color_index]
	}

	/// The number of beads using each palette color
	#[must_use]
	pub fn color_counts(&self) -> Vec<u32> {
		let mut counts = vec![0; self.palette.len()];
		for bead in &self.beads {
			counts[bead.color_index] += 1;
		}
		counts
	}

	/// The top-left and bottom-right corners of the box around all bead positions
	#[must_use]
	pub fn bounds(&self) -> Option<(Point, Point)> {
		let first = self.beads.first()?.position.point;
		Some(self.beads.iter().fold((first, first), |(min, max), bead| {
			let p = bead.position.point;
			(Point::new(min.x.min(p.x), min.y.min(p.y)), Point::new(max.x.max(p.x), max.y.max(p.y)))
		}))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Placement;

	fn bead(x: f32, y: f32, number: u32, color_index: usize) -> Bead {
		Bead {
			position: BeadPosition { point: Point::new(x, y), placement: Placement::Grid { row: 0, col: number } },
			number,
			color_index,
		}
	}

	#[test]
	fn color_counts_tally_each_index() {
		let palette = Palette::new(vec![Srgb::new(0, 0, 0), Srgb::new(9, 9, 9), Srgb::new(255, 255, 255)]);
		let beads = vec![bead(0.0, 0.0, 1, 2), bead(1.0, 0.0, 2, 0), bead(2.0, 0.0, 3, 2)];
		let pattern = Pattern::new(beads, palette);

		assert_eq!(pattern.color_counts(), vec![1, 0, 2]);
		assert_eq!(pattern.color_of(&pattern.beads()[0]), Srgb::new(255, 255, 255));
	}

	#[test]
	fn bounds_cover_all_beads() {
		let palette = Palette::new(vec![Srgb::new(0, 0, 0)]);
		let beads = vec![bead(5.0, 7.0, 1, 0), bead(-2.0, 9.0, 2, 0), bead(3.0, 1.0, 3, 0)];
		let pattern = Pattern::new(beads, palette);

		assert_eq!(pattern.bounds(), Some((Point::new(-2.0, 1.0), Point::new(5.0, 9.0))));
		assert_eq!(Pattern::new(Vec::new(), Palette::default()).bounds(), None);
	}

	#[test]
	fn palette_edits_keep_counts_aligned() {
		let mut palette = Palette::from_pairs([(Srgb::new(1, 1, 1), 5), (Srgb::new(2, 2, 2), 3)]);
		palette.push(Srgb::new(3, 3, 3));
		palette.set(0, Srgb::new(4, 4, 4));
		assert_eq!(palette.remove(1), Srgb::new(2, 2, 2));

		assert_eq!(palette.colors(), &[Srgb::new(4, 4, 4), Srgb::new(3, 3, 3)]);
		assert_eq!(palette.counts(), &[0, 0]);
		assert!(palette.contains(Srgb::new(3, 3, 3)));
	}
}
