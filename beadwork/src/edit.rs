//! Palette edits on a generated pattern
//!
//! Every edit that recolors beads samples the original pixels again,
//! so repeated edits never drift away from the source image.

use crate::{color, DisplayTransform, Error, Pattern, PixelBuffer, Rect, MIN_PALETTE_LEN};
use palette::Srgb;

impl Pattern {
	/// Remap every bead to its nearest color in the current palette
	///
	/// Use this after [`Pattern::replace_color`] or [`Pattern::add_colors`].
	/// Applying the same palette twice gives the same beads.
	pub fn apply_palette(&mut self, pixels: &PixelBuffer) {
		let colors = self.palette.colors();
		for bead in &mut self.beads {
			bead.color_index = color::nearest(pixels.sample(bead.position.point), colors);
		}
		log::debug!("remapped {} beads onto {} colors", self.beads.len(), colors.len());
	}

	/// Remove the palette color at `index`
	///
	/// Beads of that color are recolored with the nearest remaining color,
	/// and beads of later colors have their index shifted down.
	/// Returns the number of recolored beads.
	///
	/// # Errors
	/// Returns [`Error::TooFewColors`] and leaves the pattern unchanged
	/// if the palette has [`MIN_PALETTE_LEN`] colors or fewer.
	///
	/// # Panics
	/// Panics if `index` is not a palette index.
	pub fn delete_color(&mut self, index: usize, pixels: &PixelBuffer) -> Result<usize, Error> {
		assert!(
			index < self.palette.len(),
			"palette index {index} is out of range for {} colors",
			self.palette.len()
		);

		if self.palette.len() <= MIN_PALETTE_LEN {
			return Err(Error::TooFewColors);
		}

		let removed = self.palette.remove(index);
		let colors = self.palette.colors();

		let mut recolored = 0;
		for bead in &mut self.beads {
			if bead.color_index == index {
				bead.color_index = color::nearest(pixels.sample(bead.position.point), colors);
				recolored += 1;
			} else if bead.color_index > index {
				bead.color_index -= 1;
			}
		}

		log::debug!("deleted {removed:?}, recoloring {recolored} beads");

		Ok(recolored)
	}

	/// Recolor the beads of `color_index` that lie inside `region`
	///
	/// `region` is given in display coordinates,
	/// and bead positions are mapped through `transform` before the (inclusive) containment test.
	/// Each bead found takes the nearest palette color other than `color_index`.
	///
	/// Returns the number of recolored beads,
	/// which is `0` when no bead qualifies or the palette has no other color.
	pub fn exclude_in_region(
		&mut self,
		color_index: usize,
		region: Rect,
		transform: DisplayTransform,
		pixels: &PixelBuffer,
	) -> usize {
		let colors = self.palette.colors();

		let mut replaced = 0;
		for bead in &mut self.beads {
			if bead.color_index != color_index || !region.contains(transform.apply(bead.position.point)) {
				continue;
			}

			let sampled = pixels.sample(bead.position.point);
			if let Some(nearest) = color::nearest_excluding(sampled, colors, color_index) {
				bead.color_index = nearest;
				replaced += 1;
			}
		}

		log::debug!("excluded palette color {color_index} from {replaced} beads");

		replaced
	}

	/// Overwrite the palette color at `index`
	///
	/// The beads keep their indices until [`Pattern::apply_palette`] is called.
	///
	/// # Panics
	/// Panics if `index` is not a palette index.
	pub fn replace_color(&mut self, index: usize, color: Srgb<u8>) {
		self.palette.set(index, color);
	}

	/// Append the colors not already in the palette, returning how many were added
	///
	/// The beads keep their indices until [`Pattern::apply_palette`] is called.
	pub fn add_colors(&mut self, colors: impl IntoIterator<Item = Srgb<u8>>) -> usize {
		let before = self.palette.len();
		for color in colors {
			if !self.palette.contains(color) {
				self.palette.push(color);
			}
		}
		self.palette.len() - before
	}
}
