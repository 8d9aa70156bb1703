//! Reads the image color under each bead position

use crate::{BeadPosition, PixelBuffer};
use palette::Srgb;

/// A bead position together with the image color found there
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
	/// Where the color was read
	pub position: BeadPosition,
	/// The pixel color at that position
	pub color: Srgb<u8>,
}

/// Sample the color under each position, keeping the input order
#[cfg(not(feature = "threads"))]
#[must_use]
pub fn sample(pixels: &PixelBuffer, positions: Vec<BeadPosition>) -> Vec<Sample> {
	positions
		.into_iter()
		.map(|position| Sample { position, color: pixels.sample(position.point) })
		.collect()
}

/// Sample the color under each position, keeping the input order
#[cfg(feature = "threads")]
#[must_use]
pub fn sample(pixels: &PixelBuffer, positions: Vec<BeadPosition>) -> Vec<Sample> {
	use rayon::prelude::*;

	positions
		.into_par_iter()
		.map(|position| Sample { position, color: pixels.sample(position.point) })
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{Placement, Point};

	#[test]
	fn sample_keeps_positions_and_order() {
		#[allow(clippy::cast_possible_truncation)]
		let pixels = PixelBuffer::from_fn(10, 10, |x, y| Srgb::new(x as u8 * 10, y as u8 * 10, 7)).unwrap();

		let positions = vec![
			BeadPosition { point: Point::new(9.5, 0.2), placement: Placement::Grid { row: 0, col: 1 } },
			BeadPosition {
				point: Point::new(3.0, 4.99),
				placement: Placement::Radial { ring: 2, index: 5, angle: 1.0, radius: 2.0 },
			},
		];

		let samples = sample(&pixels, positions.clone());

		assert_eq!(samples.len(), 2);
		assert_eq!(samples[0].position, positions[0]);
		assert_eq!(samples[0].color, Srgb::new(90, 0, 7));
		assert_eq!(samples[1].position, positions[1]);
		assert_eq!(samples[1].color, Srgb::new(30, 40, 7));
	}
}
