//! Assigns each sampled bead its nearest palette color

use crate::{color, Bead, Palette, Sample};

/// Map samples onto `palette`, numbering the beads from 1 in input order
///
/// Each bead takes the palette index closest to its sampled color,
/// with the lowest index winning ties.
#[must_use]
pub fn map_to_palette(samples: &[Sample], palette: &Palette) -> Vec<Bead> {
	samples
		.iter()
		.zip(1..)
		.map(|(sample, number)| Bead {
			position: sample.position,
			number,
			color_index: color::nearest(sample.color, palette.colors()),
		})
		.collect()
}
