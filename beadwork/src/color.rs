//! Color difference in 8-bit RGB space
//!
//! Nearest-color lookups and k-means compare squared distances.
//! Only diversity thresholds use the square root,
//! since they are given as a fraction of the largest possible linear distance.

use palette::Srgb;

/// The linear distance between black and white, `sqrt(3 * 255^2)`
pub const MAX_DISTANCE: f32 = 441.67;

/// Squared euclidean distance between two colors
#[must_use]
pub fn squared_distance(x: Srgb<u8>, y: Srgb<u8>) -> u32 {
	let d = |a: u8, b: u8| u32::from(a.abs_diff(b)).pow(2);
	d(x.red, y.red) + d(x.green, y.green) + d(x.blue, y.blue)
}

/// Euclidean distance between two colors
#[must_use]
pub fn distance(x: Srgb<u8>, y: Srgb<u8>) -> f32 {
	// at most 3 * 255^2, which f32 represents exactly
	#[allow(clippy::cast_precision_loss)]
	(squared_distance(x, y) as f32).sqrt()
}

/// The minimum distance between selected colors for a diversity percentage in `0..=100`
#[must_use]
pub fn diversity_threshold(percent: u8) -> f32 {
	f32::from(percent) / 100.0 * MAX_DISTANCE
}

/// Index of the closest color in `palette`, preferring the lowest index on ties
///
/// Returns `0` for an empty palette.
#[must_use]
pub fn nearest(color: Srgb<u8>, palette: &[Srgb<u8>]) -> usize {
	let mut min_dist = u32::MAX;
	let mut nearest = 0;
	for (i, &candidate) in palette.iter().enumerate() {
		let dist = squared_distance(color, candidate);
		if dist < min_dist {
			min_dist = dist;
			nearest = i;
		}
	}
	nearest
}

/// Index of the closest color in `palette` other than `excluded`
///
/// Returns `None` if `excluded` is the only entry.
#[must_use]
pub fn nearest_excluding(color: Srgb<u8>, palette: &[Srgb<u8>], excluded: usize) -> Option<usize> {
	palette
		.iter()
		.enumerate()
		.filter(|&(i, _)| i != excluded)
		// min_by_key keeps the first of equal elements
		.min_by_key(|&(_, &candidate)| squared_distance(color, candidate))
		.map(|(i, _)| i)
}
