//! Picking colors from the source image to add to a palette

use crate::{
	color::diversity_threshold,
	quantize::{select_diverse, ColorCounts},
	PixelBuffer, Rect,
};
use image::GenericImageView;
use palette::Srgb;

/// The color of the pixel at `(x, y)`, or `None` outside the image
#[must_use]
pub fn pick_color(pixels: &PixelBuffer, x: u32, y: u32) -> Option<Srgb<u8>> {
	(x < pixels.width() && y < pixels.height()).then(|| pixels.color_at(x, y))
}

/// Clip `area` to whole pixels inside a `width` by `height` image,
/// returning the top-left pixel and the size
fn clip(area: Rect, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
	// float to int casts saturate, so negative edges become 0
	#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
	let span = |start: f32, len: f32, max: u32| {
		let lo = (start.floor() as u32).min(max);
		let hi = ((start + len).ceil() as u32).min(max);
		(lo, hi.saturating_sub(lo))
	};

	if area.is_empty() {
		return None;
	}

	let (x, w) = span(area.x, area.width, width);
	let (y, h) = span(area.y, area.height, height);
	(w > 0 && h > 0).then_some((x, y, w, h))
}

/// Up to `limit` representative colors from `area` of the image
///
/// The exact colors in the area are ranked by how often they occur,
/// and then picked so that each is at least `diversity` percent of the largest RGB distance
/// away from the colors already picked.
/// If that leaves fewer than `limit` colors, the most frequent of the rest fill the gap.
///
/// `area` is in pixel coordinates and is clipped to the image.
#[must_use]
pub fn area_colors(pixels: &PixelBuffer, area: Rect, limit: usize, diversity: u8) -> Vec<Srgb<u8>> {
	let Some((x, y, w, h)) = clip(area, pixels.width(), pixels.height()) else {
		return Vec::new();
	};

	let view = pixels.image().view(x, y, w, h);
	let counts = ColorCounts::new(view.pixels().map(|(_, _, p)| {
		let [r, g, b, _] = p.0;
		Srgb::new(r, g, b)
	}));

	let selected = select_diverse(&counts.by_frequency(), limit, diversity_threshold(diversity));
	log::debug!(
		"picked {} of {} distinct colors from a {w}x{h} area",
		selected.len(),
		counts.num_colors()
	);

	selected.into_iter().map(|(color, _)| color).collect()
}
