//! Brightness and contrast adjustment applied to the image before sampling

use image::RgbaImage;

/// The channel value that contrast scales away from
const MID: f32 = 128.0;

/// The scale factor for a contrast percentage in `(-100, 100)`
fn contrast_factor(contrast: f32) -> f32 {
	(1.0 + contrast / 100.0) / (1.0 - contrast / 100.0)
}

/// Whether the adjustment would leave every pixel unchanged
#[allow(clippy::float_cmp)]
pub fn is_identity(brightness: f32, contrast: f32) -> bool {
	brightness == 0.0 && contrast == 0.0
}

/// Return a copy of `image` with contrast and then brightness applied to each RGB channel
///
/// Alpha is left as is.
pub fn adjusted(image: &RgbaImage, brightness: f32, contrast: f32) -> RgbaImage {
	debug_assert!(contrast > -100.0 && contrast < 100.0);

	let factor = contrast_factor(contrast);

	// clamped to the u8 range before the cast
	#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
	let adjust = |value: u8| (factor * (f32::from(value) - MID) + MID + brightness).clamp(0.0, 255.0).round() as u8;

	let mut image = image.clone();
	for pixel in image.pixels_mut() {
		let [r, g, b, _] = &mut pixel.0;
		for channel in [r, g, b] {
			*channel = adjust(*channel);
		}
	}
	image
}
