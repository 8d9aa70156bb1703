//! The immutable RGBA image that every bead color is sampled from

use crate::{Error, Point};
use image::{Rgba, RgbaImage};
use palette::Srgb;

/// A rectangular, row-major grid of RGBA pixels with its origin at the top left
///
/// Edits never recolor a bead from its current palette color.
/// They re-sample this buffer, so it must outlive the pattern it produced.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
	/// Backing image with at least one pixel
	image: RgbaImage,
}

impl PixelBuffer {
	/// Wrap raw RGBA bytes, which must hold exactly `width * height * 4` values
	///
	/// # Errors
	/// Returns [`Error::EmptyImage`] if either dimension is zero,
	/// or [`Error::BufferSize`] if `rgba` has the wrong length.
	pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, Error> {
		if width == 0 || height == 0 {
			return Err(Error::EmptyImage);
		}

		let expected = (width as usize) * (height as usize) * 4;
		let actual = rgba.len();
		if actual != expected {
			return Err(Error::BufferSize { width, height, expected, actual });
		}

		RgbaImage::from_raw(width, height, rgba)
			.map(|image| Self { image })
			.ok_or(Error::BufferSize { width, height, expected, actual })
	}

	/// Create a buffer by calling `f` with the coordinates of each pixel
	///
	/// # Errors
	/// Returns [`Error::EmptyImage`] if either dimension is zero.
	pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Srgb<u8>) -> Result<Self, Error> {
		Self::try_from(RgbaImage::from_fn(width, height, |x, y| {
			let color = f(x, y);
			Rgba([color.red, color.green, color.blue, u8::MAX])
		}))
	}

	/// Width in pixels
	#[must_use]
	pub fn width(&self) -> u32 {
		self.image.width()
	}

	/// Height in pixels
	#[must_use]
	pub fn height(&self) -> u32 {
		self.image.height()
	}

	/// `(width, height)` in pixels
	#[must_use]
	pub fn dimensions(&self) -> (u32, u32) {
		self.image.dimensions()
	}

	/// The underlying image
	#[must_use]
	pub fn image(&self) -> &RgbaImage {
		&self.image
	}

	/// The RGB color of a pixel, ignoring alpha
	///
	/// # Panics
	/// Panics if `(x, y)` is outside the image.
	#[must_use]
	pub fn color_at(&self, x: u32, y: u32) -> Srgb<u8> {
		let Rgba([r, g, b, _]) = *self.image.get_pixel(x, y);
		Srgb::new(r, g, b)
	}

	/// The color under a pixel-space point
	///
	/// Coordinates are floored and then clamped into the image,
	/// so points slightly outside the image sample the nearest edge pixel.
	#[must_use]
	pub fn sample(&self, point: Point) -> Srgb<u8> {
		let (x, y) = self.pixel_index(point);
		self.color_at(x, y)
	}

	/// Floor and clamp a point to a valid pixel index
	fn pixel_index(&self, point: Point) -> (u32, u32) {
		// float to int casts saturate, and NaN becomes 0
		#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
		let (x, y) = (point.x.floor() as u32, point.y.floor() as u32);
		(x.min(self.width() - 1), y.min(self.height() - 1))
	}
}

impl TryFrom<RgbaImage> for PixelBuffer {
	type Error = Error;

	fn try_from(image: RgbaImage) -> Result<Self, Self::Error> {
		if image.width() == 0 || image.height() == 0 {
			Err(Error::EmptyImage)
		} else {
			Ok(Self { image })
		}
	}
}
