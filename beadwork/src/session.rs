//! Owns the source image and the last generated pattern between edits

use crate::{generate_with, Config, DisplayTransform, Error, Pattern, PixelBuffer, Rect};
use palette::Srgb;
use rand::Rng;
use std::sync::atomic::AtomicBool;

/// A source image together with the most recent pattern generated from it
///
/// A pattern is only replaced once a new generation completes,
/// so a cancelled run leaves the previous pattern untouched.
#[derive(Debug, Clone)]
pub struct Session {
	/// The image every bead is sampled from
	pixels: PixelBuffer,
	/// The config that produced `pattern`
	config: Option<Config>,
	/// The last completed pattern
	pattern: Option<Pattern>,
}

impl Session {
	/// Start a session for an image, with no pattern yet
	#[must_use]
	pub fn new(pixels: PixelBuffer) -> Self {
		Self { pixels, config: None, pattern: None }
	}

	/// The source image
	#[must_use]
	pub fn pixels(&self) -> &PixelBuffer {
		&self.pixels
	}

	/// The config of the current pattern
	#[must_use]
	pub fn config(&self) -> Option<&Config> {
		self.config.as_ref()
	}

	/// The current pattern
	#[must_use]
	pub fn pattern(&self) -> Option<&Pattern> {
		self.pattern.as_ref()
	}

	/// Generate a new pattern, replacing the current one if the run completes
	///
	/// Returns `Ok(None)` if `cancel` was set during the run.
	///
	/// # Errors
	/// Returns [`Error::InvalidConfiguration`] if `config` is invalid,
	/// in which case the current pattern is kept.
	pub fn generate(
		&mut self,
		config: &Config,
		rng: &mut impl Rng,
		cancel: &AtomicBool,
	) -> Result<Option<&Pattern>, Error> {
		let Some(pattern) = generate_with(&self.pixels, config, rng, cancel)? else {
			return Ok(None);
		};

		self.config = Some(config.clone());
		Ok(Some(&*self.pattern.insert(pattern)))
	}

	/// The current pattern, for editing
	fn pattern_mut(&mut self) -> Result<&mut Pattern, Error> {
		self.pattern.as_mut().ok_or(Error::NoPattern)
	}

	/// See [`Pattern::apply_palette`]
	///
	/// # Errors
	/// Returns [`Error::NoPattern`] if nothing has been generated.
	pub fn apply_palette(&mut self) -> Result<(), Error> {
		let pixels = &self.pixels;
		self.pattern.as_mut().ok_or(Error::NoPattern)?.apply_palette(pixels);
		Ok(())
	}

	/// See [`Pattern::delete_color`]
	///
	/// # Errors
	/// Returns [`Error::NoPattern`] if nothing has been generated,
	/// or [`Error::TooFewColors`] if the palette is too small.
	///
	/// # Panics
	/// Panics if `index` is not a palette index.
	pub fn delete_color(&mut self, index: usize) -> Result<usize, Error> {
		let pixels = &self.pixels;
		self.pattern.as_mut().ok_or(Error::NoPattern)?.delete_color(index, pixels)
	}

	/// See [`Pattern::exclude_in_region`], drawn with [`Session::display_transform`]
	///
	/// # Errors
	/// Returns [`Error::NoPattern`] if nothing has been generated.
	pub fn exclude_in_region(&mut self, color_index: usize, region: Rect, scale: f32) -> Result<usize, Error> {
		let transform = self.display_transform(scale)?;
		let pixels = &self.pixels;
		Ok(self
			.pattern
			.as_mut()
			.ok_or(Error::NoPattern)?
			.exclude_in_region(color_index, region, transform, pixels))
	}

	/// See [`Pattern::replace_color`]
	///
	/// # Errors
	/// Returns [`Error::NoPattern`] if nothing has been generated.
	///
	/// # Panics
	/// Panics if `index` is not a palette index.
	pub fn replace_color(&mut self, index: usize, color: Srgb<u8>) -> Result<(), Error> {
		self.pattern_mut()?.replace_color(index, color);
		Ok(())
	}

	/// See [`Pattern::add_colors`]
	///
	/// # Errors
	/// Returns [`Error::NoPattern`] if nothing has been generated.
	pub fn add_colors(&mut self, colors: impl IntoIterator<Item = Srgb<u8>>) -> Result<usize, Error> {
		Ok(self.pattern_mut()?.add_colors(colors))
	}

	/// The transform used to draw the current pattern at `scale`
	///
	/// # Errors
	/// Returns [`Error::NoPattern`] if nothing has been generated.
	pub fn display_transform(&self, scale: f32) -> Result<DisplayTransform, Error> {
		match (&self.pattern, &self.config) {
			(Some(pattern), Some(config)) => Ok(DisplayTransform::fit(pattern, config.bead_spacing, scale)),
			_ => Err(Error::NoPattern),
		}
	}
}
