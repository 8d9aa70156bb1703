//! Generate a numbered bead pattern from an image and print its palette.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
	clippy::pedantic,
	clippy::cargo,
	clippy::use_debug,
	clippy::dbg_macro,
	clippy::todo,
	clippy::unimplemented,
	clippy::unwrap_used,
	clippy::unwrap_in_result,
	clippy::unneeded_field_pattern,
	clippy::rest_pat_in_fully_bound_structs,
	clippy::unnecessary_self_imports,
	clippy::str_to_string,
	clippy::string_to_string,
	clippy::string_slice,
	missing_docs,
	clippy::missing_docs_in_private_items,
	rustdoc::all,
	clippy::float_cmp_const,
	clippy::lossy_float_literal
)]
#![allow(
	clippy::doc_markdown,
	clippy::module_name_repetitions,
	clippy::many_single_char_names,
	clippy::missing_panics_doc,
	clippy::unreadable_literal
)]

mod cli;
mod filter;

#[allow(clippy::wildcard_imports)]
use cli::*;

use anyhow::{bail, Context, Result};
use beadwork::{Config, Pattern, PixelBuffer, Placement, Point, Session, Srgb};
use clap::Parser;
use colored::Colorize;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::{process::ExitCode, sync::atomic::AtomicBool, time::Instant};

/// Record the running time of a function and print the elapsed time
macro_rules! time {
	($name: literal, $verbose: expr, $func_call: expr) => {{
		let start = Instant::now();
		let result = $func_call;
		if $verbose {
			println!("{} took {}ms", $name, start.elapsed().as_millis());
		}
		result
	}};
}

fn main() -> ExitCode {
	let options = Options::parse();

	let result = run_generate_and_print_pattern(&options);

	// Returning Result<_> uses Debug printing instead of Display
	if let Err(e) = result {
		eprintln!("{e:#}");
		ExitCode::FAILURE
	} else {
		ExitCode::SUCCESS
	}
}

/// Builds a thread pool and then runs `generate_and_print_pattern`
#[cfg(feature = "threads")]
fn run_generate_and_print_pattern(options: &Options) -> Result<()> {
	let pool = rayon::ThreadPoolBuilder::new()
		.num_threads(usize::from(options.threads))
		.build()
		.context("failed to initialize the thread pool")?;

	pool.install(|| generate_and_print_pattern(options))
}

/// Runs `generate_and_print_pattern` on a single thread
#[cfg(not(feature = "threads"))]
fn run_generate_and_print_pattern(options: &Options) -> Result<()> {
	generate_and_print_pattern(options)
}

/// Load an image, generate its pattern, apply the palette edits, and print the result
fn generate_and_print_pattern(options: &Options) -> Result<()> {
	let verbose = options.verbose;

	// Input
	let pixels = time!("Image loading", verbose, load_pixels(options))?;
	let config = config(options, &pixels);
	let mut session = Session::new(pixels);

	// Processing
	let mut rng = Xoshiro256PlusPlus::seed_from_u64(options.seed);
	time!(
		"Pattern generation",
		verbose,
		session.generate(&config, &mut rng, &AtomicBool::new(false))
	)
	.context("failed to generate the pattern")?;

	time!("Palette edits", verbose, apply_edits(&mut session, options))?;

	// Output
	let pattern = session.pattern().context("no pattern was generated")?;
	if verbose {
		println!(
			"Placed {} beads using {} colors",
			pattern.len(),
			pattern.palette().len()
		);
	}
	print_pattern(pattern, options);

	Ok(())
}

/// Load and optionally adjust the input image
fn load_pixels(options: &Options) -> Result<PixelBuffer> {
	let image = image::open(&options.image)
		.with_context(|| format!("failed to load the image file {}", options.image.display()))?
		.into_rgba8();

	let image = if filter::is_identity(options.brightness, options.contrast) {
		image
	} else {
		filter::adjusted(&image, options.brightness, options.contrast)
	};

	PixelBuffer::try_from(image).context("the image cannot be used for a pattern")
}

/// Build the generation config, placing the rings at the middle of the image by default
fn config(options: &Options, pixels: &PixelBuffer) -> Config {
	#[allow(clippy::cast_precision_loss)]
	let center = Point::new(pixels.width() as f32 / 2.0, pixels.height() as f32 / 2.0);

	Config {
		color_count: options.k,
		color_diversity: options.diversity,
		diversity_enabled: !options.no_diversity,
		limit_colors: !options.all_colors,
		bead_spacing: options.spacing,
		start_point: Some(options.start.unwrap_or(center)),
		layout: options.layout.into(),
		grid_size: options.grid,
	}
}

/// Convert a 1-based palette number into a palette index
fn palette_index(session: &Session, number: usize) -> Result<usize> {
	let len = session.pattern().map_or(0, |pattern| pattern.palette().len());
	if (1..=len).contains(&number) {
		Ok(number - 1)
	} else {
		bail!("there is no palette color {number}, the palette has {len} colors")
	}
}

/// Apply the palette edits from the command line in a fixed order
fn apply_edits(session: &mut Session, options: &Options) -> Result<()> {
	for replacement in &options.replace {
		let index = palette_index(session, replacement.number)?;
		session.replace_color(index, replacement.color)?;
	}

	let added = session.add_colors(options.add.iter().copied())?;
	if options.verbose && !options.add.is_empty() {
		println!("Added {added} new colors");
	}

	if !options.replace.is_empty() || added > 0 {
		session.apply_palette()?;
	}

	for exclusion in &options.exclude {
		let index = palette_index(session, exclusion.number)?;
		let replaced = session.exclude_in_region(index, exclusion.region, options.display_scale)?;
		if options.verbose {
			println!("Recolored {replaced} beads of color {}", exclusion.number);
		}
	}

	// Highest first, so that each number still refers to the undeleted palette
	let mut deletions = options.delete.clone();
	deletions.sort_unstable_by(|a, b| b.cmp(a));
	deletions.dedup();
	for number in deletions {
		let index = palette_index(session, number)?;
		let recolored = session
			.delete_color(index)
			.with_context(|| format!("failed to delete color {number}"))?;
		if options.verbose {
			println!("Recolored {recolored} beads of deleted color {number}");
		}
	}

	Ok(())
}

/// Print the palette, the number of beads of each color, and optionally every bead
fn print_pattern(pattern: &Pattern, options: &Options) {
	let colors = pattern.palette().colors();
	print_palette(colors, options);

	println!(
		"{}",
		pattern
			.color_counts()
			.iter()
			.map(u32::to_string)
			.collect::<Vec<_>>()
			.join(" ")
	);

	if options.beads {
		for bead in pattern.beads() {
			let position = bead.position;
			let layout = match position.placement {
				Placement::Radial { ring, index, .. } => format!("ring {ring} #{index}"),
				Placement::Grid { row, col } => format!("row {row} col {col}"),
			};
			println!(
				"{} {layout} ({:.1},{:.1}) {}",
				bead.number,
				position.point.x,
				position.point.y,
				bead.color_index + 1
			);
		}
	}
}

/// Print the given colors based off the provided options
fn print_palette(colors: &[Srgb<u8>], options: &Options) {
	match options.output {
		FormatOutput::Hex => color_format_print(colors, options, " ", |color| format!("{color:X}")),

		FormatOutput::Rgb => color_format_print(colors, options, " ", |color| {
			format!("({},{},{})", color.red, color.green, color.blue)
		}),

		FormatOutput::Swatch => print_colors(colors, "", |color| {
			"   ".on_truecolor(color.red, color.green, color.blue).to_string()
		}),
	}
}

/// Print a line of colors using the given format
fn print_colors(colors: &[Srgb<u8>], delimiter: &str, format: impl Fn(Srgb<u8>) -> String) {
	println!(
		"{}",
		colors
			.iter()
			.map(|&color| format(color))
			.collect::<Vec<_>>()
			.join(delimiter)
	);
}

/// Format, colorize, and then print the text for all colors
fn color_format_print(colors: &[Srgb<u8>], options: &Options, delimiter: &str, format: impl Fn(Srgb<u8>) -> String) {
	match options.colorize {
		Some(ColorizeOutput::Fg) => print_colors(colors, delimiter, |color| {
			format(color).truecolor(color.red, color.green, color.blue).to_string()
		}),

		Some(ColorizeOutput::Bg) => print_colors(colors, delimiter, |color| {
			format(color).on_truecolor(color.red, color.green, color.blue).to_string()
		}),

		None => print_colors(colors, delimiter, format),
	}
}
