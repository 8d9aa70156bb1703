use beadwork::{Config, GridSize, Layout, PixelBuffer, Point, QuantizeOptions, Srgb};
use criterion::{
	black_box, criterion_group, criterion_main, measurement::WallTime, BenchmarkGroup, BenchmarkId, Criterion,
	SamplingMode,
};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::{sync::atomic::AtomicBool, time::Duration};

const SIZES: [(u32, u32); 3] = [(480, 270), (1920, 1080), (3840, 2160)];

/// A smooth gradient with a few hard-edged blocks, so quantization has both
fn synthetic_image(width: u32, height: u32) -> PixelBuffer {
	PixelBuffer::from_fn(width, height, |x, y| {
		if (x / 64 + y / 64) % 7 == 0 {
			Srgb::new(20, 200, 40)
		} else {
			let r = (x * 255 / width) as u8;
			let g = (y * 255 / height) as u8;
			Srgb::new(r, g, r / 2 + g / 2)
		}
	})
	.expect("non-empty image")
}

fn create_group<'a>(c: &'a mut Criterion, name: &'a str) -> BenchmarkGroup<'a, WallTime> {
	let mut group = c.benchmark_group(name);
	group
		.sample_size(30)
		.noise_threshold(0.05)
		.sampling_mode(SamplingMode::Flat)
		.warm_up_time(Duration::from_millis(500));
	group
}

fn center(width: u32, height: u32) -> Point {
	Point::new(width as f32 / 2.0, height as f32 / 2.0)
}

fn grids(c: &mut Criterion) {
	let mut group = create_group(c, "grid");
	let cancel = AtomicBool::new(false);

	for (width, height) in SIZES {
		let id = format!("{width}x{height}");

		group.bench_function(BenchmarkId::new("radial", &id), |b| {
			b.iter(|| beadwork::grid::radial(center(width, height), width, height, black_box(8.0), &cancel));
		});

		group.bench_function(BenchmarkId::new("rectangular", &id), |b| {
			let size = GridSize::from_spacing(width, height, 8.0);
			b.iter(|| beadwork::grid::rectangular(black_box(size), width, height, &cancel));
		});
	}
}

fn quantize(c: &mut Criterion) {
	let mut group = create_group(c, "quantize");
	group.measurement_time(Duration::from_secs(2));

	let (width, height) = SIZES[1];
	let pixels = synthetic_image(width, height);
	let positions = beadwork::grid::rectangular(
		GridSize::from_spacing(width, height, 8.0),
		width,
		height,
		&AtomicBool::new(false),
	)
	.expect("not cancelled");
	let colors = beadwork::sample(&pixels, positions)
		.into_iter()
		.map(|sample| sample.color)
		.collect::<Vec<_>>();

	fn bench(name: &str, group: &mut BenchmarkGroup<WallTime>, colors: &[Srgb<u8>], options: QuantizeOptions) {
		group.bench_with_input(BenchmarkId::from_parameter(name), colors, |b, colors| {
			b.iter(|| beadwork::quantize(colors, black_box(options), &mut Xoshiro256PlusPlus::seed_from_u64(0)));
		});
	}

	let options = QuantizeOptions { k: 10, diversity: 30, diversity_enabled: true, limit_colors: true };
	bench("default", &mut group, &colors, options);
	bench("no diversity", &mut group, &colors, QuantizeOptions { diversity_enabled: false, ..options });
	bench("high k", &mut group, &colors, QuantizeOptions { k: 40, ..options });
	bench("all colors", &mut group, &colors, QuantizeOptions { limit_colors: false, ..options });
}

fn generate(c: &mut Criterion) {
	let mut group = create_group(c, "generate");
	group.measurement_time(Duration::from_secs(4));

	for (width, height) in SIZES {
		let pixels = synthetic_image(width, height);
		let config = Config {
			start_point: Some(center(width, height)),
			bead_spacing: 12.0,
			layout: Layout::Both,
			..Config::default()
		};

		group.bench_with_input(BenchmarkId::from_parameter(format!("{width}x{height}")), &pixels, |b, pixels| {
			b.iter(|| beadwork::generate(pixels, &config, black_box(0)));
		});
	}
}

criterion_group!(benches, grids, quantize, generate);
criterion_main!(benches);
