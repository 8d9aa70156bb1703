//! Reduces sampled colors to a small palette using k-means and diversity-aware selection

use crate::{
	color::{self, diversity_threshold},
	Palette,
};
use palette::Srgb;
use rand::{seq::SliceRandom, Rng};
use std::{cmp::Reverse, collections::HashMap};

/// Number of k-means iterations, run without a convergence check
const ITERATIONS: u32 = 10;

/// Most candidate clusters to generate when diversity selection is enabled
const MAX_CANDIDATES: u8 = 50;

/// Options for [`quantize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantizeOptions {
	/// Maximum number of palette colors
	pub k: u8,
	/// Diversity percentage in `0..=100`
	pub diversity: u8,
	/// Whether to enforce the diversity threshold between palette colors
	pub diversity_enabled: bool,
	/// Whether to cluster at all, as opposed to keeping every distinct color
	pub limit_colors: bool,
}

impl QuantizeOptions {
	/// Whether diversity selection applies
	const fn diverse(self) -> bool {
		self.diversity_enabled && self.diversity > 0
	}

	/// The number of k-means clusters to run before selecting the final palette
	///
	/// Diversity selection needs spare candidates to choose from.
	/// The count never drops below `k`, even when `3k` exceeds the candidate cap.
	fn candidates(self) -> u8 {
		if self.diverse() {
			u8::max(self.k, self.k.saturating_mul(3).min(MAX_CANDIDATES))
		} else {
			self.k
		}
	}
}

/// Deduplicated colors with the number of samples of each, in order of first appearance
#[derive(Debug, Clone, Default)]
pub struct ColorCounts {
	/// Distinct colors
	colors: Vec<Srgb<u8>>,
	/// Number of samples of each color
	counts: Vec<u32>,
}

impl ColorCounts {
	/// Tally the distinct colors in `colors`
	pub fn new(colors: impl IntoIterator<Item = Srgb<u8>>) -> Self {
		let mut data = Self::default();

		// Packed Srgb -> data index
		let mut memo: HashMap<u32, usize> = HashMap::new();

		for srgb in colors {
			let key = srgb.into_u32::<palette::rgb::channels::Rgba>();
			let index = *memo.entry(key).or_insert_with(|| {
				data.colors.push(srgb);
				data.counts.push(0);
				data.colors.len() - 1
			});

			data.counts[index] += 1;
		}

		data
	}

	/// The distinct colors
	#[must_use]
	pub fn colors(&self) -> &[Srgb<u8>] {
		&self.colors
	}

	/// The number of samples of each distinct color
	#[must_use]
	pub fn counts(&self) -> &[u32] {
		&self.counts
	}

	/// Number of distinct colors
	#[must_use]
	pub fn num_colors(&self) -> usize {
		self.colors.len()
	}

	/// Whether there are no colors at all
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	/// Iterator over each color and its count
	fn pairs(&self) -> impl Iterator<Item = (Srgb<u8>, u32)> + '_ {
		self.colors.iter().copied().zip(self.counts.iter().copied())
	}

	/// `(color, count)` pairs sorted by descending count, ties kept in order of first appearance
	#[must_use]
	pub fn by_frequency(&self) -> Vec<(Srgb<u8>, u32)> {
		let mut pairs = self.pairs().collect::<Vec<_>>();
		pairs.sort_by_key(|&(_, n)| Reverse(n));
		pairs
	}
}

/// Per-cluster sums and counts gathered during one assignment pass
#[derive(Debug, Clone)]
struct Accumulator {
	/// Channel sums of the colors in each cluster
	sum: Vec<[u64; 3]>,
	/// Number of samples in each cluster
	count: Vec<u32>,
}

impl Accumulator {
	/// An empty accumulator for `k` clusters
	fn new(k: usize) -> Self {
		Self { sum: vec![[0; 3]; k], count: vec![0; k] }
	}

	/// Add `n` samples of `color` to cluster `i`
	fn add(&mut self, i: usize, color: Srgb<u8>, n: u32) {
		let n64 = u64::from(n);
		let sum = &mut self.sum[i];
		sum[0] += n64 * u64::from(color.red);
		sum[1] += n64 * u64::from(color.green);
		sum[2] += n64 * u64::from(color.blue);
		self.count[i] += n;
	}

	/// Combine the sums and counts of two accumulators
	#[cfg(feature = "threads")]
	fn merge(mut self, other: Self) -> Self {
		for (sum, other) in self.sum.iter_mut().zip(&other.sum) {
			for (s, o) in sum.iter_mut().zip(other) {
				*s += o;
			}
		}
		for (count, other) in self.count.iter_mut().zip(&other.count) {
			*count += other;
		}
		self
	}

	/// The rounded mean color of cluster `i`, which must be non-empty
	fn mean(&self, i: usize) -> Srgb<u8> {
		let n = u64::from(self.count[i]);
		// rounds halves up, and the mean of u8 values fits in a u8
		#[allow(clippy::cast_possible_truncation)]
		let avg = |sum: u64| ((2 * sum + n) / (2 * n)) as u8;
		let [r, g, b] = self.sum[i];
		Srgb::new(avg(r), avg(g), avg(b))
	}
}

/// Assign each color to its nearest centroid, accumulating cluster sums
#[cfg(not(feature = "threads"))]
fn assign(unique: &ColorCounts, centroids: &[Srgb<u8>]) -> Accumulator {
	unique
		.pairs()
		.fold(Accumulator::new(centroids.len()), |mut acc, (color, n)| {
			acc.add(color::nearest(color, centroids), color, n);
			acc
		})
}

/// Assign each color to its nearest centroid, accumulating cluster sums
#[cfg(feature = "threads")]
fn assign(unique: &ColorCounts, centroids: &[Srgb<u8>]) -> Accumulator {
	use rayon::prelude::*;

	let k = centroids.len();
	unique
		.colors
		.par_iter()
		.with_min_len(unique.num_colors() / rayon::current_num_threads() + 1)
		.zip(&unique.counts)
		.fold_with(Accumulator::new(k), |mut acc, (&color, &n)| {
			acc.add(color::nearest(color, centroids), color, n);
			acc
		})
		.reduce(|| Accumulator::new(k), Accumulator::merge)
}

/// Pick `k` starting centroids from a shuffled copy of the distinct colors
///
/// A color is reused only when there are fewer distinct colors than centroids.
fn initial_centroids(unique: &ColorCounts, k: u8, rng: &mut impl Rng) -> Vec<Srgb<u8>> {
	let mut shuffled = unique.colors.clone();
	shuffled.shuffle(rng);
	(0..usize::from(k)).map(|i| shuffled[i % shuffled.len()]).collect()
}

/// Move `centroids` for a fixed number of iterations, returning the non-empty clusters and their sizes
///
/// A centroid left without members keeps its color and can gain members in a later iteration.
/// Only centroids that are empty after the last iteration are dropped.
fn refine(unique: &ColorCounts, mut centroids: Vec<Srgb<u8>>) -> Vec<(Srgb<u8>, u32)> {
	let mut counts = vec![0; centroids.len()];

	for _ in 0..ITERATIONS {
		let acc = assign(unique, &centroids);
		for (i, centroid) in centroids.iter_mut().enumerate() {
			if acc.count[i] > 0 {
				*centroid = acc.mean(i);
			}
		}
		counts = acc.count;
	}

	centroids
		.into_iter()
		.zip(counts)
		.filter(|&(_, n)| n > 0)
		.collect()
}

/// Run k-means from `k` random starting centroids
fn kmeans(unique: &ColorCounts, k: u8, rng: &mut impl Rng) -> Vec<(Srgb<u8>, u32)> {
	let clusters = refine(unique, initial_centroids(unique, k, rng));

	log::debug!(
		"k-means kept {} of {k} clusters over {} distinct colors",
		clusters.len(),
		unique.num_colors()
	);

	clusters
}

/// Greedily pick up to `k` candidates that are at least `min_distance` apart,
/// then top up with the remaining candidates in order
///
/// Candidates should be sorted by importance, most important first.
/// The result is in selection order.
#[must_use]
pub fn select_diverse(candidates: &[(Srgb<u8>, u32)], k: usize, min_distance: f32) -> Vec<(Srgb<u8>, u32)> {
	let mut selected = Vec::with_capacity(k.min(candidates.len()));
	let mut taken = vec![false; candidates.len()];

	for (i, &(color, _)) in candidates.iter().enumerate() {
		if selected.len() >= k {
			break;
		}

		let diverse = selected
			.iter()
			.all(|&j: &usize| color::distance(color, candidates[j].0) >= min_distance);

		if diverse {
			selected.push(i);
			taken[i] = true;
		}
	}

	for (i, &taken) in taken.iter().enumerate() {
		if selected.len() >= k {
			break;
		}
		if !taken {
			selected.push(i);
		}
	}

	selected.into_iter().map(|i| candidates[i]).collect()
}

/// Reduce `colors` to a palette of at most `options.k` colors
///
/// With `limit_colors` off, every distinct color is kept, most frequent first.
/// Otherwise the colors are clustered with k-means,
/// and the largest clusters become the palette.
/// With diversity enabled, more clusters than needed are generated
/// and the palette favors clusters far apart from each other.
///
/// The initial centroids are drawn from `rng`, so the palette varies between random sources.
#[must_use]
pub fn quantize(colors: &[Srgb<u8>], options: QuantizeOptions, rng: &mut impl Rng) -> Palette {
	let unique = ColorCounts::new(colors.iter().copied());

	if !options.limit_colors {
		return Palette::from_pairs(unique.by_frequency());
	}

	if options.k == 0 || unique.is_empty() {
		return Palette::default();
	}

	let k = usize::from(options.k);
	let mut clusters = kmeans(&unique, options.candidates(), rng);
	clusters.sort_by_key(|&(_, n)| Reverse(n));

	if !options.diverse() || clusters.len() <= k {
		clusters.truncate(k);
		Palette::from_pairs(clusters)
	} else {
		Palette::from_pairs(select_diverse(&clusters, k, diversity_threshold(options.diversity)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand_xoshiro::Xoshiro256PlusPlus;

	const RED: Srgb<u8> = Srgb::new(255, 0, 0);
	const GREEN: Srgb<u8> = Srgb::new(0, 255, 0);
	const BLUE: Srgb<u8> = Srgb::new(0, 0, 255);
	const WHITE: Srgb<u8> = Srgb::new(255, 255, 255);

	fn rng() -> Xoshiro256PlusPlus {
		Xoshiro256PlusPlus::seed_from_u64(0)
	}

	fn options(k: u8, diversity: u8) -> QuantizeOptions {
		QuantizeOptions { k, diversity, diversity_enabled: true, limit_colors: true }
	}

	/// `n` copies of each color
	fn repeated(colors: &[(Srgb<u8>, usize)]) -> Vec<Srgb<u8>> {
		colors.iter().flat_map(|&(color, n)| std::iter::repeat(color).take(n)).collect()
	}

	/// A spread of colors with many distinct values
	fn gradient() -> Vec<Srgb<u8>> {
		let range = (0..u8::MAX).step_by(16);
		let mut colors = Vec::new();
		for r in range.clone() {
			for g in range.clone() {
				for b in range.clone() {
					colors.push(Srgb::new(r, g, b));
				}
			}
		}
		colors
	}

	#[test]
	fn color_counts_merge_duplicates_in_first_seen_order() {
		let counts = ColorCounts::new([GREEN, RED, GREEN, BLUE, GREEN, RED]);

		assert_eq!(counts.colors(), &[GREEN, RED, BLUE]);
		assert_eq!(counts.counts(), &[3, 2, 1]);
		assert_eq!(counts.by_frequency(), vec![(GREEN, 3), (RED, 2), (BLUE, 1)]);
	}

	#[test]
	fn candidates_never_below_k() {
		assert_eq!(options(4, 30).candidates(), 12);
		assert_eq!(options(20, 30).candidates(), 50);
		assert_eq!(options(60, 30).candidates(), 60);
		assert_eq!(options(4, 0).candidates(), 4);
		assert_eq!(QuantizeOptions { diversity_enabled: false, ..options(4, 30) }.candidates(), 4);
	}

	#[test]
	fn unlimited_keeps_every_distinct_color() {
		let colors = repeated(&[(BLUE, 1), (RED, 5), (GREEN, 3), (WHITE, 3)]);
		let palette = quantize(&colors, QuantizeOptions { limit_colors: false, ..options(1, 30) }, &mut rng());

		assert_eq!(palette.colors(), &[RED, GREEN, WHITE, BLUE]);
		assert_eq!(palette.counts(), &[5, 3, 3, 1]);
	}

	#[test]
	fn solid_color_gives_single_entry() {
		let colors = vec![RED; 100];
		let palette = quantize(&colors, options(1, 30), &mut rng());

		assert_eq!(palette.colors(), &[RED]);
		assert_eq!(palette.counts(), &[100]);
	}

	#[test]
	fn empty_centroid_survives_until_the_last_iteration() {
		let gray = |v: u8| Srgb::new(v, v, v);
		let unique = ColorCounts::new([gray(0), gray(40), gray(100)]);

		// First pass: 40 and 100 both go to centroid 0, ties go to the lower index,
		// so centroid 1 is empty but stays at 40 and takes the 40 back in the second pass.
		// Centroid 3 always loses its tie with centroid 2 and is dropped at the end.
		let clusters = refine(&unique, vec![gray(40), gray(40), gray(0), gray(0)]);
		assert_eq!(clusters, vec![(gray(100), 1), (gray(40), 1), (gray(0), 1)]);

		let unique = ColorCounts::new([gray(0), gray(0), gray(40), gray(100)]);
		let clusters = refine(&unique, vec![gray(40), gray(40), gray(0)]);
		assert_eq!(clusters, vec![(gray(100), 1), (gray(40), 1), (gray(0), 2)]);
	}

	#[test]
	fn kmeans_drops_duplicate_seeds() {
		let unique = ColorCounts::new(repeated(&[(RED, 3), (BLUE, 1)]));

		// two distinct colors for three centroids, so one seed is repeated and never wins a color
		let mut clusters = kmeans(&unique, 3, &mut rng());
		clusters.sort_by_key(|&(_, n)| Reverse(n));
		assert_eq!(clusters, vec![(RED, 3), (BLUE, 1)]);
	}

	#[test]
	fn separated_colors_are_recovered_exactly() {
		let colors = repeated(&[(RED, 40), (GREEN, 30), (BLUE, 20), (WHITE, 10)]);

		for seed in 0..8 {
			let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
			let palette = quantize(&colors, QuantizeOptions { diversity_enabled: false, ..options(4, 0) }, &mut rng);

			assert_eq!(palette.colors(), &[RED, GREEN, BLUE, WHITE]);
			assert_eq!(palette.counts(), &[40, 30, 20, 10]);
		}
	}

	#[test]
	fn palette_size_is_bounded_by_k() {
		let colors = gradient();
		for k in [1, 2, 5, 8, 16, 30] {
			for diversity in [0, 10, 50, 100] {
				let palette = quantize(&colors, options(k, diversity), &mut rng());
				assert!(palette.len() <= usize::from(k));
				assert!(!palette.is_empty());
			}
		}
	}

	#[test]
	fn counts_cover_all_samples() {
		let colors = gradient();
		let palette = quantize(&colors, QuantizeOptions { diversity_enabled: false, ..options(64, 0) }, &mut rng());

		let total = palette.counts().iter().map(|&n| n as usize).sum::<usize>();
		assert_eq!(total, colors.len());
	}

	#[test]
	fn counts_are_descending_without_diversity() {
		let colors = gradient();
		let palette = quantize(&colors, options(8, 0), &mut rng());

		assert!(palette.counts().windows(2).all(|w| w[0] >= w[1]));
	}

	#[test]
	fn same_seed_gives_same_palette() {
		let colors = gradient();
		let a = quantize(&colors, options(6, 40), &mut rng());
		let b = quantize(&colors, options(6, 40), &mut rng());
		assert_eq!(a, b);
	}

	#[test]
	fn select_diverse_skips_close_colors_then_fills() {
		let dark_red = Srgb::new(200, 0, 0);
		let candidates = [(RED, 10), (dark_red, 9), (BLUE, 5)];

		let selected = select_diverse(&candidates, 3, 100.0);
		assert_eq!(selected, vec![(RED, 10), (BLUE, 5), (dark_red, 9)]);

		let selected = select_diverse(&candidates, 2, 100.0);
		assert_eq!(selected, vec![(RED, 10), (BLUE, 5)]);

		let selected = select_diverse(&candidates, 2, 0.0);
		assert_eq!(selected, vec![(RED, 10), (dark_red, 9)]);
	}

	#[test]
	fn diversity_spreads_palette() {
		// three close reds outnumber two distant colors
		let colors = repeated(&[
			(RED, 50),
			(Srgb::new(245, 0, 0), 40),
			(Srgb::new(235, 0, 0), 30),
			(BLUE, 8),
			(GREEN, 6),
		]);

		let palette = quantize(&colors, options(3, 50), &mut rng());
		assert_eq!(palette.colors(), &[RED, BLUE, GREEN]);
		assert_eq!(palette.counts(), &[50, 8, 6]);

		let threshold = diversity_threshold(50);
		for (i, &x) in palette.colors().iter().enumerate() {
			for &y in &palette.colors()[(i + 1)..] {
				assert!(color::distance(x, y) >= threshold, "{x:?} and {y:?} are too close");
			}
		}
	}
}
