use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Source of randomness used while sampling.
///
/// The model never touches a random generator directly: every draw goes
/// through a `Picker`, so a fixed seed (or a scripted picker in tests)
/// makes generation fully reproducible.
pub trait Picker {
	/// Picks an index in `0..len`, each with the same probability.
	///
	/// Returns `None` if `len == 0`.
	fn pick_uniform(&mut self, len: usize) -> Option<usize>;

	/// Picks an index of `weights`, with probability `weights[i] / sum(weights)`.
	///
	/// Returns `None` if `weights` is empty or sums to zero.
	fn pick_weighted(&mut self, weights: &[u64]) -> Option<usize>;
}

/// `Picker` backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomPicker<R: Rng> {
	rng: R,
}

impl<R: Rng> RandomPicker<R> {
	/// Wraps an existing random generator.
	pub fn new(rng: R) -> Self {
		Self { rng }
	}
}

impl RandomPicker<ThreadRng> {
	/// Picker using the thread-local generator.
	pub fn thread() -> Self {
		Self::new(rand::rng())
	}
}

impl RandomPicker<StdRng> {
	/// Reproducible picker: the same seed always yields the same draws.
	pub fn seeded(seed: u64) -> Self {
		Self::new(StdRng::seed_from_u64(seed))
	}
}

impl<R: Rng> Picker for RandomPicker<R> {
	fn pick_uniform(&mut self, len: usize) -> Option<usize> {
		if len == 0 {
			return None;
		}
		Some(self.rng.random_range(0..len))
	}

	/// Cumulative subtraction over the weights: O(n) scan, one draw.
	fn pick_weighted(&mut self, weights: &[u64]) -> Option<usize> {
		let total: u64 = weights.iter().sum();
		if total == 0 {
			return None;
		}

		let mut r = self.rng.random_range(0..total);
		for (index, weight) in weights.iter().enumerate() {
			if r < *weight {
				return Some(index);
			}
			r -= weight;
		}

		// Unreachable while r < total
		None
	}
}
