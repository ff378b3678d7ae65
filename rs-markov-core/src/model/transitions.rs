use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::picker::Picker;

/// Outgoing transitions of a single token.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
/// Example: { "cat" => 42, "dog" => 3 }
///
/// ## Invariants
/// - Each occurrence count is strictly positive
/// - Successors are kept in lexical order, so a fixed random seed always
///   walks them in the same order
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Transitions {
	counts: BTreeMap<String, u64>,
}

impl Transitions {
	/// Records an occurrence of a transition toward `next`.
	///
	/// An existing successor gets its count increased, a new one starts at 1.
	pub fn add(&mut self, next: &str) {
		if let Some(count) = self.counts.get_mut(next) {
			*count += 1;
		} else {
			self.counts.insert(next.to_owned(), 1);
		}
	}

	/// Number of times `next` was observed after this token (0 if never).
	pub fn count(&self, next: &str) -> u64 {
		self.counts.get(next).copied().unwrap_or(0)
	}

	/// Sum of every successor count.
	pub fn total(&self) -> u64 {
		self.counts.values().sum()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	pub fn len(&self) -> usize {
		self.counts.len()
	}

	/// Iterates over `(successor, count)` pairs in lexical order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
		self.counts.iter().map(|(next, count)| (next.as_str(), *count))
	}

	/// Selection probability of each successor: `count / total`.
	pub fn probabilities(&self) -> impl Iterator<Item = (&str, f64)> {
		let total = self.total() as f64;
		self.iter().map(move |(next, count)| (next, count as f64 / total))
	}

	/// Draws a successor with probability proportional to its count.
	///
	/// Returns `None` if there are no transitions.
	pub fn pick<P: Picker + ?Sized>(&self, picker: &mut P) -> Option<&str> {
		let weights: Vec<u64> = self.counts.values().copied().collect();
		let index = picker.pick_weighted(&weights)?;
		self.counts.keys().nth(index).map(String::as_str)
	}

	/// Adds every count of `other` into this one.
	pub fn merge(&mut self, other: &Self) {
		for (next, count) in &other.counts {
			*self.counts.entry(next.clone()).or_insert(0) += count;
		}
	}

	/// Checks the count invariant, returning the offending successor if any.
	pub(crate) fn zero_count(&self) -> Option<&str> {
		self.counts
			.iter()
			.find(|(_, count)| **count == 0)
			.map(|(next, _)| next.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::picker::RandomPicker;

	fn transitions(pairs: &[(&str, u64)]) -> Transitions {
		let mut t = Transitions::default();
		for (next, count) in pairs {
			for _ in 0..*count {
				t.add(next);
			}
		}
		t
	}

	#[test]
	fn add_counts_occurrences() {
		let t = transitions(&[("b", 2), ("c", 1)]);
		assert_eq!(t.count("b"), 2);
		assert_eq!(t.count("c"), 1);
		assert_eq!(t.count("z"), 0);
		assert_eq!(t.total(), 3);
		assert_eq!(t.len(), 2);
	}

	#[test]
	fn probabilities_sum_to_one() {
		let t = transitions(&[("a", 3), ("b", 7), ("c", 1)]);
		let sum: f64 = t.probabilities().map(|(_, p)| p).sum();
		assert!((sum - 1.0).abs() < 1e-9);
	}

	#[test]
	fn pick_on_empty_is_none() {
		let t = Transitions::default();
		assert_eq!(t.pick(&mut RandomPicker::seeded(0)), None);
	}

	#[test]
	fn pick_single_successor() {
		let t = transitions(&[("only", 4)]);
		let mut picker = RandomPicker::seeded(3);
		for _ in 0..20 {
			assert_eq!(t.pick(&mut picker), Some("only"));
		}
	}

	#[test]
	fn merge_sums_counts() {
		let mut a = transitions(&[("x", 1), ("y", 2)]);
		let b = transitions(&[("y", 3), ("z", 1)]);
		a.merge(&b);
		assert_eq!(a.count("x"), 1);
		assert_eq!(a.count("y"), 5);
		assert_eq!(a.count("z"), 1);
	}
}
