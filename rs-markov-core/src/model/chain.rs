use std::collections::BTreeMap;

use log::debug;

use super::picker::Picker;
use super::transitions::Transitions;
use crate::error::ModelError;

/// Sentinel marking the beginning of a unit of input (line, sentence).
pub const START: &str = "START";

/// Sentinel marking the end of a unit of input. Drawing it stops sampling.
pub const END: &str = "END";

/// Default number of tokens produced by a sample.
pub const DEFAULT_MAX_TOKENS: usize = 50;

/// First-order Markov chain over words.
///
/// # Responsibilities
/// - Accumulate transition counts from token sequences
/// - Sample new sequences with frequency-weighted draws
/// - Merge with another model built with the same window
///
/// # Invariants
/// - `window` is always >= 1
/// - Every key of `table` has at least one successor with a count >= 1
/// - The table is owned by the instance, models never share state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkovModel {
	/// Tokens ahead considered when forming a transition.
	pub(crate) window: usize,

	/// Mapping from a token to its observed successors.
	pub(crate) table: BTreeMap<String, Transitions>,
}

impl Default for MarkovModel {
	/// Empty first-order model.
	fn default() -> Self {
		Self { window: 1, table: BTreeMap::new() }
	}
}

impl MarkovModel {
	/// Creates an empty model.
	///
	/// # Errors
	/// Returns `InvalidWindow` if `window == 0`.
	pub fn new(window: usize) -> Result<Self, ModelError> {
		if window == 0 {
			return Err(ModelError::InvalidWindow(window));
		}
		Ok(Self { window, table: BTreeMap::new() })
	}

	pub fn window(&self) -> usize {
		self.window
	}

	/// Number of tokens with outgoing transitions.
	pub fn len(&self) -> usize {
		self.table.len()
	}

	pub fn is_empty(&self) -> bool {
		self.table.is_empty()
	}

	/// Iterates over every known token, in lexical order.
	pub fn tokens(&self) -> impl Iterator<Item = &str> {
		self.table.keys().map(String::as_str)
	}

	/// Observed successors of `token`, if any.
	pub fn successors(&self, token: &str) -> Option<&Transitions> {
		self.table.get(token)
	}

	/// Number of times `to` followed `from`.
	pub fn count(&self, from: &str, to: &str) -> u64 {
		self.table.get(from).map_or(0, |t| t.count(to))
	}

	/// Probability of drawing `to` right after `from` (0.0 if unknown).
	pub fn probability(&self, from: &str, to: &str) -> f64 {
		match self.table.get(from) {
			Some(t) if !t.is_empty() => t.count(to) as f64 / t.total() as f64,
			_ => 0.0,
		}
	}

	/// Adds a token sequence to the model.
	///
	/// Every pair `(tokens[i], tokens[i + 1])` with `i < len - window`
	/// increments the matching transition count.
	///
	/// # Notes
	/// - Sequences shorter than `window + 1` are ignored.
	/// - Never fails.
	pub fn ingest<S: AsRef<str>>(&mut self, tokens: &[S]) {
		let Some(last) = tokens.len().checked_sub(self.window) else {
			// Too short, no transition to record
			return;
		};

		for i in 0..last {
			let current = tokens[i].as_ref();
			let next = tokens[i + 1].as_ref();

			if let Some(transitions) = self.table.get_mut(current) {
				transitions.add(next);
			} else {
				let mut transitions = Transitions::default();
				transitions.add(next);
				self.table.insert(current.to_owned(), transitions);
			}
		}
	}

	/// Generates a sentence of at most `max_tokens + 1` words.
	///
	/// # Behavior
	/// - Without `seed`, the first word is drawn uniformly among the
	///   successors of `START`, or among every token if `START` is unknown.
	/// - Each step draws a successor weighted by its count. Drawing `END`
	///   stops generation.
	/// - A token with no successor (an unknown seed for instance) makes the
	///   walk jump to a token drawn uniformly from the whole table. The
	///   sentence may change topic abruptly when this happens.
	/// - The first word is capitalized, words are joined with a space.
	/// - A first word equal to `END` (seeded, or drawn from a hand-written
	///   table) ends generation at once with an empty string.
	///
	/// # Errors
	/// Returns `EmptyModel` if the model has no transitions.
	pub fn sample<P: Picker + ?Sized>(
		&self,
		picker: &mut P,
		max_tokens: usize,
		seed: Option<&str>,
	) -> Result<String, ModelError> {
		if self.table.is_empty() {
			return Err(ModelError::EmptyModel);
		}

		let mut current: &str = match seed {
			Some(seed) => seed,
			None => self.first_token(picker)?,
		};
		if current == END {
			// Nothing before the end marker
			return Ok(String::new());
		}
		let mut words = vec![current];

		for _ in 0..max_tokens {
			let transitions = match self.table.get(current) {
				Some(t) if !t.is_empty() => t,
				_ => {
					let (token, transitions) = self.random_entry(picker)?;
					debug!("No successor known for '{}', jumping to '{}'", current, token);
					current = token;
					transitions
				}
			};

			let Some(next) = transitions.pick(picker) else {
				break;
			};
			if next == END {
				break;
			}
			words.push(next);
			current = next;
		}

		Ok(capitalize(&words.join(" ")))
	}

	/// Merges another model into this one, summing counts.
	///
	/// # Errors
	/// Returns `WindowMismatch` if the windows differ.
	pub fn merge(&mut self, other: &Self) -> Result<(), ModelError> {
		if self.window != other.window {
			return Err(ModelError::WindowMismatch { expected: self.window, found: other.window });
		}

		for (token, transitions) in &other.table {
			if let Some(existing) = self.table.get_mut(token) {
				existing.merge(transitions);
			} else {
				self.table.insert(token.clone(), transitions.clone());
			}
		}

		Ok(())
	}

	/// Draws the first word when no seed is given.
	fn first_token<P: Picker + ?Sized>(&self, picker: &mut P) -> Result<&str, ModelError> {
		match self.table.get(START) {
			Some(starts) if !starts.is_empty() => {
				let index = picker.pick_uniform(starts.len()).ok_or(ModelError::EmptyModel)?;
				starts
					.iter()
					.nth(index)
					.map(|(token, _)| token)
					.ok_or(ModelError::EmptyModel)
			}
			_ => self.random_entry(picker).map(|(token, _)| token),
		}
	}

	/// Draws a token uniformly among every key of the table.
	fn random_entry<P: Picker + ?Sized>(
		&self,
		picker: &mut P,
	) -> Result<(&str, &Transitions), ModelError> {
		let index = picker.pick_uniform(self.table.len()).ok_or(ModelError::EmptyModel)?;
		self.table
			.iter()
			.nth(index)
			.map(|(token, transitions)| (token.as_str(), transitions))
			.ok_or(ModelError::EmptyModel)
	}
}

/// Uppercases the first character and lowercases the rest.
///
/// Example: `"hELLO world"` → `"Hello world"`
fn capitalize(text: &str) -> String {
	let mut chars = text.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
		None => String::new(),
	}
}
