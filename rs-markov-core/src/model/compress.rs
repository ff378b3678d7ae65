use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::chain::MarkovModel;
use crate::error::ModelError;

/// Outgoing transitions of one token, as indices and probabilities.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CompressedState {
	/// Index of the token in `CompressedModel::tokens`.
	pub index: usize,
	/// Indices of the successors, in the same order as `probabilities`.
	pub successors: Vec<usize>,
	/// Normalized selection probabilities, summing to 1.0.
	pub probabilities: Vec<f64>,
}

/// Index-based export of a model, for inspection and analysis.
///
/// This is a read-only view: it cannot be ingested back, the canonical
/// persisted form stays the one written by `MarkovModel::save`.
///
/// # Invariants
/// - `tokens` holds every key and every successor once, in lexical order,
///   so the same table always gets the same indices
/// - `states` follows the key order of the model
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CompressedModel {
	pub window: usize,
	pub tokens: Vec<String>,
	pub states: Vec<CompressedState>,
}

impl CompressedModel {
	/// Looks up the token behind an index.
	pub fn token(&self, index: usize) -> Option<&str> {
		self.tokens.get(index).map(String::as_str)
	}

	/// JSON encoding of the export.
	pub fn to_json(&self) -> Result<Vec<u8>, ModelError> {
		Ok(serde_json::to_vec(self)?)
	}

	/// Writes the JSON export to `path`.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
		fs::write(path, self.to_json()?)?;
		Ok(())
	}
}

impl MarkovModel {
	/// Builds the index-based export of this model.
	///
	/// Successors that never appear as a key (usually `END`) still get an
	/// index, after being merged into the sorted vocabulary.
	pub fn compress(&self) -> CompressedModel {
		let vocabulary: BTreeSet<&str> = self
			.table
			.iter()
			.flat_map(|(token, transitions)| {
				std::iter::once(token.as_str()).chain(transitions.iter().map(|(next, _)| next))
			})
			.collect();

		let indices: BTreeMap<&str, usize> = vocabulary
			.iter()
			.enumerate()
			.map(|(index, token)| (*token, index))
			.collect();

		let states = self
			.table
			.iter()
			.map(|(token, transitions)| {
				let (successors, probabilities) = transitions
					.probabilities()
					.map(|(next, probability)| (indices[next], probability))
					.unzip();
				CompressedState { index: indices[token.as_str()], successors, probabilities }
			})
			.collect();

		CompressedModel {
			window: self.window,
			tokens: vocabulary.into_iter().map(str::to_owned).collect(),
			states,
		}
	}
}
