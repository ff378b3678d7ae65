use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::chain::MarkovModel;
use super::transitions::Transitions;
use crate::error::ModelError;

/// Encoding of a persisted model.
///
/// Both encodings store the pair `(window, table)`. In JSON it reads:
/// `[1, {"START": {"hello": 2}, "hello": {"END": 2}}]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
	/// Human readable, canonical form.
	Json,
	/// Compact binary cache (`postcard`).
	Postcard,
}

impl Encoding {
	/// Picks the encoding from the file extension: `.bin` is postcard,
	/// anything else is JSON.
	pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
		match path.as_ref().extension().and_then(|ext| ext.to_str()) {
			Some("bin") => Self::Postcard,
			_ => Self::Json,
		}
	}
}

#[derive(Serialize)]
struct SnapshotRef<'a>(usize, &'a BTreeMap<String, Transitions>);

#[derive(Deserialize)]
struct Snapshot(usize, BTreeMap<String, Transitions>);

impl MarkovModel {
	/// Encodes `(window, table)`.
	pub fn serialize(&self, encoding: Encoding) -> Result<Vec<u8>, ModelError> {
		let snapshot = SnapshotRef(self.window, &self.table);
		let bytes = match encoding {
			Encoding::Json => serde_json::to_vec(&snapshot)?,
			Encoding::Postcard => postcard::to_stdvec(&snapshot)?,
		};
		Ok(bytes)
	}

	/// Decodes a model produced by `serialize`.
	///
	/// # Errors
	/// Returns `CorruptModel` if the bytes cannot be decoded, if the window
	/// is 0, or if the table holds a token without successors or a zero count.
	pub fn deserialize(bytes: &[u8], encoding: Encoding) -> Result<Self, ModelError> {
		let Snapshot(window, table) = match encoding {
			Encoding::Json => serde_json::from_slice(bytes)?,
			Encoding::Postcard => postcard::from_bytes(bytes)?,
		};

		if window == 0 {
			return Err(ModelError::CorruptModel("window must be >= 1".to_owned()));
		}
		for (token, transitions) in &table {
			if transitions.is_empty() {
				return Err(ModelError::CorruptModel(format!("'{}' has no successor", token)));
			}
			if let Some(next) = transitions.zero_count() {
				return Err(ModelError::CorruptModel(format!(
					"'{}' -> '{}' has a zero count",
					token, next
				)));
			}
		}

		Ok(Self { window, table })
	}

	/// Decodes a model, falling back to an empty one on failure.
	///
	/// The failure is logged, never propagated.
	pub fn deserialize_or_empty(bytes: &[u8], encoding: Encoding, fallback_window: usize) -> Self {
		match Self::deserialize(bytes, encoding) {
			Ok(model) => model,
			Err(e) => {
				warn!("{}, starting from an empty model", e);
				Self::empty_with(fallback_window)
			}
		}
	}

	/// Writes the model to `path`, encoding chosen by `Encoding::from_path`.
	///
	/// Missing parent directories are created.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
		let path = path.as_ref();
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent)?;
		}
		fs::write(path, self.serialize(Encoding::from_path(path))?)?;
		info!("Saved model ({} tokens) to {}", self.len(), path.display());
		Ok(())
	}

	/// Reads a model written by `save`.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
		let path = path.as_ref();
		let bytes = fs::read(path)?;
		let model = Self::deserialize(&bytes, Encoding::from_path(path))?;
		info!("Loaded model ({} tokens) from {}", model.len(), path.display());
		Ok(model)
	}

	/// Reads a model, falling back to an empty one with `fallback_window`
	/// if the file is missing, unreadable or corrupt.
	pub fn load_or_empty<P: AsRef<Path>>(path: P, fallback_window: usize) -> Self {
		let path = path.as_ref();
		match Self::load(path) {
			Ok(model) => model,
			Err(e) => {
				warn!("Error reading {}: {}, starting from an empty model", path.display(), e);
				Self::empty_with(fallback_window)
			}
		}
	}

	/// Empty fallback model. The fallback must not fail, so a zero window
	/// is raised to 1 instead of being rejected.
	fn empty_with(window: usize) -> Self {
		Self { window: window.max(1), table: BTreeMap::new() }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::chain::{END, START};
	use pretty_assertions::assert_eq;

	fn sample_model() -> MarkovModel {
		let mut model = MarkovModel::default();
		model.ingest(&[START, "a", "b", END]);
		model.ingest(&[START, "a", "c", END]);
		model
	}

	#[test]
	fn encoding_from_extension() {
		assert_eq!(Encoding::from_path("model.bin"), Encoding::Postcard);
		assert_eq!(Encoding::from_path("model.json"), Encoding::Json);
		assert_eq!(Encoding::from_path("model"), Encoding::Json);
	}

	#[test]
	fn json_layout_is_window_then_table() {
		let bytes = sample_model().serialize(Encoding::Json).unwrap();
		let text = String::from_utf8(bytes).unwrap();
		assert_eq!(
			text,
			r#"[1,{"START":{"a":2},"a":{"b":1,"c":1},"b":{"END":1},"c":{"END":1}}]"#
		);
	}

	#[test]
	fn round_trip_both_encodings() {
		let model = sample_model();
		for encoding in [Encoding::Json, Encoding::Postcard] {
			let bytes = model.serialize(encoding).unwrap();
			assert_eq!(MarkovModel::deserialize(&bytes, encoding).unwrap(), model);
		}
	}

	#[test]
	fn reads_hand_written_json() {
		let model = MarkovModel::deserialize(br#"[2, {"x": {"END": 3}}]"#, Encoding::Json).unwrap();
		assert_eq!(model.window(), 2);
		assert_eq!(model.count("x", END), 3);
	}

	#[test]
	fn rejects_malformed_input() {
		let cases: [&[u8]; 5] = [
			b"not json",
			br#"{"window": 1}"#,
			br#"[0, {}]"#,
			br#"[1, {"a": {}}]"#,
			br#"[1, {"a": {"b": 0}}]"#,
		];
		for bytes in cases {
			assert!(matches!(
				MarkovModel::deserialize(bytes, Encoding::Json),
				Err(ModelError::CorruptModel(_))
			));
		}
		assert!(matches!(
			MarkovModel::deserialize(&[0xff, 0xff, 0xff], Encoding::Postcard),
			Err(ModelError::CorruptModel(_))
		));
	}

	#[test]
	fn corrupt_input_falls_back_to_empty() {
		let model = MarkovModel::deserialize_or_empty(b"{{{", Encoding::Json, 2);
		assert!(model.is_empty());
		assert_eq!(model.window(), 2);
	}
}
