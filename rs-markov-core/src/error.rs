use std::io;

use thiserror::Error;

/// Errors raised by the Markov model and its persistence adapters.
#[derive(Debug, Error)]
pub enum ModelError {
	/// Sampling was requested from a model with no transitions.
	#[error("model is empty, nothing to sample from")]
	EmptyModel,

	/// A persisted model could not be decoded or breaks the table invariants.
	#[error("corrupt model: {0}")]
	CorruptModel(String),

	/// The window must be at least 1.
	#[error("window must be >= 1, got {0}")]
	InvalidWindow(usize),

	/// Two models built with different windows cannot be merged.
	#[error("window mismatch: self={expected}, other={found}")]
	WindowMismatch { expected: usize, found: usize },

	/// Building a model from a corpus failed before every line was counted.
	#[error("training failed: {0}")]
	Training(String),

	#[error("io error: {0}")]
	Io(#[from] io::Error),
}

impl From<serde_json::Error> for ModelError {
	fn from(err: serde_json::Error) -> Self {
		Self::CorruptModel(err.to_string())
	}
}

impl From<postcard::Error> for ModelError {
	fn from(err: postcard::Error) -> Self {
		Self::CorruptModel(err.to_string())
	}
}
