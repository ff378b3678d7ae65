//! Word-level Markov chain.
//!
//! - `MarkovModel`: transition table, ingestion and sampling
//! - `Transitions`: successor counts of a single token
//! - `Picker`: injected randomness source
//! - Persistence (`Encoding`, save/load) and the compressed export

/// Transition table, ingestion, sampling and merging.
pub mod chain;

/// Index-based, read-only export of a model.
pub mod compress;

/// Serialization of `(window, table)` and file load/save with fallback.
pub mod persist;

/// Randomness source used by sampling.
pub mod picker;

/// Corpus training, possibly across worker threads.
mod train;

/// Successor counts of one token, with weighted random selection.
pub mod transitions;

pub use chain::{DEFAULT_MAX_TOKENS, END, MarkovModel, START};
pub use compress::{CompressedModel, CompressedState};
pub use persist::Encoding;
pub use picker::{Picker, RandomPicker};
pub use transitions::Transitions;
