//! Markov chain text generation library.
//!
//! This crate provides a first-order, word-level Markov chain including:
//! - Transition counting from tokenized lines
//! - Frequency-weighted sampling with an injectable randomness source
//! - JSON / postcard persistence with a fallback to an empty model
//! - A tokenizer turning raw text into `START … END` token units

/// Errors shared by every operation of the crate.
pub mod error;

/// File helpers (corpus reading, output paths).
pub mod io;

/// Markov model, persistence and sampling.
pub mod model;

/// Text cleaning and tokenization.
pub mod tokenizer;

pub use error::ModelError;
pub use model::{Encoding, MarkovModel, Picker, RandomPicker};
