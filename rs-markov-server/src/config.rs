use std::env;
use std::path::PathBuf;

use thiserror::Error;

use rs_markov_core::model::DEFAULT_MAX_TOKENS;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("{name} must be a positive integer, got '{value}'")]
	InvalidNumber { name: &'static str, value: String },
}

/// Server settings, read from `MARKOV_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
	/// Address to bind (`MARKOV_BIND`).
	pub bind: String,
	/// Persisted model, `.bin` for postcard, JSON otherwise (`MARKOV_MODEL`).
	pub model_path: PathBuf,
	/// Corpus used to train a model when none is saved (`MARKOV_CORPUS`).
	pub corpus_path: Option<PathBuf>,
	/// Window of a freshly trained or fallback model (`MARKOV_WINDOW`).
	pub window: usize,
	/// Words per message on the HTML endpoint (`MARKOV_WORD_COUNT`).
	pub word_count: usize,
	/// Largest `word_count` a request may ask for (`MARKOV_MAX_WORD_COUNT`).
	pub max_word_count: usize,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			bind: "127.0.0.1:5000".to_owned(),
			model_path: PathBuf::from("./data/model.json"),
			corpus_path: None,
			window: 1,
			word_count: DEFAULT_MAX_TOKENS,
			max_word_count: 1_000,
		}
	}
}

impl Config {
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| env::var(name).ok())
	}

	/// Builds the configuration from any variable lookup, unset values
	/// keep their default.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut config = Self::default();

		if let Some(bind) = lookup("MARKOV_BIND") {
			config.bind = bind;
		}
		if let Some(model) = lookup("MARKOV_MODEL") {
			config.model_path = PathBuf::from(model);
		}
		config.corpus_path = lookup("MARKOV_CORPUS")
			.filter(|s| !s.trim().is_empty())
			.map(PathBuf::from);
		if let Some(window) = lookup("MARKOV_WINDOW") {
			config.window = parse_positive("MARKOV_WINDOW", &window)?;
		}
		if let Some(word_count) = lookup("MARKOV_WORD_COUNT") {
			config.word_count = parse_positive("MARKOV_WORD_COUNT", &word_count)?;
		}
		if let Some(max_word_count) = lookup("MARKOV_MAX_WORD_COUNT") {
			config.max_word_count = parse_positive("MARKOV_MAX_WORD_COUNT", &max_word_count)?;
		}

		Ok(config)
	}
}

fn parse_positive(name: &'static str, value: &str) -> Result<usize, ConfigError> {
	match value.trim().parse::<usize>() {
		Ok(n) if n > 0 => Ok(n),
		_ => Err(ConfigError::InvalidNumber { name, value: value.to_owned() }),
	}
}
