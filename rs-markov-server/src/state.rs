use std::sync::RwLock;

use log::{error, info, warn};

use rs_markov_core::{MarkovModel, ModelError, RandomPicker};

use crate::config::Config;

/// State shared by every worker.
///
/// Sampling only needs a read lock and may run concurrently, replacing
/// the model takes the write lock.
pub struct SharedData {
	pub config: Config,
	model: RwLock<MarkovModel>,
}

/// Failure of a request against the shared model.
#[derive(Debug)]
pub enum SampleError {
	Model(ModelError),
	Lock,
}

impl SharedData {
	pub fn new(config: Config, model: MarkovModel) -> Self {
		Self { config, model: RwLock::new(model) }
	}

	/// Loads the configured model, training it from the corpus when the
	/// saved one is missing, corrupt or empty.
	pub fn from_config(config: Config) -> Self {
		let model = prepare_model(&config);
		Self::new(config, model)
	}

	/// Samples a message under a read lock.
	pub fn sample(&self, word_count: usize, seed: Option<&str>) -> Result<String, SampleError> {
		let model = self.model.read().map_err(|_| SampleError::Lock)?;
		model
			.sample(&mut RandomPicker::thread(), word_count, seed)
			.map_err(SampleError::Model)
	}

	/// Re-reads the model file and swaps it in. Returns the number of tokens.
	pub fn reload(&self) -> Result<usize, SampleError> {
		let fresh = prepare_model(&self.config);
		let len = fresh.len();
		let mut model = self.model.write().map_err(|_| SampleError::Lock)?;
		*model = fresh;
		Ok(len)
	}

	#[cfg(test)]
	pub fn model_len(&self) -> Result<usize, SampleError> {
		Ok(self.model.read().map_err(|_| SampleError::Lock)?.len())
	}
}

fn prepare_model(config: &Config) -> MarkovModel {
	let model = MarkovModel::load_or_empty(&config.model_path, config.window);
	if !model.is_empty() {
		return model;
	}

	let Some(corpus) = &config.corpus_path else {
		warn!("No corpus configured, serving an empty model");
		return model;
	};

	match MarkovModel::train_file(corpus, config.window) {
		Ok(trained) => {
			if let Err(e) = trained.save(&config.model_path) {
				error!("Failed to save model to {}: {}", config.model_path.display(), e);
			}
			trained
		}
		Err(e) => {
			error!("Failed to train from {}: {}", corpus.display(), e);
			model
		}
	}
}
