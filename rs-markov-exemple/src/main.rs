use std::env;

use anyhow::Context;
use rs_markov_core::io::build_output_path;
use rs_markov_core::model::DEFAULT_MAX_TOKENS;
use rs_markov_core::{MarkovModel, RandomPicker};

fn main() -> anyhow::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	// Corpus to learn from, one sentence per line
	let corpus = env::args().nth(1).unwrap_or_else(|| "./data/shrek.txt".to_owned());
	// Optional seed for reproducible messages
	let seed: Option<u64> = env::args()
		.nth(2)
		.map(|s| s.parse::<u64>())
		.transpose()
		.context("seed must be an integer")?;

	// Reuse the saved model next to the corpus, train it otherwise
	let model_path = build_output_path(&corpus, "json")?;
	let mut model = MarkovModel::load_or_empty(&model_path, 1);
	if model.is_empty() {
		model = MarkovModel::train_file(&corpus, 1)
			.with_context(|| format!("cannot train from {}", corpus))?;
		model.save(&model_path)?;
	}

	// Index-based export, for inspection only
	let compressed_path = build_output_path(&corpus, "compressed.json")?;
	model.compress().save(&compressed_path)?;
	log::info!("Compressed export written to {}", compressed_path.display());

	let mut picker = match seed {
		Some(seed) => Box::new(RandomPicker::seeded(seed)) as Box<dyn rs_markov_core::Picker>,
		None => Box::new(RandomPicker::thread()),
	};

	// Generate 10 messages
	for i in 0..10 {
		let message = model.sample(picker.as_mut(), DEFAULT_MAX_TOKENS, None)?;
		println!("Generated message {}: {}", i + 1, message);
	}

	Ok(())
}
