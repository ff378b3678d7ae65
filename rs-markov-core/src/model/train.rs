use std::path::Path;
use std::sync::mpsc::{self, SendError};
use std::thread::{self, JoinHandle};

use log::info;

use super::chain::MarkovModel;
use crate::error::ModelError;
use crate::io::read_file;
use crate::tokenizer::tokenize_line;

impl MarkovModel {
	/// Ingests every line as its own `START … END` unit.
	pub fn ingest_lines<I, S>(&mut self, lines: I)
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		for line in lines {
			self.ingest(&tokenize_line(line.as_ref()));
		}
	}

	/// Builds a model from a text corpus, one unit per line.
	///
	/// # Behavior
	/// - Splits the lines into chunks (CPU cores * factor).
	/// - Each worker thread builds a private partial model from its chunk.
	/// - Partial models are merged once every worker is done.
	///
	/// Counts are summed, so the result is the same as a sequential build.
	///
	/// # Errors
	/// Returns an error if `window == 0` or if the file cannot be read.
	pub fn train_file<P: AsRef<Path>>(filename: P, window: usize) -> Result<Self, ModelError> {
		let mut final_model = Self::new(window)?;
		let lines = read_file(&filename)?;
		if lines.is_empty() {
			return Ok(final_model);
		}

		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = lines.len().div_ceil(chunks);

		let (tx, rx) = mpsc::channel();
		let mut workers = Vec::new();
		for chunk in lines.chunks(chunk_size) {
			let tx = tx.clone();
			let chunk: Vec<String> = chunk.to_vec();

			workers.push(thread::spawn(move || {
				let mut partial_model = Self { window, ..Self::default() };
				partial_model.ingest_lines(chunk);
				tx.send(partial_model)
			}));
		}
		drop(tx);

		for partial_model in rx.iter() {
			final_model.merge(&partial_model)?;
		}

		join_workers(workers)?;

		info!(
			"Trained model on {} lines from {}: {} tokens",
			lines.len(),
			filename.as_ref().display(),
			final_model.len()
		);
		Ok(final_model)
	}
}

type Worker = JoinHandle<Result<(), SendError<MarkovModel>>>;

/// Waits for every worker, so that a lost partial model fails the build.
fn join_workers(workers: Vec<Worker>) -> Result<(), ModelError> {
	for worker in workers {
		match worker.join() {
			Ok(Ok(())) => (),
			Ok(Err(_)) => {
				return Err(ModelError::Training(
					"a worker could not send its partial model".to_owned(),
				));
			}
			Err(_) => return Err(ModelError::Training("a worker panicked".to_owned())),
		}
	}
	Ok(())
}
