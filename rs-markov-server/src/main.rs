mod config;
mod routes;
mod state;

use std::io;

use actix_web::{App, HttpServer, web};
use log::info;

use config::Config;
use state::SharedData;

/// Main entry point for the server.
///
/// Loads (or trains) the Markov model, wraps it in a `RwLock` shared by
/// every worker, and starts an Actix-web HTTP server.
///
/// # Notes
/// - Settings come from `MARKOV_*` environment variables (see `Config`).
/// - Log level is driven by `RUST_LOG`, `info` by default.
#[actix_web::main]
async fn main() -> io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
	let bind = config.bind.clone();

	let shared_data = web::Data::new(SharedData::from_config(config));
	info!("Listening on {}", bind);

	HttpServer::new(move || {
		App::new()
			.app_data(shared_data.clone())
			.configure(routes::configure)
	})
		.bind(bind)?
		.run()
		.await
}
