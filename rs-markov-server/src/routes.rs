use actix_web::{HttpResponse, Responder, get, post, put, web};
use log::error;
use serde::Deserialize;

use rs_markov_core::ModelError;
use rs_markov_core::tokenizer::sanitize;

use crate::state::{SampleError, SharedData};

const INDEX_HTML: &str = include_str!("../static/index.html");
const HTML: &str = "text/html; charset=utf-8";
const TEXT: &str = "text/plain; charset=utf-8";

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	word_count: Option<usize>,
	seed: Option<String>,
}

/// Registers every endpoint.
pub fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(index)
		.service(generate)
		.service(get_generated)
		.service(put_model);
}

fn error_response(e: SampleError) -> HttpResponse {
	match e {
		SampleError::Model(e @ ModelError::EmptyModel) => {
			HttpResponse::ServiceUnavailable().body(e.to_string())
		}
		SampleError::Model(e) => {
			error!("Sampling failed: {}", e);
			HttpResponse::InternalServerError().body(e.to_string())
		}
		SampleError::Lock => HttpResponse::InternalServerError().body("Model lock failed"),
	}
}

#[get("/")]
async fn index() -> impl Responder {
	HttpResponse::Ok().content_type(HTML).body(INDEX_HTML)
}

/// HTML fragment swapped in by htmx: a message and the button asking for the next one.
#[post("/generate")]
async fn generate(data: web::Data<SharedData>) -> impl Responder {
	match data.sample(data.config.word_count, None) {
		Ok(message) => HttpResponse::Ok().content_type(HTML).body(format!(
			"<p>{}</p><button hx-post=\"/generate\" hx-swap=\"outerHTML\">New Message</button>",
			message
		)),
		Err(e) => error_response(e),
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Returns a generated message as plain text.
///
/// The seed is cleaned like any corpus word, so only `a..=z` can come back.
#[get("/v1/generate")]
async fn get_generated(
	data: web::Data<SharedData>,
	query: web::Query<GenerateParams>,
) -> impl Responder {
	let word_count = query.word_count.unwrap_or(data.config.word_count);
	if word_count > data.config.max_word_count {
		return HttpResponse::BadRequest()
			.content_type(TEXT)
			.body(format!("word_count must be <= {}", data.config.max_word_count));
	}

	let seed = match query.seed.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
		None => None,
		Some(raw) => match sanitize(raw) {
			s if s.is_empty() => {
				return HttpResponse::BadRequest()
					.content_type(TEXT)
					.body("Seed must contain at least one letter");
			}
			s => Some(s),
		},
	};

	match data.sample(word_count, seed.as_deref()) {
		Ok(message) => HttpResponse::Ok().content_type(TEXT).body(message),
		Err(e) => error_response(e),
	}
}

#[put("/v1/load_model")]
async fn put_model(data: web::Data<SharedData>) -> impl Responder {
	match data.reload() {
		Ok(len) => HttpResponse::Ok().body(format!("Model loaded successfully ({} tokens)", len)),
		Err(e) => error_response(e),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::Config;
	use actix_web::http::{StatusCode, header};
	use actix_web::{App, test};
	use rs_markov_core::MarkovModel;

	fn shared(lines: &[&str]) -> web::Data<SharedData> {
		let mut model = MarkovModel::default();
		model.ingest_lines(lines);
		web::Data::new(SharedData::new(Config::default(), model))
	}

	#[actix_web::test]
	async fn index_serves_page() {
		let app = test::init_service(App::new().app_data(shared(&[])).configure(configure)).await;
		let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
		assert_eq!(resp.status(), StatusCode::OK);
		let body = test::read_body(resp).await;
		assert!(std::str::from_utf8(&body).unwrap().contains("hx-post=\"/generate\""));
	}

	#[actix_web::test]
	async fn generate_wraps_message() {
		let data = shared(&["shrek is love"]);
		let app = test::init_service(App::new().app_data(data).configure(configure)).await;
		let req = test::TestRequest::post().uri("/generate").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert_eq!(
			body,
			web::Bytes::from_static(
				b"<p>Shrek is love</p><button hx-post=\"/generate\" hx-swap=\"outerHTML\">New Message</button>"
			)
		);
	}

	#[actix_web::test]
	async fn v1_generate_honours_seed() {
		let data = shared(&["ogres are like onions"]);
		let app = test::init_service(App::new().app_data(data).configure(configure)).await;
		let req = test::TestRequest::get().uri("/v1/generate?seed=like").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert_eq!(body, web::Bytes::from_static(b"Like onions"));
	}

	#[actix_web::test]
	async fn v1_generate_cleans_seed() {
		let data = shared(&["hello there"]);
		let app = test::init_service(App::new().app_data(data).configure(configure)).await;
		let req = test::TestRequest::get()
			.uri("/v1/generate?seed=%3Cb%3EHello%3C/b%3E")
			.to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::OK);
		assert_eq!(
			resp.headers().get(header::CONTENT_TYPE).unwrap(),
			"text/plain; charset=utf-8"
		);
		// "<b>Hello</b>" sanitizes to "bhellob", unknown, so the walk jumps
		let body = test::read_body(resp).await;
		let text = std::str::from_utf8(&body).unwrap();
		assert!(text.starts_with("Bhellob"), "{}", text);
		assert!(!text.contains('<'), "{}", text);
	}

	#[actix_web::test]
	async fn v1_generate_rejects_markup_only_seed() {
		let data = shared(&["hello there"]);
		let app = test::init_service(App::new().app_data(data).configure(configure)).await;
		let req = test::TestRequest::get().uri("/v1/generate?seed=%3C%2F%3E").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn v1_generate_caps_word_count() {
		let data = shared(&["hello there"]);
		let app = test::init_service(App::new().app_data(data).configure(configure)).await;

		let req = test::TestRequest::get().uri("/v1/generate?word_count=1001").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

		let req = test::TestRequest::get().uri("/v1/generate?word_count=1000").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::OK);
	}

	#[actix_web::test]
	async fn empty_model_is_unavailable() {
		let app = test::init_service(App::new().app_data(shared(&[])).configure(configure)).await;
		let req = test::TestRequest::post().uri("/generate").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
	}
}
