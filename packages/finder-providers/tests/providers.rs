use std::sync::{Arc, Mutex};

use axum::{
	Json, Router,
	extract::{Query, State},
	http::{HeaderMap, StatusCode},
	response::IntoResponse,
	routing,
};
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use tokio::{net::TcpListener, sync::oneshot};

use finder_config::{LlmProviderConfig, SearchProviderConfig};

#[derive(Clone, Default)]
struct Captured {
	requests: Arc<Mutex<Vec<(HeaderMap, Value, Option<String>)>>>,
}
impl Captured {
	fn last(&self) -> (HeaderMap, Value, Option<String>) {
		self.requests
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.last()
			.cloned()
			.expect("Mock server received no request.")
	}
}

async fn spawn_mock(app: Router) -> (String, oneshot::Sender<()>) {
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind mock server.");
	let addr = listener.local_addr().expect("Failed to read mock server address.");
	let (tx, rx) = oneshot::channel();
	let server = axum::serve(listener, app).with_graceful_shutdown(async move {
		let _ = rx.await;
	});

	tokio::spawn(async move {
		let _ = server.into_future().await;
	});

	(format!("http://{addr}"), tx)
}

async fn search_handler(
	State(captured): State<Captured>,
	Query(params): Query<Vec<(String, String)>>,
	headers: HeaderMap,
	Json(payload): Json<Value>,
) -> impl IntoResponse {
	let version = params.into_iter().find(|(key, _)| key == "api-version").map(|(_, value)| value);

	captured.requests.lock().unwrap_or_else(|err| err.into_inner()).push((
		headers,
		payload,
		version,
	));

	Json(serde_json::json!({
		"value": [
			{ "@search.score": 3.1, "id": "p-1", "name": "Senior Shuttle", "city": "Oakland" },
			{ "@search.score": 1.2, "id": "p-2", "name": "Paratransit", "areas": ["Bay Area"] }
		]
	}))
}

async fn model_handler(
	State(captured): State<Captured>,
	headers: HeaderMap,
	Json(payload): Json<Value>,
) -> impl IntoResponse {
	captured.requests.lock().unwrap_or_else(|err| err.into_inner()).push((headers, payload, None));

	Json(serde_json::json!({
		"result": { "response": "senior transportation rides\n" },
		"success": true
	}))
}

async fn failing_handler() -> impl IntoResponse {
	StatusCode::INTERNAL_SERVER_ERROR
}

fn search_config(endpoint: String) -> SearchProviderConfig {
	SearchProviderConfig {
		endpoint: Some(endpoint),
		api_key: Some("search-secret".to_string()),
		index: Some("programs".to_string()),
		..SearchProviderConfig::default()
	}
}

fn llm_config(api_base: String) -> LlmProviderConfig {
	LlmProviderConfig {
		api_base,
		account_id: Some("acct".to_string()),
		api_token: Some("model-secret".to_string()),
		model: "test-model".to_string(),
		..LlmProviderConfig::default()
	}
}

#[test]
fn builds_bearer_auth_header() {
	let headers = finder_providers::bearer_headers("secret").expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn builds_api_key_header() {
	let headers = finder_providers::api_key_headers("secret").expect("Failed to build headers.");

	assert_eq!(headers.get("api-key").expect("Missing api-key header."), "secret");
}

#[tokio::test]
async fn search_posts_query_and_parses_matches() {
	let captured = Captured::default();
	let app = Router::new()
		.route("/indexes/programs/docs/search", routing::post(search_handler))
		.with_state(captured.clone());
	let (endpoint, shutdown) = spawn_mock(app).await;
	let cfg = search_config(endpoint);
	let backend = cfg.backend().expect("Search backend must be configured.");
	let records = finder_providers::search::search(backend, "senior rides", Some("city eq 'Oakland'"))
		.await
		.expect("Search must succeed.");

	assert_eq!(records.len(), 2);
	assert_eq!(records[0].id, "p-1");
	assert_eq!(records[0].city.as_deref(), Some("Oakland"));

	let (headers, body, version) = captured.last();

	assert_eq!(headers.get("api-key").expect("Missing api-key header."), "search-secret");
	assert_eq!(version.as_deref(), Some("2023-11-01"));
	assert_eq!(body["search"], "senior rides");
	assert_eq!(body["top"], 10);
	assert_eq!(body["filter"], "city eq 'Oakland'");
	assert_eq!(body["select"], "id,name,category,description,groups,areas,city,website,phone");

	let _ = shutdown.send(());
}

#[tokio::test]
async fn search_reports_non_success_status() {
	let app = Router::new().route("/indexes/programs/docs/search", routing::post(failing_handler));
	let (endpoint, shutdown) = spawn_mock(app).await;
	let cfg = search_config(endpoint);
	let backend = cfg.backend().expect("Search backend must be configured.");
	let result = finder_providers::search::search(backend, "food", None).await;

	assert!(matches!(result, Err(finder_providers::Error::Reqwest(_))));

	let _ = shutdown.send(());
}

#[tokio::test]
async fn keyword_extraction_sends_chat_payload() {
	let captured = Captured::default();
	let app = Router::new()
		.route("/acct/ai/run/test-model", routing::post(model_handler))
		.with_state(captured.clone());
	let (api_base, shutdown) = spawn_mock(app).await;
	let cfg = llm_config(api_base);
	let messages = vec![
		serde_json::json!({ "role": "system", "content": "Extract keywords." }),
		serde_json::json!({ "role": "user", "content": "my grandma needs a ride" }),
	];
	let keywords = finder_providers::keywords::extract_keywords(&cfg, &messages)
		.await
		.expect("Keyword extraction must succeed.");

	assert_eq!(keywords, "senior transportation rides");

	let (headers, body, _) = captured.last();

	assert_eq!(
		headers.get(AUTHORIZATION).expect("Missing authorization header."),
		"Bearer model-secret"
	);
	assert_eq!(body["messages"].as_array().map(Vec::len), Some(2));
	assert_eq!(body["max_tokens"], 50);
	assert!(body["temperature"].as_f64().is_some_and(|value| value < 0.2));

	let _ = shutdown.send(());
}

#[tokio::test]
async fn keyword_extraction_requires_credentials() {
	let cfg = LlmProviderConfig::default();
	let result = finder_providers::keywords::extract_keywords(&cfg, &[]).await;

	assert!(matches!(result, Err(finder_providers::Error::InvalidConfig { .. })));
}

#[tokio::test]
async fn keyword_extraction_reports_server_errors() {
	let app = Router::new().route("/acct/ai/run/test-model", routing::post(failing_handler));
	let (api_base, shutdown) = spawn_mock(app).await;
	let cfg = llm_config(api_base);
	let result = finder_providers::keywords::extract_keywords(&cfg, &[]).await;

	assert!(result.is_err());

	let _ = shutdown.send(());
}
