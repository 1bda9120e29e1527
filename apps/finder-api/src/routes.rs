use std::any::Any;

use axum::{
	Json, Router,
	body::Bytes,
	extract::State,
	http::{
		HeaderValue, StatusCode,
		header::{
			ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
			ACCESS_CONTROL_ALLOW_ORIGIN,
		},
	},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, set_header::SetResponseHeaderLayer};
use tracing::Instrument;
use uuid::Uuid;

use finder_service::{AssistRequest, AssistResponse, Error as ServiceError};

use crate::state::AppState;

pub const INTERNAL_ERROR: &str = "Something went wrong. Please try again.";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/", post(assist_handler).options(preflight))
		.route("/v1/assist", post(assist_handler).options(preflight))
		.with_state(state)
		.layer(CatchPanicLayer::custom(panic_response))
		.layer(SetResponseHeaderLayer::overriding(
			ACCESS_CONTROL_ALLOW_ORIGIN,
			HeaderValue::from_static("*"),
		))
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn preflight() -> impl IntoResponse {
	(
		StatusCode::NO_CONTENT,
		[
			(ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
			(ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
		],
	)
}

async fn assist_handler(
	State(state): State<AppState>,
	body: Bytes,
) -> Result<Json<AssistResponse>, ApiError> {
	let request_id = Uuid::new_v4();
	let span = tracing::info_span!("assist", %request_id);

	async move {
		let request = AssistRequest::from_slice(&body)?;
		let response = state.service.assist(request).await?;

		Ok(Json(response))
	}
	.instrument(span)
	.await
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
	let detail = panic
		.downcast_ref::<String>()
		.map(String::as_str)
		.or_else(|| panic.downcast_ref::<&str>().copied())
		.unwrap_or("unknown panic payload");

	tracing::error!(panic = detail, "Request handler panicked.");

	ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR).into_response()
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, message: impl Into<String>) -> Self {
		Self { status, message: message.into() }
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } => Self::new(StatusCode::BAD_REQUEST, message),
			ServiceError::NotConfigured { message } => {
				Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		(self.status, Json(json!({ "error": self.message }))).into_response()
	}
}
