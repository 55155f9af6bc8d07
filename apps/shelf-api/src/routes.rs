use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;

use crate::state::AppState;
use shelf_service::{Error, RawSearchRequest, SearchRequest, SearchResponse};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/search", post(search))
		.route("/v1/search/raw", post(search_raw))
		.route("/v1/meta", get(meta))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
	let Json(payload) = payload?;
	let response = state.service.search(payload).await?;

	Ok(Json(response))
}

async fn search_raw(
	State(state): State<AppState>,
	payload: Result<Json<RawSearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
	let Json(payload) = payload?;
	let response = state.service.search_raw(payload).await?;

	Ok(Json(response))
}

async fn meta(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
	let response = state.service.meta().await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: &'static str,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: &'static str, message: impl Into<String>) -> Self {
		Self { status, error_code, message: message.into() }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		let message = err.to_string();

		match err {
			Error::InvalidMode { .. } =>
				Self::new(StatusCode::BAD_REQUEST, "invalid_mode", message),
			Error::MissingVector => Self::new(StatusCode::BAD_REQUEST, "missing_vector", message),
			Error::InvalidRequest { .. } =>
				Self::new(StatusCode::BAD_REQUEST, "invalid_request", message),
			Error::EmbeddingUnavailable { .. } =>
				Self::new(StatusCode::BAD_GATEWAY, "embedding_unavailable", message),
			Error::BackendUnavailable { .. } =>
				Self::new(StatusCode::BAD_GATEWAY, "backend_unavailable", message),
			Error::BackendQueryError { .. } =>
				Self::new(StatusCode::BAD_GATEWAY, "backend_query_error", message),
			Error::InvalidConfig { .. } => {
				tracing::error!(error = %message, "Service is misconfigured.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
			},
		}
	}
}
impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		Self::new(StatusCode::BAD_REQUEST, "invalid_request", rejection.body_text())
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code.to_string(), message: self.message };

		(self.status, Json(body)).into_response()
	}
}
