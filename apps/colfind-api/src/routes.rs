use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use colfind_service::{Error, SearchRequest, SearchResponse};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/columns/search", post(search))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
	let Json(payload) = payload.map_err(|err| {
		json_error(StatusCode::BAD_REQUEST, "invalid_request", err.body_text(), None)
	})?;
	let response = state.finder.search(payload).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	pub fn status(&self) -> StatusCode {
		self.status
	}

	pub fn error_code(&self) -> &str {
		&self.error_code
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::EmptyQuery => json_error(
				StatusCode::BAD_REQUEST,
				"empty_query",
				err.to_string(),
				Some(vec!["$.query".to_string()]),
			),
			Error::InvalidConfig { message } => {
				tracing::error!(error = %message, "Search failed on invalid configuration.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, "invalid_config", message, None)
			},
			Error::Provider { message } => {
				tracing::error!(error = %message, "Search failed in a provider call.");

				json_error(StatusCode::BAD_GATEWAY, "provider_error", message, None)
			},
			Error::Storage { message } => {
				tracing::error!(error = %message, "Search failed in storage.");

				json_error(StatusCode::SERVICE_UNAVAILABLE, "storage_unavailable", message, None)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError { status, error_code: code.to_string(), message: message.into(), fields }
}
