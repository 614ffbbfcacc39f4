use axum::{
	response::{IntoResponse, Response},
	Json,
};
use hyper::StatusCode;
use thiserror::Error;

use crate::api::ErrorBody;

/// Failure of a single request, mapped to a status code at the handler boundary.
#[derive(Error, Debug)]
pub enum ApiError {
	/// Missing or malformed client input, detected before touching the store.
	#[error("{0}")]
	Validation(String),

	/// Well-formed identifier that matches no document.
	#[error("{0}")]
	NotFound(String),

	/// Store or decoding failure. Logged, never shown to the caller.
	#[error(transparent)]
	Internal(#[from] anyhow::Error),
}

impl ApiError {
	pub fn validation(msg: impl Into<String>) -> Self {
		ApiError::Validation(msg.into())
	}

	pub fn not_found(msg: impl Into<String>) -> Self {
		ApiError::NotFound(msg.into())
	}

	pub fn status(&self) -> StatusCode {
		match self {
			ApiError::Validation(_) => StatusCode::BAD_REQUEST,
			ApiError::NotFound(_) => StatusCode::NOT_FOUND,
			ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl From<bson::de::Error> for ApiError {
	fn from(err: bson::de::Error) -> Self {
		ApiError::Internal(err.into())
	}
}

impl From<bson::ser::Error> for ApiError {
	fn from(err: bson::ser::Error) -> Self {
		ApiError::Internal(err.into())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = self.status();
		let error = match self {
			ApiError::Validation(msg) | ApiError::NotFound(msg) => msg,
			ApiError::Internal(err) => {
				log::error!("internal error: {:#}", err);
				"Internal server error".to_string()
			}
		};
		(status, Json(ErrorBody::new(error))).into_response()
	}
}
