//! Request and response conventions shared by the vehicle and booking endpoints.

use axum::{
	extract::{
		rejection::{JsonRejection, PathRejection, QueryRejection},
		Path, Query,
	},
	Json,
};
use bson::{oid::ObjectId, DateTime};
use serde::{Serialize, Serializer};

use crate::error::ApiError;

/// Unwraps a JSON body, reporting an undecodable one as a validation failure.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
	body.map(|Json(value)| value).map_err(|rejection| ApiError::validation(rejection.body_text()))
}

pub fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
	query.map(|Query(value)| value).map_err(|rejection| ApiError::validation(rejection.body_text()))
}

pub fn path_param<T>(path: Result<Path<T>, PathRejection>) -> Result<T, ApiError> {
	path.map(|Path(value)| value).map_err(|rejection| ApiError::validation(rejection.body_text()))
}

/// The value, unless it is absent or blank.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
	value.as_deref().filter(|v| !v.trim().is_empty())
}

#[derive(serde::Deserialize, Debug, Default)]
pub struct EmailQuery {
	pub email: Option<String>,
}

impl EmailQuery {
	pub fn required(&self) -> Result<&str, ApiError> {
		non_empty(&self.email).ok_or_else(|| ApiError::validation("email query parameter is required"))
	}
}

#[derive(serde::Serialize, Debug)]
pub struct ErrorBody {
	success: bool,
	error: String,
}

impl ErrorBody {
	pub fn new(error: impl Into<String>) -> Self {
		ErrorBody { success: false, error: error.into() }
	}
}

#[derive(serde::Serialize, Debug)]
pub struct MessageBody {
	success: bool,
	message: &'static str,
}

impl MessageBody {
	pub fn ok(message: &'static str) -> Self {
		MessageBody { success: true, message }
	}
}

/// Writes an identifier as its 24 hex character form.
pub fn hex_id<S: Serializer>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error> {
	id.to_hex().serialize(serializer)
}

/// Writes a stored timestamp as RFC 3339.
pub fn rfc3339<S: Serializer>(at: &DateTime, serializer: S) -> Result<S::Ok, S::Error> {
	at.to_chrono().to_rfc3339_opts(chrono::SecondsFormat::Millis, true).serialize(serializer)
}
