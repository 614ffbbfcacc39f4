use axum::{
	extract::{
		rejection::{JsonRejection, PathRejection, QueryRejection},
		Path, Query, State,
	},
	Json,
};
use bson::{doc, oid::ObjectId, DateTime};
use chrono::{NaiveDate, NaiveDateTime, Utc};

use crate::{
	api::{hex_id, json_body, non_empty, path_param, query_params, rfc3339, EmailQuery, MessageBody},
	db_client::{decode_all, newest_first, parse_id, DbClient},
	error::ApiError,
};

const DEFAULT_STATUS: &str = "pending";

#[derive(serde::Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
	pub vehicle_id: Option<String>,
	pub user_email: Option<String>,
	pub start_date: Option<String>,
	pub end_date: Option<String>,
	pub status: Option<String>,
}

#[derive(serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
	#[serde(rename = "_id", serialize_with = "hex_id")]
	pub id: ObjectId,
	pub vehicle_id: String,
	pub user_email: String,
	#[serde(serialize_with = "rfc3339")]
	pub start_date: DateTime,
	#[serde(serialize_with = "rfc3339")]
	pub end_date: DateTime,
	pub status: String,
	#[serde(serialize_with = "rfc3339")]
	pub created_at: DateTime,
}

#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreated {
	success: bool,
	message: &'static str,
	booking_id: String,
}

const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Accepts an RFC 3339 timestamp, a timestamp without offset or a bare `YYYY-MM-DD`.
/// Values without an offset are read as UTC, bare dates as midnight.
fn parse_date(raw: &str) -> Option<DateTime> {
	let raw = raw.trim();
	if let Ok(at) = chrono::DateTime::parse_from_rfc3339(raw) {
		return Some(DateTime::from_chrono(at.with_timezone(&Utc)));
	}
	if let Some(at) = LOCAL_FORMATS.iter().find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok()) {
		return Some(DateTime::from_chrono(at.and_utc()));
	}
	let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
	Some(DateTime::from_chrono(day.and_hms_opt(0, 0, 0)?.and_utc()))
}

pub async fn create_booking(
	db: State<DbClient>,
	body: Result<Json<NewBooking>, JsonRejection>,
) -> Result<Json<BookingCreated>, ApiError> {
	let booking = json_body(body)?;
	let (Some(vehicle_id), Some(user_email), Some(start), Some(end)) = (
		non_empty(&booking.vehicle_id),
		non_empty(&booking.user_email),
		non_empty(&booking.start_date),
		non_empty(&booking.end_date),
	) else {
		return Err(ApiError::validation(
			"vehicleId, userEmail, startDate and endDate are required",
		));
	};
	let (Some(start_date), Some(end_date)) = (parse_date(start), parse_date(end)) else {
		return Err(ApiError::validation("Invalid date format"));
	};
	let status = non_empty(&booking.status).unwrap_or(DEFAULT_STATUS);

	let id = db
		.bookings
		.insert_one(doc! {
			"vehicleId": vehicle_id,
			"userEmail": user_email,
			"startDate": start_date,
			"endDate": end_date,
			"status": status,
			"createdAt": DateTime::now(),
		})
		.await?;
	log::info!("booking {} created for vehicle {} by {}", id, vehicle_id, user_email);
	Ok(Json(BookingCreated {
		success: true,
		message: "Booking created successfully",
		booking_id: id.to_hex(),
	}))
}

pub async fn my_bookings(
	db: State<DbClient>,
	query: Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<Vec<Booking>>, ApiError> {
	let query = query_params(query)?;
	let email = query.required()?;
	let docs = db.bookings.find(doc! { "userEmail": email }, newest_first()).await?;
	Ok(Json(decode_all(docs)?))
}

/// Cancelling a booking removes it outright.
pub async fn cancel_booking(
	db: State<DbClient>,
	id: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageBody>, ApiError> {
	let id = parse_id(&path_param(id)?, "Invalid booking id")?;
	if db.bookings.delete_one(doc! { "_id": id }).await? == 0 {
		return Err(ApiError::not_found("Booking not found"));
	}
	log::info!("booking {} cancelled", id);
	Ok(Json(MessageBody::ok("Booking cancelled successfully")))
}
