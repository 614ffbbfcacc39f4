use axum::{
	extract::{
		rejection::{JsonRejection, PathRejection, QueryRejection},
		Path, Query, State,
	},
	Json,
};
use bson::{doc, oid::ObjectId, Bson, DateTime, Document};

use crate::{
	api::{hex_id, json_body, non_empty, path_param, query_params, rfc3339, EmailQuery, MessageBody},
	db_client::{decode_all, newest_first, parse_id, DbClient},
	error::ApiError,
};

const INVALID_ID: &str = "Invalid vehicle id";
const NOT_FOUND: &str = "Vehicle not found";

/// The owner-editable part of a vehicle. This is also the allow-list for updates.
///
/// Apart from the name, values are stored and returned as sent, whatever their JSON type.
#[derive(serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct VehicleFields {
	pub vehicle_name: Option<String>,
	pub owner: Option<Bson>,
	pub category: Option<Bson>,
	pub price_per_day: Option<Bson>,
	pub location: Option<Bson>,
	pub availability: Option<Bson>,
	pub description: Option<Bson>,
	pub cover_image: Option<Bson>,
}

#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewVehicle {
	#[serde(flatten)]
	pub fields: VehicleFields,
	pub user_email: Option<String>,
}

#[derive(serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
	#[serde(rename = "_id", serialize_with = "hex_id")]
	pub id: ObjectId,
	pub vehicle_name: Option<String>,
	pub user_email: String,
	pub owner: Option<Bson>,
	pub category: Option<Bson>,
	pub price_per_day: Option<Bson>,
	pub location: Option<Bson>,
	pub availability: Option<Bson>,
	pub description: Option<Bson>,
	pub cover_image: Option<Bson>,
	#[serde(serialize_with = "rfc3339")]
	pub created_at: DateTime,
}

#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VehicleAdded {
	success: bool,
	message: &'static str,
	inserted_id: String,
}

#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VehicleUpdated {
	success: bool,
	message: &'static str,
	modified_count: u64,
}

pub async fn get_vehicles(db: State<DbClient>) -> Result<Json<Vec<Vehicle>>, ApiError> {
	let docs = db.vehicles.find(doc! {}, newest_first()).await?;
	Ok(Json(decode_all(docs)?))
}

pub async fn add_vehicle(
	db: State<DbClient>,
	body: Result<Json<NewVehicle>, JsonRejection>,
) -> Result<Json<VehicleAdded>, ApiError> {
	let vehicle = json_body(body)?;
	let name = non_empty(&vehicle.fields.vehicle_name);
	let (Some(_), Some(user_email)) = (name, non_empty(&vehicle.user_email)) else {
		return Err(ApiError::validation("vehicleName and userEmail are required"));
	};

	// absent optional fields are left out of the stored document
	let mut doc: Document = bson::to_document(&vehicle.fields)?
		.into_iter()
		.filter(|(_, value)| *value != Bson::Null)
		.collect();
	doc.insert("userEmail", user_email);
	doc.insert("createdAt", DateTime::now());

	let id = db.vehicles.insert_one(doc).await?;
	log::info!("vehicle {} added by {}", id, user_email);
	Ok(Json(VehicleAdded {
		success: true,
		message: "Vehicle added successfully",
		inserted_id: id.to_hex(),
	}))
}

pub async fn get_vehicle(
	db: State<DbClient>,
	id: Result<Path<String>, PathRejection>,
) -> Result<Json<Vehicle>, ApiError> {
	let id = parse_id(&path_param(id)?, INVALID_ID)?;
	let Some(doc) = db.vehicles.find_one(doc! { "_id": id }).await? else {
		return Err(ApiError::not_found(NOT_FOUND));
	};
	Ok(Json(bson::from_document(doc)?))
}

pub async fn my_vehicles(
	db: State<DbClient>,
	query: Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<Vec<Vehicle>>, ApiError> {
	let query = query_params(query)?;
	let email = query.required()?;
	let docs = db.vehicles.find(doc! { "userEmail": email }, newest_first()).await?;
	Ok(Json(decode_all(docs)?))
}

/// Overwrites every allow-listed field. Fields missing from the body are stored as null.
pub async fn update_vehicle(
	db: State<DbClient>,
	id: Result<Path<String>, PathRejection>,
	body: Result<Json<VehicleFields>, JsonRejection>,
) -> Result<Json<VehicleUpdated>, ApiError> {
	let id = parse_id(&path_param(id)?, INVALID_ID)?;
	let fields = json_body(body)?;
	let set = bson::to_document(&fields)?;

	let counts = db.vehicles.update_one(doc! { "_id": id }, doc! { "$set": set }).await?;
	if counts.matched == 0 {
		return Err(ApiError::not_found(NOT_FOUND));
	}
	Ok(Json(VehicleUpdated {
		success: true,
		message: "Vehicle updated successfully",
		modified_count: counts.modified,
	}))
}

pub async fn delete_vehicle(
	db: State<DbClient>,
	id: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageBody>, ApiError> {
	let id = parse_id(&path_param(id)?, INVALID_ID)?;
	if db.vehicles.delete_one(doc! { "_id": id }).await? == 0 {
		return Err(ApiError::not_found(NOT_FOUND));
	}
	log::info!("vehicle {} deleted", id);
	Ok(Json(MessageBody::ok("Vehicle deleted successfully")))
}
