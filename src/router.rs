use axum::routing::{delete, get, post, Router};
use tower_http::cors::CorsLayer;

use crate::{bookings, db_client::DbClient, vehicles};

async fn liveness() -> &'static str {
	"Vehicle rental server is running"
}

pub fn app(db: DbClient) -> Router {
	Router::new()
		.route("/", get(liveness))
		.route("/vehicles", get(vehicles::get_vehicles).post(vehicles::add_vehicle))
		.route(
			"/vehicles/:id",
			get(vehicles::get_vehicle).put(vehicles::update_vehicle).delete(vehicles::delete_vehicle),
		)
		.route("/my-vehicles", get(vehicles::my_vehicles))
		.route("/bookings", post(bookings::create_booking))
		.route("/bookings/:id", delete(bookings::cancel_booking))
		.route("/my-bookings", get(bookings::my_bookings))
		.layer(CorsLayer::permissive())
		.with_state(db)
}
