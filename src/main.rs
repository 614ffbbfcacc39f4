use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;

mod api;
mod bookings;
mod config;
mod db_client;
mod error;
mod router;
mod vehicles;

use config::Config;
use db_client::DbClient;

#[tokio::main]
async fn main() {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	if let Err(err) = run().await {
		log::error!("{:#}", err);
		std::process::exit(1);
	}
}

async fn run() -> anyhow::Result<()> {
	let config = Config::from_env()?;
	let db = DbClient::connect(&config).await?;
	log::info!("connected to database {}", config.db_name);

	let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
	let listener = TcpListener::bind(addr).await.with_context(|| format!("failed to bind {}", addr))?;
	log::info!("listening on {}", addr);

	axum::serve(listener, router::app(db)).with_graceful_shutdown(shutdown_signal()).await?;
	log::info!("server stopped");
	Ok(())
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = tokio::signal::ctrl_c().await {
			log::error!("failed to listen for ctrl-c: {}", e);
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
			Ok(mut signal) => {
				signal.recv().await;
			}
			Err(e) => {
				log::error!("failed to listen for SIGTERM: {}", e);
				std::future::pending::<()>().await;
			}
		}
	};
	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
	log::info!("shutting down");
}
