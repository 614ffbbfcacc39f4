use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_NAME: &str = "vehicle_rental";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
	#[error("Missing environment variable: {0}")]
	MissingEnvVar(String),

	#[error("Invalid value '{value}' for environment variable {name}")]
	InvalidEnvVar { name: String, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
	pub port: u16,
	pub mongodb_uri: String,
	pub db_name: String,
}

impl Config {
	/// Reads the listen port and database settings, honouring an optional `.env` file.
	pub fn from_env() -> Result<Self, ConfigError> {
		let _ = dotenvy::dotenv();
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		let port = match lookup("PORT") {
			Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidEnvVar {
				name: "PORT".to_string(),
				value,
			})?,
			None => DEFAULT_PORT,
		};
		let mongodb_uri = lookup("MONGODB_URI")
			.filter(|uri| !uri.trim().is_empty())
			.ok_or_else(|| ConfigError::MissingEnvVar("MONGODB_URI".to_string()))?;
		let db_name = lookup("DB_NAME")
			.filter(|name| !name.trim().is_empty())
			.unwrap_or_else(|| DEFAULT_DB_NAME.to_string());

		Ok(Config { port, mongodb_uri, db_name })
	}
}
