use std::sync::Arc;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{options::FindOptions, Client, Collection};
use serde::de::DeserializeOwned;

use crate::{config::Config, error::ApiError};

#[cfg(test)]
pub mod memory;

pub const VEHICLES: &str = "vehicles";
pub const BOOKINGS: &str = "bookings";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateCounts {
	pub matched: u64,
	pub modified: u64,
}

/// A named set of documents. Each call maps onto exactly one store operation.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
	/// Inserts the document and returns the identifier the store generated for it.
	async fn insert_one(&self, doc: Document) -> anyhow::Result<ObjectId>;
	/// All documents equal to `filter` on every given key, ordered by `sort`.
	async fn find(&self, filter: Document, sort: Document) -> anyhow::Result<Vec<Document>>;
	async fn find_one(&self, filter: Document) -> anyhow::Result<Option<Document>>;
	async fn update_one(&self, filter: Document, update: Document) -> anyhow::Result<UpdateCounts>;
	/// Returns the number of documents removed (0 or 1).
	async fn delete_one(&self, filter: Document) -> anyhow::Result<u64>;
}

pub struct MongoCollection(Collection<Document>);

#[async_trait]
impl DocumentCollection for MongoCollection {
	async fn insert_one(&self, doc: Document) -> anyhow::Result<ObjectId> {
		let result = self.0.insert_one(doc, None).await.with_context(|| format!("insert into {}", self.0.name()))?;
		result
			.inserted_id
			.as_object_id()
			.ok_or_else(|| anyhow!("{} returned a non-ObjectId identifier: {}", self.0.name(), result.inserted_id))
	}

	async fn find(&self, filter: Document, sort: Document) -> anyhow::Result<Vec<Document>> {
		let options = FindOptions::builder().sort(sort).build();
		let cursor = self.0.find(filter, options).await.with_context(|| format!("find in {}", self.0.name()))?;
		let docs: Vec<Document> =
			cursor.try_collect().await.with_context(|| format!("read cursor of {}", self.0.name()))?;
		Ok(docs)
	}

	async fn find_one(&self, filter: Document) -> anyhow::Result<Option<Document>> {
		let doc = self.0.find_one(filter, None).await.with_context(|| format!("find_one in {}", self.0.name()))?;
		Ok(doc)
	}

	async fn update_one(&self, filter: Document, update: Document) -> anyhow::Result<UpdateCounts> {
		let result = self
			.0
			.update_one(filter, update, None)
			.await
			.with_context(|| format!("update in {}", self.0.name()))?;
		Ok(UpdateCounts {
			matched: result.matched_count,
			modified: result.modified_count,
		})
	}

	async fn delete_one(&self, filter: Document) -> anyhow::Result<u64> {
		let result = self.0.delete_one(filter, None).await.with_context(|| format!("delete from {}", self.0.name()))?;
		Ok(result.deleted_count)
	}
}

/// Handle to both collections, built once at startup and handed to every handler as router state.
#[derive(Clone)]
pub struct DbClient {
	pub vehicles: Arc<dyn DocumentCollection>,
	pub bookings: Arc<dyn DocumentCollection>,
}

impl DbClient {
	pub fn new(vehicles: Arc<dyn DocumentCollection>, bookings: Arc<dyn DocumentCollection>) -> Self {
		DbClient { vehicles, bookings }
	}

	/// Connects to MongoDB and pings it so a bad URI fails at startup instead of on the first request.
	pub async fn connect(config: &Config) -> anyhow::Result<Self> {
		let client = Client::with_uri_str(&config.mongodb_uri).await.context("invalid MongoDB connection string")?;
		let db = client.database(&config.db_name);
		db.run_command(doc! { "ping": 1 }, None)
			.await
			.with_context(|| format!("failed to reach database {}", config.db_name))?;

		Ok(DbClient::new(
			Arc::new(MongoCollection(db.collection(VEHICLES))),
			Arc::new(MongoCollection(db.collection(BOOKINGS))),
		))
	}
}

/// Listing order for both collections.
pub fn newest_first() -> Document {
	doc! { "createdAt": -1 }
}

pub fn decode_all<T: DeserializeOwned>(docs: Vec<Document>) -> Result<Vec<T>, bson::de::Error> {
	docs.into_iter().map(bson::from_document).collect()
}

/// Parses a path identifier, rejecting anything that is not a store-native id.
pub fn parse_id(raw: &str, invalid_msg: &str) -> Result<ObjectId, ApiError> {
	ObjectId::parse_str(raw.trim()).map_err(|_| ApiError::validation(invalid_msg))
}
