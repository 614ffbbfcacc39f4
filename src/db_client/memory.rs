//! In-process stand-ins for the MongoDB collections, used by the handler tests.

use std::cmp::Ordering;

use anyhow::anyhow;
use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};
use tokio::sync::Mutex;

use super::{DocumentCollection, UpdateCounts};

#[derive(Default)]
pub struct MemoryCollection {
	docs: Mutex<Vec<Document>>,
}

impl MemoryCollection {
	pub async fn len(&self) -> usize {
		self.docs.lock().await.len()
	}
}

fn matches(doc: &Document, filter: &Document) -> bool {
	filter.iter().all(|(key, value)| doc.get(key) == Some(value))
}

// Only datetime sort keys are needed by the handlers.
fn compare(a: &Document, b: &Document, key: &str) -> Ordering {
	a.get_datetime(key).ok().cmp(&b.get_datetime(key).ok())
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
	async fn insert_one(&self, mut doc: Document) -> anyhow::Result<ObjectId> {
		let id = ObjectId::new();
		doc.insert("_id", id);
		self.docs.lock().await.push(doc);
		Ok(id)
	}

	async fn find(&self, filter: Document, sort: Document) -> anyhow::Result<Vec<Document>> {
		let mut found: Vec<Document> =
			self.docs.lock().await.iter().filter(|doc| matches(doc, &filter)).cloned().collect();
		if let Some((key, direction)) = sort.iter().next() {
			let descending = matches!(direction, Bson::Int32(-1) | Bson::Int64(-1));
			found.sort_by(|a, b| {
				let ord = compare(a, b, key);
				if descending {
					ord.reverse()
				} else {
					ord
				}
			});
		}
		Ok(found)
	}

	async fn find_one(&self, filter: Document) -> anyhow::Result<Option<Document>> {
		Ok(self.docs.lock().await.iter().find(|doc| matches(doc, &filter)).cloned())
	}

	async fn update_one(&self, filter: Document, update: Document) -> anyhow::Result<UpdateCounts> {
		let mut docs = self.docs.lock().await;
		let Some(doc) = docs.iter_mut().find(|doc| matches(doc, &filter)) else {
			return Ok(UpdateCounts { matched: 0, modified: 0 });
		};
		let set = update.get_document("$set").map_err(|_| anyhow!("only $set updates are supported"))?;
		let mut modified = 0;
		for (key, value) in set {
			if doc.get(key) != Some(value) {
				doc.insert(key.clone(), value.clone());
				modified = 1;
			}
		}
		Ok(UpdateCounts { matched: 1, modified })
	}

	async fn delete_one(&self, filter: Document) -> anyhow::Result<u64> {
		let mut docs = self.docs.lock().await;
		match docs.iter().position(|doc| matches(doc, &filter)) {
			Some(pos) => {
				docs.remove(pos);
				Ok(1)
			}
			None => Ok(0),
		}
	}
}

/// Every operation fails as if the connection had dropped.
pub struct FailingCollection;

#[async_trait]
impl DocumentCollection for FailingCollection {
	async fn insert_one(&self, _doc: Document) -> anyhow::Result<ObjectId> {
		Err(anyhow!("connection refused"))
	}

	async fn find(&self, _filter: Document, _sort: Document) -> anyhow::Result<Vec<Document>> {
		Err(anyhow!("connection refused"))
	}

	async fn find_one(&self, _filter: Document) -> anyhow::Result<Option<Document>> {
		Err(anyhow!("connection refused"))
	}

	async fn update_one(&self, _filter: Document, _update: Document) -> anyhow::Result<UpdateCounts> {
		Err(anyhow!("connection refused"))
	}

	async fn delete_one(&self, _filter: Document) -> anyhow::Result<u64> {
		Err(anyhow!("connection refused"))
	}
}
