use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};

use crate::db::models::{Document, DocumentPatch, DocumentStatus, UpdateOutcome};
use crate::error::AppError;

/// Repository trait for document operations.
///
/// This trait allows mocking the database layer in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Insert a new document.
    async fn insert(&self, doc: Document) -> Result<(), AppError>;

    /// Find a document by id, regardless of status.
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Document>, AppError>;

    /// List documents with the given status whose category is in `categories`.
    async fn list_by_status(
        &self,
        status: DocumentStatus,
        categories: &[String],
    ) -> Result<Vec<Document>, AppError>;

    /// Write only the fields present in `patch`, stamping `updatedAt`.
    async fn update_fields(
        &self,
        id: &ObjectId,
        patch: DocumentPatch,
        now: DateTime<Utc>,
    ) -> Result<UpdateOutcome, AppError>;
}

/// MongoDB implementation of the DocumentRepository.
pub struct MongoDocumentRepository {
    collection: mongodb::Collection<Document>,
}

impl MongoDocumentRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("documents"),
        }
    }
}

#[async_trait]
impl DocumentRepository for MongoDocumentRepository {
    async fn insert(&self, doc: Document) -> Result<(), AppError> {
        self.collection.insert_one(&doc).await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Document>, AppError> {
        use mongodb::bson::doc;

        Ok(self.collection.find_one(doc! { "_id": *id }).await?)
    }

    async fn list_by_status(
        &self,
        status: DocumentStatus,
        categories: &[String],
    ) -> Result<Vec<Document>, AppError> {
        use futures::TryStreamExt;
        use mongodb::bson::doc;

        let filter = doc! {
            "status": status.as_str(),
            "category": { "$in": categories.to_vec() },
        };

        let cursor = self
            .collection
            .find(filter)
            .await?;

        Ok(cursor.try_collect::<Vec<_>>().await?)
    }

    async fn update_fields(
        &self,
        id: &ObjectId,
        patch: DocumentPatch,
        now: DateTime<Utc>,
    ) -> Result<UpdateOutcome, AppError> {
        use mongodb::bson::{doc, Document as BsonDocument};

        let mut set = BsonDocument::new();
        if let Some(title) = patch.title {
            set.insert("title", title);
        }
        if let Some(description) = patch.description {
            set.insert("description", description);
        }
        if let Some(url) = patch.url {
            set.insert("url", url);
        }
        if let Some(category) = patch.category {
            set.insert("category", category);
        }
        if let Some(tags) = patch.tags {
            set.insert("tags", tags);
        }
        if let Some(status) = patch.status {
            set.insert("status", status.as_str());
        }
        set.insert("updatedAt", bson::DateTime::from_chrono(now));

        let result = self
            .collection
            .update_one(doc! { "_id": *id }, doc! { "$set": set })
            .await?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }
}
