use async_trait::async_trait;

use crate::db::models::Technology;
use crate::error::AppError;

/// Repository trait for the flat technology registry.
#[async_trait]
pub trait TechnologyRepository: Send + Sync {
    /// Find a technology whose name or label matches.
    async fn find_by_name_or_label(
        &self,
        name: &str,
        label: &str,
    ) -> Result<Option<Technology>, AppError>;

    async fn insert(&self, technology: Technology) -> Result<(), AppError>;

    /// List all technologies, sorted by name.
    async fn list_all(&self) -> Result<Vec<Technology>, AppError>;
}

/// MongoDB implementation of the TechnologyRepository.
pub struct MongoTechnologyRepository {
    collection: mongodb::Collection<Technology>,
}

impl MongoTechnologyRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("technologies"),
        }
    }
}

#[async_trait]
impl TechnologyRepository for MongoTechnologyRepository {
    async fn find_by_name_or_label(
        &self,
        name: &str,
        label: &str,
    ) -> Result<Option<Technology>, AppError> {
        use mongodb::bson::doc;

        let filter = doc! { "$or": [ { "name": name }, { "label": label } ] };
        Ok(self.collection.find_one(filter).await?)
    }

    async fn insert(&self, technology: Technology) -> Result<(), AppError> {
        self.collection.insert_one(&technology).await?;

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Technology>, AppError> {
        use futures::TryStreamExt;
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        let options = FindOptions::builder().sort(doc! { "name": 1 }).build();

        let cursor = self
            .collection
            .find(doc! {})
            .with_options(options)
            .await?;

        Ok(cursor.try_collect::<Vec<_>>().await?)
    }
}
