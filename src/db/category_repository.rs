use async_trait::async_trait;

use crate::db::models::Category;
use crate::error::AppError;

/// Repository trait for category operations.
///
/// This trait allows mocking the database layer in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Find a category by its (lowercased) name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, AppError>;

    /// Insert a new category.
    async fn insert(&self, category: Category) -> Result<(), AppError>;

    /// Union `subcategories` into an existing category's set.
    async fn add_subcategories(&self, name: &str, subcategories: &[String]) -> Result<(), AppError>;

    /// List all categories, sorted by name.
    async fn list_all(&self) -> Result<Vec<Category>, AppError>;
}

/// MongoDB implementation of the CategoryRepository.
///
/// The collection carries no unique index on `name`; concurrent first-time
/// upserts of the same name can both insert.
pub struct MongoCategoryRepository {
    collection: mongodb::Collection<Category>,
}

impl MongoCategoryRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("categories"),
        }
    }
}

#[async_trait]
impl CategoryRepository for MongoCategoryRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, AppError> {
        use mongodb::bson::doc;

        Ok(self.collection.find_one(doc! { "name": name }).await?)
    }

    async fn insert(&self, category: Category) -> Result<(), AppError> {
        self.collection.insert_one(&category).await?;

        Ok(())
    }

    async fn add_subcategories(&self, name: &str, subcategories: &[String]) -> Result<(), AppError> {
        use mongodb::bson::doc;

        self.collection
            .update_one(
                doc! { "name": name },
                doc! { "$addToSet": { "subcategories": { "$each": subcategories.to_vec() } } },
            )
            .await?;

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Category>, AppError> {
        use futures::TryStreamExt;
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        let options = FindOptions::builder().sort(doc! { "name": 1 }).build();

        let mut cursor = self
            .collection
            .find(doc! {})
            .with_options(options)
            .await?;

        let mut categories = Vec::new();
        while let Some(category) = cursor
            .try_next()
            .await?
        {
            categories.push(category);
        }

        Ok(categories)
    }
}
