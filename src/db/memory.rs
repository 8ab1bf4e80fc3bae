//! In-memory repositories backing the unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};

use crate::db::category_repository::CategoryRepository;
use crate::db::models::{
    Category, Document, DocumentPatch, DocumentStatus, Technology, UpdateOutcome,
};
use crate::db::repository::DocumentRepository;
use crate::db::technology_repository::TechnologyRepository;
use crate::error::AppError;

#[derive(Default)]
pub struct MemoryDocumentRepository {
    pub documents: Mutex<Vec<Document>>,
}

#[async_trait]
impl DocumentRepository for MemoryDocumentRepository {
    async fn insert(&self, doc: Document) -> Result<(), AppError> {
        self.documents.lock().unwrap().push(doc);
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Document>, AppError> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .find(|d| &d.id == id)
            .cloned())
    }

    async fn list_by_status(
        &self,
        status: DocumentStatus,
        categories: &[String],
    ) -> Result<Vec<Document>, AppError> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.status == status && categories.contains(&d.category))
            .cloned()
            .collect())
    }

    async fn update_fields(
        &self,
        id: &ObjectId,
        patch: DocumentPatch,
        now: DateTime<Utc>,
    ) -> Result<UpdateOutcome, AppError> {
        let mut docs = self.documents.lock().unwrap();
        match docs.iter_mut().find(|d| &d.id == id) {
            // `updatedAt` always changes, so a match is always a modification.
            Some(doc) => {
                patch.apply_to(doc, now);
                Ok(UpdateOutcome {
                    matched: 1,
                    modified: 1,
                })
            }
            None => Ok(UpdateOutcome {
                matched: 0,
                modified: 0,
            }),
        }
    }
}

#[derive(Default)]
pub struct MemoryCategoryRepository {
    pub categories: Mutex<Vec<Category>>,
}

impl MemoryCategoryRepository {
    pub fn with(categories: Vec<Category>) -> Self {
        Self {
            categories: Mutex::new(categories),
        }
    }
}

#[async_trait]
impl CategoryRepository for MemoryCategoryRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, AppError> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn insert(&self, category: Category) -> Result<(), AppError> {
        self.categories.lock().unwrap().push(category);
        Ok(())
    }

    async fn add_subcategories(&self, name: &str, subcategories: &[String]) -> Result<(), AppError> {
        let mut categories = self.categories.lock().unwrap();
        if let Some(category) = categories.iter_mut().find(|c| c.name == name) {
            for sub in subcategories {
                if !category.subcategories.contains(sub) {
                    category.subcategories.push(sub.clone());
                }
            }
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Category>, AppError> {
        let mut categories = self.categories.lock().unwrap().clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}

#[derive(Default)]
pub struct MemoryTechnologyRepository {
    pub technologies: Mutex<Vec<Technology>>,
}

#[async_trait]
impl TechnologyRepository for MemoryTechnologyRepository {
    async fn find_by_name_or_label(
        &self,
        name: &str,
        label: &str,
    ) -> Result<Option<Technology>, AppError> {
        Ok(self
            .technologies
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.name == name || t.label == label)
            .cloned())
    }

    async fn insert(&self, technology: Technology) -> Result<(), AppError> {
        self.technologies.lock().unwrap().push(technology);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Technology>, AppError> {
        let mut technologies = self.technologies.lock().unwrap().clone();
        technologies.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(technologies)
    }
}
