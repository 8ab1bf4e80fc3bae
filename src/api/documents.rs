use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::validation::{self, FieldErrors};
use crate::app::AppState;
use crate::db::category_repository::CategoryRepository;
use crate::db::models::{Document, DocumentPatch, DocumentStatus};
use crate::db::repository::DocumentRepository;
use crate::error::AppError;
use crate::taxonomy;

/// Request payload for `POST /documents`.
///
/// Fields stay raw so that validation can report every problem at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateDocumentRequest {
    pub title: Option<Value>,
    pub description: Option<Value>,
    pub url: Option<Value>,
    pub category: Option<Value>,
    pub tags: Option<Value>,
    pub status: Option<Value>,
}

/// Request payload for `PUT /documents/{id}`. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDocumentRequest {
    pub title: Option<Value>,
    pub description: Option<Value>,
    pub url: Option<Value>,
    pub category: Option<Value>,
    pub tags: Option<Value>,
    pub status: Option<Value>,
    /// Legacy clients send the category as the first element of this array.
    pub subcategories: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocumentResponse {
    pub message: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentResponse {
    pub message: String,
    pub modified_count: u64,
}

/// A document as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub category: String,
    pub tags: Vec<String>,
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Document> for DocumentView {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id.to_hex(),
            title: doc.title,
            description: doc.description,
            url: doc.url,
            category: doc.category,
            tags: doc.tags,
            status: doc.status,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentListResponse {
    pub total_documents: usize,
    pub results: Vec<DocumentView>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListDocumentsQuery {
    /// Comma-separated category filter.
    pub categories: Option<String>,
}

/// Parse a path identifier as a store key.
pub fn parse_document_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id.trim())
        .map_err(|_| AppError::BadRequest(format!("Invalid document id '{}'", id)))
}

/// Validate a create payload into a new document stamped with `now`.
pub fn validate_new_document(
    request: &CreateDocumentRequest,
    now: DateTime<Utc>,
) -> Result<Document, AppError> {
    let mut errors = FieldErrors::new();

    let title = validation::required_string(&mut errors, "title", request.title.as_ref());
    let description =
        validation::required_string(&mut errors, "description", request.description.as_ref());
    let category =
        validation::required_category(&mut errors, "category", request.category.as_ref());
    validation::require_present(&mut errors, "tags", &request.tags);
    let status = validation::required_status(&mut errors, request.status.as_ref());
    let url = validation::optional_url(&mut errors, request.url.as_ref());
    let tags = validation::tag_list(request.tags.as_ref());

    match (title, description, category, status) {
        (Some(title), Some(description), Some(category), Some(status)) if errors.is_empty() => {
            Ok(Document {
                id: ObjectId::new(),
                title,
                description,
                url,
                category,
                tags,
                status,
                created_at: now,
                updated_at: None,
            })
        }
        _ => Err(errors.into_error()),
    }
}

/// Validate an update payload into a patch holding only the supplied fields.
pub fn validate_patch(request: &UpdateDocumentRequest) -> Result<DocumentPatch, AppError> {
    let mut errors = FieldErrors::new();
    let mut patch = DocumentPatch::default();

    if validation::is_supplied(&request.title) {
        patch.title = validation::required_string(&mut errors, "title", request.title.as_ref());
    }
    if validation::is_supplied(&request.description) {
        patch.description =
            validation::required_string(&mut errors, "description", request.description.as_ref());
    }
    if validation::is_supplied(&request.url) {
        patch.url = Some(validation::optional_url(&mut errors, request.url.as_ref()));
    }
    if validation::is_supplied(&request.category) {
        patch.category =
            validation::required_category(&mut errors, "category", request.category.as_ref());
    } else if let Some(Value::Array(subs)) = &request.subcategories {
        // Kept for older clients: a leading string subcategory names the category.
        // Anything else in that slot is ignored.
        if let Some(Value::String(first)) = subs.first() {
            if !first.trim().is_empty() {
                patch.category = Some(taxonomy::normalize_key(first));
            }
        }
    }
    if validation::is_supplied(&request.tags) {
        patch.tags = Some(validation::tag_list(request.tags.as_ref()));
    }
    if validation::is_supplied(&request.status) {
        patch.status = validation::required_status(&mut errors, request.status.as_ref());
    }

    if errors.is_empty() && patch.is_empty() {
        return Err(AppError::BadRequest(
            "Request body contains no updatable fields".into(),
        ));
    }

    errors.finish(patch)
}

/// Core document creation logic, separated from the HTTP layer for testability.
pub async fn process_create_document(
    repo: &dyn DocumentRepository,
    request: CreateDocumentRequest,
) -> Result<CreateDocumentResponse, AppError> {
    let doc = validate_new_document(&request, Utc::now())?;
    let id = doc.id.to_hex();

    repo.insert(doc).await?;
    tracing::info!(%id, "document created");

    Ok(CreateDocumentResponse {
        message: "Document created successfully".to_string(),
        id,
    })
}

/// Core partial-update logic.
pub async fn process_update_document(
    repo: &dyn DocumentRepository,
    id: &str,
    request: UpdateDocumentRequest,
) -> Result<UpdateDocumentResponse, AppError> {
    let id = parse_document_id(id)?;
    let patch = validate_patch(&request)?;

    let outcome = repo.update_fields(&id, patch, Utc::now()).await?;
    if outcome.matched == 0 {
        return Err(AppError::NotFound(format!("Document '{}' not found", id)));
    }

    tracing::info!(id = %id, modified = outcome.modified, "document updated");

    Ok(UpdateDocumentResponse {
        message: "Document updated successfully".to_string(),
        modified_count: outcome.modified,
    })
}

/// Core listing logic: published documents in the resolved category set.
pub async fn process_list_documents(
    repo: &dyn DocumentRepository,
    categories: &dyn CategoryRepository,
    filter: Option<&str>,
) -> Result<DocumentListResponse, AppError> {
    let known = taxonomy::known_categories(&categories.list_all().await?);
    let resolved = taxonomy::resolve_filter(filter, &known)?;

    tracing::debug!(categories = ?resolved, "listing published documents");

    let results: Vec<DocumentView> = repo
        .list_by_status(DocumentStatus::Published, &resolved)
        .await?
        .into_iter()
        .map(DocumentView::from)
        .collect();

    Ok(DocumentListResponse {
        total_documents: results.len(),
        results,
    })
}

/// Core lookup logic; status is not considered.
pub async fn process_get_document(
    repo: &dyn DocumentRepository,
    id: &str,
) -> Result<DocumentView, AppError> {
    let id = parse_document_id(id)?;

    repo.find_by_id(&id)
        .await?
        .map(DocumentView::from)
        .ok_or_else(|| AppError::NotFound(format!("Document '{}' not found", id)))
}

/// Axum handler for `POST /documents`.
pub async fn create_document_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateDocumentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateDocumentResponse>), AppError> {
    let Json(request) = payload?;
    let response = process_create_document(state.document_repo.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Axum handler for `PUT /documents/{id}`.
pub async fn update_document_handler(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateDocumentRequest>, JsonRejection>,
) -> Result<Json<UpdateDocumentResponse>, AppError> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let response = process_update_document(state.document_repo.as_ref(), &id, request).await?;
    Ok(Json(response))
}

/// Axum handler for `GET /documents`.
pub async fn list_documents_handler(
    State(state): State<AppState>,
    query: Result<Query<ListDocumentsQuery>, QueryRejection>,
) -> Result<Json<DocumentListResponse>, AppError> {
    let Query(query) = query?;
    let response = process_list_documents(
        state.document_repo.as_ref(),
        state.category_repo.as_ref(),
        query.categories.as_deref(),
    )
    .await?;
    Ok(Json(response))
}

/// Axum handler for `GET /documents/{id}`.
pub async fn get_document_handler(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<DocumentView>, AppError> {
    let Path(id) = id?;
    let response = process_get_document(state.document_repo.as_ref(), &id).await?;
    Ok(Json(response))
}
