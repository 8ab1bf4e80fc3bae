use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::validation::{self, FieldErrors};
use crate::app::AppState;
use crate::db::category_repository::CategoryRepository;
use crate::db::models::Category;
use crate::error::AppError;
use crate::taxonomy;

/// Request payload for `POST /categories`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpsertCategoryRequest {
    pub name: Option<Value>,
    pub subcategories: Option<Value>,
}

/// Result of a category upsert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UpsertCategoryResponse {
    Created {
        message: String,
        name: String,
        subcategories: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Merged {
        message: String,
        name: String,
        added_subcategories: Vec<String>,
    },
}

impl UpsertCategoryResponse {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UpsertCategoryResponse::Created { .. } => StatusCode::CREATED,
            UpsertCategoryResponse::Merged { .. } => StatusCode::OK,
        }
    }
}

/// Core category upsert logic (merge semantics).
///
/// Creates the category when absent; otherwise unions the new subcategories
/// into the stored set and reports only those that were not already present.
/// The read and the write are separate store calls.
pub async fn process_upsert_category(
    repo: &dyn CategoryRepository,
    request: UpsertCategoryRequest,
) -> Result<UpsertCategoryResponse, AppError> {
    let mut errors = FieldErrors::new();
    let name = validation::required_category(&mut errors, "name", request.name.as_ref());
    let subcategories = validation::required_string_array(
        &mut errors,
        "subcategories",
        request.subcategories.as_ref(),
    );
    let (Some(name), Some(subcategories)) = (name, subcategories) else {
        return Err(errors.into_error());
    };
    let subcategories = taxonomy::clean_subcategories(&subcategories);

    match repo.find_by_name(&name).await? {
        None => {
            repo.insert(Category {
                name: name.clone(),
                subcategories: subcategories.clone(),
            })
            .await?;
            tracing::info!(%name, "category created");

            Ok(UpsertCategoryResponse::Created {
                message: "Category created successfully".to_string(),
                name,
                subcategories,
            })
        }
        Some(existing) => {
            let added = taxonomy::missing_subcategories(&existing.subcategories, &subcategories);
            if !added.is_empty() {
                repo.add_subcategories(&name, &added).await?;
            }
            tracing::info!(%name, added = added.len(), "category merged");

            Ok(UpsertCategoryResponse::Merged {
                message: "Category updated successfully".to_string(),
                name,
                added_subcategories: added,
            })
        }
    }
}

/// Axum handler for `POST /categories`.
pub async fn upsert_category_handler(
    State(state): State<AppState>,
    payload: Result<Json<UpsertCategoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UpsertCategoryResponse>), AppError> {
    let Json(request) = payload?;
    let response = process_upsert_category(state.category_repo.as_ref(), request).await?;
    Ok((response.status_code(), Json(response)))
}

/// Axum handler for `GET /categories`.
pub async fn list_categories_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = state.category_repo.list_all().await?;
    Ok(Json(categories))
}
