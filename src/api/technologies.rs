use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::validation::{self, FieldErrors};
use crate::app::AppState;
use crate::db::models::Technology;
use crate::db::technology_repository::TechnologyRepository;
use crate::error::AppError;

/// Request payload for `POST /technologies`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTechnologyRequest {
    pub name: Option<Value>,
    pub label: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTechnologyResponse {
    pub message: String,
    pub name: String,
    pub label: String,
}

/// Register a technology tag. Name and label must both be unused.
pub async fn process_create_technology(
    repo: &dyn TechnologyRepository,
    request: CreateTechnologyRequest,
) -> Result<CreateTechnologyResponse, AppError> {
    let mut errors = FieldErrors::new();
    let name = validation::required_category(&mut errors, "name", request.name.as_ref());
    let label = validation::required_string(&mut errors, "label", request.label.as_ref());
    let (Some(name), Some(label)) = (name, label) else {
        return Err(errors.into_error());
    };

    if let Some(existing) = repo.find_by_name_or_label(&name, &label).await? {
        let field = if existing.name == name { "name" } else { "label" };
        return Err(AppError::Conflict(format!(
            "A technology with this {} already exists",
            field
        )));
    }

    repo.insert(Technology {
        name: name.clone(),
        label: label.clone(),
    })
    .await?;
    tracing::info!(%name, "technology registered");

    Ok(CreateTechnologyResponse {
        message: "Technology created successfully".to_string(),
        name,
        label,
    })
}

/// Axum handler for `POST /technologies`.
pub async fn create_technology_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateTechnologyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateTechnologyResponse>), AppError> {
    let Json(request) = payload?;
    let response = process_create_technology(state.technology_repo.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Axum handler for `GET /technologies`.
pub async fn list_technologies_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Technology>>, AppError> {
    Ok(Json(state.technology_repo.list_all().await?))
}
