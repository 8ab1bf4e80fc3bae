use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::{categories, documents, technologies};
use crate::config::AppConfig;
use crate::db::category_repository::{CategoryRepository, MongoCategoryRepository};
use crate::db::repository::{DocumentRepository, MongoDocumentRepository};
use crate::db::technology_repository::{MongoTechnologyRepository, TechnologyRepository};

/// Shared, immutable state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub document_repo: Arc<dyn DocumentRepository>,
    pub category_repo: Arc<dyn CategoryRepository>,
    pub technology_repo: Arc<dyn TechnologyRepository>,
}

impl AppState {
    /// Wire MongoDB-backed repositories for the given database.
    pub fn from_database(db: &mongodb::Database) -> Self {
        Self {
            document_repo: Arc::new(MongoDocumentRepository::new(db)),
            category_repo: Arc::new(MongoCategoryRepository::new(db)),
            technology_repo: Arc::new(MongoTechnologyRepository::new(db)),
        }
    }

    /// Connect to MongoDB using the configured URI, database and timeout.
    pub async fn connect(config: &AppConfig) -> Result<Self, mongodb::error::Error> {
        let mut options = mongodb::options::ClientOptions::parse(&config.mongodb_uri).await?;
        options.connect_timeout = Some(config.connect_timeout());
        options.app_name = Some("doc-catalog".to_string());

        let client = mongodb::Client::with_options(options)?;
        Ok(Self::from_database(&client.database(&config.database)))
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/documents",
            get(documents::list_documents_handler).post(documents::create_document_handler),
        )
        .route(
            "/documents/{id}",
            get(documents::get_document_handler).put(documents::update_document_handler),
        )
        .route(
            "/categories",
            get(categories::list_categories_handler).post(categories::upsert_category_handler),
        )
        .route(
            "/technologies",
            get(technologies::list_technologies_handler)
                .post(technologies::create_technology_handler),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::{
        MemoryCategoryRepository, MemoryDocumentRepository, MemoryTechnologyRepository,
    };
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn memory_state() -> AppState {
        AppState {
            document_repo: Arc::new(MemoryDocumentRepository::default()),
            category_repo: Arc::new(MemoryCategoryRepository::default()),
            technology_repo: Arc::new(MemoryTechnologyRepository::default()),
        }
    }

    async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router(memory_state()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(
            Request::get("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (status, body) = send(
            Request::post("/documents")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_create_document_returns_created() {
        let payload = serde_json::json!({
            "title": "Axum guide",
            "description": "Routing and extractors",
            "category": "rust",
            "tags": [],
            "status": "draft"
        });
        let (status, body) = send(
            Request::post("/documents")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"].as_str().unwrap().len(), 24);
    }

    #[tokio::test]
    async fn test_empty_store_rejects_any_category_filter() {
        let (status, body) = send(
            Request::get("/documents?categories=rust")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["validCategories"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_repeated_query_parameter_is_json_bad_request() {
        let (status, body) = send(
            Request::get("/documents?categories=a&categories=b")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}
