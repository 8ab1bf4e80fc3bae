use std::sync::Arc;

use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::mongo::Mongo;

use doc_catalog::app::{self, AppState};
use doc_catalog::db::category_repository::{CategoryRepository, MongoCategoryRepository};
use doc_catalog::db::repository::{DocumentRepository, MongoDocumentRepository};
use doc_catalog::db::technology_repository::{MongoTechnologyRepository, TechnologyRepository};

/// Holds a running MongoDB container and the router wired to it.
///
/// The container is kept alive for as long as this struct lives. When dropped,
/// it is stopped and cleaned up automatically.
pub struct TestEnv {
    _mongo: ContainerAsync<Mongo>,
    pub router: axum::Router,
    pub repo: Arc<dyn DocumentRepository>,
    pub category_repo: Arc<dyn CategoryRepository>,
    pub technology_repo: Arc<dyn TechnologyRepository>,
}

impl TestEnv {
    /// Spin up MongoDB and build the router against a fresh database.
    pub async fn start() -> Self {
        let mongo_container = Mongo::default()
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let mongo_port = mongo_container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");
        let mongo_uri = format!("mongodb://127.0.0.1:{}", mongo_port);
        let mongo_client = mongodb::Client::with_uri_str(&mongo_uri)
            .await
            .expect("Failed to connect to MongoDB");
        let mongo_db = mongo_client.database("doc_catalog_test");

        let repo: Arc<dyn DocumentRepository> = Arc::new(MongoDocumentRepository::new(&mongo_db));
        let category_repo: Arc<dyn CategoryRepository> =
            Arc::new(MongoCategoryRepository::new(&mongo_db));
        let technology_repo: Arc<dyn TechnologyRepository> =
            Arc::new(MongoTechnologyRepository::new(&mongo_db));

        let state = AppState {
            document_repo: repo.clone(),
            category_repo: category_repo.clone(),
            technology_repo: technology_repo.clone(),
        };

        Self {
            _mongo: mongo_container,
            router: app::router(state),
            repo,
            category_repo,
            technology_repo,
        }
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .expect_success_by_default()
            .build(self.router.clone())
    }

    /// Build a `TestServer` that does NOT expect success by default (for error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .build(self.router.clone())
    }

    /// Helper: upsert a category via the API.
    pub async fn upsert_category(
        &self,
        server: &axum_test::TestServer,
        name: &str,
        subcategories: &[&str],
    ) -> axum_test::TestResponse {
        server
            .post("/categories")
            .json(&serde_json::json!({
                "name": name,
                "subcategories": subcategories,
            }))
            .await
    }

    /// Helper: create a document via the API and return its id.
    pub async fn create_document(
        &self,
        server: &axum_test::TestServer,
        title: &str,
        category: &str,
        status: &str,
    ) -> String {
        let response = server
            .post("/documents")
            .json(&serde_json::json!({
                "title": title,
                "description": format!("{title} description"),
                "url": "https://example.com/docs",
                "category": category,
                "tags": ["test"],
                "status": status,
            }))
            .await;
        let body: serde_json::Value = response.json();
        body["id"].as_str().expect("id in response").to_string()
    }
}
