mod common;

use axum::http::StatusCode;
use doc_catalog::db::models::Technology;
use doc_catalog::db::technology_repository::TechnologyRepository;

#[tokio::test]
async fn create_and_list_technologies() {
    let env = common::TestEnv::start().await;
    let server = env.server();

    server
        .post("/technologies")
        .json(&serde_json::json!({ "name": "Rust", "label": "Rust" }))
        .await
        .assert_status(StatusCode::CREATED);
    server
        .post("/technologies")
        .json(&serde_json::json!({ "name": "go", "label": "Go" }))
        .await
        .assert_status(StatusCode::CREATED);

    let technologies: Vec<Technology> = server.get("/technologies").await.json();
    let names: Vec<&str> = technologies.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["go", "rust"]);
    assert_eq!(env.technology_repo.list_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn duplicate_name_or_label_conflicts() {
    let env = common::TestEnv::start().await;
    let server = env.server_permissive();

    server
        .post("/technologies")
        .json(&serde_json::json!({ "name": "go", "label": "Go" }))
        .await
        .assert_status(StatusCode::CREATED);

    server
        .post("/technologies")
        .json(&serde_json::json!({ "name": "GO", "label": "Golang" }))
        .await
        .assert_status(StatusCode::CONFLICT);

    let response = server
        .post("/technologies")
        .json(&serde_json::json!({ "name": "golang", "label": "Go" }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("label"));
}
