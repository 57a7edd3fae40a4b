mod common;

use axum::http::StatusCode;
use common::{body_json, TestApp};
use serde_json::json;

#[tokio::test]
async fn tags_empty_state() {
    let app = TestApp::new().await;
    let resp = app.get("/tags").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!([]));
}

#[tokio::test]
async fn tags_are_listed_once_in_creation_order() {
    let app = TestApp::new().await;

    app.create_reflection("one", &["rust", "music"]).await;
    app.create_reflection("two", &["music", "walks"]).await;

    let json = body_json(app.get("/tags").await).await;
    assert_eq!(json, json!(["rust", "music", "walks"]));
}

#[tokio::test]
async fn tags_outlive_their_reflections() {
    let app = TestApp::new().await;

    let id = app.create_reflection("only one", &["orphan"]).await;
    app.delete(&format!("/reflections/{id}")).await;

    let json = body_json(app.get("/tags").await).await;
    assert_eq!(json, json!(["orphan"]));
}

#[tokio::test]
async fn suggestions_fall_back_to_seed_tags() {
    let app = TestApp::new().await;

    let json = body_json(app.get("/tags/suggestions").await).await;
    assert_eq!(
        json,
        json!(["Work", "Family", "Meetings", "Workouts", "Relationships", "Goals", "Gratitude", "Health"])
    );
}

#[tokio::test]
async fn suggestions_match_history_ignoring_case() {
    let app = TestApp::new().await;

    app.create_reflection("note", &["Work", "Workouts", "Family"]).await;

    let json = body_json(app.get("/tags/suggestions?input=wor").await).await;
    assert_eq!(json, json!(["Work", "Workouts"]));

    let json = body_json(app.get("/tags/suggestions?input=wor&attached=Work").await).await;
    assert_eq!(json, json!(["Workouts"]));
}

#[tokio::test]
async fn empty_input_suggestions_are_capped() {
    let app = TestApp::new().await;

    let tags: Vec<String> = (0..10).map(|i| format!("tag{i}")).collect();
    let tag_refs: Vec<&str> = tags.iter().map(String::as_str).collect();
    app.create_reflection("many tags", &tag_refs).await;

    let json = body_json(app.get("/tags/suggestions").await).await;
    let suggestions = json.as_array().unwrap();
    assert_eq!(suggestions.len(), 8);
    assert_eq!(suggestions[0], "tag0");

    let json = body_json(app.get("/tags/suggestions?attached=tag0&attached=tag1").await).await;
    assert_eq!(json.as_array().unwrap()[0], "tag2");
}

#[tokio::test]
async fn attached_tags_may_contain_commas() {
    let app = TestApp::new().await;

    app.create_reflection("note", &["a,b", "a"]).await;

    let json = body_json(app.get("/tags/suggestions?input=a").await).await;
    assert_eq!(json, json!(["a,b", "a"]));

    let json = body_json(app.get("/tags/suggestions?input=a&attached=a%2Cb").await).await;
    assert_eq!(json, json!(["a"]));
}
