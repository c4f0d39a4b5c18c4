pub mod error;
pub mod feedbacks;
pub mod health;
pub mod stats;
pub mod validation;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post},
};

use feedboard_db::Database;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

/// Full route table. The binary and the tests both build the app from
/// here so they can never drift apart.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/feedbacks",
            get(feedbacks::list_feedbacks).post(feedbacks::create_feedback),
        )
        .route("/feedbacks/{id}", get(feedbacks::get_feedback))
        .route("/feedbacks/{id}/upvote", patch(feedbacks::upvote_feedback))
        .route(
            "/feedbacks/{id}/status",
            patch(feedbacks::update_feedback_status),
        )
        .route("/feedbacks/{id}/comments", post(feedbacks::add_comment))
        .route("/stats", get(stats::get_stats))
        .route("/health", get(health::health))
        .route("/status", get(health::status))
        .fallback(health::route_not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let db = Database::open_in_memory().unwrap();
        router(Arc::new(AppStateInner { db }))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(v) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&v).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn create(app: &Router, title: &str, description: &str, category: &str) -> Value {
        let (status, body) = send(
            app,
            "POST",
            "/feedbacks",
            Some(json!({ "title": title, "description": description, "category": category })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"].clone()
    }

    #[tokio::test]
    async fn create_forces_open_status_and_zero_upvotes() {
        let app = test_app();
        let (status, body) = send(
            &app,
            "POST",
            "/feedbacks",
            Some(json!({
                "title": "Dark mode",
                "description": "Add dark theme",
                "category": "UI",
                "status": "Done",
                "upvotes": 99,
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["message"], json!("Feedback created successfully"));
        assert_eq!(body["data"]["status"], json!("Open"));
        assert_eq!(body["data"]["upvotes"], json!(0));
    }

    #[tokio::test]
    async fn create_lists_every_validation_error() {
        let app = test_app();
        let (status, body) = send(&app, "POST", "/feedbacks", Some(json!({}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("Validation failed"));
        assert_eq!(body["errors"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn get_one_returns_feedback_with_its_comments() {
        let app = test_app();
        let created = create(&app, "Export", "CSV export", "Feature").await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            "POST",
            &format!("/feedbacks/{id}/comments"),
            Some(json!({ "comment": "  yes please  " })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, "GET", &format!("/feedbacks/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["title"], json!("Export"));

        let comments = body["data"]["comments"].as_array().unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0]["comment"], json!("yes please"));
        assert_eq!(comments[0]["author"], json!("Anonymous"));
    }

    #[tokio::test]
    async fn get_missing_feedback_is_404() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/feedbacks/does-not-exist", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("Feedback not found"));
    }

    #[tokio::test]
    async fn upvote_increments_by_one() {
        let app = test_app();
        let created = create(&app, "Export", "CSV export", "Feature").await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, body) = send(&app, "PATCH", &format!("/feedbacks/{id}/upvote"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!("Upvote added successfully"));
        assert_eq!(body["data"]["upvotes"], json!(1));
    }

    #[tokio::test]
    async fn upvote_on_missing_id_is_404() {
        let app = test_app();
        let (status, body) = send(&app, "PATCH", "/feedbacks/nope/upvote", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("Feedback not found"));
    }

    #[tokio::test]
    async fn status_update_validates_then_overwrites() {
        let app = test_app();
        let created = create(&app, "Export", "CSV export", "Feature").await;
        let id = created["id"].as_str().unwrap().to_string();
        let uri = format!("/feedbacks/{id}/status");

        let (status, body) = send(&app, "PATCH", &uri, Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], json!("Status is required"));

        let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "status": "Maybe" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            json!("Invalid status. Valid statuses are: Open, Planned, In Progress, Done")
        );

        let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "status": "Planned" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], json!("Planned"));

        let (status, _) = send(
            &app,
            "PATCH",
            "/feedbacks/nope/status",
            Some(json!({ "status": "Done" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn comment_requires_text_and_an_existing_parent() {
        let app = test_app();
        let created = create(&app, "Export", "CSV export", "Feature").await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "POST",
            &format!("/feedbacks/{id}/comments"),
            Some(json!({ "comment": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], json!("Comment is required"));

        let (status, body) = send(
            &app,
            "POST",
            "/feedbacks/nope/comments",
            Some(json!({ "comment": "hello" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("Feedback not found"));

        let (status, body) = send(
            &app,
            "POST",
            &format!("/feedbacks/{id}/comments"),
            Some(json!({ "comment": "hello", "author": "alice" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], json!("Comment added successfully"));
        assert_eq!(body["data"]["author"], json!("alice"));
    }

    #[tokio::test]
    async fn list_filters_compose_and_report_total() {
        let app = test_app();
        create(&app, "Crash on save", "App crashes", "Bug").await;
        create(&app, "Crash on load", "Also crashes", "Bug").await;
        create(&app, "Dark mode", "Night theme", "UI").await;

        let (status, body) = send(&app, "GET", "/feedbacks?category=Bug", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], json!(2));

        let (_, body) = send(&app, "GET", "/feedbacks?category=Bug&search=LOAD", None).await;
        assert_eq!(body["total"], json!(1));
        assert_eq!(body["data"][0]["title"], json!("Crash on load"));

        let (_, body) = send(&app, "GET", "/feedbacks?status=Planned", None).await;
        assert_eq!(body["total"], json!(0));
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn empty_query_params_do_not_filter() {
        let app = test_app();
        create(&app, "Crash on save", "App crashes", "Bug").await;
        create(&app, "Dark mode", "Night theme", "UI").await;

        let (status, body) = send(&app, "GET", "/feedbacks?status=", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], json!(2));

        let (_, body) = send(&app, "GET", "/feedbacks?category=&search=&sort=", None).await;
        assert_eq!(body["total"], json!(2));

        // An empty param next to a real one must not narrow the result
        let (_, body) = send(&app, "GET", "/feedbacks?status=&category=UI", None).await;
        assert_eq!(body["total"], json!(1));
    }

    #[tokio::test]
    async fn stats_buckets_add_up() {
        let app = test_app();
        create(&app, "A", "d", "Feature").await;
        create(&app, "B", "d", "Bug").await;
        let c = create(&app, "C", "d", "Bug").await;
        let id = c["id"].as_str().unwrap().to_string();
        send(&app, "PATCH", &format!("/feedbacks/{id}/upvote"), None).await;
        send(
            &app,
            "PATCH",
            &format!("/feedbacks/{id}/status"),
            Some(json!({ "status": "Done" })),
        )
        .await;

        let (status, body) = send(&app, "GET", "/stats", None).await;
        assert_eq!(status, StatusCode::OK);

        let data = &body["data"];
        assert_eq!(data["total"], json!(3));
        assert_eq!(data["totalUpvotes"], json!(1));
        assert_eq!(data["byStatus"]["open"], json!(2));
        assert_eq!(data["byStatus"]["done"], json!(1));
        assert_eq!(data["byCategory"]["bug"], json!(2));
        assert_eq!(data["byCategory"]["feature"], json!(1));

        let by_status = data["byStatus"].as_object().unwrap();
        let status_sum: i64 = by_status.values().map(|v| v.as_i64().unwrap()).sum();
        let by_category = data["byCategory"].as_object().unwrap();
        let category_sum: i64 = by_category.values().map(|v| v.as_i64().unwrap()).sum();
        assert_eq!(status_sum, 3);
        assert_eq!(category_sum, 3);
    }

    #[tokio::test]
    async fn liveness_probes_and_fallback() {
        let app = test_app();

        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!("Server is running"));
        assert!(body["timestamp"].is_string());

        let (status, body) = send(&app, "GET", "/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));

        let (status, body) = send(&app, "GET", "/no/such/route", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("Route not found"));
    }
}
