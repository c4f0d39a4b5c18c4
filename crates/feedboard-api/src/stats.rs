use axum::{Json, extract::State, response::IntoResponse};
use tracing::warn;

use feedboard_types::api::{CategoryCounts, Envelope, StatsResponse, StatusCounts};
use feedboard_types::models::{Category, Status};

use crate::AppState;
use crate::error::{ApiError, join_error};

/// GET /stats — grouped counts and the upvote sum come straight from
/// SQLite; this handler only buckets them into named fields.
pub async fn get_stats(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let raw = tokio::task::spawn_blocking(move || db.db.get_stats())
        .await
        .map_err(join_error)??;

    let mut by_status = StatusCounts::default();
    for (status, count) in &raw.by_status {
        match Status::parse(status) {
            Some(Status::Open) => by_status.open = *count,
            Some(Status::Planned) => by_status.planned = *count,
            Some(Status::InProgress) => by_status.in_progress = *count,
            Some(Status::Done) => by_status.done = *count,
            // Only reachable through out-of-band writes; still counted in total
            None => warn!("Unrecognized status '{}' in stats", status),
        }
    }

    let mut by_category = CategoryCounts::default();
    for (category, count) in &raw.by_category {
        match Category::parse(category) {
            Some(Category::Feature) => by_category.feature = *count,
            Some(Category::Bug) => by_category.bug = *count,
            Some(Category::Ui) => by_category.ui = *count,
            Some(Category::Enhancement) => by_category.enhancement = *count,
            None => warn!("Unrecognized category '{}' in stats", category),
        }
    }

    Ok(Json(Envelope::ok(StatsResponse {
        total: raw.total,
        by_status,
        by_category,
        total_upvotes: raw.total_upvotes,
    })))
}
