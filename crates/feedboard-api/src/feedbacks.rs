use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use feedboard_db::models::{CommentRow, FeedbackFilter, FeedbackRow, SortKey};
use feedboard_types::api::{
    AddCommentRequest, CommentResponse, CreateFeedbackRequest, Envelope, FeedbackDetailResponse,
    FeedbackResponse, ListEnvelope, UpdateStatusRequest,
};
use feedboard_types::models::Status;

use crate::AppState;
use crate::error::{ApiError, join_error};
use crate::validation::{validate_feedback, validate_status};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

/// GET /feedbacks — filters AND-compose; unknown sort values fall back to
/// newest-first. Empty params (`?status=`) are treated as absent, not as a
/// filter for the empty string. Non-empty values are passed to the query
/// verbatim, so an off-enum status simply matches nothing.
pub async fn list_feedbacks(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = FeedbackFilter {
        status: query.status.filter(|s| !s.is_empty()),
        category: query.category.filter(|c| !c.is_empty()),
        search: query.search.filter(|s| !s.is_empty()),
        sort: SortKey::from_param(query.sort.as_deref()),
    };

    // Run blocking DB work off the async runtime
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_feedbacks(&filter))
        .await
        .map_err(join_error)??;

    let data: Vec<FeedbackResponse> = rows.into_iter().map(feedback_response).collect();
    Ok(Json(ListEnvelope::new(data)))
}

/// GET /feedbacks/{id} — the row plus all of its comments, oldest first.
pub async fn get_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let found = tokio::task::spawn_blocking(move || {
        let Some(row) = db.db.get_feedback(&id)? else {
            return Ok(None);
        };
        let comments = db.db.get_comments_for_feedback(&row.id)?;
        Ok::<_, anyhow::Error>(Some((row, comments)))
    })
    .await
    .map_err(join_error)??;

    let (row, comments) = found.ok_or_else(|| ApiError::not_found("Feedback not found"))?;

    Ok(Json(Envelope::ok(FeedbackDetailResponse {
        feedback: feedback_response(row),
        comments: comments.into_iter().map(comment_response).collect(),
    })))
}

/// POST /feedbacks — status and upvotes are server-assigned; anything the
/// client sends for them is ignored.
pub async fn create_feedback(
    State(state): State<AppState>,
    Json(req): Json<CreateFeedbackRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let errors = validate_feedback(&req);
    if !errors.is_empty() {
        return Err(ApiError::validation_errors("Validation failed", errors));
    }

    // Validation guarantees all three are present and non-blank
    let title = req.title.unwrap_or_default().trim().to_string();
    let description = req.description.unwrap_or_default().trim().to_string();
    let category = req.category.unwrap_or_default().trim().to_string();

    let id = Uuid::new_v4();
    let row = state
        .db
        .insert_feedback(&id.to_string(), &title, &description, &category)?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(
            "Feedback created successfully",
            feedback_response(row),
        )),
    ))
}

/// PATCH /feedbacks/{id}/upvote — single atomic UPDATE..RETURNING; a miss
/// means no row was touched.
pub async fn upvote_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .db
        .upvote_feedback(&id)?
        .ok_or_else(|| ApiError::not_found("Feedback not found"))?;

    Ok(Json(Envelope::with_message(
        "Upvote added successfully",
        feedback_response(row),
    )))
}

/// PATCH /feedbacks/{id}/status — admin-intent endpoint; no access control
/// is wired in front of it yet.
pub async fn update_feedback_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let status = match req.status.as_deref() {
        None | Some("") => return Err(ApiError::validation("Status is required")),
        Some(s) => s,
    };

    if !validate_status(status) {
        let valid = Status::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ApiError::validation(format!(
            "Invalid status. Valid statuses are: {valid}"
        )));
    }

    let row = state
        .db
        .update_feedback_status(&id, status)?
        .ok_or_else(|| ApiError::not_found("Feedback not found"))?;

    Ok(Json(Envelope::with_message(
        "Status updated successfully",
        feedback_response(row),
    )))
}

/// POST /feedbacks/{id}/comments — parent must exist; author defaults to
/// "Anonymous" when absent or empty.
pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = match req.comment.as_deref().map(str::trim) {
        None | Some("") => return Err(ApiError::validation("Comment is required")),
        Some(c) => c.to_string(),
    };

    let author = req
        .author
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| "Anonymous".to_string());

    if !state.db.feedback_exists(&id)? {
        return Err(ApiError::not_found("Feedback not found"));
    }

    let comment_id = Uuid::new_v4();
    let row = state
        .db
        .insert_comment(&comment_id.to_string(), &id, &comment, &author)?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(
            "Comment added successfully",
            comment_response(row),
        )),
    ))
}

pub(crate) fn feedback_response(row: FeedbackRow) -> FeedbackResponse {
    let created_at = parse_created_at(&row.created_at, &row.id);
    FeedbackResponse {
        id: parse_row_id(&row.id),
        title: row.title,
        description: row.description,
        category: row.category,
        status: row.status,
        upvotes: row.upvotes,
        created_at,
    }
}

fn comment_response(row: CommentRow) -> CommentResponse {
    let created_at = parse_created_at(&row.created_at, &row.id);
    CommentResponse {
        id: parse_row_id(&row.id),
        comment: row.comment,
        author: row.author,
        created_at,
    }
}

fn parse_row_id(id: &str) -> Uuid {
    id.parse().unwrap_or_else(|e| {
        warn!("Corrupt row id '{}': {}", id, e);
        Uuid::default()
    })
}

fn parse_created_at(raw: &str, id: &str) -> chrono::DateTime<chrono::Utc> {
    raw.parse::<chrono::DateTime<chrono::Utc>>()
        .or_else(|_| {
            // SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
            // Parse as naive UTC and convert.
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on row '{}': {}", raw, id, e);
            chrono::DateTime::default()
        })
}
