use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- Requests --

/// Body for POST /feedbacks. Fields are optional so missing values reach
/// the validation helpers (which report all problems at once) instead of
/// being rejected by the deserializer. Extra fields like `status` or
/// `upvotes` are accepted and ignored.
#[derive(Debug, Default, Deserialize)]
pub struct CreateFeedbackRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

// -- Responses --

/// Category and status stay plain strings on the wire: list filters pass
/// caller-supplied values through verbatim, and rows predating an enum
/// change must still serialize.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: String,
    pub upvotes: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub comment: String,
    pub author: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackDetailResponse {
    #[serde(flatten)]
    pub feedback: FeedbackResponse,
    pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total: i64,
    pub by_status: StatusCounts,
    pub by_category: CategoryCounts,
    pub total_upvotes: i64,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub open: i64,
    pub planned: i64,
    pub in_progress: i64,
    pub done: i64,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCounts {
    pub feature: i64,
    pub bug: i64,
    pub ui: i64,
    pub enhancement: i64,
}

// -- Envelopes --

/// Success envelope shared by every handler: `{success, message?, data}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

/// List envelope carries the row count alongside the page.
#[derive(Debug, Serialize)]
pub struct ListEnvelope {
    pub success: bool,
    pub data: Vec<FeedbackResponse>,
    pub total: usize,
}

impl ListEnvelope {
    pub fn new(data: Vec<FeedbackResponse>) -> Self {
        let total = data.len();
        Self {
            success: true,
            data,
            total,
        }
    }
}
