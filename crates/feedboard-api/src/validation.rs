use feedboard_types::api::CreateFeedbackRequest;
use feedboard_types::models::{Category, Status};

/// Collects every problem with a create request in order, without
/// short-circuiting, so the client sees the full list at once.
pub fn validate_feedback(input: &CreateFeedbackRequest) -> Vec<String> {
    let mut errors = Vec::new();

    if is_blank(&input.title) {
        errors.push("Title is required".to_string());
    }

    if is_blank(&input.description) {
        errors.push("Description is required".to_string());
    }

    if is_blank(&input.category) {
        errors.push("Category is required".to_string());
    }

    // Enum membership is checked against the raw value: a category that is
    // merely padded with whitespace is reported as invalid, not repaired.
    if let Some(category) = input.category.as_deref() {
        if !category.is_empty() && Category::parse(category).is_none() {
            errors.push("Invalid category".to_string());
        }
    }

    errors
}

/// Case-sensitive membership in {Open, Planned, In Progress, Done}.
pub fn validate_status(status: &str) -> bool {
    Status::parse(status).is_some()
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().is_none_or(|s| s.trim().is_empty())
}
