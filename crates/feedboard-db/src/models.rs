/// Database row types — these map directly to SQLite rows.
/// Distinct from feedboard-types API models to keep the DB layer independent.

pub struct FeedbackRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: String,
    pub upvotes: i64,
    pub created_at: String,
}

pub struct CommentRow {
    pub id: String,
    pub feedback_id: String,
    pub comment: String,
    pub author: String,
    pub created_at: String,
}

/// Aggregates computed inside SQLite. Grouped counts come back as raw
/// (value, count) pairs; the API layer buckets them into named fields.
pub struct StatsRow {
    pub total: i64,
    pub total_upvotes: i64,
    pub by_status: Vec<(String, i64)>,
    pub by_category: Vec<(String, i64)>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    Upvotes,
    #[default]
    Newest,
    Oldest,
}

impl SortKey {
    /// Unrecognized or absent sort params fall back to newest-first.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("upvotes") => SortKey::Upvotes,
            Some("oldest") => SortKey::Oldest,
            _ => SortKey::Newest,
        }
    }

    // created_at has second granularity, so rowid breaks ties by
    // insertion order and keeps the ordering stable.
    fn order_clause(self) -> &'static str {
        match self {
            SortKey::Upvotes => " ORDER BY upvotes DESC, rowid DESC",
            SortKey::Newest => " ORDER BY created_at DESC, rowid DESC",
            SortKey::Oldest => " ORDER BY created_at ASC, rowid ASC",
        }
    }

    pub(crate) fn append_to(self, sql: &mut String) {
        sql.push_str(self.order_clause());
    }
}

/// Composable list filter; all parts optional, AND-combined.
#[derive(Debug, Default)]
pub struct FeedbackFilter {
    pub status: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: SortKey,
}
