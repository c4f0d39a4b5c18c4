use serde::{Deserialize, Serialize};

/// Lifecycle stage of a feedback. Stored as its display string in the
/// database so out-of-band rows stay readable without a migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Open,
    Planned,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Open,
        Status::Planned,
        Status::InProgress,
        Status::Done,
    ];

    /// Case-sensitive parse of the wire/database string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Open" => Some(Status::Open),
            "Planned" => Some(Status::Planned),
            "In Progress" => Some(Status::InProgress),
            "Done" => Some(Status::Done),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::Planned => "Planned",
            Status::InProgress => "In Progress",
            Status::Done => "Done",
        }
    }
}

/// Classification tag of a feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Feature,
    Bug,
    #[serde(rename = "UI")]
    Ui,
    Enhancement,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Feature,
        Category::Bug,
        Category::Ui,
        Category::Enhancement,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Feature" => Some(Category::Feature),
            "Bug" => Some(Category::Bug),
            "UI" => Some(Category::Ui),
            "Enhancement" => Some(Category::Enhancement),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Feature => "Feature",
            Category::Bug => "Bug",
            Category::Ui => "UI",
            Category::Enhancement => "Enhancement",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_is_case_sensitive() {
        assert_eq!(Status::parse("In Progress"), Some(Status::InProgress));
        assert_eq!(Status::parse("in progress"), None);
        assert_eq!(Status::parse("OPEN"), None);
        assert_eq!(Status::parse("Maybe"), None);
    }

    #[test]
    fn category_round_trips_through_strings() {
        for cat in Category::ALL {
            assert_eq!(Category::parse(cat.as_str()), Some(cat));
        }
        assert_eq!(Category::parse("ui"), None);
    }
}
