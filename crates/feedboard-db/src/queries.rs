use crate::Database;
use crate::models::{CommentRow, FeedbackFilter, FeedbackRow, StatsRow};
use anyhow::Result;
use rusqlite::Connection;

const FEEDBACK_COLS: &str = "id, title, description, category, status, upvotes, created_at";
const COMMENT_COLS: &str = "id, feedback_id, comment, author, created_at";

impl Database {
    // -- Feedbacks --

    pub fn insert_feedback(
        &self,
        id: &str,
        title: &str,
        description: &str,
        category: &str,
    ) -> Result<FeedbackRow> {
        self.with_conn(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO feedbacks (id, title, description, category, status, upvotes)
                     VALUES (?1, ?2, ?3, ?4, 'Open', 0)
                     RETURNING {FEEDBACK_COLS}"
                ),
                rusqlite::params![id, title, description, category],
                feedback_from_row,
            )?;
            Ok(row)
        })
    }

    pub fn list_feedbacks(&self, filter: &FeedbackFilter) -> Result<Vec<FeedbackRow>> {
        self.with_conn(|conn| query_feedbacks(conn, filter))
    }

    pub fn get_feedback(&self, id: &str) -> Result<Option<FeedbackRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {FEEDBACK_COLS} FROM feedbacks WHERE id = ?1"),
                [id],
                feedback_from_row,
            )
            .optional()
        })
    }

    pub fn feedback_exists(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row("SELECT 1 FROM feedbacks WHERE id = ?1", [id], |row| {
                    row.get(0)
                })
                .optional()?;
            Ok(found.is_some())
        })
    }

    /// Atomic increment in a single statement. A read-then-write pair here
    /// would drop updates under concurrent requests on the same row.
    /// Returns `None` when no row matches, without writing anything.
    pub fn upvote_feedback(&self, id: &str) -> Result<Option<FeedbackRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!(
                    "UPDATE feedbacks SET upvotes = upvotes + 1 WHERE id = ?1
                     RETURNING {FEEDBACK_COLS}"
                ),
                [id],
                feedback_from_row,
            )
            .optional()
        })
    }

    /// Overwrites the status. Callers validate the value first; the schema
    /// itself accepts any string.
    pub fn update_feedback_status(&self, id: &str, status: &str) -> Result<Option<FeedbackRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!(
                    "UPDATE feedbacks SET status = ?2 WHERE id = ?1
                     RETURNING {FEEDBACK_COLS}"
                ),
                rusqlite::params![id, status],
                feedback_from_row,
            )
            .optional()
        })
    }

    // -- Comments --

    pub fn insert_comment(
        &self,
        id: &str,
        feedback_id: &str,
        comment: &str,
        author: &str,
    ) -> Result<CommentRow> {
        self.with_conn(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO comments (id, feedback_id, comment, author)
                     VALUES (?1, ?2, ?3, ?4)
                     RETURNING {COMMENT_COLS}"
                ),
                rusqlite::params![id, feedback_id, comment, author],
                comment_from_row,
            )?;
            Ok(row)
        })
    }

    pub fn get_comments_for_feedback(&self, feedback_id: &str) -> Result<Vec<CommentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COMMENT_COLS} FROM comments
                 WHERE feedback_id = ?1
                 ORDER BY created_at ASC"
            ))?;

            let rows = stmt
                .query_map([feedback_id], comment_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Stats --

    /// Aggregation happens inside SQLite; only the grouped counts cross the
    /// boundary, never the full table.
    pub fn get_stats(&self) -> Result<StatsRow> {
        self.with_conn(|conn| {
            let (total, total_upvotes) = conn.query_row(
                "SELECT COUNT(*), COALESCE(SUM(upvotes), 0) FROM feedbacks",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;

            let by_status =
                query_grouped(conn, "SELECT status, COUNT(*) FROM feedbacks GROUP BY status")?;
            let by_category = query_grouped(
                conn,
                "SELECT category, COUNT(*) FROM feedbacks GROUP BY category",
            )?;

            Ok(StatsRow {
                total,
                total_upvotes,
                by_status,
                by_category,
            })
        })
    }
}

fn feedback_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FeedbackRow> {
    Ok(FeedbackRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        status: row.get(4)?,
        upvotes: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn comment_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CommentRow> {
    Ok(CommentRow {
        id: row.get(0)?,
        feedback_id: row.get(1)?,
        comment: row.get(2)?,
        author: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn query_feedbacks(conn: &Connection, filter: &FeedbackFilter) -> Result<Vec<FeedbackRow>> {
    let mut sql = format!("SELECT {FEEDBACK_COLS} FROM feedbacks");
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<String> = Vec::new();

    if let Some(status) = &filter.status {
        params.push(status.clone());
        clauses.push(format!("status = ?{}", params.len()));
    }

    if let Some(category) = &filter.category {
        params.push(category.clone());
        clauses.push(format!("category = ?{}", params.len()));
    }

    // Substring match via instr() instead of LIKE, so %/_ in the search
    // term need no escaping.
    if let Some(search) = &filter.search {
        params.push(search.clone());
        let n = params.len();
        clauses.push(format!(
            "(instr(lower(title), lower(?{n})) > 0 OR instr(lower(description), lower(?{n})) > 0)"
        ));
    }

    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    filter.sort.append_to(&mut sql);

    let mut stmt = conn.prepare(&sql)?;
    let bound: Vec<&dyn rusqlite::types::ToSql> = params
        .iter()
        .map(|p| p as &dyn rusqlite::types::ToSql)
        .collect();

    let rows = stmt
        .query_map(bound.as_slice(), feedback_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_grouped(conn: &Connection, sql: &str) -> Result<Vec<(String, i64)>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
