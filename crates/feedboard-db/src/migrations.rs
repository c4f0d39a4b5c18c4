use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS feedbacks (
            id          TEXT PRIMARY KEY,
            title       TEXT NOT NULL,
            description TEXT NOT NULL,
            category    TEXT NOT NULL,
            status      TEXT NOT NULL DEFAULT 'Open',
            upvotes     INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_feedbacks_created
            ON feedbacks(created_at);

        CREATE INDEX IF NOT EXISTS idx_feedbacks_status
            ON feedbacks(status);

        CREATE TABLE IF NOT EXISTS comments (
            id          TEXT PRIMARY KEY,
            feedback_id TEXT NOT NULL REFERENCES feedbacks(id),
            comment     TEXT NOT NULL,
            author      TEXT NOT NULL DEFAULT 'Anonymous',
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_comments_feedback
            ON comments(feedback_id, created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
