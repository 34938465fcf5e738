use anyhow::{Context, Result};
use chrono::Utc;
use uuid::Uuid;

use crate::db::{format_timestamp, DbPool};

pub struct FavoriteRepository {
    pool: DbPool,
}

impl FavoriteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Favorite a post and return its updated like count
    ///
    /// Favoriting twice is a no-op.
    pub fn add(&self, user_id: &Uuid, post_id: &Uuid) -> Result<u32> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT OR IGNORE INTO favorites (user_id, post_id, created_at) VALUES (?, ?, ?)",
            (user_id.to_string(), post_id.to_string(), format_timestamp(&Utc::now())),
        )
        .context("Failed to add favorite")?;

        Self::refresh_like_count(&conn, post_id)
    }

    /// Remove a favorite and return the post's updated like count
    pub fn remove(&self, user_id: &Uuid, post_id: &Uuid) -> Result<u32> {
        let conn = self.pool.get()?;

        conn.execute(
            "DELETE FROM favorites WHERE user_id = ? AND post_id = ?",
            (user_id.to_string(), post_id.to_string()),
        )
        .context("Failed to remove favorite")?;

        Self::refresh_like_count(&conn, post_id)
    }

    /// Recalculate a post's like count from the favorites table
    fn refresh_like_count(conn: &rusqlite::Connection, post_id: &Uuid) -> Result<u32> {
        conn.execute(
            "UPDATE posts
             SET like_count = (SELECT COUNT(*) FROM favorites WHERE post_id = ?)
             WHERE id = ?",
            (post_id.to_string(), post_id.to_string()),
        )
        .context("Failed to update like count")?;

        let like_count: u32 = conn
            .query_row(
                "SELECT like_count FROM posts WHERE id = ?",
                [post_id.to_string()],
                |row| row.get(0),
            )
            .context("Failed to read like count")?;

        Ok(like_count)
    }
}
