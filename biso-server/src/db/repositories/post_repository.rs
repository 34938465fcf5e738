use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{types::Type, OptionalExtension, Row};
use uuid::Uuid;

use biso_types::{Post, SortOrder};

use crate::db::{format_timestamp, DbPool};
use crate::hashtag::sorted_post_tags;

const POST_COLUMNS: &str = "p.id, p.author_id, p.author_name, p.caption, p.like_count, p.created_at";

fn parse_uuid(idx: usize, value: String) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(&value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_timestamp(idx: usize, value: String) -> rusqlite::Result<DateTime<Utc>> {
    value
        .parse::<DateTime<Utc>>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Map a row selected with `POST_COLUMNS`; hashtags are derived from the caption
fn row_to_post(row: &Row<'_>) -> rusqlite::Result<Post> {
    let caption: String = row.get(3)?;
    Ok(Post {
        id: parse_uuid(0, row.get(0)?)?,
        author_id: parse_uuid(1, row.get(1)?)?,
        author_name: row.get(2)?,
        hashtags: sorted_post_tags(&caption),
        caption,
        like_count: row.get(4)?,
        created_at: parse_timestamp(5, row.get(5)?)?,
    })
}

pub struct PostRepository {
    pool: DbPool,
}

impl PostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new post
    pub fn create(&self, post: &Post) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO posts (id, author_id, author_name, caption, like_count, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            (
                post.id.to_string(),
                post.author_id.to_string(),
                &post.author_name,
                &post.caption,
                post.like_count,
                format_timestamp(&post.created_at),
            ),
        ).context("Failed to create post")?;
        Ok(())
    }

    /// Get posts with sorting and limit
    pub fn get_posts(&self, sort_order: SortOrder, limit: i64) -> Result<Vec<Post>> {
        let conn = self.pool.get()?;

        let order_clause = match sort_order {
            SortOrder::Newest => "ORDER BY p.created_at DESC",
            SortOrder::Popular => "ORDER BY p.like_count DESC, p.created_at DESC",
        };

        let query = format!(
            "SELECT {} FROM posts p {} LIMIT ?",
            POST_COLUMNS, order_clause
        );

        let mut stmt = conn.prepare(&query)?;
        let posts = stmt
            .query_map([limit], row_to_post)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    /// Every post, newest first; this is the collection hashtag feeds rank over
    pub fn list_all(&self) -> Result<Vec<Post>> {
        let conn = self.pool.get()?;
        let query = format!(
            "SELECT {} FROM posts p ORDER BY p.created_at DESC, p.id ASC",
            POST_COLUMNS
        );

        let mut stmt = conn.prepare(&query)?;
        let posts = stmt
            .query_map([], row_to_post)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    /// Get a single post by ID
    pub fn get_by_id(&self, post_id: &Uuid) -> Result<Option<Post>> {
        let conn = self.pool.get()?;
        let query = format!("SELECT {} FROM posts p WHERE p.id = ?", POST_COLUMNS);

        let post = conn
            .query_row(&query, [post_id.to_string()], row_to_post)
            .optional()?;

        Ok(post)
    }

    /// Posts a user has favorited, most recent favorite first
    pub fn get_favorited_by(&self, user_id: &Uuid) -> Result<Vec<Post>> {
        let conn = self.pool.get()?;
        let query = format!(
            "SELECT {} FROM posts p
             JOIN favorites f ON f.post_id = p.id
             WHERE f.user_id = ?
             ORDER BY f.created_at DESC",
            POST_COLUMNS
        );

        let mut stmt = conn.prepare(&query)?;
        let posts = stmt
            .query_map([user_id.to_string()], row_to_post)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    /// Delete a post; favorites go with it
    pub fn delete(&self, post_id: &Uuid) -> Result<bool> {
        let conn = self.pool.get()?;
        let deleted = conn
            .execute("DELETE FROM posts WHERE id = ?", [post_id.to_string()])
            .context("Failed to delete post")?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn setup() -> PostRepository {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");
        PostRepository::new(db.pool)
    }

    fn post(caption: &str, like_count: u32, created_at: &str) -> Post {
        Post {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            author_name: "amani".to_string(),
            caption: caption.to_string(),
            like_count,
            created_at: created_at.parse().unwrap(),
            hashtags: Vec::new(),
        }
    }

    #[test]
    fn test_create_and_get_derives_hashtags() {
        let repo = setup();
        let p = post("Lac #Kivu et #Goma #kivu", 4, "2024-05-01T10:00:00Z");
        repo.create(&p).unwrap();

        let fetched = repo.get_by_id(&p.id).unwrap().expect("post should exist");
        assert_eq!(fetched.caption, p.caption);
        assert_eq!(fetched.like_count, 4);
        assert_eq!(fetched.created_at, p.created_at);
        assert_eq!(fetched.hashtags, vec!["goma", "kivu"]);
    }

    #[test]
    fn test_get_missing_post() {
        let repo = setup();
        assert!(repo.get_by_id(&Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_sort_orders() {
        let repo = setup();
        let old_popular = post("#goma", 90, "2024-05-01T10:00:00Z");
        let new_quiet = post("#goma", 1, "2024-05-03T10:00:00Z");
        repo.create(&old_popular).unwrap();
        repo.create(&new_quiet).unwrap();

        let newest = repo.get_posts(SortOrder::Newest, 10).unwrap();
        assert_eq!(newest[0].id, new_quiet.id);

        let popular = repo.get_posts(SortOrder::Popular, 10).unwrap();
        assert_eq!(popular[0].id, old_popular.id);

        let limited = repo.get_posts(SortOrder::Newest, 1).unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_timestamps_order_within_the_same_second() {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");
        db.seed_test_data().expect("Failed to seed test data");
        let repo = PostRepository::new(db.pool.clone());

        // Half a second after the newest seeded post
        let p = post("#goma", 0, "2024-05-11T18:30:00.500Z");
        repo.create(&p).unwrap();

        let stored: String = db
            .connection()
            .unwrap()
            .query_row(
                "SELECT created_at FROM posts WHERE id = ?",
                [p.id.to_string()],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(stored, "2024-05-11T18:30:00.500Z");

        let newest = repo.get_posts(SortOrder::Newest, 2).unwrap();
        assert_eq!(newest[0].id, p.id);
        assert_eq!(
            newest[1].id.to_string(),
            "650e8400-e29b-41d4-a716-446655440002"
        );
    }

    #[test]
    fn test_delete() {
        let repo = setup();
        let p = post("#bukavu", 0, "2024-05-01T10:00:00Z");
        repo.create(&p).unwrap();

        assert!(repo.delete(&p.id).unwrap());
        assert!(!repo.delete(&p.id).unwrap());
        assert!(repo.list_all().unwrap().is_empty());
    }
}
