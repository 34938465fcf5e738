use chrono::{DateTime, SecondsFormat, Utc};

/// SQL schema for the feed database
/// Creates all tables with proper constraints, foreign keys, and indexes
pub const SCHEMA: &str = r#"
-- Posts table (author is denormalized, hashtags are derived from the caption)
CREATE TABLE IF NOT EXISTS posts (
    id TEXT PRIMARY KEY,
    author_id TEXT NOT NULL,
    author_name TEXT NOT NULL,
    caption TEXT NOT NULL DEFAULT '' CHECK(length(caption) <= 2200),
    like_count INTEGER NOT NULL DEFAULT 0 CHECK(like_count >= 0),
    created_at TEXT NOT NULL
);

-- Create index on created_at for efficient post sorting
CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts(created_at DESC);
CREATE INDEX IF NOT EXISTS idx_posts_author_id ON posts(author_id);

-- Favorites table (one row per user and favorited post)
CREATE TABLE IF NOT EXISTS favorites (
    user_id TEXT NOT NULL,
    post_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (user_id, post_id),
    FOREIGN KEY (post_id) REFERENCES posts(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_favorites_user_id ON favorites(user_id);
CREATE INDEX IF NOT EXISTS idx_favorites_post_id ON favorites(post_id);
"#;

/// Sample feed for development
/// Includes overlapping tags (#Goma, #GomaCity, #goma) so similarity matching
/// has something to work with.
pub const TEST_DATA: &str = r#"
-- ============================================================================
-- SAMPLE POSTS
-- ============================================================================
INSERT OR IGNORE INTO posts (id, author_id, author_name, caption, like_count, created_at) VALUES
    ('650e8400-e29b-41d4-a716-446655440001', '550e8400-e29b-41d4-a716-446655440001', 'amani', 'Belle vue #Goma au bord du lac #goma', 10, '2024-05-10T10:00:00.000Z'),
    ('650e8400-e29b-41d4-a716-446655440002', '550e8400-e29b-41d4-a716-446655440002', 'bijou', 'Soirée au centre-ville #GomaCity', 50, '2024-05-11T18:30:00.000Z'),
    ('650e8400-e29b-41d4-a716-446655440003', '550e8400-e29b-41d4-a716-446655440003', 'chance', 'Embouteillage sur le boulevard du 30 juin #Kinshasa', 25, '2024-05-09T08:15:00.000Z'),
    ('650e8400-e29b-41d4-a716-446655440004', '550e8400-e29b-41d4-a716-446655440001', 'amani', 'Bateau vers Bukavu sur le #Kivu', 18, '2024-05-08T07:00:00.000Z'),
    ('650e8400-e29b-41d4-a716-446655440005', '550e8400-e29b-41d4-a716-446655440004', 'dorcas', 'Les collines des #Kivus au lever du soleil', 32, '2024-05-07T06:10:00.000Z'),
    ('650e8400-e29b-41d4-a716-446655440006', '550e8400-e29b-41d4-a716-446655440002', 'bijou', 'Gorilles du #parc_virunga #tourisme', 77, '2024-05-06T12:00:00.000Z'),
    ('650e8400-e29b-41d4-a716-446655440007', '550e8400-e29b-41d4-a716-446655440005', 'elikya', 'Rumba jusqu''au matin #Kinshasa #rumba', 41, '2024-05-05T23:45:00.000Z'),
    ('650e8400-e29b-41d4-a716-446655440008', '550e8400-e29b-41d4-a716-446655440003', 'chance', 'Chutes de Zongo, à une journée de route #tourisme #kinshasa', 12, '2024-05-04T14:20:00.000Z');

-- ============================================================================
-- SAMPLE FAVORITES
-- ============================================================================
-- One favorite per seeded like so like_count matches the favorites table.
-- Posts that already have favorites are left alone on reseed.
WITH RECURSIVE seq(i) AS (
    SELECT 1
    UNION ALL
    SELECT i + 1 FROM seq WHERE i < 100
)
INSERT OR IGNORE INTO favorites (user_id, post_id, created_at)
SELECT printf('00000000-0000-4000-8000-%012d', seq.i), p.id, p.created_at
FROM posts p
JOIN seq ON seq.i <= p.like_count
WHERE p.id LIKE '650e8400-e29b-41d4-a716-4466554400%'
  AND NOT EXISTS (SELECT 1 FROM favorites f WHERE f.post_id = p.id);
"#;

/// Format a timestamp the way it is stored in TEXT columns
///
/// Fixed-width UTC with millisecond precision, so `ORDER BY created_at`
/// compares chronologically.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
