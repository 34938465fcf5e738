use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::MatchKind;

// Custom serde module for DateTime to ensure RFC3339 string format
mod datetime_format {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = date.to_rfc3339();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<DateTime<Utc>>().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    /// Free text, may embed any number of hashtags
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub like_count: u32,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
    /// Normalized tags derived from the caption, never stored
    #[serde(default)]
    pub hashtags: Vec<String>,
}

// Request/Response types for API
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub author_id: Uuid,
    pub author_name: String,
    pub caption: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FavoriteResponse {
    pub post_id: Uuid,
    pub favorited: bool,
    pub like_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HashtagSummary {
    pub name: String,
    pub post_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SimilarTagsResponse {
    pub tag: String,
    pub similar_tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedPost {
    pub post: Post,
    pub match_kind: MatchKind,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HashtagFeedResponse {
    /// Normalized form of the requested tag
    pub tag: String,
    pub similar_tags: Vec<String>,
    /// Number of matching posts before any limit was applied
    pub count: usize,
    pub posts: Vec<RankedPost>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_created_at_serializes_as_rfc3339() {
        let created_at = "2024-06-01T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let post = Post {
            id: Uuid::nil(),
            author_id: Uuid::nil(),
            author_name: "amani".to_string(),
            caption: "Lac Kivu #goma".to_string(),
            like_count: 3,
            created_at,
            hashtags: vec!["goma".to_string()],
        };

        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["created_at"], "2024-06-01T12:00:00+00:00");

        let back: Post = serde_json::from_value(value).unwrap();
        assert_eq!(back, post);
    }

    #[test]
    fn test_post_missing_caption_defaults_to_empty() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000000",
            "author_id": "00000000-0000-0000-0000-000000000000",
            "author_name": "amani",
            "created_at": "2024-06-01T12:00:00Z"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert!(post.caption.is_empty());
        assert_eq!(post.like_count, 0);
        assert!(post.hashtags.is_empty());
    }
}
