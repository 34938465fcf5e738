use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Popular,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "Newest",
            SortOrder::Popular => "Popular",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Newest" => Some(SortOrder::Newest),
            "Popular" => Some(SortOrder::Popular),
            _ => None,
        }
    }
}

/// How a post in a hashtag feed matched the requested tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// The post carries the requested tag itself
    Exact,
    /// The post only carries a tag from the similarity set
    Similar,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Exact => "exact",
            MatchKind::Similar => "similar",
        }
    }
}
