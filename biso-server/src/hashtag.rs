use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};

/// Character that introduces a hashtag in a caption
pub const HASHTAG_MARKER: char = '#';

/// Regex pattern for matching hashtags
/// Matches: # followed by one or more word characters (letters, numbers, underscores)
static HASHTAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#\w+").expect("Failed to compile hashtag regex")
});

/// Extract raw hashtags from a caption
///
/// Returns every `#word` substring in order of appearance, marker included.
/// Repeated tags are kept; deduplication happens when building the tag universe.
///
/// # Examples
///
/// ```
/// use biso_server::hashtag::extract_hashtags;
/// let tags = extract_hashtags("Belle vue #Goma au bord du lac #goma");
/// assert_eq!(tags, vec!["#Goma", "#goma"]);
/// ```
pub fn extract_hashtags(caption: &str) -> Vec<String> {
    HASHTAG_REGEX
        .find_iter(caption)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Normalize a tag for comparison
///
/// Strips the leading marker, lower-cases and trims. Works with or without
/// the marker and is idempotent.
///
/// ```
/// use biso_server::hashtag::normalize_hashtag;
/// assert_eq!(normalize_hashtag("#GomaCity"), "gomacity");
/// assert_eq!(normalize_hashtag("gomacity"), "gomacity");
/// ```
pub fn normalize_hashtag(raw: &str) -> String {
    raw.trim_start_matches(|c: char| c == HASHTAG_MARKER || c.is_whitespace())
        .trim_end()
        .to_lowercase()
}

/// Normalized, non-empty tags carried by a single caption
pub fn post_tags(caption: &str) -> HashSet<String> {
    extract_hashtags(caption)
        .iter()
        .map(|tag| normalize_hashtag(tag))
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Normalized tags of a caption in a stable (sorted) order, for display
pub fn sorted_post_tags(caption: &str) -> Vec<String> {
    post_tags(caption)
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct raw hashtags observed across a set of captions
///
/// Tags keep their first-seen spelling and order. Tags that normalize to an
/// empty string are left out.
pub fn tag_universe<'a, I>(captions: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut universe = Vec::new();

    for caption in captions {
        for tag in extract_hashtags(caption) {
            if normalize_hashtag(&tag).is_empty() {
                continue;
            }
            if seen.insert(tag.clone()) {
                universe.push(tag);
            }
        }
    }

    universe
}
