use std::collections::HashSet;

use thiserror::Error;

use crate::hashtag::normalize_hashtag;

/// Similarity ratio a candidate must exceed to count as the same topic
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

#[derive(Debug, Error, PartialEq)]
pub enum MatchError {
    #[error("hashtag is empty")]
    EmptyTarget,
    #[error("similarity threshold must be between 0 and 1, got {0}")]
    InvalidThreshold(f64),
}

/// Levenshtein distance between two strings, counted in characters
///
/// Fills a `(len(b) + 1) x (len(a) + 1)` table and returns its bottom-right cell.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut table = vec![vec![0usize; a.len() + 1]; b.len() + 1];
    for (i, row) in table.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in table[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=b.len() {
        for j in 1..=a.len() {
            let cost = if b[i - 1] == a[j - 1] { 0 } else { 1 };
            table[i][j] = (table[i - 1][j] + 1) // deletion
                .min(table[i][j - 1] + 1) // insertion
                .min(table[i - 1][j - 1] + cost); // substitution
        }
    }

    table[b.len()][a.len()]
}

/// `1 - distance / max_len`, or `None` when both strings are empty
pub fn similarity_ratio(a: &str, b: &str) -> Option<f64> {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return None;
    }
    Some(1.0 - edit_distance(a, b) as f64 / max_len as f64)
}

/// Tunables for deciding whether two tags are the same topic
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchConfig {
    /// Ratio a candidate must strictly exceed
    pub similarity_threshold: f64,
    /// Accept tags that contain, or are contained in, the target
    pub substring_match: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            substring_match: true,
        }
    }
}

impl MatchConfig {
    pub fn new(similarity_threshold: f64, substring_match: bool) -> Result<Self, MatchError> {
        if !(0.0..=1.0).contains(&similarity_threshold) {
            return Err(MatchError::InvalidThreshold(similarity_threshold));
        }
        Ok(Self {
            similarity_threshold,
            substring_match,
        })
    }
}

/// Finds the tags treated as the same topic as a target tag
///
/// Every candidate is compared against the target only. If A matches the
/// target and B matches A, B is not pulled in unless it matches the target
/// too.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityMatcher {
    config: MatchConfig,
}

impl SimilarityMatcher {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    /// Whether two normalized tags name the same topic
    pub fn is_similar(&self, target: &str, candidate: &str) -> bool {
        if target == candidate {
            return true;
        }
        if self.config.substring_match
            && !target.is_empty()
            && !candidate.is_empty()
            && (target.contains(candidate) || candidate.contains(target))
        {
            return true;
        }
        match similarity_ratio(target, candidate) {
            Some(ratio) => ratio > self.config.similarity_threshold,
            None => false,
        }
    }

    /// Normalized tags equivalent to `target` among the raw tags of `universe`
    ///
    /// The normalized target is always part of the result.
    pub fn similar_tags<S: AsRef<str>>(&self, target: &str, universe: &[S]) -> HashSet<String> {
        let target = normalize_hashtag(target);
        let mut result = HashSet::new();
        result.insert(target.clone());

        for raw in universe {
            let candidate = normalize_hashtag(raw.as_ref());
            if candidate == target || result.contains(&candidate) {
                continue;
            }
            if self.is_similar(&target, &candidate) {
                result.insert(candidate);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance_basic() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("kivu", "kivus"), 1);
        assert_eq!(edit_distance("a", "xyz"), 3);
    }

    #[test]
    fn test_edit_distance_identity() {
        assert_eq!(edit_distance("kinshasa", "kinshasa"), 0);
        assert_eq!(edit_distance("", ""), 0);
    }

    #[test]
    fn test_edit_distance_empty_side() {
        assert_eq!(edit_distance("", "goma"), 4);
        assert_eq!(edit_distance("goma", ""), 4);
    }

    #[test]
    fn test_edit_distance_counts_characters_not_bytes() {
        assert_eq!(edit_distance("été", "ete"), 2);
        assert_eq!(edit_distance("é", ""), 1);
    }

    #[test]
    fn test_similarity_ratio() {
        let ratio = similarity_ratio("kivu", "kivus").unwrap();
        assert!((ratio - 0.8).abs() < 1e-9);
        assert_eq!(similarity_ratio("a", "xyz"), Some(0.0));
        assert_eq!(similarity_ratio("", ""), None);
    }

    #[test]
    fn test_config_rejects_out_of_range_threshold() {
        assert_eq!(
            MatchConfig::new(1.5, true),
            Err(MatchError::InvalidThreshold(1.5))
        );
        assert!(MatchConfig::new(-0.1, true).is_err());
        assert!(MatchConfig::new(0.0, false).is_ok());
        assert!(MatchConfig::new(1.0, true).is_ok());
    }

    #[test]
    fn test_substring_containment_both_directions() {
        let matcher = SimilarityMatcher::default();
        let universe = ["#Goma", "#GomaCity", "#Kinshasa"];
        let set = matcher.similar_tags("#goma", &universe);

        assert_eq!(set.len(), 2);
        assert!(set.contains("goma"));
        assert!(set.contains("gomacity"));
        assert!(!set.contains("kinshasa"));

        // Shorter candidate contained in the target
        let set = matcher.similar_tags("#GomaCity", &universe);
        assert!(set.contains("goma"));
    }

    #[test]
    fn test_edit_distance_match() {
        let matcher = SimilarityMatcher::default();
        let set = matcher.similar_tags("#kinshasa", &["#kinshsa"]);
        assert!(set.contains("kinshsa"));
    }

    #[test]
    fn test_dissimilar_tag_excluded() {
        let matcher = SimilarityMatcher::default();
        let set = matcher.similar_tags("#a", &["#xyz"]);
        assert_eq!(set.len(), 1);
        assert!(set.contains("a"));
    }

    #[test]
    fn test_threshold_is_strict() {
        // distance 1 over 4 characters gives exactly 0.75
        let strict = SimilarityMatcher::new(MatchConfig::new(0.75, false).unwrap());
        assert!(!strict.is_similar("abcd", "abce"));

        let loose = SimilarityMatcher::new(MatchConfig::new(0.7, false).unwrap());
        assert!(loose.is_similar("abcd", "abce"));
    }

    #[test]
    fn test_substring_match_can_be_disabled() {
        let matcher = SimilarityMatcher::new(MatchConfig::new(0.7, false).unwrap());
        let set = matcher.similar_tags("#goma", &["#gomacityhall"]);
        assert!(!set.contains("gomacityhall"));
    }

    #[test]
    fn test_similarity_is_one_hop_only() {
        // "gomacity" ~ "omacityy" at ratio 0.75, "goma" ~ "omacityy" only at 0.25
        let matcher = SimilarityMatcher::default();
        assert!(matcher.is_similar("gomacity", "omacityy"));

        let set = matcher.similar_tags("#goma", &["#gomacity", "#omacityy"]);
        assert!(set.contains("gomacity"));
        assert!(!set.contains("omacityy"));
    }

    #[test]
    fn test_empty_target_only_matches_itself() {
        let matcher = SimilarityMatcher::default();
        let set = matcher.similar_tags("#", &["#goma", "#kivu"]);
        assert_eq!(set.len(), 1);
        assert!(set.contains(""));
    }

    #[test]
    fn test_target_always_in_own_set() {
        let matcher = SimilarityMatcher::default();
        let empty: [&str; 0] = [];
        let set = matcher.similar_tags("#Mbandaka", &empty);
        assert!(set.contains("mbandaka"));
    }
}
