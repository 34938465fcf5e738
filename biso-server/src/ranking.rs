use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use biso_types::{HashtagSummary, MatchKind, Post};

use crate::hashtag::{normalize_hashtag, post_tags, tag_universe};
use crate::similarity::{MatchError, SimilarityMatcher};

/// Anything the ranker can place in a hashtag feed
pub trait FeedItem {
    fn caption(&self) -> &str;
    fn like_count(&self) -> u32;
}

impl FeedItem for Post {
    fn caption(&self) -> &str {
        &self.caption
    }

    fn like_count(&self) -> u32 {
        self.like_count
    }
}

/// A validated hashtag to build a feed for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetTag {
    raw: String,
    normalized: String,
}

impl TargetTag {
    /// Accepts a tag with or without its marker; rejects tags that normalize to nothing
    pub fn parse(raw: &str) -> Result<Self, MatchError> {
        let normalized = normalize_hashtag(raw);
        if normalized.is_empty() {
            return Err(MatchError::EmptyTarget);
        }
        Ok(Self {
            raw: raw.to_string(),
            normalized,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

/// One post in a ranked feed
#[derive(Debug, Clone, Copy)]
pub struct RankedItem<'a, P> {
    pub post: &'a P,
    pub match_kind: MatchKind,
}

/// Outcome of ranking a post collection for one tag
#[derive(Debug, Clone)]
pub struct RankedPosts<'a, P> {
    /// Normalized target tag
    pub tag: String,
    pub similar_tags: HashSet<String>,
    pub items: Vec<RankedItem<'a, P>>,
}

impl<'a, P> RankedPosts<'a, P> {
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn posts(&self) -> impl Iterator<Item = &'a P> + '_ {
        self.items.iter().map(|item| item.post)
    }

    /// Similarity set in a stable order
    pub fn sorted_similar_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.similar_tags.iter().cloned().collect();
        tags.sort();
        tags
    }
}

/// Normalized tags with the number of posts carrying each
///
/// Busiest tags first, ties broken by name.
pub fn summarize_hashtags<P: FeedItem>(posts: &[P]) -> Vec<HashtagSummary> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for post in posts {
        for tag in post_tags(post.caption()) {
            *counts.entry(tag).or_insert(0) += 1;
        }
    }

    let mut summaries: Vec<HashtagSummary> = counts
        .into_iter()
        .map(|(name, post_count)| HashtagSummary { name, post_count })
        .collect();
    summaries.sort_by(|a, b| b.post_count.cmp(&a.post_count).then_with(|| a.name.cmp(&b.name)));
    summaries
}

/// Filters and orders posts for a hashtag feed
///
/// Posts carrying the exact target tag come first, then posts that only
/// matched through a similar tag. Within each group posts are ordered by like
/// count, highest first, keeping input order on ties.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostRanker {
    matcher: SimilarityMatcher,
}

impl PostRanker {
    pub fn new(matcher: SimilarityMatcher) -> Self {
        Self { matcher }
    }

    /// Similarity set of `target` over the tags found in `posts`
    pub fn similar_tags<P: FeedItem>(&self, posts: &[P], target: &str) -> HashSet<String> {
        let universe = tag_universe(posts.iter().map(|post| post.caption()));
        self.matcher.similar_tags(target, &universe)
    }

    pub fn rank<'a, P: FeedItem>(&self, posts: &'a [P], target: &str) -> RankedPosts<'a, P> {
        let tag = normalize_hashtag(target);
        let similar_tags = self.similar_tags(posts, target);

        let mut items: Vec<RankedItem<'a, P>> = posts
            .iter()
            .filter_map(|post| {
                let tags = post_tags(post.caption());
                if tags.is_disjoint(&similar_tags) {
                    return None;
                }
                let match_kind = if tags.contains(&tag) {
                    MatchKind::Exact
                } else {
                    MatchKind::Similar
                };
                Some(RankedItem { post, match_kind })
            })
            .collect();

        // sort_by_key is stable, ties keep input order
        items.sort_by_key(|item| {
            (
                item.match_kind != MatchKind::Exact,
                Reverse(item.post.like_count()),
            )
        });

        RankedPosts {
            tag,
            similar_tags,
            items,
        }
    }

    /// Same as [`PostRanker::rank`] for a validated tag
    pub fn rank_target<'a, P: FeedItem>(
        &self,
        posts: &'a [P],
        target: &TargetTag,
    ) -> RankedPosts<'a, P> {
        self.rank(posts, target.normalized())
    }
}
