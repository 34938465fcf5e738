// Integration tests for the hashtag feed pipeline
// These walk the scenarios a hashtag page goes through: extract, match, rank

use biso_server::hashtag::{extract_hashtags, post_tags, tag_universe};
use biso_server::ranking::{PostRanker, TargetTag};
use biso_server::similarity::{MatchConfig, MatchError, SimilarityMatcher};
use biso_types::{MatchKind, Post};
use chrono::Utc;
use uuid::Uuid;

fn post(caption: &str, like_count: u32) -> Post {
    Post {
        id: Uuid::new_v4(),
        author_id: Uuid::new_v4(),
        author_name: "amani".to_string(),
        caption: caption.to_string(),
        like_count,
        created_at: Utc::now(),
        hashtags: Vec::new(),
    }
}

#[test]
fn test_caption_extraction_and_post_tags() {
    let caption = "Belle vue #Goma au bord du lac #goma";
    assert_eq!(extract_hashtags(caption), vec!["#Goma", "#goma"]);

    let tags = post_tags(caption);
    assert_eq!(tags.len(), 1);
    assert!(tags.contains("goma"));
}

#[test]
fn test_similarity_set_from_universe() {
    let posts = [
        post("#Goma", 1),
        post("#GomaCity la nuit", 1),
        post("#Kinshasa", 1),
    ];
    let universe = tag_universe(posts.iter().map(|p| p.caption.as_str()));
    assert_eq!(universe, vec!["#Goma", "#GomaCity", "#Kinshasa"]);

    let set = SimilarityMatcher::default().similar_tags("#goma", &universe);
    assert_eq!(set.len(), 2);
    assert!(set.contains("goma"));
    assert!(set.contains("gomacity"));
    assert!(!set.contains("kinshasa"));
}

#[test]
fn test_close_spelling_is_included() {
    let set = SimilarityMatcher::default().similar_tags("#kivu", &["#kivus"]);
    assert!(set.contains("kivus"));
}

#[test]
fn test_unrelated_short_tag_is_excluded() {
    let set = SimilarityMatcher::default().similar_tags("#a", &["#xyz"]);
    assert!(!set.contains("xyz"));
}

#[test]
fn test_exact_match_ranks_before_more_liked_similar_match() {
    let p1 = post("Marché central #goma", 10);
    let p2 = post("Vue du volcan #gomacity", 50);
    let posts = vec![p1.clone(), p2.clone()];

    let ranked = PostRanker::default().rank(&posts, "#goma");
    let ids: Vec<Uuid> = ranked.posts().map(|p| p.id).collect();
    assert_eq!(ids, vec![p1.id, p2.id]);
    assert_eq!(ranked.items[0].match_kind, MatchKind::Exact);
    assert_eq!(ranked.items[1].match_kind, MatchKind::Similar);
    assert_eq!(ranked.count(), 2);
}

#[test]
fn test_empty_inputs_yield_empty_feed() {
    let ranker = PostRanker::default();

    let empty: Vec<Post> = Vec::new();
    assert!(ranker.rank(&empty, "#goma").is_empty());

    let posts = vec![post("#kinshasa", 3), post("sans tag", 8)];
    assert!(ranker.rank(&posts, "#mbandaka").is_empty());
}

#[test]
fn test_configured_threshold_changes_feed() {
    let posts = vec![post("#kinshasa", 1), post("#kinshsa", 2)];

    let default_feed = PostRanker::default().rank(&posts, "#kinshasa");
    assert_eq!(default_feed.count(), 2);

    let strict = PostRanker::new(SimilarityMatcher::new(MatchConfig::new(0.9, true).unwrap()));
    let strict_feed = strict.rank(&posts, "#kinshasa");
    assert_eq!(strict_feed.count(), 1);
    assert_eq!(strict_feed.items[0].post.caption, "#kinshasa");
}

#[test]
fn test_empty_target_rejected_at_boundary() {
    assert_eq!(TargetTag::parse("#"), Err(MatchError::EmptyTarget));
    assert_eq!(TargetTag::parse("   "), Err(MatchError::EmptyTarget));

    let target = TargetTag::parse("#Goma").unwrap();
    let posts = vec![post("#goma", 1)];
    assert_eq!(PostRanker::default().rank_target(&posts, &target).count(), 1);
}
