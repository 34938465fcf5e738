use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    api::{ApiError, ApiResult},
    db::repositories::PostRepository,
    ranking::{summarize_hashtags, TargetTag},
    state::AppState,
};
use biso_types::{HashtagFeedResponse, HashtagSummary, Post, RankedPost, SimilarTagsResponse};

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

fn load_posts(state: &AppState) -> ApiResult<Vec<Post>> {
    PostRepository::new(state.db.pool.clone())
        .list_all()
        .map_err(|e| ApiError::InternalError(format!("Failed to load posts: {}", e)))
}

/// GET /hashtags - Every tag in the feed with its post count
pub async fn list_hashtags(State(state): State<AppState>) -> ApiResult<Json<Vec<HashtagSummary>>> {
    let posts = load_posts(&state)?;
    Ok(Json(summarize_hashtags(&posts)))
}

/// GET /hashtags/:tag/similar - Tags treated as the same topic as :tag
pub async fn get_similar_hashtags(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> ApiResult<Json<SimilarTagsResponse>> {
    let target = TargetTag::parse(&tag)?;
    let posts = load_posts(&state)?;

    let mut similar_tags: Vec<String> = state
        .ranker
        .similar_tags(&posts, target.normalized())
        .into_iter()
        .collect();
    similar_tags.sort();

    Ok(Json(SimilarTagsResponse {
        tag: target.normalized().to_string(),
        similar_tags,
    }))
}

/// GET /hashtags/:tag/posts - Ranked feed for :tag
pub async fn get_hashtag_feed(
    State(state): State<AppState>,
    Path(tag): Path<String>,
    query: Result<Query<FeedQuery>, QueryRejection>,
) -> ApiResult<Json<HashtagFeedResponse>> {
    let Query(query) = query?;
    let target = TargetTag::parse(&tag)?;
    let posts = load_posts(&state)?;

    let ranked = state.ranker.rank_target(&posts, &target);
    let count = ranked.count();

    tracing::debug!(
        tag = %ranked.tag,
        similar = ranked.similar_tags.len(),
        matches = count,
        "Ranked hashtag feed"
    );

    let limit = query.limit.unwrap_or(count);
    let ranked_posts = ranked
        .items
        .iter()
        .take(limit)
        .map(|item| RankedPost {
            post: item.post.clone(),
            match_kind: item.match_kind,
        })
        .collect();

    Ok(Json(HashtagFeedResponse {
        tag: ranked.tag.clone(),
        similar_tags: ranked.sorted_similar_tags(),
        count,
        posts: ranked_posts,
    }))
}
