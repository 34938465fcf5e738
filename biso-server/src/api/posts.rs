use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::{ApiError, ApiResult},
    db::repositories::{FavoriteRepository, PostRepository},
    hashtag::sorted_post_tags,
    state::AppState,
};
use biso_types::{CreatePostRequest, FavoriteResponse, Post, SortOrder};

/// Longest caption accepted, in characters
pub const MAX_CAPTION_LENGTH: usize = 2200;

/// Extract the caller's user ID from the identity header set by the platform
pub(crate) fn get_user_from_headers(headers: &HeaderMap) -> Result<Uuid, ApiError> {
    let value = headers
        .get("X-User-Id")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing X-User-Id header".to_string()))?;

    Uuid::parse_str(value.trim())
        .map_err(|_| ApiError::Unauthorized("Invalid X-User-Id header".to_string()))
}

fn parse_post_id(post_id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(post_id).map_err(|_| ApiError::BadRequest("Invalid post ID".to_string()))
}

#[derive(Deserialize)]
pub struct GetPostsQuery {
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    sort: Option<String>,
}

fn default_limit() -> i64 {
    25
}

/// GET /posts - Get posts with sorting and limit
pub async fn get_posts(
    State(state): State<AppState>,
    query: Result<Query<GetPostsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Post>>> {
    let Query(query) = query?;
    if query.limit <= 0 {
        return Err(ApiError::BadRequest("limit must be positive".to_string()));
    }

    let sort_order = match query.sort.as_deref() {
        None => SortOrder::default(),
        Some(sort) => SortOrder::parse(sort).ok_or_else(|| {
            ApiError::BadRequest(format!(
                "Unknown sort order '{}', expected Newest or Popular",
                sort
            ))
        })?,
    };

    let posts = PostRepository::new(state.db.pool.clone())
        .get_posts(sort_order, query.limit)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok(Json(posts))
}

/// POST /posts - Create a new post
pub async fn create_post(
    State(state): State<AppState>,
    Json(payload): Json<CreatePostRequest>,
) -> ApiResult<Json<Post>> {
    if payload.caption.trim().is_empty() {
        return Err(ApiError::BadRequest("Caption cannot be empty".to_string()));
    }
    let length = payload.caption.chars().count();
    if length > MAX_CAPTION_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Caption exceeds {} character limit (current: {})",
            MAX_CAPTION_LENGTH, length
        )));
    }
    if payload.author_name.trim().is_empty() {
        return Err(ApiError::BadRequest("Author name cannot be empty".to_string()));
    }

    let post = Post {
        id: Uuid::new_v4(),
        author_id: payload.author_id,
        author_name: payload.author_name.trim().to_string(),
        hashtags: sorted_post_tags(&payload.caption),
        caption: payload.caption,
        like_count: 0,
        created_at: Utc::now(),
    };

    PostRepository::new(state.db.pool.clone())
        .create(&post)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    tracing::info!(post_id = %post.id, hashtags = post.hashtags.len(), "Post created");

    Ok(Json(post))
}

/// GET /posts/:id - Get a single post
pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> ApiResult<Json<Post>> {
    let post_id = parse_post_id(&post_id)?;

    let post = PostRepository::new(state.db.pool.clone())
        .get_by_id(&post_id)
        .map_err(|e| ApiError::InternalError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    Ok(Json(post))
}

/// DELETE /posts/:id - Delete a post (author only)
pub async fn delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let post_id = parse_post_id(&post_id)?;
    let user_id = get_user_from_headers(&headers)?;

    let post_repo = PostRepository::new(state.db.pool.clone());
    let post = post_repo
        .get_by_id(&post_id)
        .map_err(|e| ApiError::InternalError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    if post.author_id != user_id {
        return Err(ApiError::Forbidden(
            "Only the author can delete this post".to_string(),
        ));
    }

    post_repo
        .delete(&post_id)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    tracing::info!(post_id = %post_id, "Post deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /posts/:id/favorite - Add a post to the caller's favorites
pub async fn favorite_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<FavoriteResponse>> {
    let post_id = parse_post_id(&post_id)?;
    let user_id = get_user_from_headers(&headers)?;

    let pool = state.db.pool.clone();
    PostRepository::new(pool.clone())
        .get_by_id(&post_id)
        .map_err(|e| ApiError::InternalError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    let like_count = FavoriteRepository::new(pool)
        .add(&user_id, &post_id)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok(Json(FavoriteResponse {
        post_id,
        favorited: true,
        like_count,
    }))
}

/// DELETE /posts/:id/favorite - Remove a post from the caller's favorites
pub async fn unfavorite_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<FavoriteResponse>> {
    let post_id = parse_post_id(&post_id)?;
    let user_id = get_user_from_headers(&headers)?;

    let pool = state.db.pool.clone();
    PostRepository::new(pool.clone())
        .get_by_id(&post_id)
        .map_err(|e| ApiError::InternalError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    let like_count = FavoriteRepository::new(pool)
        .remove(&user_id, &post_id)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok(Json(FavoriteResponse {
        post_id,
        favorited: false,
        like_count,
    }))
}

/// GET /favorites - Posts the caller has favorited
pub async fn get_favorites(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Post>>> {
    let user_id = get_user_from_headers(&headers)?;

    let posts = PostRepository::new(state.db.pool.clone())
        .get_favorited_by(&user_id)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok(Json(posts))
}
