//! Post handlers: create/list/get/delete plus likes and comments.

use axum::{
    extract::{Extension, Path},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{Comment, CommentRemoveError, Like, LikeError, Post, User};
use crate::store;
use crate::store::collection::Collection;
use crate::validation::{required, validate, Rule};

const TEXT_RULES: &[Rule] = &[required("text", "Text is required")];

#[derive(Debug, Deserialize)]
struct TextBody {
    text: String,
}

fn parse_post_id(raw: &str) -> Result<Uuid, ApiError> {
    // A syntactically invalid id is indistinguishable from an absent post
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("Post not found"))
}

async fn find_post(posts: &Collection<Post>, id: Uuid) -> Result<Post, ApiError> {
    posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))
}

async fn find_author(users: &Collection<User>, id: Uuid) -> Result<User, ApiError> {
    users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

fn decode<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|_| ApiError::bad_request("Invalid request body"))
}

/// POST /api/posts - create a post, denormalizing the caller's display fields
pub async fn create_post(
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> Result<Json<Post>, ApiError> {
    validate(&body, TEXT_RULES)?;
    let payload: TextBody = decode(body)?;

    let users = store::users().await?;
    let author = find_author(&users, auth.user_id).await?;

    let post = Post::new(auth.user_id, payload.text, author.name, author.avatar);
    store::posts().await?.insert(post.id, &post).await?;

    Ok(Json(post))
}

/// GET /api/posts - all posts, newest first
pub async fn get_posts(
    Extension(_auth): Extension<AuthUser>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = store::posts().await?.find_all().await?;
    Ok(Json(posts))
}

/// GET /api/posts/:id
pub async fn get_post(
    Extension(_auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let id = parse_post_id(&id)?;
    let posts = store::posts().await?;
    let post = find_post(&posts, id).await?;
    Ok(Json(post))
}

/// DELETE /api/posts/:id - owner only
pub async fn delete_post(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_post_id(&id)?;
    let posts = store::posts().await?;
    let post = find_post(&posts, id).await?;

    if post.user != auth.user_id {
        return Err(ApiError::unauthorized("User not authorized"));
    }

    posts.delete(id).await?;
    Ok(Json(json!({ "msg": "Post removed" })))
}

/// PUT /api/posts/like/:id - returns the updated likes sequence
pub async fn like_post(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Like>>, ApiError> {
    let id = parse_post_id(&id)?;
    let posts = store::posts().await?;
    let mut post = find_post(&posts, id).await?;

    post.like(auth.user_id).map_err(|_: LikeError| ApiError::bad_request("Post already liked"))?;

    posts.update(post.id, &post).await?;
    Ok(Json(post.likes))
}

/// PUT /api/posts/unlike/:id - returns the updated likes sequence
pub async fn unlike_post(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Like>>, ApiError> {
    let id = parse_post_id(&id)?;
    let posts = store::posts().await?;
    let mut post = find_post(&posts, id).await?;

    post.unlike(auth.user_id)
        .map_err(|_: LikeError| ApiError::bad_request("Post has not yet been liked"))?;

    posts.update(post.id, &post).await?;
    Ok(Json(post.likes))
}

/// POST /api/posts/comment/:id - returns the updated comments sequence
pub async fn add_comment(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    validate(&body, TEXT_RULES)?;
    let payload: TextBody = decode(body)?;

    let id = parse_post_id(&id)?;
    let users = store::users().await?;
    let author = find_author(&users, auth.user_id).await?;

    let posts = store::posts().await?;
    let mut post = find_post(&posts, id).await?;

    post.add_comment(auth.user_id, payload.text, author.name, author.avatar);

    // Persist the modified post itself
    posts.update(post.id, &post).await?;
    Ok(Json(post.comments))
}

/// DELETE /api/posts/comment/:id/:comment_id - comment author only
pub async fn delete_comment(
    Extension(auth): Extension<AuthUser>,
    Path((id, comment_id)): Path<(String, String)>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let id = parse_post_id(&id)?;
    let comment_id = Uuid::parse_str(&comment_id)
        .map_err(|_| ApiError::not_found("Comment does not exist"))?;

    let posts = store::posts().await?;
    let mut post = find_post(&posts, id).await?;

    post.remove_comment(comment_id, auth.user_id).map_err(|err| match err {
        CommentRemoveError::NotFound => ApiError::not_found("Comment does not exist"),
        CommentRemoveError::NotOwner => ApiError::unauthorized("User not authorized"),
    })?;

    posts.update(post.id, &post).await?;
    Ok(Json(post.comments))
}
