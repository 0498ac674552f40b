//! Request and response bodies, one explicit schema per endpoint.

use serde::{Deserialize, Serialize};

use crate::model::{Comment, Post, PostBody, User};

/// Fields every backend response may carry.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Envelope {
    /// Best human-readable explanation carried by the body.
    pub fn explanation(self) -> Option<String> {
        self.message
            .filter(|m| !m.trim().is_empty())
            .or(self.error.filter(|e| !e.trim().is_empty()))
    }
}

/// `GET posts/list`: `{data: [...]}` or `{posts: [...], start}`.
#[derive(Debug, Deserialize)]
pub struct PostListResponse {
    #[serde(alias = "posts")]
    pub data: Vec<Post>,
}

/// `GET posts/single/:id`.
#[derive(Debug, Deserialize)]
pub struct SinglePostResponse {
    #[serde(alias = "post")]
    pub data: Post,
}

/// `POST posts/create`.
#[derive(Debug, Deserialize)]
pub struct CreatePostResponse {
    #[serde(alias = "post")]
    pub data: PostBody,
}

/// Responses that only carry a confirmation message.
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest<'a> {
    pub post_id: &'a str,
}

/// `POST posts/like`: the server toggles and reports the new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub likes_count: u64,
    pub is_liked_by_user: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest<'a> {
    pub post_id: &'a str,
    pub content: &'a str,
}

/// `POST posts/comment`.
#[derive(Debug, Deserialize)]
pub struct CommentResponse {
    #[serde(alias = "data")]
    pub comment: Comment,
}

/// `GET posts/comments/:postId`.
#[derive(Debug, Deserialize)]
pub struct CommentListResponse {
    #[serde(alias = "data")]
    pub comments: Vec<Comment>,
}

#[derive(Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `POST auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: String,
}

/// `POST auth/login`. Token and user are only meaningful together.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub token: Option<String>,
}

/// `GET auth/profile` and `POST auth/profile/upload`.
#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    #[serde(alias = "user")]
    pub data: User,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest<'a> {
    pub old_password: &'a str,
    pub new_password: &'a str,
}
