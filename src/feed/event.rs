//! Lifecycle events emitted by feed operations.

use crate::model::{Author, Comment, Post, PostBody, PostId};
use crate::mvi::Intent;

use super::state::OperationKind;

#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    FetchPageStarted {
        start: u32,
        limit: u32,
    },
    FetchPageSucceeded {
        posts: Vec<Post>,
        start: u32,
        limit: u32,
        /// Revision returned when the fetch was started.
        issued_at: u64,
    },
    FetchPageFailed {
        message: String,
    },

    FetchPostStarted {
        post_id: PostId,
    },
    FetchPostSucceeded {
        post: Post,
        issued_at: u64,
    },
    FetchPostFailed {
        post_id: PostId,
        message: String,
    },

    LikeStarted {
        post_id: PostId,
    },
    LikeSucceeded {
        post_id: PostId,
        likes_count: u64,
        is_liked_by_user: bool,
    },
    LikeFailed {
        post_id: PostId,
        message: String,
    },

    CreatePostStarted,
    CreatePostSucceeded {
        post: PostBody,
        author: Author,
    },
    CreatePostFailed {
        message: String,
    },

    DeletePostStarted {
        post_id: PostId,
    },
    DeletePostSucceeded {
        post_id: PostId,
    },
    DeletePostFailed {
        post_id: PostId,
        message: String,
    },

    FetchCommentsStarted {
        post_id: PostId,
    },
    FetchCommentsSucceeded {
        post_id: PostId,
        comments: Vec<Comment>,
    },
    FetchCommentsFailed {
        post_id: PostId,
        message: String,
    },

    AddCommentStarted {
        post_id: PostId,
    },
    AddCommentSucceeded {
        post_id: PostId,
        comment: Comment,
    },
    AddCommentFailed {
        post_id: PostId,
        message: String,
    },

    /// The server no longer knows this post. Ends the `kind` request
    /// without recording an outcome.
    PostVanished {
        post_id: PostId,
        kind: OperationKind,
    },

    /// Drop everything (sign-out), keeping the page size.
    Reset,
}

impl Intent for FeedEvent {}
