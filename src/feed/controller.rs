//! Async feed operations.
//!
//! Each operation dispatches a started event, awaits the backend, then
//! dispatches exactly one outcome event. Operations share no lock besides
//! the store's own dispatch, so any number may be in flight at once.

use crate::api::{ApiError, LikeResponse, RemoteClient};
use crate::model::{Attachment, Comment, Post, PostId};
use crate::session::SessionStore;

use super::event::FeedEvent;
use super::state::OperationKind;
use super::FeedStore;

/// Entry point for feed operations.
#[derive(Clone)]
pub struct FeedController {
    client: RemoteClient,
    store: FeedStore,
    session: SessionStore,
}

impl FeedController {
    pub fn new(client: RemoteClient, store: FeedStore, session: SessionStore) -> Self {
        Self {
            client,
            store,
            session,
        }
    }

    pub fn store(&self) -> &FeedStore {
        &self.store
    }

    /// Fetch `limit` posts starting at `start`. Returns how many arrived.
    ///
    /// `start == 0` replaces the feed; later pages are merged without
    /// duplicates. Callers stop paging once the cursor reports no more.
    pub async fn fetch_page(&self, start: u32, limit: u32) -> Result<usize, ApiError> {
        if limit == 0 {
            return Err(self.reject(
                "Page limit must be greater than zero",
                |message| FeedEvent::FetchPageFailed { message },
            ));
        }

        let issued_at = self
            .store
            .dispatch(FeedEvent::FetchPageStarted { start, limit })
            .revision();

        match self.client.list_posts(start, limit).await {
            Ok(posts) => {
                let received = posts.len();
                tracing::info!(start, limit, received, "Feed page loaded");
                self.store.dispatch(FeedEvent::FetchPageSucceeded {
                    posts,
                    start,
                    limit,
                    issued_at,
                });
                Ok(received)
            }
            Err(err) => {
                tracing::warn!(start, limit, error = %err, "Feed page failed");
                self.store.dispatch(FeedEvent::FetchPageFailed {
                    message: err.user_message(),
                });
                Err(err)
            }
        }
    }

    /// Reload the first page with the current page size.
    pub async fn refresh(&self) -> Result<usize, ApiError> {
        let limit = self.store.snapshot().cursor().limit;
        self.fetch_page(0, limit).await
    }

    /// Fetch the page after the last one loaded.
    ///
    /// Returns `Ok(None)` without a request once the feed is exhausted.
    pub async fn fetch_next_page(&self) -> Result<Option<usize>, ApiError> {
        let cursor = self.store.snapshot().cursor();
        if !cursor.has_more {
            return Ok(None);
        }
        self.fetch_page(cursor.next_start, cursor.limit)
            .await
            .map(Some)
    }

    /// Fetch one post with its media and author.
    pub async fn fetch_post(&self, post_id: &str) -> Result<Post, ApiError> {
        let post_id = self.require_id(post_id, |post_id, message| {
            FeedEvent::FetchPostFailed { post_id, message }
        })?;

        let issued_at = self
            .store
            .dispatch(FeedEvent::FetchPostStarted {
                post_id: post_id.clone(),
            })
            .revision();

        match self.client.get_post(&post_id).await {
            Ok(post) => {
                self.store.dispatch(FeedEvent::FetchPostSucceeded {
                    post: post.clone(),
                    issued_at,
                });
                Ok(post)
            }
            Err(err) => Err(self.settle_failure(
                &post_id,
                OperationKind::PostFetch,
                err,
                |message| FeedEvent::FetchPostFailed {
                    post_id: post_id.clone(),
                    message,
                },
            )),
        }
    }

    /// Toggle the viewer's like. The server decides the direction and the
    /// store only changes once it answers.
    pub async fn like(&self, post_id: &str) -> Result<LikeResponse, ApiError> {
        let post_id = self.require_id(post_id, |post_id, message| FeedEvent::LikeFailed {
            post_id,
            message,
        })?;

        self.store.dispatch(FeedEvent::LikeStarted {
            post_id: post_id.clone(),
        });

        match self.client.like_post(&post_id).await {
            Ok(like) => {
                tracing::info!(
                    post_id = %post_id,
                    likes_count = like.likes_count,
                    liked = like.is_liked_by_user,
                    "Like confirmed"
                );
                self.store.dispatch(FeedEvent::LikeSucceeded {
                    post_id,
                    likes_count: like.likes_count,
                    is_liked_by_user: like.is_liked_by_user,
                });
                Ok(like)
            }
            Err(err) => Err(self.settle_failure(
                &post_id,
                OperationKind::Like,
                err,
                |message| FeedEvent::LikeFailed {
                    post_id: post_id.clone(),
                    message,
                },
            )),
        }
    }

    /// Create a post. Blank title or content fails without a request.
    pub async fn create_post(
        &self,
        title: &str,
        content: &str,
        attachments: &[Attachment],
    ) -> Result<PostId, ApiError> {
        let failed = |message| FeedEvent::CreatePostFailed { message };
        if title.trim().is_empty() {
            return Err(self.reject("Title must not be empty", failed));
        }
        if content.trim().is_empty() {
            return Err(self.reject("Content must not be empty", failed));
        }

        self.store.dispatch(FeedEvent::CreatePostStarted);

        let body = match self.client.create_post(title, content, attachments).await {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(error = %err, "Create post failed");
                self.store.dispatch(failed(err.user_message()));
                return Err(err);
            }
        };

        let author = self
            .session
            .snapshot()
            .user()
            .map(|user| user.as_author())
            .or_else(|| body.embedded_author().cloned());
        let Some(author) = author else {
            let err = ApiError::MalformedResponse {
                endpoint: crate::api::endpoints::display(crate::api::endpoints::CREATE_POST),
                reason: "created post has no author and no user is signed in".to_string(),
            };
            self.store.dispatch(failed(err.user_message()));
            return Err(err);
        };

        let post_id = body.id.clone();
        tracing::info!(post_id = %post_id, media = attachments.len(), "Post created");
        self.store.dispatch(FeedEvent::CreatePostSucceeded { post: body, author });
        Ok(post_id)
    }

    /// Delete a post. The server decides whether the viewer may; a post it
    /// no longer knows counts as deleted.
    pub async fn delete_post(&self, post_id: &str) -> Result<(), ApiError> {
        let post_id = self.require_id(post_id, |post_id, message| {
            FeedEvent::DeletePostFailed { post_id, message }
        })?;

        self.store.dispatch(FeedEvent::DeletePostStarted {
            post_id: post_id.clone(),
        });

        match self.client.delete_post(&post_id).await {
            Ok(_) => {
                tracing::info!(post_id = %post_id, "Post deleted");
                self.store.dispatch(FeedEvent::DeletePostSucceeded { post_id });
                Ok(())
            }
            Err(err) if err.is_not_found() => {
                tracing::debug!(post_id = %post_id, "Post already gone");
                self.store.dispatch(FeedEvent::DeletePostSucceeded { post_id });
                Ok(())
            }
            Err(err) => {
                tracing::warn!(post_id = %post_id, error = %err, "Delete failed");
                self.store.dispatch(FeedEvent::DeletePostFailed {
                    post_id,
                    message: err.user_message(),
                });
                Err(err)
            }
        }
    }

    /// Add a comment. Whitespace-only content fails without a request.
    pub async fn add_comment(&self, post_id: &str, content: &str) -> Result<Comment, ApiError> {
        let post_id = self.require_id(post_id, |post_id, message| {
            FeedEvent::AddCommentFailed { post_id, message }
        })?;
        if content.trim().is_empty() {
            return Err(self.reject("Comment must not be empty", |message| {
                FeedEvent::AddCommentFailed {
                    post_id: post_id.clone(),
                    message,
                }
            }));
        }

        self.store.dispatch(FeedEvent::AddCommentStarted {
            post_id: post_id.clone(),
        });

        match self.client.add_comment(&post_id, content.trim()).await {
            Ok(comment) => {
                self.store.dispatch(FeedEvent::AddCommentSucceeded {
                    post_id,
                    comment: comment.clone(),
                });
                Ok(comment)
            }
            Err(err) => Err(self.settle_failure(
                &post_id,
                OperationKind::Comment,
                err,
                |message| FeedEvent::AddCommentFailed {
                    post_id: post_id.clone(),
                    message,
                },
            )),
        }
    }

    /// Load all comments of a post, replacing any cached list.
    pub async fn fetch_comments(&self, post_id: &str) -> Result<usize, ApiError> {
        let post_id = self.require_id(post_id, |post_id, message| {
            FeedEvent::FetchCommentsFailed { post_id, message }
        })?;

        self.store.dispatch(FeedEvent::FetchCommentsStarted {
            post_id: post_id.clone(),
        });

        match self.client.list_comments(&post_id).await {
            Ok(comments) => {
                let count = comments.len();
                self.store
                    .dispatch(FeedEvent::FetchCommentsSucceeded { post_id, comments });
                Ok(count)
            }
            Err(err) => Err(self.settle_failure(
                &post_id,
                OperationKind::CommentFetch,
                err,
                |message| FeedEvent::FetchCommentsFailed {
                    post_id: post_id.clone(),
                    message,
                },
            )),
        }
    }

    /// Record a precondition failure without contacting the server.
    fn reject(&self, message: &str, failed: impl FnOnce(String) -> FeedEvent) -> ApiError {
        tracing::debug!(%message, "Rejected before sending");
        self.store.dispatch(failed(message.to_string()));
        ApiError::InvalidArgument(message.to_string())
    }

    fn require_id(
        &self,
        post_id: &str,
        failed: impl FnOnce(PostId, String) -> FeedEvent,
    ) -> Result<PostId, ApiError> {
        let trimmed = post_id.trim();
        if trimmed.is_empty() {
            return Err(self.reject("Post id must not be empty", |message| {
                failed(String::new(), message)
            }));
        }
        Ok(trimmed.to_string())
    }

    /// Dispatch the outcome of a failed post-scoped call.
    ///
    /// A 404 means the post is gone: it is dropped from the store and the
    /// `kind` request ends without a recorded failure.
    fn settle_failure(
        &self,
        post_id: &str,
        kind: OperationKind,
        err: ApiError,
        failed: impl FnOnce(String) -> FeedEvent,
    ) -> ApiError {
        if err.is_not_found() {
            tracing::info!(post_id = %post_id, "Post no longer exists");
            self.store.dispatch(FeedEvent::PostVanished {
                post_id: post_id.to_string(),
                kind,
            });
            return err;
        }

        tracing::warn!(post_id = %post_id, error = %err, "Feed operation failed");
        self.store.dispatch(failed(err.user_message()));
        err
    }
}
