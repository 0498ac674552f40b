//! Feed state: posts, per-post comments, pagination cursor, request status.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::model::{Comment, Post, PostId};
use crate::mvi::{RequestStatus, StoreState};

/// Page size used when none is configured.
pub const DEFAULT_PAGE_LIMIT: u32 = 5;

/// Operation groups whose request lifecycle is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    FeedFetch,
    PostFetch,
    Like,
    Create,
    Delete,
    /// Adding a comment.
    Comment,
    /// Fetching a post's comments.
    CommentFetch,
}

/// Pagination progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Offset to request next.
    pub next_start: u32,
    /// Page size.
    pub limit: u32,
    /// False once a page came back shorter than `limit`.
    pub has_more: bool,
}

impl Cursor {
    pub fn new(limit: u32) -> Self {
        Self {
            next_start: 0,
            limit,
            has_more: true,
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_LIMIT)
    }
}

/// Like state confirmed by the server, stamped with the revision at which
/// it was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ConfirmedLike {
    pub likes_count: u64,
    pub is_liked_by_user: bool,
    pub revision: u64,
}

/// Snapshot of the feed.
///
/// Only the feed reducer builds new states; readers use the accessors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedState {
    pub(crate) posts: IndexMap<PostId, Post>,
    /// Posts fetched individually that are not part of the paginated feed.
    pub(crate) detached: HashMap<PostId, Post>,
    pub(crate) comments_by_post: HashMap<PostId, Vec<Comment>>,
    pub(crate) cursor: Cursor,
    pub(crate) status: HashMap<OperationKind, RequestStatus>,
    pub(crate) confirmed_likes: HashMap<PostId, ConfirmedLike>,
    /// Issue revision of the newest refresh applied. Page and post
    /// responses issued before it are stale.
    pub(crate) refreshed_at: u64,
    pub(crate) revision: u64,
}

impl StoreState for FeedState {}

static IDLE: RequestStatus = RequestStatus::Idle;

impl FeedState {
    /// Empty feed paginating `limit` posts at a time.
    pub fn with_page_limit(limit: u32) -> Self {
        Self {
            cursor: Cursor::new(limit),
            ..Self::default()
        }
    }

    /// Feed posts, newest first.
    pub fn posts(&self) -> impl Iterator<Item = &Post> {
        self.posts.values()
    }

    pub fn post_ids(&self) -> Vec<&str> {
        self.posts.keys().map(String::as_str).collect()
    }

    /// Post by id, from the feed or from individually fetched posts.
    pub fn post(&self, id: &str) -> Option<&Post> {
        self.posts.get(id).or_else(|| self.detached.get(id))
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Cached comments for a post; empty when never fetched.
    pub fn comments(&self, post_id: &str) -> &[Comment] {
        self.comments_by_post
            .get(post_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether comments for this post have been loaded.
    pub fn has_comments(&self, post_id: &str) -> bool {
        self.comments_by_post.contains_key(post_id)
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn status(&self, kind: OperationKind) -> &RequestStatus {
        self.status.get(&kind).unwrap_or(&IDLE)
    }

    pub fn is_pending(&self, kind: OperationKind) -> bool {
        self.status(kind).is_pending()
    }

    /// Number of events applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
