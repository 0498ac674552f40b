//! Reducer for the feed.
//!
//! Every transition is total: events that reference posts no longer held
//! are no-ops, and failures record a message without touching entities.

use std::collections::HashSet;

use crate::model::{Post, PostId};
use crate::mvi::{Reducer, RequestStatus};

use super::event::FeedEvent;
use super::state::{ConfirmedLike, Cursor, FeedState, OperationKind};

pub struct FeedReducer;

impl Reducer for FeedReducer {
    type State = FeedState;
    type Intent = FeedEvent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        state.revision += 1;

        match intent {
            FeedEvent::FetchPageStarted { .. } => {
                state.set_status(OperationKind::FeedFetch, RequestStatus::Pending);
            }

            FeedEvent::FetchPageSucceeded {
                posts,
                start,
                limit,
                issued_at,
            } => {
                // A newer refresh already replaced the feed.
                if issued_at < state.refreshed_at {
                    return state;
                }

                let received = u32::try_from(posts.len()).unwrap_or(u32::MAX);
                if start == 0 {
                    state.replace_posts(posts, issued_at);
                } else {
                    state.append_posts(posts, issued_at);
                }
                state.cursor = Cursor {
                    next_start: start.saturating_add(received),
                    limit,
                    has_more: received >= limit,
                };
                state.set_status(OperationKind::FeedFetch, RequestStatus::Succeeded);
            }

            FeedEvent::FetchPageFailed { message } => {
                state.set_status(OperationKind::FeedFetch, RequestStatus::Failed(message));
            }

            FeedEvent::FetchPostStarted { .. } => {
                state.set_status(OperationKind::PostFetch, RequestStatus::Pending);
            }

            FeedEvent::FetchPostSucceeded { post, issued_at } => {
                let post = state.preserve_confirmed(post, issued_at);
                let stale = issued_at < state.refreshed_at;
                if let Some(existing) = state.posts.get_mut(&post.id) {
                    if !stale {
                        *existing = post;
                    }
                } else {
                    state.detached.insert(post.id.clone(), post);
                }
                state.set_status(OperationKind::PostFetch, RequestStatus::Succeeded);
            }

            FeedEvent::FetchPostFailed { message, .. } => {
                state.set_status(OperationKind::PostFetch, RequestStatus::Failed(message));
            }

            // Likes are applied on server confirmation only.
            FeedEvent::LikeStarted { .. } => {}

            FeedEvent::LikeSucceeded {
                post_id,
                likes_count,
                is_liked_by_user,
            } => {
                let revision = state.revision;
                if let Some(post) = state.post_mut(&post_id) {
                    post.likes_count = likes_count;
                    post.is_liked_by_user = is_liked_by_user;
                    state.confirmed_likes.insert(
                        post_id,
                        ConfirmedLike {
                            likes_count,
                            is_liked_by_user,
                            revision,
                        },
                    );
                }
                state.set_status(OperationKind::Like, RequestStatus::Succeeded);
            }

            FeedEvent::LikeFailed { message, .. } => {
                state.set_status(OperationKind::Like, RequestStatus::Failed(message));
            }

            FeedEvent::CreatePostStarted => {
                state.set_status(OperationKind::Create, RequestStatus::Pending);
            }

            FeedEvent::CreatePostSucceeded { post, author } => {
                let post = post.into_post(author);
                let id = post.id.clone();
                state.posts.shift_remove(&id);
                state.detached.remove(&id);
                state.posts.shift_insert(0, id, post);
                state.set_status(OperationKind::Create, RequestStatus::Succeeded);
            }

            FeedEvent::CreatePostFailed { message } => {
                state.set_status(OperationKind::Create, RequestStatus::Failed(message));
            }

            FeedEvent::DeletePostStarted { .. } => {
                state.set_status(OperationKind::Delete, RequestStatus::Pending);
            }

            FeedEvent::DeletePostSucceeded { post_id } => {
                state.remove_post(&post_id);
                state.set_status(OperationKind::Delete, RequestStatus::Succeeded);
            }

            FeedEvent::DeletePostFailed { message, .. } => {
                state.set_status(OperationKind::Delete, RequestStatus::Failed(message));
            }

            FeedEvent::FetchCommentsStarted { .. } => {
                state.set_status(OperationKind::CommentFetch, RequestStatus::Pending);
            }

            FeedEvent::FetchCommentsSucceeded { post_id, comments } => {
                state.comments_by_post.insert(post_id, comments);
                state.set_status(OperationKind::CommentFetch, RequestStatus::Succeeded);
            }

            FeedEvent::FetchCommentsFailed { message, .. } => {
                state.set_status(OperationKind::CommentFetch, RequestStatus::Failed(message));
            }

            FeedEvent::AddCommentStarted { .. } => {
                state.set_status(OperationKind::Comment, RequestStatus::Pending);
            }

            FeedEvent::AddCommentSucceeded { post_id, comment } => {
                state
                    .comments_by_post
                    .entry(post_id)
                    .or_default()
                    .push(comment);
                state.set_status(OperationKind::Comment, RequestStatus::Succeeded);
            }

            FeedEvent::AddCommentFailed { message, .. } => {
                state.set_status(OperationKind::Comment, RequestStatus::Failed(message));
            }

            FeedEvent::PostVanished { post_id, kind } => {
                state.remove_post(&post_id);
                state.set_status(kind, RequestStatus::Idle);
            }

            // Responses to requests issued before the reset are dropped.
            FeedEvent::Reset => {
                let revision = state.revision;
                state = FeedState {
                    revision,
                    refreshed_at: revision,
                    ..FeedState::with_page_limit(state.cursor.limit)
                };
            }
        }

        state
    }
}

impl FeedState {
    fn set_status(&mut self, kind: OperationKind, status: RequestStatus) {
        self.status.insert(kind, status);
    }

    fn post_mut(&mut self, id: &str) -> Option<&mut Post> {
        match self.posts.get_mut(id) {
            Some(post) => Some(post),
            None => self.detached.get_mut(id),
        }
    }

    /// Keep like fields the server confirmed after `issued_at`: a response
    /// to a request issued earlier cannot know about them.
    fn preserve_confirmed(&self, mut post: Post, issued_at: u64) -> Post {
        if let Some(confirmed) = self.confirmed_likes.get(&post.id) {
            if confirmed.revision > issued_at {
                post.likes_count = confirmed.likes_count;
                post.is_liked_by_user = confirmed.is_liked_by_user;
            }
        }
        post
    }

    fn replace_posts(&mut self, posts: Vec<Post>, issued_at: u64) {
        let mut merged = indexmap::IndexMap::with_capacity(posts.len());
        for post in posts {
            let post = self.preserve_confirmed(post, issued_at);
            self.detached.remove(&post.id);
            merged.insert(post.id.clone(), post);
        }
        self.posts = merged;
        self.refreshed_at = issued_at;
        self.confirmed_likes.retain(|_, c| c.revision > issued_at);
    }

    fn append_posts(&mut self, posts: Vec<Post>, issued_at: u64) {
        let mut seen: HashSet<PostId> = self.posts.keys().cloned().collect();
        for post in posts {
            if !seen.insert(post.id.clone()) {
                continue;
            }
            let post = self.preserve_confirmed(post, issued_at);
            self.detached.remove(&post.id);
            self.posts.insert(post.id.clone(), post);
        }
    }

    fn remove_post(&mut self, id: &str) {
        self.posts.shift_remove(id);
        self.detached.remove(id);
        self.comments_by_post.remove(id);
        self.confirmed_likes.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Author, Comment, PostBody};
    use chrono::{TimeZone, Utc};

    fn post(id: &str, likes: u64) -> Post {
        Post {
            id: id.to_string(),
            title: format!("Title {id}"),
            content: format!("Content {id}"),
            author: author("u1"),
            media: Vec::new(),
            likes_count: likes,
            is_liked_by_user: false,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
        }
    }

    fn author(id: &str) -> Author {
        Author {
            id: id.to_string(),
            display_name: format!("user {id}"),
            avatar_url: None,
        }
    }

    fn comment(id: &str) -> Comment {
        Comment {
            id: id.to_string(),
            content: format!("comment {id}"),
            author: author("u2"),
        }
    }

    fn page(state: FeedState, ids: &[&str], start: u32, limit: u32) -> FeedState {
        let issued_at = state.revision;
        FeedReducer::reduce(
            state,
            FeedEvent::FetchPageSucceeded {
                posts: ids.iter().map(|id| post(id, 0)).collect(),
                start,
                limit,
                issued_at,
            },
        )
    }

    fn like(state: FeedState, id: &str, count: u64, liked: bool) -> FeedState {
        FeedReducer::reduce(
            state,
            FeedEvent::LikeSucceeded {
                post_id: id.to_string(),
                likes_count: count,
                is_liked_by_user: liked,
            },
        )
    }

    #[test]
    fn fetch_started_sets_pending() {
        let state = FeedReducer::reduce(
            FeedState::default(),
            FeedEvent::FetchPageStarted { start: 0, limit: 5 },
        );
        assert!(state.is_pending(OperationKind::FeedFetch));
        assert_eq!(state.revision(), 1);
    }

    #[test]
    fn refresh_replaces_posts() {
        let state = page(FeedState::default(), &["a", "b", "c"], 0, 5);
        let state = page(state, &["d", "b"], 0, 5);
        assert_eq!(state.post_ids(), vec!["d", "b"]);
    }

    #[test]
    fn append_skips_known_ids() {
        let state = page(FeedState::default(), &["a", "b"], 0, 2);
        let state = page(state, &["b", "c", "c"], 2, 3);
        assert_eq!(state.post_ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn append_keeps_existing_entry() {
        let state = like(page(FeedState::default(), &["a"], 0, 1), "a", 9, true);
        let state = page(state, &["a", "b"], 1, 2);
        assert_eq!(state.post("a").unwrap().likes_count, 9);
    }

    #[test]
    fn cursor_advances_and_stops() {
        let state = page(FeedState::default(), &["1", "2", "3", "4", "5"], 0, 5);
        assert_eq!(state.cursor().next_start, 5);
        assert!(state.cursor().has_more);

        let state = page(state, &["6", "7"], 5, 5);
        assert_eq!(state.cursor().next_start, 7);
        assert!(!state.cursor().has_more);
        assert_eq!(state.len(), 7);
    }

    #[test]
    fn fetch_failure_keeps_cursor() {
        let state = page(FeedState::default(), &["1", "2"], 0, 2);
        let before = state.cursor();
        let state = FeedReducer::reduce(
            state,
            FeedEvent::FetchPageFailed {
                message: "offline".into(),
            },
        );
        assert_eq!(state.cursor(), before);
        assert_eq!(
            state.status(OperationKind::FeedFetch).error_message(),
            Some("offline")
        );
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn like_started_changes_nothing_but_revision() {
        let state = page(FeedState::default(), &["a"], 0, 5);
        let next = FeedReducer::reduce(
            state.clone(),
            FeedEvent::LikeStarted {
                post_id: "a".into(),
            },
        );
        assert_eq!(next.posts, state.posts);
        assert_eq!(next.status, state.status);
        assert_eq!(next.revision(), state.revision() + 1);
    }

    #[test]
    fn like_on_absent_post_is_noop() {
        let state = page(FeedState::default(), &["a"], 0, 5);
        let next = like(state.clone(), "zzz", 10, true);
        assert_eq!(next.posts, state.posts);
        assert!(next.confirmed_likes.is_empty());
    }

    #[test]
    fn like_failure_leaves_count() {
        let state = page(FeedState::default(), &["a"], 0, 5);
        let next = FeedReducer::reduce(
            state,
            FeedEvent::LikeFailed {
                post_id: "a".into(),
                message: "nope".into(),
            },
        );
        assert_eq!(next.post("a").unwrap().likes_count, 0);
        assert!(next.status(OperationKind::Like).is_failed());
    }

    #[test]
    fn stale_refresh_keeps_confirmed_like() {
        let state = page(FeedState::default(), &["a", "b"], 0, 5);
        let issued_at = state.revision;
        let state = like(state, "b", 4, true);

        // Refresh issued before the like was confirmed.
        let mut stale = post("b", 3);
        stale.is_liked_by_user = false;
        let state = FeedReducer::reduce(
            state,
            FeedEvent::FetchPageSucceeded {
                posts: vec![post("a", 0), stale],
                start: 0,
                limit: 5,
                issued_at,
            },
        );

        let b = state.post("b").unwrap();
        assert_eq!(b.likes_count, 4);
        assert!(b.is_liked_by_user);
    }

    #[test]
    fn fresh_refresh_overrides_confirmed_like() {
        let state = page(FeedState::default(), &["a"], 0, 5);
        let state = like(state, "a", 4, true);
        let issued_at = state.revision;

        let state = FeedReducer::reduce(
            state,
            FeedEvent::FetchPageSucceeded {
                posts: vec![post("a", 12)],
                start: 0,
                limit: 5,
                issued_at,
            },
        );

        assert_eq!(state.post("a").unwrap().likes_count, 12);
        assert!(state.confirmed_likes.is_empty());
    }

    #[test]
    fn create_prepends() {
        let state = page(FeedState::default(), &["a", "b"], 0, 5);
        let body = PostBody {
            id: "c".into(),
            title: "new".into(),
            content: "post".into(),
            author: None,
            media: Vec::new(),
            likes_count: 0,
            is_liked_by_user: false,
            created_at: Utc::now(),
        };
        let state = FeedReducer::reduce(
            state,
            FeedEvent::CreatePostSucceeded {
                post: body,
                author: author("me"),
            },
        );
        assert_eq!(state.post_ids(), vec!["c", "a", "b"]);
        assert_eq!(state.post("c").unwrap().author.id, "me");
        assert_eq!(state.status(OperationKind::Create), &RequestStatus::Succeeded);
    }

    #[test]
    fn delete_removes_post_and_comments() {
        let state = page(FeedState::default(), &["a", "b"], 0, 5);
        let state = FeedReducer::reduce(
            state,
            FeedEvent::FetchCommentsSucceeded {
                post_id: "a".into(),
                comments: vec![comment("c1")],
            },
        );
        let state = FeedReducer::reduce(
            state,
            FeedEvent::DeletePostSucceeded {
                post_id: "a".into(),
            },
        );
        assert_eq!(state.post_ids(), vec!["b"]);
        assert!(!state.has_comments("a"));
    }

    #[test]
    fn fetch_comments_replaces_list() {
        let state = FeedReducer::reduce(
            FeedState::default(),
            FeedEvent::AddCommentSucceeded {
                post_id: "a".into(),
                comment: comment("old"),
            },
        );
        let state = FeedReducer::reduce(
            state,
            FeedEvent::FetchCommentsSucceeded {
                post_id: "a".into(),
                comments: vec![comment("c1"), comment("c2")],
            },
        );
        let ids: Vec<_> = state.comments("a").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2"]);
    }

    #[test]
    fn add_comment_appends() {
        let state = FeedReducer::reduce(
            FeedState::default(),
            FeedEvent::FetchCommentsSucceeded {
                post_id: "a".into(),
                comments: vec![comment("c1")],
            },
        );
        let state = FeedReducer::reduce(
            state,
            FeedEvent::AddCommentSucceeded {
                post_id: "a".into(),
                comment: comment("c2"),
            },
        );
        assert_eq!(state.comments("a").len(), 2);
        assert_eq!(state.comments("a")[1].id, "c2");
    }

    #[test]
    fn add_comment_failure_mutates_nothing() {
        let state = FeedReducer::reduce(
            FeedState::default(),
            FeedEvent::AddCommentFailed {
                post_id: "a".into(),
                message: "too long".into(),
            },
        );
        assert!(!state.has_comments("a"));
        assert_eq!(
            state.status(OperationKind::Comment).error_message(),
            Some("too long")
        );
    }

    #[test]
    fn single_fetch_updates_in_place() {
        let state = page(FeedState::default(), &["a", "b", "c"], 0, 5);
        let issued_at = state.revision;
        let state = FeedReducer::reduce(
            state,
            FeedEvent::FetchPostSucceeded {
                post: post("b", 42),
                issued_at,
            },
        );
        assert_eq!(state.post_ids(), vec!["a", "b", "c"]);
        assert_eq!(state.post("b").unwrap().likes_count, 42);
    }

    #[test]
    fn single_fetch_of_unlisted_post_is_detached() {
        let state = page(FeedState::default(), &["a"], 0, 5);
        let state = FeedReducer::reduce(
            state,
            FeedEvent::FetchPostSucceeded {
                post: post("x", 1),
                issued_at: 0,
            },
        );
        assert_eq!(state.post_ids(), vec!["a"]);
        assert_eq!(state.post("x").unwrap().likes_count, 1);

        // Liking a detached post updates it.
        let state = like(state, "x", 2, true);
        assert_eq!(state.post("x").unwrap().likes_count, 2);

        // Once paginated in, it is held only once.
        let state = page(state, &["x"], 1, 5);
        assert_eq!(state.post_ids(), vec!["a", "x"]);
        assert!(state.detached.is_empty());
    }

    #[test]
    fn vanished_post_ends_its_request_without_outcome() {
        let state = page(FeedState::default(), &["a", "b"], 0, 5);
        let state = FeedReducer::reduce(
            state,
            FeedEvent::FetchCommentsStarted {
                post_id: "a".into(),
            },
        );
        assert!(state.is_pending(OperationKind::CommentFetch));

        let state = FeedReducer::reduce(
            state,
            FeedEvent::PostVanished {
                post_id: "a".into(),
                kind: OperationKind::CommentFetch,
            },
        );
        assert_eq!(state.post_ids(), vec!["b"]);
        assert_eq!(state.status(OperationKind::CommentFetch), &RequestStatus::Idle);
        assert_eq!(
            state.status(OperationKind::FeedFetch),
            &RequestStatus::Succeeded
        );
    }

    #[test]
    fn delete_twice_equals_delete_once() {
        let state = page(FeedState::default(), &["a", "b"], 0, 5);
        let state = FeedReducer::reduce(
            state,
            FeedEvent::FetchCommentsSucceeded {
                post_id: "a".into(),
                comments: vec![comment("c1")],
            },
        );
        let delete = || FeedEvent::DeletePostSucceeded {
            post_id: "a".into(),
        };

        let once = FeedReducer::reduce(state, delete());
        let twice = FeedReducer::reduce(once.clone(), delete());

        assert_eq!(twice.posts, once.posts);
        assert_eq!(twice.detached, once.detached);
        assert_eq!(twice.comments_by_post, once.comments_by_post);
        assert_eq!(twice.cursor, once.cursor);
        assert_eq!(twice.status, once.status);
    }

    #[test]
    fn comments_of_one_post_leave_others_untouched() {
        let state = FeedReducer::reduce(
            FeedState::default(),
            FeedEvent::FetchCommentsSucceeded {
                post_id: "p1".into(),
                comments: vec![comment("c1")],
            },
        );
        let before = state.comments("p1").to_vec();

        let state = FeedReducer::reduce(
            state,
            FeedEvent::FetchCommentsSucceeded {
                post_id: "p2".into(),
                comments: vec![comment("c2")],
            },
        );
        let state = FeedReducer::reduce(
            state,
            FeedEvent::AddCommentSucceeded {
                post_id: "p2".into(),
                comment: comment("c3"),
            },
        );

        assert_eq!(state.comments("p1"), before.as_slice());
        let p2: Vec<_> = state.comments("p2").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(p2, vec!["c2", "c3"]);
    }

    #[test]
    fn out_of_order_refreshes_keep_confirmed_like() {
        let state = page(FeedState::default(), &["p1"], 0, 5);

        let state = FeedReducer::reduce(
            state,
            FeedEvent::FetchPageStarted { start: 0, limit: 5 },
        );
        let first = state.revision;
        let state = like(state, "p1", 1, true);
        let state = FeedReducer::reduce(
            state,
            FeedEvent::FetchPageStarted { start: 0, limit: 5 },
        );
        let second = state.revision;

        // The later refresh lands first and already reflects the like.
        let mut liked = post("p1", 1);
        liked.is_liked_by_user = true;
        let state = FeedReducer::reduce(
            state,
            FeedEvent::FetchPageSucceeded {
                posts: vec![liked],
                start: 0,
                limit: 5,
                issued_at: second,
            },
        );
        let state = FeedReducer::reduce(
            state,
            FeedEvent::FetchPageSucceeded {
                posts: vec![post("p1", 0), post("p2", 0)],
                start: 0,
                limit: 5,
                issued_at: first,
            },
        );

        let p1 = state.post("p1").unwrap();
        assert_eq!(p1.likes_count, 1);
        assert!(p1.is_liked_by_user);
        assert_eq!(state.post_ids(), vec!["p1"]);
        assert_eq!(state.cursor().next_start, 1);
    }

    #[test]
    fn single_fetch_issued_before_refresh_is_ignored() {
        let state = page(FeedState::default(), &["a"], 0, 5);
        let fetch_issued = state.revision;
        let state = FeedReducer::reduce(
            state,
            FeedEvent::FetchPageStarted { start: 0, limit: 5 },
        );
        let refresh_issued = state.revision;
        let state = FeedReducer::reduce(
            state,
            FeedEvent::FetchPageSucceeded {
                posts: vec![post("a", 9)],
                start: 0,
                limit: 5,
                issued_at: refresh_issued,
            },
        );

        let state = FeedReducer::reduce(
            state,
            FeedEvent::FetchPostSucceeded {
                post: post("a", 2),
                issued_at: fetch_issued,
            },
        );
        assert_eq!(state.post("a").unwrap().likes_count, 9);
        assert_eq!(state.status(OperationKind::PostFetch), &RequestStatus::Succeeded);
    }

    #[test]
    fn page_issued_before_reset_is_dropped() {
        let state = FeedReducer::reduce(
            FeedState::default(),
            FeedEvent::FetchPageStarted { start: 0, limit: 5 },
        );
        let issued_at = state.revision;
        let state = FeedReducer::reduce(state, FeedEvent::Reset);
        let state = FeedReducer::reduce(
            state,
            FeedEvent::FetchPageSucceeded {
                posts: vec![post("a", 0)],
                start: 0,
                limit: 5,
                issued_at,
            },
        );
        assert!(state.is_empty());
    }

    #[test]
    fn reset_keeps_limit_and_revision() {
        let state = page(FeedState::with_page_limit(3), &["a"], 0, 3);
        let revision = state.revision;
        let state = FeedReducer::reduce(state, FeedEvent::Reset);
        assert!(state.is_empty());
        assert_eq!(state.cursor(), Cursor::new(3));
        assert_eq!(state.revision(), revision + 1);
    }
}
