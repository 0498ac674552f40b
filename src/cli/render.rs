//! Plain-text rendering of store snapshots.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::feed::{FeedState, OperationKind};
use crate::format::format_age;
use crate::model::{Comment, Post, User};

pub fn post(post: &Post, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let liked = if post.is_liked_by_user { "♥" } else { "♡" };
    let _ = writeln!(
        out,
        "[{}] {} · @{} · {}",
        post.id,
        post.title,
        post.author.display_name,
        format_age(post.created_at, now)
    );
    let _ = writeln!(out, "    {}", post.content);
    for media in &post.media {
        let _ = writeln!(out, "    {:?}: {}", media.kind, media.secure_url);
    }
    let _ = write!(out, "    {} {}", liked, post.likes_count);
    out
}

pub fn feed(state: &FeedState, now: DateTime<Utc>) -> String {
    if state.is_empty() {
        return "No posts yet.".to_string();
    }

    let mut out = state
        .posts()
        .map(|p| post(p, now))
        .collect::<Vec<_>>()
        .join("\n\n");
    if let Some(message) = state.status(OperationKind::FeedFetch).error_message() {
        let _ = write!(out, "\n\n! {message}");
    } else if state.cursor().has_more {
        let _ = write!(out, "\n\n(more posts available)");
    }
    out
}

pub fn comments(comments: &[Comment]) -> String {
    if comments.is_empty() {
        return "No comments.".to_string();
    }
    comments
        .iter()
        .map(|c| format!("@{}: {}", c.author.display_name, c.content))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn user(user: &User) -> String {
    match &user.profile_image {
        Some(image) => format!("{} <{}>\n{}", user.user_name, user.email, image),
        None => format!("{} <{}>", user.user_name, user.email),
    }
}
