//! Endpoint paths relative to the API base URL, as path segments.

pub const REGISTER: &[&str] = &["auth", "register"];
pub const LOGIN: &[&str] = &["auth", "login"];
pub const PROFILE: &[&str] = &["auth", "profile"];
pub const PROFILE_UPLOAD: &[&str] = &["auth", "profile", "upload"];
pub const CHANGE_PASSWORD: &[&str] = &["auth", "password", "change"];

pub const LIST_POSTS: &[&str] = &["posts", "list"];
pub const SINGLE_POST: &[&str] = &["posts", "single"];
pub const CREATE_POST: &[&str] = &["posts", "create"];
pub const DELETE_POST: &[&str] = &["posts", "delete"];
pub const LIKE_POST: &[&str] = &["posts", "like"];
pub const COMMENT_ON_POST: &[&str] = &["posts", "comment"];
pub const POST_COMMENTS: &[&str] = &["posts", "comments"];

/// Human-readable form of an endpoint, used in logs and error messages.
pub fn display(segments: &[&str]) -> String {
    segments.join("/")
}
