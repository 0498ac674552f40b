//! Domain entities shared by the feed and session layers.
//!
//! Entities deserialize straight from the backend's camelCase JSON. The
//! backend is loose about some field names (`_id` vs `userId`,
//! `profileImage` vs `profileImageSecureUrl`); that looseness is absorbed
//! here so the rest of the crate sees one shape.

mod attachment;
mod comment;
mod post;
mod user;

pub use attachment::{Attachment, AttachmentError};
pub use comment::Comment;
pub use post::{Author, AuthorRef, Media, MediaKind, Post, PostBody, PostId};
pub use user::User;
