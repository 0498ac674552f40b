use serde::{Deserialize, Serialize};

use super::post::Author;

/// A comment on a post. Comments are stored per post id, never on the post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    #[serde(rename = "user")]
    pub author: Author,
}
