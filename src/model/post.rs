use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned post identifier.
pub type PostId = String;

/// Author descriptor attached to posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AuthorWire")]
pub struct Author {
    pub id: String,
    #[serde(rename = "userName")]
    pub display_name: String,
    #[serde(rename = "profileImage", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthorWire {
    #[serde(rename = "_id", default)]
    mongo_id: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default, alias = "username")]
    user_name: Option<String>,
    #[serde(default)]
    profile_image_secure_url: Option<String>,
    #[serde(default)]
    profile_image: Option<String>,
}

impl TryFrom<AuthorWire> for Author {
    type Error = String;

    fn try_from(wire: AuthorWire) -> Result<Self, Self::Error> {
        let id = wire
            .mongo_id
            .or(wire.user_id)
            .or(wire.id)
            .ok_or_else(|| "author is missing an id".to_string())?;
        Ok(Self {
            id,
            display_name: wire.user_name.unwrap_or_default(),
            avatar_url: wire.profile_image_secure_url.or(wire.profile_image),
        })
    }
}

/// Kind of a media attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// Media attached to a post, as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "secureUrl")]
    pub secure_url: String,
    #[serde(rename = "mediaType")]
    pub kind: MediaKind,
}

/// A post as held by the feed store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: PostId,
    pub title: String,
    pub content: String,
    #[serde(rename = "user")]
    pub author: Author,
    #[serde(default)]
    pub media: Vec<Media>,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub is_liked_by_user: bool,
    pub created_at: DateTime<Utc>,
}

/// Author field of a freshly created post: either populated or a bare id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AuthorRef {
    Full(Author),
    Id(String),
}

/// Post body returned by the create endpoint, before an author is attached.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostBody {
    #[serde(rename = "_id")]
    pub id: PostId,
    pub title: String,
    pub content: String,
    #[serde(rename = "user", default)]
    pub author: Option<AuthorRef>,
    #[serde(default)]
    pub media: Vec<Media>,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub is_liked_by_user: bool,
    pub created_at: DateTime<Utc>,
}

impl PostBody {
    /// Populated author returned by the server, if any.
    pub fn embedded_author(&self) -> Option<&Author> {
        match &self.author {
            Some(AuthorRef::Full(author)) => Some(author),
            _ => None,
        }
    }

    /// Synthesize a full post by attaching `author`.
    pub fn into_post(self, author: Author) -> Post {
        Post {
            id: self.id,
            title: self.title,
            content: self.content,
            author,
            media: self.media,
            likes_count: self.likes_count,
            is_liked_by_user: self.is_liked_by_user,
            created_at: self.created_at,
        }
    }
}
