use serde::{Deserialize, Serialize};

use super::post::Author;

/// The signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserWire")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub email: String,
    #[serde(rename = "profileImage", skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserWire {
    #[serde(rename = "_id", default)]
    mongo_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default, alias = "username")]
    user_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    profile_image_secure_url: Option<String>,
    #[serde(default)]
    profile_image: Option<String>,
}

impl TryFrom<UserWire> for User {
    type Error = String;

    fn try_from(wire: UserWire) -> Result<Self, Self::Error> {
        let id = wire
            .mongo_id
            .or(wire.id)
            .ok_or_else(|| "user is missing an id".to_string())?;
        Ok(Self {
            id,
            user_name: wire.user_name.unwrap_or_default(),
            email: wire.email.unwrap_or_default(),
            profile_image: wire.profile_image_secure_url.or(wire.profile_image),
        })
    }
}

impl User {
    /// Author descriptor used when this user creates content.
    pub fn as_author(&self) -> Author {
        Author {
            id: self.id.clone(),
            display_name: self.user_name.clone(),
            avatar_url: self.profile_image.clone(),
        }
    }
}
