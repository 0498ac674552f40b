use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio::time::timeout;
use tracing::Instrument;

use crate::api::endpoints;
use crate::api::error::ApiError;
use crate::api::schema::{
    ChangePasswordRequest, CommentListResponse, CommentRequest, CommentResponse,
    CreatePostResponse, Envelope, LikeRequest, LikeResponse, LoginRequest, LoginResponse,
    MessageResponse, PostListResponse, ProfileResponse, RegisterRequest, RegisterResponse,
    SinglePostResponse,
};
use crate::api::timeout::TimeoutConfig;
use crate::config::ApiConfig;
use crate::model::{Attachment, Comment, Post, PostBody, User};
use crate::session::{build_auth_header, TokenStore};

/// Authenticated HTTP client for the feed backend.
///
/// Cheap to clone; clones share the connection pool and token store.
#[derive(Clone)]
pub struct RemoteClient {
    http: Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
    request_timeout: Duration,
}

impl RemoteClient {
    pub fn new(api: &ApiConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let timeouts = TimeoutConfig::from(api);
        let http = Client::builder()
            .connect_timeout(timeouts.connect)
            .build()
            .map_err(|e| ApiError::Http(format!("Failed to build HTTP client: {}", e)))?;

        // A trailing slash keeps `/api/` when endpoint segments are appended.
        let mut base = api.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| {
            ApiError::InvalidArgument(format!("Invalid API base URL '{}': {}", api.base_url, e))
        })?;

        Ok(Self {
            http,
            base_url,
            tokens,
            request_timeout: timeouts.request,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // -- Posts ----------------------------------------------------------------

    /// `GET posts/list?start&limit`
    pub async fn list_posts(&self, start: u32, limit: u32) -> Result<Vec<Post>, ApiError> {
        let mut url = self.url(endpoints::LIST_POSTS, &[])?;
        url.query_pairs_mut()
            .append_pair("start", &start.to_string())
            .append_pair("limit", &limit.to_string());
        let response: PostListResponse = self
            .send(endpoints::LIST_POSTS, self.http.get(url))
            .await?;
        Ok(response.data)
    }

    /// `GET posts/single/:id`
    pub async fn get_post(&self, post_id: &str) -> Result<Post, ApiError> {
        let url = self.url(endpoints::SINGLE_POST, &[post_id])?;
        let response: SinglePostResponse = self
            .send(endpoints::SINGLE_POST, self.http.get(url))
            .await?;
        Ok(response.data)
    }

    /// `POST posts/create` as multipart: `title`, `content`, `media[]`.
    pub async fn create_post(
        &self,
        title: &str,
        content: &str,
        attachments: &[Attachment],
    ) -> Result<PostBody, ApiError> {
        let mut form = Form::new()
            .text("title", title.to_string())
            .text("content", content.to_string());
        for attachment in attachments {
            form = form.part("media", attachment_part(attachment)?);
        }

        let url = self.url(endpoints::CREATE_POST, &[])?;
        let response: CreatePostResponse = self
            .send(endpoints::CREATE_POST, self.http.post(url).multipart(form))
            .await?;
        Ok(response.data)
    }

    /// `DELETE posts/delete/:id`
    pub async fn delete_post(&self, post_id: &str) -> Result<String, ApiError> {
        let url = self.url(endpoints::DELETE_POST, &[post_id])?;
        let response: MessageResponse = self
            .send(endpoints::DELETE_POST, self.http.delete(url))
            .await?;
        Ok(response.message)
    }

    /// `POST posts/like`. The server decides whether this likes or unlikes.
    pub async fn like_post(&self, post_id: &str) -> Result<LikeResponse, ApiError> {
        let url = self.url(endpoints::LIKE_POST, &[])?;
        let body = LikeRequest { post_id };
        self.send(endpoints::LIKE_POST, self.http.post(url).json(&body))
            .await
    }

    /// `POST posts/comment`
    pub async fn add_comment(&self, post_id: &str, content: &str) -> Result<Comment, ApiError> {
        let url = self.url(endpoints::COMMENT_ON_POST, &[])?;
        let body = CommentRequest { post_id, content };
        let response: CommentResponse = self
            .send(endpoints::COMMENT_ON_POST, self.http.post(url).json(&body))
            .await?;
        Ok(response.comment)
    }

    /// `GET posts/comments/:postId`
    pub async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>, ApiError> {
        let url = self.url(endpoints::POST_COMMENTS, &[post_id])?;
        let response: CommentListResponse = self
            .send(endpoints::POST_COMMENTS, self.http.get(url))
            .await?;
        Ok(response.comments)
    }

    // -- Auth -----------------------------------------------------------------

    /// `POST auth/register`, returning the server's confirmation message.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<String, ApiError> {
        let url = self.url(endpoints::REGISTER, &[])?;
        let body = RegisterRequest {
            username,
            email,
            password,
        };
        let response: RegisterResponse = self
            .send(endpoints::REGISTER, self.http.post(url).json(&body))
            .await?;
        Ok(response.message)
    }

    /// `POST auth/login`. Persisting the returned token is the caller's job.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let url = self.url(endpoints::LOGIN, &[])?;
        let body = LoginRequest { email, password };
        self.send(endpoints::LOGIN, self.http.post(url).json(&body))
            .await
    }

    /// `GET auth/profile`
    pub async fn profile(&self) -> Result<User, ApiError> {
        let url = self.url(endpoints::PROFILE, &[])?;
        let response: ProfileResponse = self
            .send(endpoints::PROFILE, self.http.get(url))
            .await?;
        Ok(response.data)
    }

    /// `POST auth/profile/upload` as multipart field `profileImage`.
    pub async fn upload_profile_image(&self, image: &Attachment) -> Result<User, ApiError> {
        let form = Form::new().part("profileImage", attachment_part(image)?);
        let url = self.url(endpoints::PROFILE_UPLOAD, &[])?;
        let response: ProfileResponse = self
            .send(endpoints::PROFILE_UPLOAD, self.http.post(url).multipart(form))
            .await?;
        Ok(response.data)
    }

    /// `POST auth/password/change`
    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<String, ApiError> {
        let url = self.url(endpoints::CHANGE_PASSWORD, &[])?;
        let body = ChangePasswordRequest {
            old_password,
            new_password,
        };
        let response: MessageResponse = self
            .send(endpoints::CHANGE_PASSWORD, self.http.post(url).json(&body))
            .await?;
        Ok(response.message)
    }

    // -- Transport ------------------------------------------------------------

    fn url(&self, endpoint: &[&str], params: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ApiError::InvalidArgument(format!("Base URL '{}' cannot hold a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(endpoint)
            .extend(params);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &[&str],
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let endpoint = endpoints::display(endpoint);
        let request_id = uuid::Uuid::new_v4();
        let span = tracing::debug_span!("api_call", %request_id, endpoint = %endpoint);

        async {
            let builder = self.authorize(builder).await?;
            let started = std::time::Instant::now();

            let (status, body) = match timeout(self.request_timeout, execute(builder)).await {
                Ok(result) => result.map_err(|source| ApiError::Network {
                    endpoint: endpoint.clone(),
                    source,
                })?,
                Err(_) => {
                    tracing::warn!("Request timed out");
                    return Err(ApiError::Timeout {
                        duration: self.request_timeout.as_secs(),
                    });
                }
            };

            tracing::debug!(
                status = status.as_u16(),
                bytes = body.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Response received"
            );
            decode(&endpoint, status, &body)
        }
        .instrument(span)
        .await
    }

    /// Attach the stored bearer token, if there is one.
    ///
    /// Token stores may touch the filesystem, so the lookup runs on the
    /// blocking pool.
    async fn authorize(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let tokens = Arc::clone(&self.tokens);
        let token = tokio::task::spawn_blocking(move || tokens.token())
            .await
            .map_err(|e| ApiError::Http(format!("Token lookup failed: {}", e)))??;
        match token {
            Some(token) => {
                let (name, value) = build_auth_header(&token);
                Ok(builder.header(name, value))
            }
            None => Ok(builder),
        }
    }
}

async fn execute(builder: RequestBuilder) -> Result<(StatusCode, Vec<u8>), reqwest::Error> {
    let response = builder.send().await?;
    let status = response.status();
    let body = response.bytes().await?;
    Ok((status, body.to_vec()))
}

fn attachment_part(attachment: &Attachment) -> Result<Part, ApiError> {
    Part::bytes(attachment.bytes.clone())
        .file_name(attachment.file_name.clone())
        .mime_str(&attachment.mime_type)
        .map_err(|_| {
            ApiError::InvalidArgument(format!(
                "Invalid MIME type '{}' for '{}'",
                attachment.mime_type, attachment.file_name
            ))
        })
}

/// Map a raw response onto the endpoint schema or a classified error.
fn decode<T: DeserializeOwned>(
    endpoint: &str,
    status: StatusCode,
    body: &[u8],
) -> Result<T, ApiError> {
    if !status.is_success() {
        let message = serde_json::from_slice::<Envelope>(body)
            .ok()
            .and_then(Envelope::explanation)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
        tracing::warn!(status = status.as_u16(), %message, "Backend returned an error");

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound {
                endpoint: endpoint.to_string(),
                message,
            });
        }
        return Err(ApiError::Server {
            status: status.as_u16(),
            message,
        });
    }

    let malformed = |e: serde_json::Error| ApiError::MalformedResponse {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    };

    let envelope: Envelope = serde_json::from_slice(body).map_err(malformed)?;
    if envelope.success == Some(false) {
        let message = envelope
            .explanation()
            .unwrap_or_else(|| "Request was not successful".to_string());
        return Err(ApiError::Server {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(body).map_err(malformed)
}
