//! Command-line front end over the feed and session controllers.

pub mod render;

use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::api::ApiError;
use crate::app::App;
use crate::config::Config;
use crate::model::{Attachment, AttachmentError};

#[derive(Parser, Debug)]
#[command(name = "feedclient")]
#[command(about = "Browse and post to the feed from the terminal")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
    /// Path to config.toml (default: platform config dir)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the API base URL from the config file
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Fold command-line overrides into the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        if let Command::Feed {
            limit: Some(limit), ..
        } = &self.command
        {
            config.feed.page_limit = *limit;
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Create an account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "FEEDCLIENT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FEEDCLIENT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the saved session
    Logout,
    /// Show the saved session's user
    Whoami,
    /// Fetch the profile from the server
    Profile,
    /// Upload a new profile image
    Avatar { path: PathBuf },
    /// Change the account password
    Password {
        #[arg(long)]
        old: String,
        #[arg(long)]
        new: String,
    },
    /// List posts, newest first
    Feed {
        /// Pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
        /// Posts per page
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show a single post
    Show { post_id: String },
    /// Like or unlike a post
    Like { post_id: String },
    /// Create a post
    Post {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        /// Image or video to attach (repeatable)
        #[arg(long = "media", value_name = "PATH")]
        media: Vec<PathBuf>,
    },
    /// Delete one of your posts
    Delete { post_id: String },
    /// List a post's comments
    Comments { post_id: String },
    /// Comment on a post
    Comment { post_id: String, content: String },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Attachment(#[from] AttachmentError),

    #[error("Not signed in. Run `feedclient login` first.")]
    NotSignedIn,
}

/// Run one command against `app`, printing its outcome to stdout.
pub async fn run(command: Command, app: &App) -> Result<(), CliError> {
    let signed_in = app.session.restore().await?;

    match command {
        Command::Register {
            username,
            email,
            password,
        } => {
            let message = app.session.register(&username, &email, &password).await?;
            println!("{message}");
        }
        Command::Login { email, password } => {
            let user = app.session.login(&email, &password).await?;
            println!("Signed in as {}", user.user_name);
        }
        Command::Logout => {
            app.session.logout()?;
            println!("Signed out");
        }
        Command::Whoami => match app.session.store().snapshot().user() {
            Some(user) => println!("{}", render::user(user)),
            None => return Err(CliError::NotSignedIn),
        },
        command => {
            if !signed_in {
                return Err(CliError::NotSignedIn);
            }
            run_signed_in(command, app).await?;
        }
    }
    Ok(())
}

async fn run_signed_in(command: Command, app: &App) -> Result<(), CliError> {
    let now = Utc::now();
    match command {
        Command::Profile => {
            let user = app.session.fetch_profile().await?;
            println!("{}", render::user(&user));
        }
        Command::Avatar { path } => {
            let image = Attachment::from_path(&path)?;
            let user = app.session.upload_profile_image(&image).await?;
            println!("{}", render::user(&user));
        }
        Command::Password { old, new } => {
            let message = app.session.change_password(&old, &new).await?;
            println!("{message}");
        }
        Command::Feed { pages, .. } => {
            app.feed.refresh().await?;
            for _ in 1..pages {
                if app.feed.fetch_next_page().await?.is_none() {
                    break;
                }
            }
            println!("{}", render::feed(&app.feed.store().snapshot(), now));
        }
        Command::Show { post_id } => {
            let post = app.feed.fetch_post(&post_id).await?;
            app.feed.fetch_comments(&post.id).await?;
            let snapshot = app.feed.store().snapshot();
            println!("{}", render::post(&post, now));
            println!();
            println!("{}", render::comments(snapshot.comments(&post.id)));
        }
        Command::Like { post_id } => {
            let like = app.feed.like(&post_id).await?;
            let verb = if like.is_liked_by_user { "Liked" } else { "Unliked" };
            println!("{verb} ({} likes)", like.likes_count);
        }
        Command::Post {
            title,
            content,
            media,
        } => {
            let attachments = media
                .iter()
                .map(|path| Attachment::from_path(path))
                .collect::<Result<Vec<_>, _>>()?;
            let post_id = app.feed.create_post(&title, &content, &attachments).await?;
            println!("Created post {post_id}");
        }
        Command::Delete { post_id } => {
            app.feed.delete_post(&post_id).await?;
            println!("Deleted post {post_id}");
        }
        Command::Comments { post_id } => {
            app.feed.fetch_comments(&post_id).await?;
            let snapshot = app.feed.store().snapshot();
            println!("{}", render::comments(snapshot.comments(&post_id)));
        }
        Command::Comment { post_id, content } => {
            let comment = app.feed.add_comment(&post_id, &content).await?;
            println!("Commented: {}", comment.content);
        }
        Command::Register { .. }
        | Command::Login { .. }
        | Command::Logout
        | Command::Whoami => {}
    }
    Ok(())
}
