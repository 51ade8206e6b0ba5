use anyhow::{anyhow, Context};
use clap::Subcommand;
use serde::Serialize;

use std::path::PathBuf;

use aora_core::{Backend, NewUser, NewVideoPost, Post, User};
use aora_data::Aora;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the trending strip and every video, newest first
    Feed,
    /// Search videos by title
    Search { query: String },
    /// Show the signed-in user and their videos
    Profile,
    /// Register a new account
    SignUp {
        #[arg(long)]
        username: String,
    },
    /// End the current session
    SignOut,
    /// Publish a video
    Create {
        #[arg(long)]
        title: String,
        /// The prompt the video was generated from
        #[arg(long, default_value = "")]
        prompt: String,
        #[arg(long)]
        thumbnail: PathBuf,
        #[arg(long)]
        video: PathBuf,
    },
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    fn require(&self) -> anyhow::Result<(&str, &str)> {
        match (self.email.as_deref(), self.password.as_deref()) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(anyhow!("--email and --password (or AORA_EMAIL / AORA_PASSWORD) are required")),
        }
    }
}

pub struct Output {
    pub json: bool,
}

impl Output {
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }
}

pub async fn run<B: Backend>(
    aora: &Aora<B>,
    command: Command,
    credentials: &Credentials,
    output: &Output,
) -> anyhow::Result<()> {
    match command {
        Command::Feed => {
            let latest = aora.latest_posts().await?;
            let all = aora.all_posts().await?;
            let value = serde_json::json!({ "latest": latest, "all": all });
            output.emit(&value, || {
                format!(
                    "Trending\n{}\n\nLatest videos\n{}",
                    post_lines(&latest, "No videos yet"),
                    post_lines(&all, "No videos yet")
                )
            })
        }
        Command::Search { query } => {
            let posts = aora.search_posts(&query).await?;
            output.emit(&posts, || {
                format!(
                    "Search results for \"{}\"\n{}",
                    query,
                    post_lines(&posts, "No videos found for this search query")
                )
            })
        }
        Command::Profile => {
            let (email, password) = credentials.require()?;
            aora.sign_in(email, password).await?;
            let user = signed_in_user(aora).await?;
            let posts = aora.user_posts(&user.id).await?;
            let value = serde_json::json!({ "user": user, "posts": posts });
            output.emit(&value, || {
                format!(
                    "{}\n{} posts\n{}",
                    user_line(&user),
                    posts.len(),
                    post_lines(&posts, "No videos found. No videos created yet")
                )
            })
        }
        Command::SignUp { username } => {
            let (email, password) = credentials.require()?;
            let form = NewUser {
                email: email.to_string(),
                password: password.to_string(),
                username,
            };
            let user = aora.create_user(&form).await?;
            output.emit(&user, || format!("Welcome, {}", user_line(&user)))
        }
        Command::SignOut => {
            let (email, password) = credentials.require()?;
            aora.sign_in(email, password).await?;
            aora.sign_out().await?;
            output.emit(&serde_json::json!({ "signed_out": true }), || "Signed out".to_string())
        }
        Command::Create {
            title,
            prompt,
            thumbnail,
            video,
        } => {
            let (email, password) = credentials.require()?;
            aora.sign_in(email, password).await?;
            let user = signed_in_user(aora).await?;

            let form = NewVideoPost {
                title,
                thumbnail: Some(crate::util::media_asset(&thumbnail).await?),
                video: Some(crate::util::media_asset(&video).await?),
                prompt,
                user_id: user.id,
            };
            let post = aora
                .create_video_post(&form)
                .await
                .with_context(|| format!("cannot publish `{}`", form.title))?;
            output.emit(&post, || format!("Published {}", post))
        }
    }
}

async fn signed_in_user<B: Backend>(aora: &Aora<B>) -> anyhow::Result<User> {
    aora.current_user()
        .await
        .ok_or_else(|| anyhow!("no user profile is linked to this account"))
}

fn user_line(user: &User) -> String {
    format!("@{} <{}>", user.username, user.email)
}

fn post_lines(posts: &[Post], empty: &str) -> String {
    if posts.is_empty() {
        return format!("  {}", empty);
    }
    posts
        .iter()
        .map(|post| format!("  {}  {}", post.created_at.format("%Y-%m-%d"), post))
        .collect::<Vec<_>>()
        .join("\n")
}
