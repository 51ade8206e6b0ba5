// Operations the screens call. Each one is a single request/response against the backend,
// with the post listing and the user document going through the cache.

use tokio::sync::Mutex;
use url::Url;

use std::time::Duration;

use aora_core::{
    Account, Backend, Error, FileKind, MediaAsset, NewUser, NewVideoPost, Post, PostDraft, PostFilter, Result,
    Session, User, UserProfile,
};

use crate::cache::{user_key, AoraCache, ALL_POSTS};
use crate::config::AoraConfig;
use crate::safe::safe_execute;

/// The data-access layer. Owns its cache; share it behind an `Arc` if several tasks need it.
pub struct Aora<B> {
    backend: B,
    cache: Mutex<AoraCache>,
    latest_limit: u32,
}

impl<B: Backend> Aora<B> {
    pub fn new(backend: B, cache_ttl: Duration, latest_limit: u32) -> Self {
        Self {
            backend,
            cache: Mutex::new(AoraCache::new(cache_ttl)),
            latest_limit,
        }
    }

    pub fn with_config(backend: B, config: &AoraConfig) -> Self {
        Self::new(backend, config.cache_ttl, config.latest_limit)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // MARK: Auth

    /// Register an account, sign in, and create the linked user document.
    pub async fn create_user(&self, form: &NewUser) -> Result<User> {
        let account = safe_execute(
            self.backend.create_account(&form.email, &form.password, &form.username),
            Some("Failed to create a new account"),
            &[("email", form.email.as_str()), ("username", form.username.as_str())],
        )
        .await?;

        let avatar = self.backend.initials_avatar(&form.username)?;

        safe_execute(self.sign_in(&form.email, &form.password), Some("Sign-in failed"), &[]).await?;

        let profile = UserProfile {
            account_id: account.id,
            email: form.email.clone(),
            username: form.username.clone(),
            avatar: avatar.to_string(),
        };
        let user = safe_execute(
            self.backend.create_user(&profile),
            Some("Failed to create a new user document"),
            &[("account_id", profile.account_id.as_str())],
        )
        .await?;
        tracing::info!("Registered user {} for account {}", user.username, user.account_id);
        Ok(user)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        safe_execute(
            self.backend.create_session(email, password),
            Some("Failed to create a session. Please check your email and password."),
            &[("email", email)],
        )
        .await
    }

    pub async fn sign_out(&self) -> Result<()> {
        safe_execute(
            self.backend.delete_session(),
            Some("Failed to sign out. The session could not be deleted."),
            &[],
        )
        .await?;
        self.cache.lock().await.users.clear();
        Ok(())
    }

    pub async fn account(&self) -> Result<Account> {
        safe_execute(
            self.backend.get_account(),
            Some("Failed to retrieve the account. The account might not exist or there was an issue with the request."),
            &[],
        )
        .await
    }

    /// The signed-in user's document, always fetched fresh and then cached.
    /// `None` if nobody is signed in, the lookup failed, or the account has no user document.
    pub async fn current_user(&self) -> Option<User> {
        let account = safe_execute(self.account(), Some("Failed to retrieve the current account"), &[])
            .await
            .ok()?;

        let users = safe_execute(
            self.backend.find_users(&account.id),
            Some("Failed to retrieve user data from the database"),
            &[("account_id", account.id.as_str())],
        )
        .await
        .ok()?;

        let Some(user) = users.into_iter().next() else {
            tracing::warn!("No user found for account {}", account.id);
            return None;
        };
        self.cache.lock().await.users.set(&user_key(&account.id), user.clone());
        Some(user)
    }

    /// User document cached by the last `current_user` call for `account_id`, if still fresh.
    pub async fn cached_user(&self, account_id: &str) -> Option<User> {
        self.cache.lock().await.users.get(&user_key(account_id))
    }

    // MARK: Posts

    /// Every post, newest first. Served from the cache while it is fresh.
    pub async fn all_posts(&self) -> Result<Vec<Post>> {
        let cached = self.cache.lock().await.posts.get(ALL_POSTS);
        if let Some(posts) = cached {
            tracing::debug!("Serving {} posts from cache", posts.len());
            return Ok(posts);
        }

        let posts = safe_execute(
            self.backend.list_posts(&PostFilter::Recent { limit: None }),
            Some("Failed to retrieve posts"),
            &[],
        )
        .await?;
        self.cache.lock().await.posts.set(ALL_POSTS, posts.clone());
        tracing::info!("Stored {} posts to cache", posts.len());
        Ok(posts)
    }

    /// The newest few posts for the trending strip.
    pub async fn latest_posts(&self) -> Result<Vec<Post>> {
        let filter = PostFilter::Recent {
            limit: Some(self.latest_limit),
        };
        safe_execute(self.backend.list_posts(&filter), Some("Failed to retrieve the latest posts"), &[]).await
    }

    pub async fn user_posts(&self, user_id: &str) -> Result<Vec<Post>> {
        let filter = PostFilter::ByCreator {
            user_id: user_id.to_string(),
        };
        let message = format!("Failed to retrieve posts for user: {}", user_id);
        safe_execute(self.backend.list_posts(&filter), Some(message.as_str()), &[("user_id", user_id)]).await
    }

    /// Posts whose title matches `query`. No match is an empty list.
    pub async fn search_posts(&self, query: &str) -> Result<Vec<Post>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let filter = PostFilter::TitleSearch {
            text: query.to_string(),
        };
        let posts = safe_execute(self.backend.list_posts(&filter), Some("Failed to search posts"), &[("query", query)])
            .await?;
        if posts.is_empty() {
            tracing::debug!("No posts found matching {:?}", query);
        }
        Ok(posts)
    }

    // MARK: Files

    /// Upload `asset` and return the URL it is served from. No asset, no upload.
    pub async fn upload_file(&self, asset: Option<&MediaAsset>, kind: FileKind) -> Result<Option<Url>> {
        let Some(asset) = asset else {
            return Ok(None);
        };
        let stored = safe_execute(
            self.backend.upload_file(asset),
            Some("Failed to upload file"),
            &[("file", asset.file_name.as_str())],
        )
        .await?;
        tracing::info!("Uploaded {} {} as {}", kind, stored.name, stored.id);
        self.file_url(&stored.id, kind).map(Some)
    }

    pub fn file_url(&self, file_id: &str, kind: FileKind) -> Result<Url> {
        self.backend.file_url(file_id, kind)
    }

    /// Upload thumbnail and video side by side, then publish the post.
    /// Nothing is written unless both uploads produced a URL.
    pub async fn create_video_post(&self, form: &NewVideoPost) -> Result<Post> {
        let (thumbnail, video) = futures::future::try_join(
            self.upload_file(form.thumbnail.as_ref(), FileKind::Image),
            self.upload_file(form.video.as_ref(), FileKind::Video),
        )
        .await?;
        let (Some(thumbnail), Some(video)) = (thumbnail, video) else {
            return Err(Error::IncompleteUpload(format!(
                "`{}` needs both a thumbnail and a video",
                form.title
            )));
        };

        let draft = PostDraft {
            title: form.title.clone(),
            thumbnail: thumbnail.to_string(),
            video: video.to_string(),
            prompt: form.prompt.clone(),
            creator: form.user_id.clone(),
        };
        let post = safe_execute(
            self.backend.create_post(&draft),
            Some("Failed to create the post"),
            &[("title", form.title.as_str())],
        )
        .await?;

        self.cache.lock().await.posts.invalidate(ALL_POSTS);
        tracing::info!("Published post {} and invalidated the post cache", post.id);
        Ok(post)
    }
}
