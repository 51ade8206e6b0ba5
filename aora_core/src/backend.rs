// The abstract backend interface the data layer talks to.
// The real implementation is Appwrite over HTTP; tests plug in an in-memory one.

use async_trait::async_trait;
use url::Url;

use crate::error::Result;
use crate::model::*;

/// Which slice of the video collection to list. Every filter is ordered newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    /// Newest posts, optionally capped at `limit`.
    Recent { limit: Option<u32> },
    ByCreator { user_id: String },
    /// Full-text match on the title.
    TitleSearch { text: String },
}

/// A backend-as-a-service providing auth, documents and file storage.
#[async_trait]
pub trait Backend: Send + Sync {
    // Auth

    async fn create_account(&self, email: &str, password: &str, username: &str) -> Result<Account>;
    async fn create_session(&self, email: &str, password: &str) -> Result<Session>;
    /// Delete the session currently in use.
    async fn delete_session(&self) -> Result<()>;
    async fn get_account(&self) -> Result<Account>;
    /// Avatar URL rendered from the initials of `name`.
    fn initials_avatar(&self, name: &str) -> Result<Url>;

    // Documents

    /// User documents linked to `account_id`. Normally zero or one.
    async fn find_users(&self, account_id: &str) -> Result<Vec<User>>;
    async fn create_user(&self, profile: &UserProfile) -> Result<User>;
    async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<Post>>;
    async fn create_post(&self, draft: &PostDraft) -> Result<Post>;

    // Storage

    async fn upload_file(&self, asset: &MediaAsset) -> Result<StoredFile>;
    /// Public URL for a stored file: the original stream for videos, a rendered preview for images.
    fn file_url(&self, file_id: &str, kind: FileKind) -> Result<Url>;
}
