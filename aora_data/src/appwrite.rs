use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use appwrite_client::{AppwriteClient, Document, Gravity, InputFile, PreviewOptions, Query, ID};
use aora_core::{
    Account, Backend, FileKind, MediaAsset, Post, PostDraft, PostFilter, Result, Session, StoredFile, User,
    UserProfile,
};

use crate::config::AoraConfig;

const CREATED_AT: &str = "$createdAt";
const PREVIEW_SIZE: u32 = 2000;
const PREVIEW_QUALITY: u32 = 100;

/// Attributes of the user collection.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    account_id: String,
    email: String,
    username: String,
    avatar: String,
}

/// Attributes of the video collection as read back, with `creator` expanded.
#[derive(Deserialize, Debug, Clone)]
struct PostRecord {
    title: String,
    thumbnail: Option<String>,
    video: String,
    prompt: Option<String>,
    #[serde(default)]
    creator: Option<Document<UserRecord>>,
}

fn user(doc: Document<UserRecord>) -> User {
    User {
        id: doc.id,
        account_id: doc.data.account_id,
        email: doc.data.email,
        username: doc.data.username,
        avatar: doc.data.avatar,
    }
}

fn post(doc: Document<PostRecord>) -> Post {
    Post {
        id: doc.id,
        created_at: doc.created_at,
        title: doc.data.title,
        thumbnail: doc.data.thumbnail.unwrap_or_default(),
        video: doc.data.video,
        prompt: doc.data.prompt.unwrap_or_default(),
        creator: doc.data.creator.map(user),
    }
}

fn queries(filter: &PostFilter) -> Vec<Query> {
    match filter {
        PostFilter::Recent { limit } => {
            let mut queries = vec![Query::order_desc(CREATED_AT)];
            if let Some(limit) = limit {
                queries.push(Query::limit(*limit));
            }
            queries
        }
        PostFilter::ByCreator { user_id } => vec![
            Query::equal("creator", user_id.as_str()),
            Query::order_desc(CREATED_AT),
        ],
        PostFilter::TitleSearch { text } => vec![Query::search("title", text), Query::order_desc(CREATED_AT)],
    }
}

/// `Backend` over an Appwrite project.
#[derive(Debug, Clone)]
pub struct AppwriteBackend {
    client: AppwriteClient,
    database_id: String,
    user_collection_id: String,
    video_collection_id: String,
    storage_id: String,
}

impl AppwriteBackend {
    pub fn new(config: &AoraConfig) -> Result<AppwriteBackend> {
        let client = AppwriteClient::new(&config.client).map_err(anyhow::Error::from)?;
        Ok(AppwriteBackend {
            client,
            database_id: config.database_id.clone(),
            user_collection_id: config.user_collection_id.clone(),
            video_collection_id: config.video_collection_id.clone(),
            storage_id: config.storage_id.clone(),
        })
    }
}

#[async_trait]
impl Backend for AppwriteBackend {
    async fn create_account(&self, email: &str, password: &str, username: &str) -> Result<Account> {
        let result = self
            .client
            .create_account(ID::unique(), email, password, Some(username))
            .await
            .map_err(anyhow::Error::from)?;
        Ok(Account {
            id: result.id,
            name: result.name,
            email: result.email,
        })
    }

    async fn create_session(&self, email: &str, password: &str) -> Result<Session> {
        let result = self
            .client
            .create_email_session(email, password)
            .await
            .map_err(anyhow::Error::from)?;
        Ok(Session {
            id: result.id,
            account_id: result.user_id,
            expire: result.expire,
        })
    }

    async fn delete_session(&self) -> Result<()> {
        self.client
            .delete_session("current")
            .await
            .map_err(anyhow::Error::from)?;
        Ok(())
    }

    async fn get_account(&self) -> Result<Account> {
        let result = self.client.get_account().await.map_err(anyhow::Error::from)?;
        Ok(Account {
            id: result.id,
            name: result.name,
            email: result.email,
        })
    }

    fn initials_avatar(&self, name: &str) -> Result<Url> {
        Ok(self.client.initials_url(name).map_err(anyhow::Error::from)?)
    }

    async fn find_users(&self, account_id: &str) -> Result<Vec<User>> {
        let list = self
            .client
            .list_documents::<UserRecord>(
                &self.database_id,
                &self.user_collection_id,
                &[Query::equal("accountId", account_id)],
            )
            .await
            .map_err(anyhow::Error::from)?;
        Ok(list.documents.into_iter().map(user).collect())
    }

    async fn create_user(&self, profile: &UserProfile) -> Result<User> {
        let record = UserRecord {
            account_id: profile.account_id.clone(),
            email: profile.email.clone(),
            username: profile.username.clone(),
            avatar: profile.avatar.clone(),
        };
        let doc = self
            .client
            .create_document::<UserRecord, _>(&self.database_id, &self.user_collection_id, ID::unique(), &record)
            .await
            .map_err(anyhow::Error::from)?;
        Ok(user(doc))
    }

    async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<Post>> {
        let list = self
            .client
            .list_documents::<PostRecord>(&self.database_id, &self.video_collection_id, &queries(filter))
            .await
            .map_err(anyhow::Error::from)?;
        tracing::debug!("Fetched {} of {} posts for {:?}", list.documents.len(), list.total, filter);
        Ok(list.documents.into_iter().map(post).collect())
    }

    async fn create_post(&self, draft: &PostDraft) -> Result<Post> {
        let doc = self
            .client
            .create_document::<PostRecord, _>(&self.database_id, &self.video_collection_id, ID::unique(), draft)
            .await
            .map_err(anyhow::Error::from)?;
        Ok(post(doc))
    }

    async fn upload_file(&self, asset: &MediaAsset) -> Result<StoredFile> {
        let path = aora_util::local_path(&asset.uri)?;
        let bytes = tokio::fs::read(&path).await?;
        if bytes.len() as u64 != asset.file_size {
            tracing::warn!(
                "{} is {} bytes on disk, picker reported {}",
                asset.file_name,
                bytes.len(),
                asset.file_size
            );
        }
        let file = InputFile {
            name: asset.file_name.clone(),
            mime_type: asset.mime_type.clone(),
            bytes,
        };
        let result = self
            .client
            .create_file(&self.storage_id, ID::unique(), &file)
            .await
            .map_err(anyhow::Error::from)?;
        Ok(StoredFile {
            id: result.id,
            name: result.name,
            mime_type: result.mime_type,
            size: result.size_original,
        })
    }

    fn file_url(&self, file_id: &str, kind: FileKind) -> Result<Url> {
        let url = match kind {
            FileKind::Video => self.client.file_view_url(&self.storage_id, file_id),
            FileKind::Image => {
                let options = PreviewOptions {
                    width: Some(PREVIEW_SIZE),
                    height: Some(PREVIEW_SIZE),
                    gravity: Some(Gravity::Top),
                    quality: Some(PREVIEW_QUALITY),
                };
                self.client.file_preview_url(&self.storage_id, file_id, &options)
            }
        };
        Ok(url.map_err(anyhow::Error::from)?)
    }
}
