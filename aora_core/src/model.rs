// Plain values handed to callers. The backend owns these entities;
// the app only reads them and creates new ones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::{Error, Result};

/// A signed-up account as the auth service knows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub id: String,
    pub account_id: String,
    pub expire: DateTime<Utc>,
}

/// The app-level user document linked to an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub account_id: String,
    pub email: String,
    pub username: String,
    pub avatar: String,
}

/// A published video.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub thumbnail: String,
    pub video: String,
    pub prompt: String,
    /// Expanded creator document. Missing if the creator was deleted.
    pub creator: Option<User>,
}

impl Display for Post {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}){}",
            self.title,
            self.id,
            self.creator
                .as_ref()
                .map(|c| format!(" by @{}", c.username))
                .unwrap_or_default()
        )
    }
}

// MARK: Forms

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub username: String,
}

/// The user document written right after registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub account_id: String,
    pub email: String,
    pub username: String,
    pub avatar: String,
}

/// A local file picked for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaAsset {
    pub file_name: String,
    pub mime_type: String,
    pub file_size: u64,
    /// Local path or `file://` URL.
    pub uri: String,
}

#[derive(Debug, Clone)]
pub struct NewVideoPost {
    pub title: String,
    pub thumbnail: Option<MediaAsset>,
    pub video: Option<MediaAsset>,
    pub prompt: String,
    /// Document ID of the creating user.
    pub user_id: String,
}

/// The post document written once both files are stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDraft {
    pub title: String,
    pub thumbnail: String,
    pub video: String,
    pub prompt: String,
    pub creator: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Video,
}

impl Display for FileKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FileKind::Image => write!(f, "image"),
            FileKind::Video => write!(f, "video"),
        }
    }
}

impl FromStr for FileKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "image" => Ok(FileKind::Image),
            "video" => Ok(FileKind::Video),
            _ => Err(Error::InvalidField(format!(
                "invalid file type `{}`, expected `video` or `image`",
                s
            ))),
        }
    }
}
