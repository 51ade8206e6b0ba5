use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aora_util::iso8601;

/// A database document: Appwrite system attributes plus the collection's own attributes in `data`.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Document<T> {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$collectionId", default)]
    pub collection_id: String,
    #[serde(rename = "$databaseId", default)]
    pub database_id: String,
    #[serde(rename = "$createdAt", with = "iso8601")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "$updatedAt", with = "iso8601")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "$permissions", default)]
    pub permissions: Vec<String>,
    #[serde(flatten)]
    pub data: T,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct DocumentList<T> {
    pub total: u64,
    pub documents: Vec<Document<T>>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AccountResult {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt", with = "iso8601")]
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub email_verification: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    #[serde(rename = "$id")]
    pub id: String,
    pub user_id: String,
    #[serde(with = "iso8601")]
    pub expire: DateTime<Utc>,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub current: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FileResult {
    #[serde(rename = "$id")]
    pub id: String,
    pub bucket_id: String,
    pub name: String,
    pub mime_type: String,
    pub size_original: u64,
    #[serde(default)]
    pub chunks_total: u32,
    #[serde(default)]
    pub chunks_uploaded: u32,
}

/// Body of a non-2xx response.
#[derive(Deserialize, Debug, Clone)]
pub(crate) struct ErrorBody {
    pub message: String,
    #[serde(default)]
    pub code: u16,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Where an image preview is cropped from when the requested box doesn't fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gravity {
    Center,
    Top,
    TopLeft,
    TopRight,
    Left,
    Right,
    Bottom,
    BottomLeft,
    BottomRight,
}

impl std::fmt::Display for Gravity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Gravity::Center => "center",
            Gravity::Top => "top",
            Gravity::TopLeft => "top-left",
            Gravity::TopRight => "top-right",
            Gravity::Left => "left",
            Gravity::Right => "right",
            Gravity::Bottom => "bottom",
            Gravity::BottomLeft => "bottom-left",
            Gravity::BottomRight => "bottom-right",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PreviewOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub gravity: Option<Gravity>,
    /// 0 to 100
    pub quality: Option<u32>,
}

/// File content to upload.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}
