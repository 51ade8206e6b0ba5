use anyhow::{anyhow, Context};

use std::path::Path;

use aora_core::MediaAsset;

/// Describe a local file the way a media picker would.
pub async fn media_asset(path: &Path) -> anyhow::Result<MediaAsset> {
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))?;
    if !metadata.is_file() {
        return Err(anyhow!("{} is not a file", path.display()));
    }
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("invalid file name: {}", path.display()))?;

    Ok(MediaAsset {
        file_name: file_name.to_string(),
        mime_type: mime_type(path).to_string(),
        file_size: metadata.len(),
        uri: path.to_string_lossy().into_owned(),
    })
}

pub fn mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}
