use std::time::Duration;

use appwrite_client::ClientConfig;
use aora_core::{Error, Result};

use crate::cache::DEFAULT_TTL;

pub const DEFAULT_PLATFORM: &str = "com.jeremy.aora";
pub const DEFAULT_LATEST_LIMIT: u32 = 7;
/// Longest accepted `AORA_CACHE_TTL_SECS`, one day.
pub const MAX_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Where the app's data lives on the Appwrite project, plus data-layer tuning.
#[derive(Debug, Clone)]
pub struct AoraConfig {
    pub client: ClientConfig,
    pub database_id: String,
    pub user_collection_id: String,
    pub video_collection_id: String,
    pub storage_id: String,
    pub cache_ttl: Duration,
    /// How many posts the trending strip shows.
    pub latest_limit: u32,
}

impl AoraConfig {
    /// Read the config from `APPWRITE_*` / `AORA_*` environment variables.
    pub fn from_env() -> Result<AoraConfig> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<AoraConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| Error::Config(format!("{} must be set", key)))
        };
        let number = |key: &str, default: u64| -> Result<u64> {
            match lookup(key) {
                Some(v) => v
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| Error::Config(format!("{} must be a non-negative integer, got `{}`", key, v))),
                None => Ok(default),
            }
        };

        let latest_limit = number("AORA_LATEST_LIMIT", DEFAULT_LATEST_LIMIT as u64)?;
        let latest_limit = u32::try_from(latest_limit)
            .map_err(|_| Error::Config(format!("AORA_LATEST_LIMIT is too large: {}", latest_limit)))?;

        let cache_ttl = Duration::from_secs(number("AORA_CACHE_TTL_SECS", DEFAULT_TTL.as_secs())?);
        if cache_ttl > MAX_CACHE_TTL {
            return Err(Error::Config(format!(
                "AORA_CACHE_TTL_SECS must be at most {}, got {}",
                MAX_CACHE_TTL.as_secs(),
                cache_ttl.as_secs()
            )));
        }

        Ok(AoraConfig {
            client: ClientConfig {
                endpoint: required("APPWRITE_ENDPOINT")?,
                project_id: required("APPWRITE_PROJECT_ID")?,
                platform: lookup("APPWRITE_PLATFORM").unwrap_or_else(|| DEFAULT_PLATFORM.to_string()),
            },
            database_id: required("APPWRITE_DATABASE_ID")?,
            user_collection_id: required("APPWRITE_USER_COLLECTION_ID")?,
            video_collection_id: required("APPWRITE_VIDEO_COLLECTION_ID")?,
            storage_id: required("APPWRITE_STORAGE_ID")?,
            cache_ttl,
            latest_limit,
        })
    }
}
