mod error;
mod query;
mod result;
#[cfg(test)]
mod test;

use reqwest::multipart::{Form, Part};
use reqwest::{header, Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use aora_util::build_params;

pub use crate::error::{Error, Result};
pub use crate::query::{Query, ID};
pub use crate::result::*;

/// Uploads above this size are sent in `Content-Range` chunks.
const CHUNK_SIZE: usize = 5 * 1024 * 1024;
const RESPONSE_FORMAT: &str = "1.4.0";
const FALLBACK_COOKIES: &str = "x-fallback-cookies";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `https://cloud.appwrite.io/v1`.
    pub endpoint: String,
    pub project_id: String,
    /// Platform identifier registered in the Appwrite console, e.g. `com.jeremy.aora`.
    pub platform: String,
}

/// Client-side (session based) Appwrite client.
/// Session cookies are kept in reqwest's cookie store, and echoed through `X-Fallback-Cookies`
/// for deployments where the cookie domain doesn't match the endpoint.
#[derive(Debug, Clone)]
pub struct AppwriteClient {
    endpoint: String,
    project_id: String,
    client: reqwest::Client,
    fallback_cookies: Arc<RwLock<Option<String>>>,
    /// Response bodies are dumped here when `CLIENT_LOG_DIR` is set.
    log_dir: Option<PathBuf>,
}

impl AppwriteClient {
    pub fn new(config: &ClientConfig) -> Result<AppwriteClient> {
        let header_value = |s: &str| {
            header::HeaderValue::from_str(s).map_err(|_| Error::InvalidField(s.to_string()))
        };
        let mut headers = header::HeaderMap::new();
        headers.insert("X-Appwrite-Project", header_value(&config.project_id)?);
        headers.insert("X-Appwrite-Response-Format", header::HeaderValue::from_static(RESPONSE_FORMAT));
        headers.insert("X-SDK-Platform", header::HeaderValue::from_static("client"));
        headers.insert("X-SDK-Language", header::HeaderValue::from_static("rust"));
        headers.insert(
            header::ORIGIN,
            header_value(&format!("appwrite-android://{}", config.platform))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .build()?;

        Ok(AppwriteClient {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            client,
            fallback_cookies: Arc::new(RwLock::new(None)),
            log_dir: std::env::var_os("CLIENT_LOG_DIR").map(PathBuf::from),
        })
    }

    // MARK: Account

    pub async fn create_account(
        &self,
        user_id: ID,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<AccountResult> {
        let body = json!({
            "userId": user_id.as_str(),
            "email": email,
            "password": password,
            "name": name,
        });
        self.post("/account", &body).await
    }

    pub async fn create_email_session(&self, email: &str, password: &str) -> Result<SessionResult> {
        let body = json!({ "email": email, "password": password });
        self.post("/account/sessions/email", &body).await
    }

    pub async fn get_account(&self) -> Result<AccountResult> {
        self.get("/account", Vec::new()).await
    }

    /// Delete a session. Pass `"current"` for the session this client is using.
    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        let path = format!("/account/sessions/{}", session_id);
        let request = self.client.delete(self.url(&path)?);
        self.send(request, &path).await?;
        Ok(())
    }

    // MARK: Databases

    pub async fn list_documents<T>(&self, database_id: &str, collection_id: &str, queries: &[Query]) -> Result<DocumentList<T>>
    where
        T: DeserializeOwned,
    {
        let path = format!("/databases/{}/collections/{}/documents", database_id, collection_id);
        let queries = queries.iter().map(|q| q.to_string()).collect::<Vec<_>>();
        let params = if queries.is_empty() {
            Vec::new()
        } else {
            build_params! { indexed queries }
        };
        self.get(&path, params).await
    }

    pub async fn create_document<T, D>(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: ID,
        data: &D,
    ) -> Result<Document<T>>
    where
        T: DeserializeOwned,
        D: Serialize + ?Sized,
    {
        let path = format!("/databases/{}/collections/{}/documents", database_id, collection_id);
        let body = json!({
            "documentId": document_id.as_str(),
            "data": serde_json::to_value(data)?,
        });
        self.post(&path, &body).await
    }

    // MARK: Storage

    pub async fn create_file(&self, bucket_id: &str, file_id: ID, file: &InputFile) -> Result<FileResult> {
        let path = format!("/storage/buckets/{}/files", bucket_id);
        let total = file.bytes.len();

        if total <= CHUNK_SIZE {
            let request = self.client.post(self.url(&path)?).multipart(upload_form(&file_id, file, 0, total)?);
            let content = self.send(request, &path).await?;
            return Ok(serde_json::from_str(&content)?);
        }

        let mut uploaded: Option<FileResult> = None;
        let mut start = 0;
        while start < total {
            let end = (start + CHUNK_SIZE).min(total);
            let mut request = self
                .client
                .post(self.url(&path)?)
                .header(header::CONTENT_RANGE, format!("bytes {}-{}/{}", start, end - 1, total))
                .multipart(upload_form(&file_id, file, start, end)?);
            if let Some(previous) = uploaded.as_ref() {
                request = request.header("x-appwrite-id", previous.id.as_str());
            }
            let content = self.send(request, &path).await?;
            let chunk: FileResult = serde_json::from_str(&content)?;
            tracing::debug!(
                "Uploaded chunk {}/{} of {}",
                chunk.chunks_uploaded,
                chunk.chunks_total,
                file.name
            );
            uploaded = Some(chunk);
            start = end;
        }
        uploaded.ok_or(Error::InvalidField(file.name.clone()))
    }

    /// URL streaming the original file. Built locally, no request is made.
    pub fn file_view_url(&self, bucket_id: &str, file_id: &str) -> Result<Url> {
        let path = format!("/storage/buckets/{}/files/{}/view", bucket_id, file_id);
        let params = build_params! { required project => self.project_id };
        Ok(Url::parse_with_params(self.url(&path)?.as_str(), &params)?)
    }

    /// URL of a server-rendered image preview. Built locally, no request is made.
    pub fn file_preview_url(&self, bucket_id: &str, file_id: &str, options: &PreviewOptions) -> Result<Url> {
        let path = format!("/storage/buckets/{}/files/{}/preview", bucket_id, file_id);
        let params = build_params! {
            optional width => options.width,
            optional height => options.height,
            optional gravity => options.gravity,
            optional quality => options.quality,
            required project => self.project_id,
        };
        Ok(Url::parse_with_params(self.url(&path)?.as_str(), &params)?)
    }

    // MARK: Avatars

    /// URL of an avatar rendered from the initials of `name`. Built locally, no request is made.
    pub fn initials_url(&self, name: &str) -> Result<Url> {
        let params = build_params! {
            required name,
            required project => self.project_id,
        };
        Ok(Url::parse_with_params(self.url("/avatars/initials")?.as_str(), &params)?)
    }
}

impl AppwriteClient {
    fn url(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}{}", self.endpoint, path))?)
    }

    async fn get<T, I>(&self, path: &str, query: I) -> Result<T>
    where
        T: DeserializeOwned,
        I: IntoIterator<Item = (String, String)>,
    {
        let mut url = self.url(path)?;
        url.query_pairs_mut().extend_pairs(query);

        let content = self.send(self.client.get(url), path).await?;
        let result = serde_json::from_str::<T>(&content)?;
        Ok(result)
    }

    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.client.post(self.url(path)?).json(body);
        let content = self.send(request, path).await?;
        let result = serde_json::from_str::<T>(&content)?;
        Ok(result)
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> Result<String> {
        let request = match self.fallback_cookies() {
            Some(cookies) => request.header("X-Fallback-Cookies", cookies),
            None => request,
        };
        let response = request.send().await?;
        self.remember_cookies(&response);

        let status = response.status();
        let content = response.text().await?;
        if let Some(dir) = self.log_dir.as_deref() {
            if let Err(err) = log(dir, path, &content).await {
                tracing::warn!("Cannot log response of {} to {}: {}", path, dir.display(), err);
            }
        }

        if !status.is_success() {
            let body = serde_json::from_str::<ErrorBody>(&content).unwrap_or_else(|_| ErrorBody {
                message: status.canonical_reason().unwrap_or("Unknown error").to_string(),
                code: status.as_u16(),
                kind: String::new(),
            });
            tracing::debug!("Appwrite {} responded {}: {}", path, status, body.message);
            return Err(Error::Service {
                code: if body.code == 0 { status.as_u16() } else { body.code },
                kind: body.kind,
                message: body.message,
            });
        }
        Ok(content)
    }

    fn fallback_cookies(&self) -> Option<String> {
        self.fallback_cookies.read().ok().and_then(|c| c.clone())
    }

    fn remember_cookies(&self, response: &Response) {
        let Some(value) = response.headers().get(FALLBACK_COOKIES) else {
            return;
        };
        let Ok(value) = value.to_str() else {
            return;
        };
        if let Ok(mut cookies) = self.fallback_cookies.write() {
            *cookies = Some(value.to_string());
        }
    }
}

fn upload_form(file_id: &ID, file: &InputFile, start: usize, end: usize) -> Result<Form> {
    let part = Part::bytes(file.bytes[start..end].to_vec())
        .file_name(file.name.clone())
        .mime_str(&file.mime_type)?;
    Ok(Form::new().text("fileId", file_id.to_string()).part("file", part))
}

async fn log(dir: &Path, path: &str, content: &str) -> Result<()> {
    use tokio::{fs::File, io::AsyncWriteExt};

    let name = path.strip_prefix('/').unwrap_or(path).replace('/', "_");
    let time = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let filepath = dir.join(format!("appwrite_{}_{}.json", name, time));
    let mut file = File::create(filepath).await?;
    file.write_all(content.as_bytes()).await?;
    Ok(())
}
