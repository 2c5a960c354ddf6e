use super::client::{LinkKind, StorageClient, StorageLink};
use crate::error::ServiceError;
use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

pub const DRIVE_BASE_URL: &str = "https://www.googleapis.com";

const SERVICE: &str = "google drive";

/// Google Drive v3 backend
///
/// Uploads in two requests: create the file metadata, then send the media.
/// Authentication is a ready-made OAuth access token.
pub struct DriveStorage {
    client: Client,
    access_token: String,
    folder_id: Option<String>,
    base_url: String,
}

impl DriveStorage {
    pub fn new(
        access_token: String,
        folder_id: Option<String>,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build Drive HTTP client")?;

        Ok(Self {
            client,
            access_token,
            folder_id,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn create_file(&self, name: &str, kind: LinkKind) -> Result<DriveFile, ServiceError> {
        let metadata = FileMetadata {
            name: name.to_string(),
            mime_type: kind.mime_type().to_string(),
            parents: self.folder_id.clone().map(|id| vec![id]),
        };

        let response = self
            .client
            .post(format!("{}/drive/v3/files", self.base_url))
            .bearer_auth(&self.access_token)
            .query(&[("fields", "id")])
            .json(&metadata)
            .send()
            .await
            .map_err(|e| ServiceError::new(SERVICE, format!("create failed: {}", e)))?;

        parse_file(response).await
    }

    async fn upload_media(
        &self,
        file_id: &str,
        content: &str,
        kind: LinkKind,
    ) -> Result<DriveFile, ServiceError> {
        let response = self
            .client
            .patch(format!("{}/upload/drive/v3/files/{}", self.base_url, file_id))
            .bearer_auth(&self.access_token)
            .query(&[("uploadType", "media"), ("fields", "id,webViewLink")])
            .header(CONTENT_TYPE, format!("{}; charset=utf-8", kind.mime_type()))
            .body(content.to_string())
            .send()
            .await
            .map_err(|e| ServiceError::new(SERVICE, format!("upload failed: {}", e)))?;

        parse_file(response).await
    }
}

#[async_trait::async_trait]
impl StorageClient for DriveStorage {
    async fn upload(
        &self,
        content: &str,
        name: &str,
        kind: LinkKind,
    ) -> Result<StorageLink, ServiceError> {
        let created = self.create_file(name, kind).await?;
        let uploaded = self.upload_media(&created.id, content, kind).await?;

        let url = uploaded
            .web_view_link
            .unwrap_or_else(|| format!("https://drive.google.com/file/d/{}/view", uploaded.id));

        info!("Uploaded {} to Drive ({})", name, uploaded.id);

        Ok(StorageLink { url, kind })
    }

    fn name(&self) -> &str {
        "drive"
    }
}

async fn parse_file(response: Response) -> Result<DriveFile, ServiceError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ServiceError::new(SERVICE, format!("failed to read response: {}", e)))?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorWrapper>(&body)
            .ok()
            .and_then(|w| w.error.message)
            .unwrap_or_else(|| format!("HTTP {}", status));
        return Err(ServiceError::new(SERVICE, message));
    }

    serde_json::from_str(&body)
        .map_err(|e| ServiceError::new(SERVICE, format!("malformed response: {}", e)))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileMetadata {
    name: String,
    mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parents: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    web_view_link: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}
