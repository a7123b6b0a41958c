//! HTTP client for the remote file-storage service.
//!
//! The service exposes four endpoints below a single base URL: the full file
//! tree, multipart upload, PDF rendition, and raw download.

use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};

use crate::config::{normalize_base_url, ServiceConfig};
use crate::models::{TreeNode, UploadFile};
use crate::util::compact_text;
use crate::{Error, Result};

const TREE_ROUTE: &str = "/list-files-tree";
const UPLOAD_ROUTE: &str = "/upload-document";
const PDF_ROUTE: &str = "/get-pdf";
const DOWNLOAD_ROUTE: &str = "/download";

/// Binary payload returned by the preview and download endpoints.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteBlob {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl std::fmt::Debug for RemoteBlob {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RemoteBlob")
            .field("bytes", &format_args!("{} bytes", self.bytes.len()))
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// HTTP client bound to one file service base URL.
#[derive(Debug, Clone)]
pub struct RemoteFileClient {
    base_url: String,
    client: reqwest::Client,
}

impl RemoteFileClient {
    /// Builds a client for an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = normalize_base_url(&base_url.into())?;
        let client = reqwest::Client::builder().build()?;
        Ok(Self { base_url, client })
    }

    /// Builds a client from service configuration.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Self::new(config.base_url.clone())
    }

    /// Returns the base URL this client was configured with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the complete file hierarchy.
    pub async fn list_tree(&self) -> Result<Vec<TreeNode>> {
        let response = self
            .client
            .get(self.url(TREE_ROUTE))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::TreeFetch(response.status().as_u16()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Uploads `file` into `folder_path` (sent verbatim, trailing `/` included).
    pub async fn upload_document(&self, file: &UploadFile, folder_path: &str) -> Result<()> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type())?;
        let form = Form::new()
            .part("file", part)
            .text("folderPath", folder_path.to_string());

        let response = self
            .client
            .post(self.url(UPLOAD_ROUTE))
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::Upload(status_text(response.status())));
        }
        Ok(())
    }

    /// Fetches the PDF rendition of the file at `full_path`.
    pub async fn fetch_pdf(&self, full_path: &str) -> Result<RemoteBlob> {
        let response = self.post_path(PDF_ROUTE, full_path).await?;
        if !response.status().is_success() {
            return Err(Error::Preview(error_body(response).await));
        }
        read_blob(response).await
    }

    /// Fetches the raw bytes of the file at `full_path`.
    pub async fn download(&self, full_path: &str) -> Result<RemoteBlob> {
        let response = self.post_path(DOWNLOAD_ROUTE, full_path).await?;
        if !response.status().is_success() {
            return Err(Error::Download(error_body(response).await));
        }
        read_blob(response).await
    }

    async fn post_path(&self, route: &str, full_path: &str) -> Result<Response> {
        let encoded_path = urlencoding::encode(full_path);
        let response = self
            .client
            .post(self.url(route))
            .json(&serde_json::json!({ "path": encoded_path }))
            .send()
            .await?;
        Ok(response)
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }
}

async fn read_blob(response: Response) -> Result<RemoteBlob> {
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);
    let bytes = response.bytes().await?;
    Ok(RemoteBlob {
        bytes: bytes.to_vec(),
        content_type,
    })
}

async fn error_body(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let body = compact_text(&body);
    if body.is_empty() {
        status_text(status)
    } else {
        body
    }
}

fn status_text(status: StatusCode) -> String {
    status.canonical_reason().map_or_else(
        || format!("HTTP {}", status.as_u16()),
        |reason| format!("HTTP {} {reason}", status.as_u16()),
    )
}
