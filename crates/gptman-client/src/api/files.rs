//! Files API.

use std::path::Path;

use reqwest::multipart::{Form, Part};

use crate::client::GptmanClient;
use crate::error::{Error, Result};
use crate::types::{DeletedObject, FileObject, FilePurpose, ListResponse};

/// Files API client.
pub struct FilesApi {
    client: GptmanClient,
}

impl FilesApi {
    pub(crate) fn new(client: GptmanClient) -> Self {
        Self { client }
    }

    /// Upload a local file.
    pub async fn upload(&self, path: &Path, purpose: FilePurpose) -> Result<FileObject> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| Error::Config(format!("not a file path: {}", path.display())))?;
        let bytes = tokio::fs::read(path).await?;

        let form = Form::new()
            .text("purpose", purpose.as_str())
            .part("file", Part::bytes(bytes).file_name(filename));

        let file: FileObject = self.client.post_multipart("files", form).await?;
        tracing::debug!(
            file_id = %file.id,
            filename = %file.filename,
            bytes = file.bytes,
            "uploaded file"
        );
        Ok(file)
    }

    /// List uploaded files.
    pub async fn list(&self) -> Result<Vec<FileObject>> {
        let page: ListResponse<FileObject> = self.client.get("files").await?;
        Ok(page.data)
    }

    /// Get a file by ID.
    pub async fn retrieve(&self, id: &str) -> Result<FileObject> {
        self.client.get(&format!("files/{}", id)).await
    }

    /// Delete a file.
    pub async fn delete(&self, id: &str) -> Result<DeletedObject> {
        self.client.delete(&format!("files/{}", id)).await
    }
}
