//! `/nas` endpoints.

use super::client::ApiClient;
use super::error::ApiError;
use crate::models::{NasFileList, NasFolder, NasFolderTree, ScanMode, ScanResult, ScanStatus};

impl ApiClient {
    /// Root of the NAS folder tree.
    pub async fn nas_folders(&self) -> Result<NasFolder, ApiError> {
        let tree: NasFolderTree = self.get("nas/folders", &[]).await?;
        Ok(tree.root)
    }

    pub async fn nas_files(&self, path: &str) -> Result<NasFileList, ApiError> {
        self.get("nas/files", &[("path", path.to_string())]).await
    }

    pub async fn scan_status(&self) -> Result<ScanStatus, ApiError> {
        self.get("nas/status", &[]).await
    }

    /// Trigger a NAS rescan. Blocks until the backend finishes scanning.
    pub async fn refresh_nas(&self, mode: ScanMode) -> Result<ScanResult, ApiError> {
        tracing::info!("Requesting {} NAS rescan", mode.as_str());
        self.post("nas/refresh", &[("mode", mode.as_str().to_string())])
            .await
    }
}
