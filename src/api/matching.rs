//! `/matching` endpoints.

use super::client::{segment, ApiClient};
use super::error::ApiError;
use crate::models::{FileSegments, MatchingMatrix, MatchingStats, MatchingStatus};

impl ApiClient {
    /// Fetch the matching matrix, optionally narrowed server side.
    pub async fn matching_matrix(
        &self,
        status: Option<MatchingStatus>,
        search: Option<&str>,
    ) -> Result<MatchingMatrix, ApiError> {
        let mut query = Vec::new();
        if let Some(status) = status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            query.push(("search", search.to_string()));
        }
        self.get("matching/matrix", &query).await
    }

    pub async fn matching_stats(&self) -> Result<MatchingStats, ApiError> {
        self.get("matching/stats", &[]).await
    }

    /// Detailed segments of one file.
    pub async fn file_segments(&self, file_name: &str) -> Result<FileSegments, ApiError> {
        let path = format!("matching/file/{}/segments", segment(file_name));
        self.get(&path, &[]).await
    }
}
