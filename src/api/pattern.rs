//! `/pattern` endpoints.

use super::client::{segment, ApiClient};
use super::error::ApiError;
use crate::models::{
    PatternList, PatternMatchDetail, PatternRefresh, PatternStats, PatternTestRequest,
    PatternTestResponse, UnmatchedFiles,
};

fn page(limit: Option<u32>, offset: Option<u32>) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(limit) = limit {
        query.push(("limit", limit.to_string()));
    }
    if let Some(offset) = offset {
        query.push(("offset", offset.to_string()));
    }
    query
}

impl ApiClient {
    pub async fn pattern_stats(&self) -> Result<PatternStats, ApiError> {
        self.get("pattern/stats", &[]).await
    }

    pub async fn pattern_list(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<PatternList, ApiError> {
        self.get("pattern/list", &page(limit, offset)).await
    }

    pub async fn unmatched_files(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<UnmatchedFiles, ApiError> {
        self.get("pattern/unmatched", &page(limit, offset)).await
    }

    pub async fn file_pattern_match(&self, file_name: &str) -> Result<PatternMatchDetail, ApiError> {
        let path = format!("pattern/files/{}/match", segment(file_name));
        self.get(&path, &[]).await
    }

    /// Run the backend's file-name parser against an arbitrary name.
    pub async fn test_pattern(
        &self,
        request: &PatternTestRequest,
    ) -> Result<PatternTestResponse, ApiError> {
        self.post_json("pattern/test", request).await
    }

    pub async fn refresh_patterns(&self) -> Result<PatternRefresh, ApiError> {
        self.post("pattern/refresh", &[]).await
    }
}
