//! File-name pattern matching diagnostics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternStats {
    pub total_files: u64,
    pub matched_files: u64,
    pub unmatched_files: u64,
    pub match_rate: f64,
    pub total_patterns: u64,
    #[serde(default)]
    pub avg_confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternInfo {
    pub name: String,
    pub regex: String,
    pub category: String,
    pub match_count: u64,
    #[serde(default)]
    pub example_files: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternList {
    #[serde(default)]
    pub patterns: Vec<PatternInfo>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedFile {
    pub file_name: String,
    #[serde(default)]
    pub path: Option<String>,
    pub reason: String,
    #[serde(default)]
    pub suggested_category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedFiles {
    pub total_unmatched: u64,
    pub percentage: f64,
    #[serde(default)]
    pub categories: BTreeMap<String, u64>,
    #[serde(default)]
    pub files: Vec<UnmatchedFile>,
}

/// Extracted capture groups; values may be strings, numbers or null.
pub type ExtractedFields = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatchDetail {
    pub file_name: String,
    pub matched: bool,
    #[serde(default)]
    pub pattern_name: Option<String>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub extracted_fields: ExtractedFields,
}

/// Body of `POST /pattern/test`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternTestRequest {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternTestResponse {
    pub success: bool,
    pub matched: bool,
    #[serde(default)]
    pub pattern_name: Option<String>,
    #[serde(default)]
    pub extracted_groups: ExtractedFields,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `POST /pattern/refresh`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRefresh {
    pub status: String,
    #[serde(default)]
    pub message: String,
}
