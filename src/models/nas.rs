//! NAS folder tree, file listing and scan models.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A folder in the NAS scan tree. Each node is owned by exactly one parent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NasFolder {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub file_count: u64,
    #[serde(default)]
    pub folder_count: u64,
    #[serde(default)]
    pub children: Vec<NasFolder>,
}

/// Response of `GET /nas/folders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NasFolderTree {
    pub root: NasFolder,
}

/// A single file entry inside a NAS folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NasFile {
    pub name: String,
    pub path: String,
    pub size_mb: f64,
    pub modified_at: String,
    #[serde(default)]
    pub has_metadata: bool,
}

/// Response of `GET /nas/files`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NasFileList {
    pub path: String,
    pub total: u64,
    #[serde(default)]
    pub files: Vec<NasFile>,
}

/// Rescan mode for `POST /nas/refresh`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    #[default]
    Full,
    Incremental,
}

impl ScanMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Incremental => "incremental",
        }
    }
}

/// Scan summary returned after a NAS rescan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    #[serde(default)]
    pub message: String,
    pub mode: ScanMode,
    pub total_files: u64,
    #[serde(default)]
    pub total_size_gb: f64,
    pub scan_duration_sec: f64,
    #[serde(default)]
    pub new_files: u64,
    #[serde(default)]
    pub modified_files: u64,
    #[serde(default)]
    pub brand_counts: HashMap<String, u64>,
}

/// Response of `GET /nas/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanStatus {
    #[serde(default)]
    pub last_scan: Option<String>,
    #[serde(default)]
    pub cached_files: u64,
    #[serde(default)]
    pub is_cached: bool,
    #[serde(default)]
    pub nas_path: String,
    #[serde(default)]
    pub nas_accessible: bool,
}
