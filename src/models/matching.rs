//! Matching models: NAS files linked to sheet segments and their UDM conversions.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend-computed alignment status of a single archive file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingStatus {
    Complete,
    Partial,
    Warning,
    Pending,
    NoMetadata,
    Orphan,
}

impl MatchingStatus {
    /// All statuses, in display order.
    pub const ALL: [MatchingStatus; 6] = [
        Self::Complete,
        Self::Partial,
        Self::Warning,
        Self::Pending,
        Self::NoMetadata,
        Self::Orphan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Partial => "partial",
            Self::Warning => "warning",
            Self::Pending => "pending",
            Self::NoMetadata => "no_metadata",
            Self::Orphan => "orphan",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "complete" => Some(Self::Complete),
            "partial" => Some(Self::Partial),
            "warning" => Some(Self::Warning),
            "pending" => Some(Self::Pending),
            "no_metadata" => Some(Self::NoMetadata),
            "orphan" => Some(Self::Orphan),
            _ => None,
        }
    }
}

impl std::fmt::Display for MatchingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversion state of one segment's UDM record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UdmStatus {
    Complete,
    #[default]
    Pending,
    Warning,
    Error,
}

impl UdmStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Pending => "pending",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Link from a sheet segment to its converted UDM record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UdmLink {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub status: UdmStatus,
}

/// Spreadsheet the segment row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentSource {
    ArchiveMetadata,
    IconikMetadata,
}

impl SegmentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ArchiveMetadata => "archive_metadata",
            Self::IconikMetadata => "iconik_metadata",
        }
    }
}

/// One annotated time range within a file, keyed by its sheet row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub row_number: i64,
    #[serde(default)]
    pub source: Option<SegmentSource>,
    #[serde(default)]
    pub time_in: Option<String>,
    #[serde(default)]
    pub time_out: Option<String>,
    pub time_in_sec: f64,
    pub time_out_sec: f64,
    #[serde(default)]
    pub duration_sec: Option<f64>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub hands: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub udm: UdmLink,
}

impl SegmentRecord {
    /// Segment length, preferring the backend value over the computed one.
    pub fn duration(&self) -> f64 {
        self.duration_sec
            .unwrap_or((self.time_out_sec - self.time_in_sec).max(0.0))
    }
}

/// NAS-side copy of an archive file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NasFileInfo {
    pub exists: bool,
    pub path: String,
    pub size_mb: f64,
    #[serde(default)]
    pub duration_sec: Option<f64>,
    pub modified_at: String,
    #[serde(default)]
    pub inferred_brand: Option<String>,
}

/// Advisory validation warning attached to a segment row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub segment_row: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

/// One entry per archive file in the matching matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingItem {
    pub file_name: String,
    #[serde(default)]
    pub nas: Option<NasFileInfo>,
    #[serde(default)]
    pub segment_count: u64,
    #[serde(default)]
    pub udm_count: u64,
    #[serde(default)]
    pub segments: Vec<SegmentRecord>,
    pub status: MatchingStatus,
    #[serde(default)]
    pub status_detail: String,
    #[serde(default)]
    pub warnings: Vec<ValidationWarning>,
}

/// Response of `GET /matching/matrix`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchingMatrix {
    #[serde(default)]
    pub total_files: u64,
    #[serde(default)]
    pub total_segments: u64,
    #[serde(default)]
    pub matched_files: u64,
    #[serde(default)]
    pub matched_segments: u64,
    #[serde(default)]
    pub orphan_records: u64,
    #[serde(default)]
    pub unmatched_nas: u64,
    #[serde(default)]
    pub items: Vec<MatchingItem>,
}

/// Per-source ingest statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceStats {
    #[serde(default)]
    pub total_files: Option<u64>,
    #[serde(default)]
    pub total_records: Option<u64>,
    #[serde(default)]
    pub unique_files: Option<u64>,
    #[serde(default)]
    pub total_size_gb: Option<f64>,
    #[serde(default)]
    pub scanned_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub synced_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileMatchCounts {
    pub complete: u64,
    pub partial: u64,
    pub warning: u64,
    pub unmatched: u64,
    pub total_with_metadata: u64,
}

impl FileMatchCounts {
    pub fn total(&self) -> u64 {
        self.complete + self.partial + self.warning + self.unmatched
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentMatchCounts {
    pub complete: u64,
    pub pending: u64,
    pub warning: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchingCounts {
    pub files: FileMatchCounts,
    pub segments: SegmentMatchCounts,
    #[serde(default)]
    pub orphan_records: u64,
}

/// Match rates, already expressed as percentages by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    pub archive_to_nas: f64,
    pub iconik_to_nas: f64,
    pub nas_to_any_sheet: f64,
    pub segment_conversion_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentSummary {
    pub avg_segments_per_file: f64,
    pub max_segments_per_file: u64,
    pub min_segments_per_file: u64,
}

/// Response of `GET /matching/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchingStats {
    #[serde(default)]
    pub sources: HashMap<String, SourceStats>,
    pub matching: MatchingCounts,
    pub coverage: Coverage,
    pub summary: SegmentSummary,
}

/// Time range block of a detailed segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub in_tc: String,
    pub out_tc: String,
    pub in_sec: f64,
    pub out_sec: f64,
    pub duration_sec: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentMetadata {
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub hands: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentDetail {
    pub index: u32,
    pub source: SegmentSource,
    pub row_number: i64,
    pub time_range: TimeRange,
    #[serde(default)]
    pub metadata: SegmentMetadata,
    #[serde(default)]
    pub udm: UdmLink,
}

/// Response of `GET /matching/file/{file_name}/segments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSegments {
    pub file_name: String,
    #[serde(default)]
    pub nas: Option<NasFileInfo>,
    pub total_segments: u64,
    pub converted_segments: u64,
    #[serde(default)]
    pub segments: Vec<SegmentDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in MatchingStatus::ALL {
            assert_eq!(MatchingStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(MatchingStatus::from_str("all"), None);
    }

    #[test]
    fn test_matching_item_defaults_missing_fields() {
        let item: MatchingItem = serde_json::from_value(serde_json::json!({
            "file_name": "WSOP_2024_ME_D1.mp4",
            "status": "no_metadata",
        }))
        .unwrap();

        assert_eq!(item.status, MatchingStatus::NoMetadata);
        assert!(item.nas.is_none());
        assert!(item.segments.is_empty());
        assert_eq!(item.segment_count, 0);
    }

    #[test]
    fn test_segment_udm_defaults_to_pending() {
        let segment: SegmentRecord = serde_json::from_value(serde_json::json!({
            "row_number": 12,
            "time_in_sec": 30.0,
            "time_out_sec": 95.5,
            "tags": ["bluff", "bluff"],
        }))
        .unwrap();

        assert_eq!(segment.udm.status, UdmStatus::Pending);
        assert!(segment.udm.uuid.is_none());
        assert_eq!(segment.tags, vec!["bluff", "bluff"]);
        assert!((segment.duration() - 65.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_warning_type_field_renamed() {
        let warning: ValidationWarning = serde_json::from_value(serde_json::json!({
            "segment_row": 4,
            "type": "time_overlap",
            "message": "overlaps row 3",
        }))
        .unwrap();
        assert_eq!(warning.kind, "time_overlap");
    }
}
