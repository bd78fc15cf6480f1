//! Unified Data Model (UDM) asset and segment documents.
//!
//! Enum-like fields (brand, asset type, game variant, ...) stay plain strings
//! so new values introduced by the converter never break parsing here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Where an asset was recorded and under which event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventContext {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub event_number: Option<i64>,
    #[serde(default)]
    pub buyin_usd: Option<f64>,
    #[serde(default)]
    pub game_variant: Option<String>,
    #[serde(default)]
    pub is_high_roller: Option<bool>,
    #[serde(default)]
    pub is_super_high_roller: Option<bool>,
    #[serde(default)]
    pub is_final_table: Option<bool>,
    #[serde(default)]
    pub season: Option<i64>,
    #[serde(default)]
    pub episode: Option<i64>,
    #[serde(default)]
    pub episode_title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechSpec {
    #[serde(default)]
    pub fps: Option<f64>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub duration_sec: Option<f64>,
    #[serde(default)]
    pub file_size_mb: Option<f64>,
    #[serde(default)]
    pub codec: Option<String>,
}

/// Metadata parsed out of the file name by the converter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileNameMeta {
    #[serde(default)]
    pub code_prefix: Option<String>,
    #[serde(default)]
    pub year_code: Option<String>,
    #[serde(default)]
    pub sequence_num: Option<i64>,
    #[serde(default)]
    pub clip_type: Option<String>,
    #[serde(default)]
    pub raw_description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SituationFlags {
    #[serde(default)]
    pub is_cooler: Option<bool>,
    #[serde(default)]
    pub is_badbeat: Option<bool>,
    #[serde(default)]
    pub is_suckout: Option<bool>,
    #[serde(default)]
    pub is_bluff: Option<bool>,
    #[serde(default)]
    pub is_hero_call: Option<bool>,
    #[serde(default)]
    pub is_hero_fold: Option<bool>,
    #[serde(default)]
    pub is_river_killer: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInHand {
    pub name: String,
    #[serde(default)]
    pub hand: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub is_winner: Option<bool>,
    #[serde(default)]
    pub chips_won: Option<f64>,
}

/// Level 2: an annotated excerpt of an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub segment_uuid: String,
    pub parent_asset_uuid: String,
    #[serde(default)]
    pub segment_type: Option<String>,
    pub time_in_sec: f64,
    pub time_out_sec: f64,
    #[serde(default)]
    pub duration_sec: Option<f64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub game_type: Option<String>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub winning_hand: Option<String>,
    #[serde(default)]
    pub losing_hand: Option<String>,
    #[serde(default)]
    pub players: Option<Vec<PlayerInHand>>,
    #[serde(default)]
    pub tags_action: Option<Vec<String>>,
    #[serde(default)]
    pub tags_emotion: Option<Vec<String>>,
    #[serde(default)]
    pub tags_content: Option<Vec<String>>,
    #[serde(default)]
    pub situation_flags: Option<SituationFlags>,
    #[serde(default)]
    pub all_in_stage: Option<String>,
    #[serde(default)]
    pub board: Option<String>,
    #[serde(default)]
    pub hand_tag: Option<String>,
    #[serde(default)]
    pub is_epic_hand: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Level 1: one archived video file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub asset_uuid: String,
    pub file_name: String,
    #[serde(default)]
    pub file_path_rel: Option<String>,
    #[serde(default)]
    pub file_path_nas: Option<String>,
    #[serde(default)]
    pub asset_type: Option<String>,
    #[serde(default)]
    pub event_context: EventContext,
    #[serde(default)]
    pub tech_spec: Option<TechSpec>,
    #[serde(default)]
    pub file_name_meta: Option<FileNameMeta>,
    #[serde(default)]
    pub source_origin: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_modified: Option<String>,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

/// Row of `GET /udm/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSummary {
    pub asset_uuid: String,
    pub file_name: String,
    #[serde(default)]
    pub file_path_nas: Option<String>,
    #[serde(default)]
    pub asset_type: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub season: Option<i64>,
    #[serde(default)]
    pub episode: Option<i64>,
    #[serde(default)]
    pub source_origin: String,
    #[serde(default)]
    pub segment_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UdmMetadata {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub generated_at: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub total_assets: u64,
    #[serde(default)]
    pub total_segments: u64,
}

/// Response of `GET /udm/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UdmDocument {
    #[serde(default)]
    pub metadata: UdmMetadata,
    #[serde(default)]
    pub assets: Vec<AssetSummary>,
}

/// Response of `GET /udm/assets/full`.
///
/// Assets are kept as raw JSON so the completion scorer sees exactly what
/// the backend sent, including fields this client does not model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FullAssets {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub filtered: u64,
    #[serde(default)]
    pub assets: Vec<serde_json::Value>,
}

/// Response of `GET /udm/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UdmStats {
    pub total_assets: u64,
    pub total_segments: u64,
    #[serde(default, alias = "by_brand")]
    pub brand_distribution: BTreeMap<String, u64>,
    #[serde(default, alias = "by_asset_type")]
    pub asset_type_distribution: BTreeMap<String, u64>,
    #[serde(default, alias = "by_year")]
    pub year_distribution: BTreeMap<String, u64>,
}

/// Response of the UDM data-loading triggers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub total_assets: u64,
}

/// Optional query filters for the UDM listing endpoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UdmFilters {
    pub brand: Option<String>,
    pub asset_type: Option<String>,
    pub year: Option<i32>,
    pub search: Option<String>,
    /// Keep only assets with at least one segment (applied client side).
    pub has_segments: Option<bool>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl UdmFilters {
    /// Query pairs for the server-side filters, skipping unset and blank values.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(brand) = self.brand.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("brand", brand.to_string()));
        }
        if let Some(asset_type) = self.asset_type.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("asset_type", asset_type.to_string()));
        }
        if let Some(year) = self.year {
            pairs.push(("year", year.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        pairs
    }

    /// Whether a raw asset passes the client-side `has_segments` filter.
    pub fn accepts(&self, asset: &serde_json::Value) -> bool {
        match self.has_segments {
            None => true,
            Some(wanted) => {
                let has = asset
                    .get("segments")
                    .and_then(|s| s.as_array())
                    .is_some_and(|s| !s.is_empty());
                has == wanted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_pairs_skip_blank_values() {
        let filters = UdmFilters {
            brand: Some("WSOP".to_string()),
            search: Some("   ".to_string()),
            year: Some(2024),
            ..Default::default()
        };
        assert_eq!(
            filters.query_pairs(),
            vec![("brand", "WSOP".to_string()), ("year", "2024".to_string())]
        );
    }

    #[test]
    fn test_has_segments_filter() {
        let with = json!({"asset_uuid": "a", "segments": [{"segment_uuid": "s"}]});
        let without = json!({"asset_uuid": "b", "segments": []});
        let missing = json!({"asset_uuid": "c"});

        let only_with = UdmFilters {
            has_segments: Some(true),
            ..Default::default()
        };
        assert!(only_with.accepts(&with));
        assert!(!only_with.accepts(&without));
        assert!(!only_with.accepts(&missing));

        let only_without = UdmFilters {
            has_segments: Some(false),
            ..Default::default()
        };
        assert!(only_without.accepts(&missing));
        assert!(UdmFilters::default().accepts(&with));
    }

    #[test]
    fn test_stats_accepts_legacy_keys() {
        let stats: UdmStats = serde_json::from_value(json!({
            "total_assets": 3,
            "total_segments": 7,
            "by_brand": {"WSOP": 2, "HCL": 1},
        }))
        .unwrap();
        assert_eq!(stats.brand_distribution.get("WSOP"), Some(&2));
    }

    #[test]
    fn test_asset_parses_sparse_document() {
        let asset: Asset = serde_json::from_value(json!({
            "asset_uuid": "u-1",
            "file_name": "HCL_2024_EP01.mp4",
            "event_context": {"brand": "HCL", "year": 2024},
        }))
        .unwrap();
        assert_eq!(asset.event_context.brand.as_deref(), Some("HCL"));
        assert!(asset.tech_spec.is_none());
        assert!(asset.segments.is_empty());
    }
}
