//! `/udm` endpoints.

use serde::Deserialize;

use super::client::{segment, ApiClient};
use super::error::ApiError;
use crate::models::{Asset, FullAssets, LoadResult, UdmDocument, UdmFilters, UdmStats};

#[derive(Deserialize)]
struct BrandList {
    #[serde(default)]
    brands: Vec<String>,
}

#[derive(Deserialize)]
struct AssetTypeList {
    #[serde(default)]
    asset_types: Vec<String>,
}

impl ApiClient {
    /// Summary listing of the loaded UDM document.
    pub async fn udm_document(&self, filters: &UdmFilters) -> Result<UdmDocument, ApiError> {
        self.get("udm/", &filters.query_pairs()).await
    }

    /// Full asset records, with `has_segments` applied locally.
    pub async fn full_assets(&self, filters: &UdmFilters) -> Result<FullAssets, ApiError> {
        let mut assets: FullAssets = self.get("udm/assets/full", &filters.query_pairs()).await?;
        if filters.has_segments.is_some() {
            assets.assets.retain(|asset| filters.accepts(asset));
            assets.filtered = assets.assets.len() as u64;
        }
        Ok(assets)
    }

    pub async fn udm_stats(&self) -> Result<UdmStats, ApiError> {
        self.get("udm/stats", &[]).await
    }

    pub async fn asset(&self, asset_uuid: &str) -> Result<Asset, ApiError> {
        let path = format!("udm/assets/{}", segment(asset_uuid));
        self.get(&path, &[]).await
    }

    pub async fn brands(&self) -> Result<Vec<String>, ApiError> {
        let list: BrandList = self.get("udm/brands", &[]).await?;
        Ok(list.brands)
    }

    pub async fn asset_types(&self) -> Result<Vec<String>, ApiError> {
        let list: AssetTypeList = self.get("udm/asset-types", &[]).await?;
        Ok(list.asset_types)
    }

    /// Load a UDM JSON file that lives on the backend host.
    pub async fn load_udm_file(&self, file_path: &str) -> Result<LoadResult, ApiError> {
        tracing::info!("Loading UDM file {}", file_path);
        self.post("udm/load", &[("file_path", file_path.to_string())])
            .await
    }

    pub async fn load_demo(&self) -> Result<LoadResult, ApiError> {
        tracing::info!("Loading demo UDM data");
        self.post("udm/demo", &[]).await
    }

    /// Rebuild the UDM document from the cached NAS scan.
    pub async fn load_from_nas(&self) -> Result<LoadResult, ApiError> {
        tracing::info!("Converting NAS scan to UDM");
        self.post("udm/from-nas", &[]).await
    }
}
