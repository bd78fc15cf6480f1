//! UDM viewer commands: listings, completion, and data loading triggers.

use anyhow::Context;
use console::style;
use serde_json::Value;

use udm_dash::completion::{completion, completion_of, is_filled, resolve_path, CellState};
use udm_dash::models::{LoadResult, UdmFilters};
use udm_dash::schema::{
    field_label, field_required, field_source, leaf_paths, FieldMeta, ASSET_SCHEMA, COLUMN_GROUPS,
    SEGMENT_SCHEMA,
};
use udm_dash::{ApiClient, ApiError};

use crate::cli::helpers::{completion_style, format_number, text_bar, truncate_string};
use crate::cli::icons::{arrow, error, success};
use crate::cli::progress::with_spinner;

/// Server-side UDM filters shared by `udm list` and `udm assets`.
#[derive(clap::Args)]
pub struct FilterArgs {
    #[arg(long)]
    brand: Option<String>,
    #[arg(long)]
    asset_type: Option<String>,
    #[arg(long)]
    year: Option<i32>,
    /// File name search
    #[arg(short = 'q', long)]
    search: Option<String>,
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long)]
    offset: Option<u32>,
}

impl FilterArgs {
    pub fn into_filters(self, has_segments: Option<bool>) -> UdmFilters {
        UdmFilters {
            brand: self.brand,
            asset_type: self.asset_type,
            year: self.year,
            search: self.search,
            has_segments,
            limit: self.limit,
            offset: self.offset,
        }
    }
}

pub async fn cmd_list(api: &ApiClient, filters: UdmFilters) -> anyhow::Result<()> {
    let doc = api
        .udm_document(&filters)
        .await
        .context("Failed to fetch UDM document")?;

    println!();
    println!(
        "{} v{} from {} ({} assets, {} segments)",
        style("UDM").cyan().bold(),
        doc.metadata.version,
        doc.metadata.source,
        format_number(doc.metadata.total_assets),
        format_number(doc.metadata.total_segments),
    );
    println!("{}", "─".repeat(100));
    println!(
        "{:<50} {:<8} {:>5} {:<12} {:>8}",
        style("FILE").bold(),
        style("BRAND").bold(),
        style("YEAR").bold(),
        style("TYPE").bold(),
        style("SEGMENTS").bold(),
    );
    for asset in &doc.assets {
        let season = match (asset.season, asset.episode) {
            (Some(s), Some(e)) => format!(" S{:02}E{:02}", s, e),
            _ => String::new(),
        };
        println!(
            "{:<50} {:<8} {:>5} {:<12} {:>8}",
            truncate_string(&format!("{}{}", asset.file_name, season), 50),
            asset.brand,
            asset.year,
            truncate_string(&asset.asset_type, 12),
            format_number(asset.segment_count),
        );
    }

    Ok(())
}

pub async fn cmd_assets(api: &ApiClient, filters: UdmFilters, json: bool) -> anyhow::Result<()> {
    let full = api
        .full_assets(&filters)
        .await
        .context("Failed to fetch full UDM assets")?;
    let paths = leaf_paths(ASSET_SCHEMA);

    if json {
        let rows: Vec<Value> = full
            .assets
            .iter()
            .map(|asset| {
                serde_json::json!({
                    "asset_uuid": asset.get("asset_uuid"),
                    "file_name": asset.get("file_name"),
                    "completion": completion(&paths, asset),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!();
    println!(
        "{} {} of {} assets, {} schema fields",
        style("UDM ASSETS").cyan().bold(),
        format_number(full.filtered),
        format_number(full.total),
        paths.len()
    );
    println!("{}", "─".repeat(100));

    let group_headers: Vec<String> = COLUMN_GROUPS
        .iter()
        .map(|g| format!("{:>9}", truncate_string(g.label, 9)))
        .collect();
    println!(
        "{:<40} {:>6} {}",
        style("FILE").bold(),
        style("DONE").bold(),
        group_headers.join(" ")
    );

    for asset in &full.assets {
        let name = asset
            .get("file_name")
            .and_then(Value::as_str)
            .unwrap_or("(unnamed)");
        let overall = completion(&paths, asset);
        let groups: Vec<String> = COLUMN_GROUPS
            .iter()
            .map(|g| {
                let filled = g.fields.iter().filter(|f| is_filled(asset, f)).count();
                format!("{:>9}", format!("{}/{}", filled, g.fields.len()))
            })
            .collect();
        println!(
            "{:<40} {:>6} {}",
            truncate_string(name, 40),
            completion_style(overall.percentage),
            groups.join(" ")
        );
    }

    Ok(())
}

pub async fn cmd_stats(api: &ApiClient) -> anyhow::Result<()> {
    let stats = api.udm_stats().await.context("Failed to fetch UDM stats")?;

    println!();
    println!(
        "{} {} assets, {} segments",
        style("UDM STATS").cyan().bold(),
        format_number(stats.total_assets),
        format_number(stats.total_segments)
    );

    for (title, dist) in [
        ("BRANDS", &stats.brand_distribution),
        ("ASSET TYPES", &stats.asset_type_distribution),
        ("YEARS", &stats.year_distribution),
    ] {
        println!();
        println!("{}", style(title).cyan().bold());
        let max = dist.values().copied().max().unwrap_or(0).max(1);
        for (key, count) in dist {
            let width = (*count * 100 / max) as u16;
            println!(
                "  {:<16} {:>8}  {}",
                truncate_string(key, 16),
                format_number(*count),
                text_bar(width, 30)
            );
        }
    }

    Ok(())
}

pub async fn cmd_asset(api: &ApiClient, asset_uuid: &str, json: bool) -> anyhow::Result<()> {
    let asset = match api.asset(asset_uuid).await {
        Ok(asset) => asset,
        Err(e) if e.is_not_found() => anyhow::bail!("Asset '{}' not found", asset_uuid),
        Err(e) => return Err(e).context("Failed to fetch asset"),
    };

    let paths = leaf_paths(ASSET_SCHEMA);
    let overall = completion_of(&paths, &asset);
    let record = serde_json::to_value(&asset)?;

    if json {
        let out = serde_json::json!({"asset": record, "completion": overall});
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "{}  {} ({}/{} fields)",
        style(&asset.file_name).bold(),
        completion_style(overall.percentage),
        overall.filled,
        overall.total
    );
    println!("  {}", style(&asset.asset_uuid).dim());

    for group in COLUMN_GROUPS {
        println!();
        println!("{}", style(group.label.to_uppercase()).cyan().bold());
        for path in group.fields {
            let cell = CellState::of(&record, path, field_required(path));
            let glyph = match cell {
                CellState::Filled => success(),
                CellState::MissingRequired => error(),
                CellState::Missing => style("·").dim(),
            };
            let value = resolve_path(&record, path)
                .filter(|_| cell == CellState::Filled)
                .map(display_value)
                .unwrap_or_default();
            println!(
                "  {} {:<22} {:<14} {}",
                glyph,
                field_label(path),
                style(field_source(path).label()).dim(),
                truncate_string(&value, 60)
            );
        }
    }

    if !asset.segments.is_empty() {
        let seg_paths = leaf_paths(SEGMENT_SCHEMA);
        println!();
        println!(
            "{} ({})",
            style("SEGMENTS").cyan().bold(),
            asset.segments.len()
        );
        for (i, segment) in asset.segments.iter().enumerate() {
            let c = completion_of(&seg_paths, segment);
            println!(
                "  {:>3}. {:<40} {:>6}",
                i + 1,
                truncate_string(segment.title.as_deref().unwrap_or("-"), 40),
                completion_style(c.percentage)
            );
        }
    }

    Ok(())
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => format!("[{} items]", items.len()),
        other => other.to_string(),
    }
}

pub async fn cmd_brands(api: &ApiClient) -> anyhow::Result<()> {
    for brand in api.brands().await.context("Failed to fetch brands")? {
        println!("{}", brand);
    }
    Ok(())
}

pub async fn cmd_asset_types(api: &ApiClient) -> anyhow::Result<()> {
    for asset_type in api
        .asset_types()
        .await
        .context("Failed to fetch asset types")?
    {
        println!("{}", asset_type);
    }
    Ok(())
}

fn report_load(result: Result<LoadResult, ApiError>, what: &str) -> anyhow::Result<()> {
    let result = result.with_context(|| format!("Failed to {}", what))?;
    if !result.success {
        eprintln!("{} {}", error(), result.message);
        anyhow::bail!("Backend reported failure to {}", what);
    }
    println!("{} {}", success(), result.message);
    println!(
        "  {} {} assets loaded",
        arrow(),
        format_number(result.total_assets)
    );
    Ok(())
}

pub async fn cmd_load(api: &ApiClient, file_path: &str) -> anyhow::Result<()> {
    let result = with_spinner(
        &format!("Loading {}", file_path),
        api.load_udm_file(file_path),
    )
    .await;
    report_load(result, "load UDM file")
}

pub async fn cmd_demo(api: &ApiClient) -> anyhow::Result<()> {
    let result = with_spinner("Loading demo data", api.load_demo()).await;
    report_load(result, "load demo data")
}

pub async fn cmd_from_nas(api: &ApiClient) -> anyhow::Result<()> {
    let result = with_spinner("Converting NAS scan to UDM", api.load_from_nas()).await;
    report_load(result, "convert NAS scan")
}

/// Print the field catalogue as an indented tree.
pub fn cmd_schema(segments: bool) -> anyhow::Result<()> {
    let schema: &[FieldMeta] = if segments {
        SEGMENT_SCHEMA
    } else {
        ASSET_SCHEMA
    };

    let mut stack: Vec<(usize, &FieldMeta)> = schema.iter().rev().map(|f| (0, f)).collect();
    while let Some((depth, field)) = stack.pop() {
        let kind = format!("{:?}", field.kind).to_lowercase();
        let required = if field.required {
            style("required").yellow()
        } else {
            style("").dim()
        };
        println!(
            "{}{:<24} {:<18} {:<8} {:<14} {}",
            "  ".repeat(depth),
            field.key,
            field.label,
            kind,
            field.source.label(),
            required
        );
        if !field.enum_values.is_empty() {
            println!(
                "{}  {} {}",
                "  ".repeat(depth),
                arrow(),
                style(field.enum_values.join(" | ")).dim()
            );
        }
        for child in field.children.iter().rev() {
            stack.push((depth + 1, child));
        }
    }

    println!();
    println!("{} leaf fields", leaf_paths(schema).len());
    Ok(())
}
