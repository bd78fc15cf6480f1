//! Matching matrix, statistics and segment detail commands.

use anyhow::Context;
use console::style;

use udm_dash::filter::{conversion_rate, progress_width, status_counts};
use udm_dash::models::{MatchingItem, MatchingMatrix, MatchingStatus, SegmentRecord};
use udm_dash::{ApiClient, DashboardState, FilterSpec, SortKey, SortOrder, StatusFilter};

use crate::cli::helpers::{
    format_duration, format_number, status_style, text_bar, truncate_string, udm_status_style,
};
use crate::cli::icons::warning;

/// Arguments of `udm-dash matrix`.
pub struct MatrixArgs {
    pub status: Option<MatchingStatus>,
    pub search: String,
    pub sort: String,
    pub order: String,
    pub expand: Vec<String>,
    pub json: bool,
}

impl MatrixArgs {
    fn filter_spec(&self) -> anyhow::Result<FilterSpec> {
        let sort_by = SortKey::parse(&self.sort);
        if sort_by.is_none() {
            tracing::warn!("Unknown sort key '{}', keeping backend order", self.sort);
        }
        let sort_order = SortOrder::parse(&self.order)
            .ok_or_else(|| anyhow::anyhow!("Sort order must be 'asc' or 'desc'"))?;

        Ok(FilterSpec {
            status: self
                .status
                .map(StatusFilter::Only)
                .unwrap_or(StatusFilter::All),
            search_query: self.search.clone(),
            sort_by,
            sort_order,
        })
    }
}

pub async fn cmd_matrix(api: &ApiClient, args: MatrixArgs) -> anyhow::Result<()> {
    let mut state = DashboardState::new();
    state.set_filters(args.filter_spec()?);
    for file_name in &args.expand {
        state.toggle_expanded(file_name);
    }

    let search = (!args.search.is_empty()).then_some(args.search.as_str());
    let matrix = api
        .matching_matrix(args.status, search)
        .await
        .context("Failed to fetch matching matrix")?;

    let visible = state.visible(&matrix.items);

    if args.json {
        let out = MatchingMatrix {
            items: visible,
            ..matrix
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print_matrix_summary(&matrix, &visible);

    if visible.is_empty() {
        println!("{} No files match the current filters", warning());
        return Ok(());
    }

    println!(
        "{:<44} {:<12} {:>8} {:>6} {:>7}  {:<12} {}",
        style("FILE").bold(),
        style("STATUS").bold(),
        style("SEGMENTS").bold(),
        style("UDM").bold(),
        style("RATE").bold(),
        "",
        style("DETAIL").bold(),
    );
    for item in &visible {
        print_item_row(item);
        if state.is_expanded(&item.file_name) {
            print_item_segments(item);
        }
    }

    for name in &args.expand {
        if !visible.iter().any(|i| &i.file_name == name) {
            println!("{} '{}' is not in the filtered list", warning(), name);
        }
    }

    Ok(())
}

fn print_matrix_summary(matrix: &MatchingMatrix, visible: &[MatchingItem]) {
    let separator = "─".repeat(100);
    println!();
    println!(
        "{} {} files, {} segments ({} matched files, {} matched segments, {} orphan records, {} unmatched NAS)",
        style("MATCHING").cyan().bold(),
        format_number(matrix.total_files),
        format_number(matrix.total_segments),
        format_number(matrix.matched_files),
        format_number(matrix.matched_segments),
        format_number(matrix.orphan_records),
        format_number(matrix.unmatched_nas),
    );

    let counts = status_counts(visible);
    let parts: Vec<String> = MatchingStatus::ALL
        .iter()
        .map(|s| format!("{} {}", status_style(*s), counts.get(s.as_str()).copied().unwrap_or(0)))
        .collect();
    println!("Showing {}: {}", visible.len(), parts.join("  "));
    println!("{}", separator);
}

fn print_item_row(item: &MatchingItem) {
    let rate = conversion_rate(item);
    println!(
        "{:<44} {:<12} {:>8} {:>6} {:>6.0}%  {:<12} {}",
        truncate_string(&item.file_name, 44),
        status_style(item.status),
        format_number(item.segment_count),
        format_number(item.udm_count),
        rate,
        text_bar(progress_width(item), 12),
        style(&item.status_detail).dim(),
    );
}

fn print_item_segments(item: &MatchingItem) {
    if let Some(ref nas) = item.nas {
        println!(
            "    NAS: {} ({:.1} MB, modified {})",
            nas.path, nas.size_mb, nas.modified_at
        );
    }
    if item.segments.is_empty() {
        println!("    {}", style("No segments").dim());
    }
    for seg in &item.segments {
        print_segment_row(seg);
        for w in item.warnings.iter().filter(|w| w.segment_row == seg.row_number) {
            println!("        {} {}: {}", warning(), w.kind, w.message);
        }
    }
}

fn print_segment_row(seg: &SegmentRecord) {
    let source = seg.source.map(|s| s.as_str()).unwrap_or("-");
    let time_in = seg.time_in.as_deref().unwrap_or("-");
    let time_out = seg.time_out.as_deref().unwrap_or("-");
    let rating = seg
        .rating
        .map(|r| "★".repeat(r as usize))
        .unwrap_or_default();
    println!(
        "    #{:<5} {:<16} {:>11} → {:<11} {:>8} {:<5} {:<20} {}",
        seg.row_number,
        source,
        time_in,
        time_out,
        format_duration(seg.duration()),
        rating,
        truncate_string(seg.winner.as_deref().unwrap_or("-"), 20),
        udm_status_style(seg.udm.status),
    );
}

pub async fn cmd_stats(api: &ApiClient, json: bool) -> anyhow::Result<()> {
    let stats = api
        .matching_stats()
        .await
        .context("Failed to fetch matching stats")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let separator = "─".repeat(70);
    println!();
    println!("{}", style("matching stats").bold());
    println!("{}", separator);

    if !stats.sources.is_empty() {
        println!("{}", style("SOURCES").cyan().bold());
        let mut names: Vec<&String> = stats.sources.keys().collect();
        names.sort();
        for name in names {
            let src = &stats.sources[name];
            let count = src
                .total_files
                .or(src.total_records)
                .or(src.unique_files)
                .unwrap_or(0);
            let when = src
                .scanned_at
                .or(src.synced_at)
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("  {:<20} {:>10}   {}", name, format_number(count), when);
        }
        println!();
    }

    let files = &stats.matching.files;
    println!("{}", style("FILES").cyan().bold());
    println!("  {:<20} {:>10}", "Complete:", format_number(files.complete));
    println!("  {:<20} {:>10}", "Partial:", format_number(files.partial));
    println!("  {:<20} {:>10}", "Warning:", format_number(files.warning));
    println!("  {:<20} {:>10}", "Unmatched:", format_number(files.unmatched));
    println!(
        "  {:<20} {:>10}",
        "With metadata:",
        format_number(files.total_with_metadata)
    );
    println!();

    let segs = &stats.matching.segments;
    println!("{}", style("SEGMENTS").cyan().bold());
    println!("  {:<20} {:>10}", "Total:", format_number(segs.total));
    println!("  {:<20} {:>10}", "Converted:", format_number(segs.complete));
    println!("  {:<20} {:>10}", "Pending:", format_number(segs.pending));
    println!("  {:<20} {:>10}", "Warning:", format_number(segs.warning));
    println!(
        "  {:<20} {:>10}",
        "Orphan records:",
        format_number(stats.matching.orphan_records)
    );
    println!();

    let cov = &stats.coverage;
    println!("{}", style("COVERAGE").cyan().bold());
    for (label, pct) in [
        ("Archive → NAS:", cov.archive_to_nas),
        ("Iconik → NAS:", cov.iconik_to_nas),
        ("NAS → any sheet:", cov.nas_to_any_sheet),
        ("Segment → UDM:", cov.segment_conversion_rate),
    ] {
        let width = pct.clamp(0.0, 100.0).round() as u16;
        println!("  {:<20} {:>6.1}%  {}", label, pct, text_bar(width, 20));
    }
    println!();

    let sum = &stats.summary;
    println!(
        "Segments per file: avg {:.1}, min {}, max {}",
        sum.avg_segments_per_file, sum.min_segments_per_file, sum.max_segments_per_file
    );
    println!("{}", separator);

    Ok(())
}

pub async fn cmd_segments(api: &ApiClient, file_name: &str, json: bool) -> anyhow::Result<()> {
    let detail = api
        .file_segments(file_name)
        .await
        .with_context(|| format!("Failed to fetch segments for '{}'", file_name))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    println!();
    println!("{}", style(&detail.file_name).bold());
    match detail.nas {
        Some(ref nas) => println!(
            "  NAS: {} ({:.1} MB{})",
            nas.path,
            nas.size_mb,
            nas.inferred_brand
                .as_deref()
                .map(|b| format!(", {}", b))
                .unwrap_or_default()
        ),
        None => println!("  NAS: {}", style("not found").red()),
    }
    println!(
        "  Converted: {}/{}",
        detail.converted_segments, detail.total_segments
    );
    println!("{}", "─".repeat(100));

    for seg in &detail.segments {
        let meta = &seg.metadata;
        println!(
            "{:>3}. {:<16} #{:<5} {:>11} → {:<11} {:>8}  {:<20} {:<10} {}",
            seg.index,
            seg.source.as_str(),
            seg.row_number,
            seg.time_range.in_tc,
            seg.time_range.out_tc,
            format_duration(seg.time_range.duration_sec),
            truncate_string(meta.winner.as_deref().unwrap_or("-"), 20),
            udm_status_style(seg.udm.status),
            meta.tags.join(", "),
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(sort: &str, order: &str) -> MatrixArgs {
        MatrixArgs {
            status: Some(MatchingStatus::Partial),
            search: "hcl".to_string(),
            sort: sort.to_string(),
            order: order.to_string(),
            expand: Vec::new(),
            json: false,
        }
    }

    #[test]
    fn test_filter_spec_from_args() {
        let spec = args("segment_count", "DESC").filter_spec().unwrap();
        assert_eq!(spec.status, StatusFilter::Only(MatchingStatus::Partial));
        assert_eq!(spec.search_query, "hcl");
        assert_eq!(spec.sort_by, Some(SortKey::SegmentCount));
        assert_eq!(spec.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_unknown_sort_key_keeps_order() {
        let spec = args("udm_count", "asc").filter_spec().unwrap();
        assert_eq!(spec.sort_by, None);
        assert!(args("file_name", "sideways").filter_spec().is_err());
    }
}
