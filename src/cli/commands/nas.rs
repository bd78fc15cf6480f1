//! NAS folder, file and scan commands.

use anyhow::Context;
use console::style;

use udm_dash::models::ScanMode;
use udm_dash::ApiClient;

use crate::cli::helpers::{format_number, truncate_string};
use crate::cli::icons::{arrow, error, success};
use crate::cli::progress::with_spinner;

/// Print the folder tree with per-folder aggregated file counts.
pub async fn cmd_folders(api: &ApiClient, max_depth: usize) -> anyhow::Result<()> {
    let root = api
        .nas_folders()
        .await
        .context("Failed to fetch NAS folder tree")?;

    println!();
    for (depth, folder) in root.walk() {
        if max_depth > 0 && depth > max_depth {
            continue;
        }
        let indent = "  ".repeat(depth);
        let name = if folder.name.is_empty() {
            folder.path.as_str()
        } else {
            folder.name.as_str()
        };
        println!(
            "{}{:<width$} {:>10}",
            indent,
            truncate_string(name, 48usize.saturating_sub(indent.len()).max(8)),
            format_number(folder.total_files()),
            width = 48usize.saturating_sub(indent.len()),
        );
    }
    println!("{}", "─".repeat(60));
    println!(
        "{} files in {} folders",
        style(format_number(root.total_files())).bold(),
        format_number(root.total_folders() as u64)
    );

    Ok(())
}

pub async fn cmd_files(api: &ApiClient, path: &str) -> anyhow::Result<()> {
    let list = api
        .nas_files(path)
        .await
        .with_context(|| format!("Failed to list files in '{}'", path))?;

    println!();
    println!(
        "{} ({} files)",
        style(&list.path).bold(),
        format_number(list.total)
    );
    println!("{}", "─".repeat(90));
    for file in &list.files {
        let meta = if file.has_metadata {
            style("metadata").green()
        } else {
            style("no metadata").dim()
        };
        println!(
            "{:<50} {:>10.1} MB  {:<20} {}",
            truncate_string(&file.name, 50),
            file.size_mb,
            truncate_string(&file.modified_at, 20),
            meta,
        );
    }

    Ok(())
}

pub async fn cmd_scan_status(api: &ApiClient) -> anyhow::Result<()> {
    let status = api
        .scan_status()
        .await
        .context("Failed to fetch NAS scan status")?;

    println!();
    println!("{}", style("NAS SCAN").cyan().bold());
    println!("  {:<16} {}", "NAS path:", status.nas_path);
    println!(
        "  {:<16} {}",
        "Accessible:",
        if status.nas_accessible {
            success()
        } else {
            error()
        }
    );
    println!(
        "  {:<16} {}",
        "Last scan:",
        status.last_scan.as_deref().unwrap_or("never")
    );
    println!(
        "  {:<16} {} ({})",
        "Cached files:",
        format_number(status.cached_files),
        if status.is_cached { "cached" } else { "not cached" }
    );

    Ok(())
}

pub async fn cmd_refresh(api: &ApiClient, mode: ScanMode) -> anyhow::Result<()> {
    let result = with_spinner(
        &format!("Running {} NAS scan", mode.as_str()),
        api.refresh_nas(mode),
    )
    .await
    .context("NAS rescan failed")?;

    println!(
        "{} Scanned {} files ({:.1} GB) in {:.1}s",
        success(),
        format_number(result.total_files),
        result.total_size_gb,
        result.scan_duration_sec
    );
    if result.mode == ScanMode::Incremental {
        println!(
            "  {} {} new, {} modified",
            arrow(),
            format_number(result.new_files),
            format_number(result.modified_files)
        );
    }
    if !result.message.is_empty() {
        println!("  {} {}", arrow(), result.message);
    }

    let mut brands: Vec<(&String, &u64)> = result.brand_counts.iter().collect();
    brands.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (brand, count) in brands {
        println!("    {:<16} {:>8}", brand, format_number(*count));
    }

    Ok(())
}
