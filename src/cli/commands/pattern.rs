//! File-name pattern diagnostics commands.

use anyhow::Context;
use console::style;
use serde_json::Value;

use udm_dash::models::{ExtractedFields, PatternTestRequest};
use udm_dash::ApiClient;

use crate::cli::helpers::{format_number, text_bar, truncate_string};
use crate::cli::icons::{arrow, error, success, warning};

pub async fn cmd_stats(api: &ApiClient) -> anyhow::Result<()> {
    let stats = api
        .pattern_stats()
        .await
        .context("Failed to fetch pattern stats")?;

    println!();
    println!("{}", style("PATTERN MATCHING").cyan().bold());
    println!("  {:<18} {:>10}", "Total files:", format_number(stats.total_files));
    println!("  {:<18} {:>10}", "Matched:", format_number(stats.matched_files));
    println!("  {:<18} {:>10}", "Unmatched:", format_number(stats.unmatched_files));
    println!("  {:<18} {:>10}", "Patterns:", format_number(stats.total_patterns));
    println!(
        "  {:<18} {:>9.1}%  {}",
        "Match rate:",
        stats.match_rate,
        text_bar(stats.match_rate.clamp(0.0, 100.0).round() as u16, 20)
    );
    println!("  {:<18} {:>10.2}", "Avg confidence:", stats.avg_confidence);

    Ok(())
}

pub async fn cmd_list(api: &ApiClient, limit: Option<u32>, offset: Option<u32>) -> anyhow::Result<()> {
    let list = api
        .pattern_list(limit, offset)
        .await
        .context("Failed to fetch pattern list")?;

    println!();
    println!(
        "{:<24} {:<14} {:>8}  {}",
        style("PATTERN").bold(),
        style("CATEGORY").bold(),
        style("MATCHES").bold(),
        style("REGEX").bold()
    );
    for p in &list.patterns {
        println!(
            "{:<24} {:<14} {:>8}  {}",
            truncate_string(&p.name, 24),
            truncate_string(&p.category, 14),
            format_number(p.match_count),
            style(truncate_string(&p.regex, 60)).dim()
        );
        for example in p.example_files.iter().take(3) {
            println!("    {} {}", arrow(), example);
        }
    }
    println!("{} of {} patterns", list.patterns.len(), list.total);

    Ok(())
}

pub async fn cmd_unmatched(
    api: &ApiClient,
    limit: Option<u32>,
    offset: Option<u32>,
) -> anyhow::Result<()> {
    let unmatched = api
        .unmatched_files(limit, offset)
        .await
        .context("Failed to fetch unmatched files")?;

    println!();
    println!(
        "{} {} files ({:.1}%)",
        style("UNMATCHED").cyan().bold(),
        format_number(unmatched.total_unmatched),
        unmatched.percentage
    );
    for (category, count) in &unmatched.categories {
        println!("  {:<20} {:>8}", category, format_number(*count));
    }
    println!("{}", "─".repeat(90));
    for f in &unmatched.files {
        println!(
            "{:<50} {:<20} {}",
            truncate_string(&f.file_name, 50),
            truncate_string(&f.reason, 20),
            style(f.suggested_category.as_deref().unwrap_or("")).dim()
        );
    }

    Ok(())
}

fn print_fields(fields: &ExtractedFields) {
    for (key, value) in fields {
        let shown = match value {
            Value::String(s) => s.clone(),
            Value::Null => "-".to_string(),
            other => other.to_string(),
        };
        println!("    {:<18} {}", key, shown);
    }
}

pub async fn cmd_match(api: &ApiClient, file_name: &str) -> anyhow::Result<()> {
    let detail = api
        .file_pattern_match(file_name)
        .await
        .with_context(|| format!("Failed to fetch pattern match for '{}'", file_name))?;

    if detail.matched {
        println!(
            "{} {} matched {} (confidence {:.2})",
            success(),
            detail.file_name,
            style(detail.pattern_name.as_deref().unwrap_or("?")).bold(),
            detail.confidence
        );
        print_fields(&detail.extracted_fields);
    } else {
        println!("{} {} matched no pattern", warning(), detail.file_name);
    }

    Ok(())
}

pub async fn cmd_test(
    api: &ApiClient,
    file_name: String,
    regex: Option<String>,
) -> anyhow::Result<()> {
    let request = PatternTestRequest { file_name, regex };
    let response = api
        .test_pattern(&request)
        .await
        .context("Pattern test request failed")?;

    if !response.success {
        anyhow::bail!(
            "Pattern test failed: {}",
            response.error.as_deref().unwrap_or("unknown error")
        );
    }

    if response.matched {
        println!(
            "{} matched {}",
            success(),
            style(response.pattern_name.as_deref().unwrap_or("?")).bold()
        );
        print_fields(&response.extracted_groups);
    } else {
        println!("{} no match for {}", error(), request.file_name);
    }

    Ok(())
}

pub async fn cmd_refresh(api: &ApiClient) -> anyhow::Result<()> {
    let result = api
        .refresh_patterns()
        .await
        .context("Failed to refresh pattern cache")?;
    println!("{} {}", success(), result.status);
    if !result.message.is_empty() {
        println!("  {} {}", arrow(), result.message);
    }
    Ok(())
}
