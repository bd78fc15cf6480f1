//! Configuration management commands.

use console::style;

use udm_dash::config::{Config, Settings};

use crate::cli::icons::arrow;

/// Print the resolved settings and the config file they came from.
pub fn cmd_config_show(settings: &Settings, config: &Config) -> anyhow::Result<()> {
    let source = config
        .source_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "none (defaults and environment)".to_string());

    println!("{}", style("Resolved settings").bold());
    println!("  {} Config file: {}", arrow(), source);
    println!();
    println!("{}", toml::to_string_pretty(settings)?);

    Ok(())
}
