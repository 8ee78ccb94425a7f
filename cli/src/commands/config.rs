use anyhow::{Context, Result};
use colored::Colorize;
use conjure_engine::EncodingMode;
use std::path::Path;

use crate::config::ConjureConfig;
use crate::ui;

pub fn init(config_path: &str) -> Result<()> {
    let path = Path::new(config_path);

    if path.exists() {
        anyhow::bail!(
            "Configuration file already exists: {}\nUse a different path or remove the existing file.",
            path.display()
        );
    }

    ConjureConfig::default().save(path)?;
    tracing::info!(path = %path.display(), "wrote default configuration");

    ui::print_success(&format!("Created {}", path.display()));
    println!();
    println!("{}", "Next steps:".bold());
    println!("  1. Pick a default mode under [encode]: {}", mode_names().cyan());
    println!("  2. Try it: {}", "conjure encode \"my secret\"".cyan());
    Ok(())
}

pub fn validate(config_path: &str) -> Result<()> {
    ui::print_step("Validating configuration...");

    let config = ConjureConfig::load(config_path).context(
        "Failed to load configuration. Run `conjure init` to create a configuration file.",
    )?;

    ui::print_success("Configuration is valid!");
    println!();
    ui::print_field("Mode", config.mode().as_str());
    if !config.mode_is_known() {
        ui::print_warning(&format!(
            "Unknown mode `{}` falls back to {}; expected one of: {}",
            config.encode.mode,
            EncodingMode::Base64,
            mode_names()
        ));
    }

    match &config.encode.seed {
        Some(_) => ui::print_field("Seed", "set (keys are reproducible)"),
        None => ui::print_info("No seed: keys are drawn fresh on every run"),
    }

    Ok(())
}

fn mode_names() -> String {
    EncodingMode::ALL
        .iter()
        .map(|mode| mode.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
