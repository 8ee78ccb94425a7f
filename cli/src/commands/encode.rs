use anyhow::{Context, Result};
use colored::Colorize;
use conjure_engine::{encode, EncodedArtifact, EncodingMode, EncodingRequest};
use serde::Serialize;

use crate::config::{rng_for, ConjureConfig};
use crate::ui;

/// Options for `conjure encode`, already resolved against the config file.
pub struct EncodeOptions<'a> {
    pub literal: &'a str,
    pub mode: Option<&'a str>,
    pub seed: Option<&'a str>,
    pub hex: bool,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct EncodeReport<'a> {
    mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    auxiliary: Option<u8>,
    bytes: &'a [u8],
    #[serde(skip_serializing_if = "Option::is_none")]
    hex: Option<String>,
    reconstruction: String,
    round_trip: bool,
}

pub fn run(config_path: &str, options: EncodeOptions<'_>) -> Result<()> {
    let config = ConjureConfig::load_or_default(config_path)?;

    let mode = match options.mode {
        Some(name) => resolve_mode(name, options.json),
        None => config.mode(),
    };
    let seed = options.seed.or(config.encode.seed.as_deref());
    tracing::info!(%mode, seeded = seed.is_some(), "encoding literal");

    let request = EncodingRequest::new(options.literal, mode);
    let artifact = encode(&request, &mut rng_for(seed));
    let round_trip = verify(&artifact, options.literal)?;

    if options.json {
        let report = EncodeReport {
            mode: artifact.mode().as_str(),
            auxiliary: artifact.auxiliary(),
            bytes: artifact.bytes(),
            hex: options.hex.then(|| hex::encode(artifact.bytes())),
            reconstruction: artifact.reconstruction().to_string(),
            round_trip,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_artifact(&artifact, options.hex);
    Ok(())
}

fn resolve_mode(name: &str, quiet: bool) -> EncodingMode {
    let mode = EncodingMode::from_name(name);
    if EncodingMode::parse_name(name).is_none() && !quiet {
        ui::print_warning(&format!("Unknown mode `{}`, using {}", name, mode));
    }
    mode
}

/// Decode in-process and compare against the input. A mismatch is a bug in
/// the engine, so it is reported as an error rather than a warning.
fn verify(artifact: &EncodedArtifact, literal: &str) -> Result<bool> {
    let decoded = artifact
        .decode()
        .context("Encoded bytes could not be decoded")?;
    if decoded != literal {
        anyhow::bail!(
            "Round-trip mismatch in {} mode: decoded {} bytes, expected {}",
            artifact.mode(),
            decoded.len(),
            literal.len()
        );
    }
    Ok(true)
}

fn print_artifact(artifact: &EncodedArtifact, as_hex: bool) {
    ui::print_section("Encoded literal");
    ui::print_field("Mode", artifact.mode().as_str());
    match (artifact.mode(), artifact.auxiliary()) {
        (EncodingMode::Xor, Some(key)) => ui::print_field("Key", &key.to_string()),
        (EncodingMode::BitShift, Some(shift)) => ui::print_field("Shift", &shift.to_string()),
        _ => {}
    }
    ui::print_field("Length", &artifact.bytes().len().to_string());
    println!(
        "  {} Bytes: [{}]",
        ui::symbols::BULLET.dimmed(),
        ui::format_bytes(artifact.bytes(), as_hex)
    );
    println!();
    println!("{}", "Reconstruction:".bold());
    println!("  {}", artifact.reconstruction().to_string().cyan());
    println!();
    ui::print_success("Round-trip verified");
}
