//! Config command handlers

use crate::cli::ConfigInitArgs;
use std::fs;

const EXAMPLE_CONFIG: &str = include_str!("../../tickwatch.example.toml");

/// Handle `tickwatch config init`
///
/// Returns the message to print on success.
pub fn handle_config_init(args: &ConfigInitArgs) -> Result<String, Box<dyn std::error::Error>> {
    if args.output.exists() && !args.force {
        return Err(format!(
            "File already exists: {}. Use --force to overwrite.",
            args.output.display()
        )
        .into());
    }

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&args.output, EXAMPLE_CONFIG)?;
    tracing::debug!(path = %args.output.display(), "Wrote example configuration");

    Ok(format!(
        "✓ Configuration file created: {}\n  Point [server] url at your dashboard backend.",
        args.output.display()
    ))
}
