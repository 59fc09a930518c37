use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use srcaudit_core::config::{render_config, VerifierConfig};

/// Write the default verifier config to `path` (JSON or YAML by extension).
pub fn init_config_command(path: &str, force: bool) -> Result<()> {
    let config_path = Path::new(path);
    if config_path.exists() && !force {
        return Err(anyhow!(
            "Config already exists at {} (use --force to overwrite)",
            config_path.display()
        ));
    }
    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
    }

    let config = VerifierConfig::default();
    let body = render_config(&config, config_path)?;
    fs::write(config_path, body)
        .with_context(|| format!("Failed to write config: {}", config_path.display()))?;

    println!("Wrote verifier config:");
    println!("  Path: {}", config_path.display());
    println!("  Excluded roots: {}", config.excluded_roots.join(", "));
    println!("  Strip prefixes: {}", config.strip_prefixes.join(", "));
    println!("  Fortify marker: {}", config.fortify_marker);
    Ok(())
}
