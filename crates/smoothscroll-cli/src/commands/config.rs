use std::path::Path;

use anyhow::{bail, Result};

use smoothscroll_core::AppConfig;

pub fn run(config: &AppConfig, init: bool, force: bool, path_only: bool) -> Result<()> {
    let path = AppConfig::config_path();

    if path_only {
        println!("{}", path.display());
        return Ok(());
    }

    if init {
        write_defaults(config, &path, force)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

/// Write `config` to `path`, refusing to replace an existing file unless forced
fn write_defaults(config: &AppConfig, path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config already exists at {}\nPass --force to overwrite it.",
            path.display()
        );
    }
    config.save_to(path)?;
    Ok(())
}
