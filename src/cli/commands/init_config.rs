//! Write the default configuration.

use analytics_config::default_config_toml;
use anyhow::{bail, Context, Result};
use tracing::info;

use crate::cli::InitConfigArgs;

pub async fn run(args: InitConfigArgs) -> Result<()> {
    let content = default_config_toml().context("Failed to render default configuration")?;

    let Some(path) = args.output else {
        print!("{}", content);
        return Ok(());
    };

    if path.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Default configuration written to {:?}", path);

    Ok(())
}
