pub mod config;
pub mod init;
pub mod plan;
pub mod render;
pub mod scan;
pub mod serve;

use anyhow::Context;
use dfg_core::config::Config;
use std::path::{Path, PathBuf};

/// Load the config at `path`, falling back to defaults when it does not exist,
/// and apply a command-line modules root override.
pub fn load_config(path: &Path, root: Option<PathBuf>) -> anyhow::Result<Config> {
    let mut config = Config::load_or_default(Some(path))
        .with_context(|| format!("failed to load {}", path.display()))?;
    if let Some(root) = root {
        config.modules_root = root;
    }
    Ok(config)
}
