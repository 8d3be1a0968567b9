use anyhow::Context;
use dfg_core::config::Config;
use dfg_core::io;
use std::path::{Path, PathBuf};

pub fn run(config_path: &Path, modules_root: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = Config::default();
    if let Some(root) = modules_root {
        config.modules_root = root;
    }

    let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
    let created = io::write_if_missing(config_path, yaml.as_bytes())
        .with_context(|| format!("failed to write {}", config_path.display()))?;

    if !created {
        println!("  exists:  {}", config_path.display());
        return Ok(());
    }
    println!("  created: {}", config_path.display());

    for w in config.validate() {
        println!("  note: {}", w.message);
    }
    Ok(())
}
