use crate::output::{print_json, print_table};
use anyhow::Context;
use dfg_core::scan;
use std::path::{Path, PathBuf};

pub fn run(config_path: &Path, root: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(config_path, root)?;
    let sequence = scan::scan(&config.modules_root)
        .with_context(|| format!("failed to scan {}", config.modules_root.display()))?;

    if json {
        return print_json(&sequence);
    }

    if sequence.is_empty() {
        println!("No modules under {}.", config.modules_root.display());
        return Ok(());
    }

    let rows = sequence
        .iter()
        .map(|node| {
            vec![
                node.depth().to_string(),
                if node.terminal { "module" } else { "group" }.to_string(),
                node.path(),
            ]
        })
        .collect();
    print_table(&["DEPTH", "KIND", "PATH"], rows);
    Ok(())
}
