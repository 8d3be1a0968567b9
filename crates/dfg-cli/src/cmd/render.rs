use anyhow::Context;
use dfg_core::{layout, scan};
use std::path::{Path, PathBuf};

pub fn run(config_path: &Path, root: Option<PathBuf>, page: bool) -> anyhow::Result<()> {
    let config = super::load_config(config_path, root)?;

    let html = if page {
        dfg_server::page::render_page(&config).context("failed to render page")?
    } else {
        let sequence = scan::scan(&config.modules_root)
            .with_context(|| format!("failed to scan {}", config.modules_root.display()))?;
        layout::render(&sequence)?.to_html()
    };

    println!("{html}");
    Ok(())
}
