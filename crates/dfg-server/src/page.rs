//! Assembly of the selection page: start template, exceptions table, module
//! markup, end template.

use crate::embed;
use dfg_core::config::Config;
use dfg_core::exceptions::{self, Exceptions};
use dfg_core::{layout, scan, Result};
use std::path::Path;

pub fn render_page(config: &Config) -> Result<String> {
    let start = template(config.templates.start.as_deref(), "start.html")?;
    let end = template(config.templates.end.as_deref(), "end.html")?;
    let script = exceptions_script(&load_exceptions(config)?)?;

    let sequence = scan::scan(&config.modules_root)?;
    let markup = layout::render(&sequence)?;
    tracing::debug!(
        nodes = sequence.len(),
        modules = sequence.modules().count(),
        options = markup.options().count(),
        "rendered selection page"
    );

    Ok(format!("{start}{script}{markup}{end}"))
}

fn template(path: Option<&Path>, builtin: &str) -> Result<String> {
    match path {
        Some(p) => dfg_core::io::read_text(p),
        None => Ok(embed::text(builtin).unwrap_or_default()),
    }
}

fn load_exceptions(config: &Config) -> Result<Exceptions> {
    match &config.exceptions_path {
        Some(path) if path.exists() => exceptions::load(path),
        Some(path) => {
            tracing::warn!(path = %path.display(), "exceptions file not found, using empty table");
            Ok(Exceptions::new())
        }
        None => Ok(Exceptions::new()),
    }
}

/// The exceptions table as a client-side `exceptionstruct` object.
pub fn exceptions_script(table: &Exceptions) -> Result<String> {
    let json = serde_json::to_string(table)?.replace("</", "<\\/");
    Ok(format!("<script> var exceptionstruct = {json}; </script>"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn module(root: &Path, rel: &str) {
        let dir = root.join(rel);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(dfg_core::paths::SENTINEL_FILE), "").unwrap();
    }

    #[test]
    fn script_embeds_table_as_json() {
        let table = exceptions::parse("001_a=002_b");
        let script = exceptions_script(&table).unwrap();
        assert_eq!(
            script,
            "<script> var exceptionstruct = {\"001_a\":\"002_b\"}; </script>"
        );
    }

    #[test]
    fn script_cannot_close_its_own_tag() {
        let table = exceptions::parse("k=</script><b>");
        let script = exceptions_script(&table).unwrap();
        assert_eq!(script.matches("</script>").count(), 1);
    }

    #[test]
    fn page_wraps_markup_in_builtin_templates() {
        let dir = TempDir::new().unwrap();
        module(dir.path(), "001_build");
        let config = Config {
            modules_root: dir.path().to_path_buf(),
            ..Config::default()
        };

        let page = render_page(&config).unwrap();
        assert!(page.starts_with("<!doctype html>"));
        assert!(page.contains("var exceptionstruct = {}"));
        assert!(page.contains("value='001_buildEND'"));
        assert!(page.trim_end().ends_with("</html>"));
    }

    #[test]
    fn configured_templates_and_exceptions_are_used() {
        let dir = TempDir::new().unwrap();
        let modules = dir.path().join("modules");
        module(&modules, "001_a");
        std::fs::write(dir.path().join("start.html"), "<start>").unwrap();
        std::fs::write(dir.path().join("end.html"), "<end>").unwrap();
        std::fs::write(dir.path().join("exceptions.txt"), "001_a=x\n").unwrap();

        let mut config = Config {
            modules_root: modules,
            exceptions_path: Some(dir.path().join("exceptions.txt")),
            ..Config::default()
        };
        config.templates.start = Some(dir.path().join("start.html"));
        config.templates.end = Some(dir.path().join("end.html"));

        let page = render_page(&config).unwrap();
        assert!(page.starts_with("<start><script> var exceptionstruct = {\"001_a\":\"x\"};"));
        assert!(page.ends_with("<end>"));
    }

    #[test]
    fn missing_exceptions_file_is_tolerated() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            modules_root: dir.path().to_path_buf(),
            exceptions_path: Some(dir.path().join("absent.txt")),
            ..Config::default()
        };
        let page = render_page(&config).unwrap();
        assert!(page.contains("var exceptionstruct = {}"));
    }

    #[test]
    fn missing_modules_root_fails() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            modules_root: dir.path().join("nope"),
            ..Config::default()
        };
        assert!(render_page(&config).is_err());
    }
}
