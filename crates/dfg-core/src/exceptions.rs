//! The exceptions table: `key=value` records separated by `#`, loaded as-is
//! for the selection page. Line breaks inside the file carry no meaning.

use crate::error::Result;
use std::collections::BTreeMap;
use std::path::Path;

pub type Exceptions = BTreeMap<String, String>;

pub fn parse(text: &str) -> Exceptions {
    let flat: String = text.chars().filter(|c| !matches!(c, '\n' | '\r')).collect();
    flat.split('#')
        .filter(|record| !record.is_empty())
        .map(|record| match record.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (record.to_string(), String::new()),
        })
        .collect()
}

pub fn load(path: &Path) -> Result<Exceptions> {
    let text = crate::io::read_text(path)?;
    let table = parse(&text);
    tracing::debug!(path = %path.display(), entries = table.len(), "loaded exceptions");
    Ok(table)
}
