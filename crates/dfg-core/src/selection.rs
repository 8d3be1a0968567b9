//! Decoding of submitted module selections.
//!
//! The selection form posts `name=value` pairs joined by `&`. Each value is an
//! encoded module path (`001_base%2FalpineEND`); its first character is the
//! category index of the pipeline stage the module belongs to.

use crate::error::{DfgError, Result};
use crate::paths::TERMINAL_MARKER;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Category whose selections accumulate instead of replacing each other.
pub const MULTI_SELECT_CATEGORY: u8 = 0;

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Action {
    /// Independent selections of the multi-select category, in submission order.
    Many(Vec<String>),
    /// The one selection of any other category.
    Single(String),
}

impl Action {
    pub fn paths(&self) -> &[String] {
        match self {
            Action::Many(paths) => paths,
            Action::Single(path) => std::slice::from_ref(path),
        }
    }
}

impl fmt::Display for Action {
    /// Pipe-joined form used by the legacy submission log.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.paths().join("|"))
    }
}

// ---------------------------------------------------------------------------
// ActionTable
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActionTable {
    entries: BTreeMap<u8, Action>,
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one decoded selection under the category given by its first
    /// character.
    pub fn insert(&mut self, path: String) -> Result<()> {
        let category = category_of(&path)?;
        if category == MULTI_SELECT_CATEGORY {
            match self.entries.get_mut(&category) {
                Some(Action::Many(paths)) => paths.push(path),
                _ => {
                    self.entries.insert(category, Action::Many(vec![path]));
                }
            }
        } else {
            self.entries.insert(category, Action::Single(path));
        }
        Ok(())
    }

    /// Place `action` under an explicit category, replacing what was there.
    #[cfg(test)]
    pub(crate) fn set(&mut self, category: u8, action: Action) {
        self.entries.insert(category, action);
    }

    pub fn get(&self, category: u8) -> Option<&Action> {
        self.entries.get(&category)
    }

    pub fn entries(&self) -> &BTreeMap<u8, Action> {
        &self.entries
    }

    pub fn categories(&self) -> impl Iterator<Item = u8> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn category_of(path: &str) -> Result<u8> {
    path.chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .map(|d| d as u8)
        .ok_or_else(|| {
            DfgError::Encoding(format!(
                "selection '{path}' does not start with a category digit"
            ))
        })
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode a raw `key=value&key=value` submission body.
///
/// Either every field decodes or the whole submission is rejected.
pub fn decode(raw: &[u8]) -> Result<ActionTable> {
    let body = std::str::from_utf8(raw)
        .map_err(|e| DfgError::Encoding(format!("submission is not UTF-8: {e}")))?;

    let mut table = ActionTable::new();
    if body.is_empty() {
        return Ok(table);
    }

    for field in body.split('&') {
        let Some((_key, value)) = field.split_once('=') else {
            return Err(DfgError::Encoding(format!(
                "field '{field}' has no '=' delimiter"
            )));
        };
        table.insert(normalize(value))?;
    }

    tracing::debug!(categories = table.len(), "decoded selection");
    Ok(table)
}

/// Restore escaped path separators and drop terminal markers.
fn normalize(value: &str) -> String {
    value
        .replace("%2F", "/")
        .replace("%2f", "/")
        .replace(TERMINAL_MARKER, "")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_separators_and_strips_marker() {
        let table = decode(b"checkbox=101_merge%2FdefaultEND").unwrap();
        assert_eq!(
            table.get(1),
            Some(&Action::Single("101_merge/default".to_string()))
        );
    }

    #[test]
    fn lowercase_escape_is_accepted() {
        let table = decode(b"checkbox=2_final%2fxEND").unwrap();
        assert_eq!(table.get(2).unwrap().paths(), ["2_final/x"]);
    }

    #[test]
    fn multi_select_category_accumulates_in_order() {
        let table = decode(b"checkbox=001_a%2FxEND&checkbox=002_b%2FyEND").unwrap();
        assert_eq!(
            table.get(0),
            Some(&Action::Many(vec![
                "001_a/x".to_string(),
                "002_b/y".to_string()
            ]))
        );
        assert_eq!(table.get(0).unwrap().to_string(), "001_a/x|002_b/y");
    }

    #[test]
    fn other_categories_keep_the_later_value() {
        let table = decode(b"checkbox=101_a%2FxEND&checkbox=102_b%2FyEND").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(1), Some(&Action::Single("102_b/y".to_string())));
    }

    #[test]
    fn category_comes_from_value_not_key() {
        let table = decode(b"a=3_clean%2FtmpEND&b=001_x%2FyEND").unwrap();
        assert_eq!(table.categories().collect::<Vec<_>>(), vec![0, 3]);
    }

    #[test]
    fn value_split_on_first_equals_only() {
        let table = decode(b"k=101_a%2Fx=yEND").unwrap();
        assert_eq!(table.get(1).unwrap().paths(), ["101_a/x=y"]);
    }

    #[test]
    fn marker_stripped_anywhere() {
        let table = decode(b"k=101_ENDa%2FxEND").unwrap();
        assert_eq!(table.get(1).unwrap().paths(), ["101_a/x"]);
    }

    #[test]
    fn missing_delimiter_rejects_whole_submission() {
        let err = decode(b"checkbox=001_a%2FxEND&broken").unwrap_err();
        assert!(matches!(err, DfgError::Encoding(_)));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn non_digit_category_is_rejected() {
        assert!(matches!(
            decode(b"checkbox=abc").unwrap_err(),
            DfgError::Encoding(_)
        ));
        assert!(matches!(
            decode(b"checkbox=").unwrap_err(),
            DfgError::Encoding(_)
        ));
    }

    #[test]
    fn non_utf8_is_rejected() {
        assert!(matches!(
            decode(&[b'k', b'=', 0xff]).unwrap_err(),
            DfgError::Encoding(_)
        ));
    }

    #[test]
    fn empty_payload_is_empty_table() {
        assert!(decode(b"").unwrap().is_empty());
    }

    #[test]
    fn decoding_is_idempotent() {
        let raw = b"checkbox=001_a%2FxEND&checkbox=001_b%2FyEND&checkbox=101_m%2FzEND";
        assert_eq!(decode(raw).unwrap(), decode(raw).unwrap());
    }

    #[test]
    fn serializes_as_category_map() {
        let table = decode(b"k=001_a%2FxEND&k=101_m%2FzEND").unwrap();
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["0"], serde_json::json!(["001_a/x"]));
        assert_eq!(json["1"], serde_json::json!("101_m/z"));
    }
}
