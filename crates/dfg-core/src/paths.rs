use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Naming conventions
// ---------------------------------------------------------------------------

/// A directory containing this file is a module: scanning stops there.
pub const SENTINEL_FILE: &str = "runMe.sh";

/// Appended to the encoded path of a terminal node, stripped again on decode.
pub const TERMINAL_MARKER: &str = "END";

/// Separates the category token from the subcategory in a top-level name.
pub const CATEGORY_SEPARATOR: char = '_';

pub const CONFIG_FILE: &str = "dfg.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}

/// First `/`-separated segment of a selection path (`"abc/x"` -> `"abc"`).
///
/// Returns `None` when the path starts with a separator or is empty.
pub fn leading_segment(path: &str) -> Option<&str> {
    path.split('/').next().filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Top-level directory naming
// ---------------------------------------------------------------------------

static CATEGORY_DIR_RE: OnceLock<Regex> = OnceLock::new();

fn category_dir_re() -> &'static Regex {
    CATEGORY_DIR_RE.get_or_init(|| Regex::new(r"^[0-9]{1,3}_.*").unwrap())
}

/// Whether `name` may appear directly under the modules root (`001_base`, `2_merge`).
pub fn is_category_dir(name: &str) -> bool {
    category_dir_re().is_match(name)
}

/// Whether a directory below the top level is eligible for traversal.
pub fn is_visible_dir(name: &str) -> bool {
    !name.starts_with('.')
}

/// Split a top-level segment into (category, subcategory): `"001_web_app"` ->
/// `("001", "web_app")`.
pub fn split_category(segment: &str) -> (&str, &str) {
    match segment.split_once(CATEGORY_SEPARATOR) {
        Some((category, sub)) => (category, sub),
        None => (segment, ""),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
