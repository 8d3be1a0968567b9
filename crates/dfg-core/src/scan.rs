//! Module discovery.
//!
//! Walks the modules root and records every directory it traverses, in
//! pre-order. Directly under the root only numbered category directories
//! (`001_base`) are considered; below that every non-hidden directory is. A
//! directory that contains [`SENTINEL_FILE`] is a module: it is recorded as
//! terminal and nothing beneath it is visited.

use crate::error::{DfgError, Result};
use crate::paths::{self, SENTINEL_FILE, TERMINAL_MARKER};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ScanNode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanNode {
    /// Path relative to the modules root, one entry per directory.
    pub segments: Vec<String>,
    /// True when the directory itself contains the sentinel file.
    pub terminal: bool,
}

impl ScanNode {
    pub fn new(segments: Vec<String>, terminal: bool) -> Self {
        Self { segments, terminal }
    }

    /// Build a node from a `/`-separated path; a trailing [`TERMINAL_MARKER`]
    /// marks it terminal (`"001_a/modEND"`).
    #[cfg(test)]
    pub(crate) fn parse(encoded: &str) -> Self {
        let (path, terminal) = match encoded.strip_suffix(TERMINAL_MARKER) {
            Some(stripped) => (stripped, true),
            None => (encoded, false),
        };
        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self { segments, terminal }
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// The path as submitted back by the selection form: terminal nodes carry
    /// the marker suffix.
    pub fn encoded(&self) -> String {
        let mut out = self.path();
        if self.terminal {
            out.push_str(TERMINAL_MARKER);
        }
        out
    }

    /// Last segment, the directory's own name.
    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    /// The top-level directory this node lives under.
    pub fn top_level(&self) -> &str {
        self.segments.first().map(String::as_str).unwrap_or("")
    }

    /// (category, subcategory) tokens of the top-level directory.
    pub fn tokens(&self) -> (&str, &str) {
        paths::split_category(self.top_level())
    }
}

// ---------------------------------------------------------------------------
// DiscoverySequence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscoverySequence {
    nodes: Vec<ScanNode>,
}

impl DiscoverySequence {
    pub fn nodes(&self) -> &[ScanNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn modules(&self) -> impl Iterator<Item = &ScanNode> {
        self.nodes.iter().filter(|n| n.terminal)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScanNode> {
        self.nodes.iter()
    }
}

impl From<Vec<ScanNode>> for DiscoverySequence {
    fn from(nodes: Vec<ScanNode>) -> Self {
        Self { nodes }
    }
}

impl FromIterator<ScanNode> for DiscoverySequence {
    fn from_iter<I: IntoIterator<Item = ScanNode>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DiscoverySequence {
    type Item = &'a ScanNode;
    type IntoIter = std::slice::Iter<'a, ScanNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

/// What a single directory turned out to be.
enum Visit {
    /// Contains the sentinel; not descended into.
    Module,
    /// Ordinary directory, with everything discovered beneath it.
    Tree(Vec<ScanNode>),
}

/// Discover the module hierarchy under `root`.
pub fn scan(root: &Path) -> Result<DiscoverySequence> {
    match visit(root, &[], 0)? {
        Visit::Tree(nodes) => {
            tracing::debug!(
                root = %root.display(),
                nodes = nodes.len(),
                "module scan complete"
            );
            Ok(nodes.into())
        }
        Visit::Module => {
            tracing::debug!(root = %root.display(), "sentinel in scan root, nothing to discover");
            Ok(DiscoverySequence::default())
        }
    }
}

fn visit(root: &Path, rel: &[String], depth: usize) -> Result<Visit> {
    let dir = rel.iter().fold(root.to_path_buf(), |p, s| p.join(s));
    let entries = list_dir(&dir)?;

    if entries.iter().any(|name| name == SENTINEL_FILE) {
        return Ok(Visit::Module);
    }

    let mut nodes = Vec::new();
    for name in entries {
        let full = dir.join(&name);
        let meta = std::fs::metadata(&full).map_err(|e| DfgError::filesystem(&full, e))?;
        if !meta.is_dir() {
            continue;
        }
        let eligible = if depth == 0 {
            paths::is_category_dir(&name)
        } else {
            paths::is_visible_dir(&name)
        };
        if !eligible {
            tracing::debug!(path = %full.display(), "skipping directory");
            continue;
        }

        let mut child = rel.to_vec();
        child.push(name);
        match visit(root, &child, depth + 1)? {
            Visit::Module => nodes.push(ScanNode::new(child, true)),
            Visit::Tree(below) => {
                nodes.push(ScanNode::new(child, false));
                nodes.extend(below);
            }
        }
    }
    Ok(Visit::Tree(nodes))
}

/// Entry names of `dir`, sorted so sibling order is stable across platforms.
///
/// A directory whose name is not UTF-8 is an error; other non-UTF-8 entries
/// are skipped.
fn list_dir(dir: &Path) -> Result<Vec<String>> {
    let reader = std::fs::read_dir(dir).map_err(|e| DfgError::filesystem(dir, e))?;
    let mut names = Vec::new();
    for entry in reader {
        let entry = entry.map_err(|e| DfgError::filesystem(dir, e))?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => {
                let full = entry.path();
                let meta =
                    std::fs::metadata(&full).map_err(|e| DfgError::filesystem(&full, e))?;
                if meta.is_dir() {
                    return Err(DfgError::filesystem(
                        &full,
                        std::io::Error::new(
                            std::io::ErrorKind::InvalidData,
                            "directory name is not valid UTF-8",
                        ),
                    ));
                }
                tracing::debug!(dir = %dir.display(), name = ?raw, "skipping non-UTF-8 file");
            }
        }
    }
    names.sort();
    Ok(names)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
