//! Turns a flat [`DiscoverySequence`] back into nested selection markup.
//!
//! Nodes sharing a category token (`001` in `001_base`) are wrapped in one
//! category group, nodes sharing the whole top-level name in one subcategory
//! group, and every non-terminal directory opens a content container that
//! holds its descendants. Modules become checkbox options.

use crate::error::{DfgError, Result};
use crate::peek::{self, Window};
use crate::scan::{DiscoverySequence, ScanNode};
use std::fmt;

// ---------------------------------------------------------------------------
// Markup tokens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Category,
    Subcategory,
    /// Container for a non-terminal directory at the given depth.
    Content { depth: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionLeaf {
    /// Module directory name, shown to the user and used as element id.
    pub label: String,
    /// Encoded module path, submitted back when selected.
    pub value: String,
    /// Top-level directory the module belongs to.
    pub group: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    Open(Level),
    Close(Level),
    Title(String),
    Option(OptionLeaf),
    Separator,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NestedMarkup {
    tokens: Vec<Markup>,
}

impl NestedMarkup {
    pub fn tokens(&self) -> &[Markup] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn opens(&self) -> usize {
        self.tokens
            .iter()
            .filter(|t| matches!(t, Markup::Open(_)))
            .count()
    }

    pub fn closes(&self) -> usize {
        self.tokens
            .iter()
            .filter(|t| matches!(t, Markup::Close(_)))
            .count()
    }

    pub fn options(&self) -> impl Iterator<Item = &OptionLeaf> {
        self.tokens.iter().filter_map(|t| match t {
            Markup::Option(leaf) => Some(leaf),
            _ => None,
        })
    }

    pub fn to_html(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for NestedMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            match token {
                Markup::Open(Level::Category) => f.write_str("<span class='container'>")?,
                Markup::Open(Level::Subcategory) => f.write_str("<span class='subcontainer'>")?,
                Markup::Open(Level::Content { depth }) => {
                    write!(f, "<span class='content n{depth}'>")?
                }
                Markup::Close(_) => f.write_str("</span>")?,
                Markup::Title(title) => {
                    write!(f, "<span class='title'>{}</span>", escape(title))?
                }
                Markup::Option(leaf) => {
                    let label = escape(&leaf.label);
                    let group = escape(&leaf.group);
                    write!(
                        f,
                        "<span class='options' id='option{label}'>\
                         <input type='checkbox' id='{label}' onchange='grey(\"{group}\")' \
                         name='checkbox' class='{group}' value='{value}'>{label}</span>",
                        value = escape(&leaf.value),
                    )?
                }
                Markup::Separator => f.write_str("<span class='separator'></span>")?,
            }
        }
        Ok(())
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Nesting state
// ---------------------------------------------------------------------------

/// The levels currently open, innermost last.
#[derive(Debug, Default)]
struct Nesting {
    open: Vec<Level>,
    tokens: Vec<Markup>,
}

impl Nesting {
    fn open(&mut self, level: Level) {
        self.open.push(level);
        self.tokens.push(Markup::Open(level));
    }

    fn pop(&mut self) -> Option<Level> {
        let level = self.open.pop()?;
        self.tokens.push(Markup::Close(level));
        Some(level)
    }

    /// Close every level up to and including the innermost category group.
    fn close_category(&mut self) {
        while let Some(level) = self.pop() {
            if level == Level::Category {
                break;
            }
        }
    }

    /// Close every level up to and including the innermost subcategory group,
    /// leaving the category group open.
    fn close_subcategory(&mut self) {
        while let Some(&level) = self.open.last() {
            if level == Level::Category {
                break;
            }
            self.pop();
            if level == Level::Subcategory {
                break;
            }
        }
    }

    /// Close content containers until at most `keep` remain open.
    fn close_content_to(&mut self, keep: usize) {
        while self.content_depth() > keep {
            match self.open.last() {
                Some(Level::Content { .. }) => {
                    self.pop();
                }
                _ => break,
            }
        }
    }

    fn close_all(&mut self) {
        while self.pop().is_some() {}
    }

    fn content_depth(&self) -> usize {
        self.open
            .iter()
            .filter(|l| matches!(l, Level::Content { .. }))
            .count()
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render a discovery sequence as nested selection markup.
///
/// Every level opened is closed again by the end of the output. Fails with
/// [`DfgError::Structure`] when a directory node sits under a top-level name
/// with no category token.
pub fn render(sequence: &DiscoverySequence) -> Result<NestedMarkup> {
    for node in sequence {
        if !node.terminal && node.tokens().0.is_empty() {
            return Err(DfgError::Structure(format!(
                "'{}' has no category token in its top-level name",
                node.path()
            )));
        }
    }

    let mut nesting = Nesting::default();
    for window in peek::windows(sequence.nodes()) {
        open_groups(&mut nesting, &window);
        emit(&mut nesting, window.current);
        close_groups(&mut nesting, &window);
    }

    debug_assert!(nesting.open.is_empty());
    Ok(NestedMarkup {
        tokens: nesting.tokens,
    })
}

fn open_groups(nesting: &mut Nesting, window: &Window<'_, ScanNode>) {
    let (category, sub) = window.current.tokens();
    let prev = window.prev.map(ScanNode::tokens);
    let category_changed = prev.map_or(true, |(c, _)| c != category);
    let sub_changed = prev.map_or(true, |(_, s)| s != sub);

    if category_changed && !category.is_empty() {
        nesting.open(Level::Category);
        nesting.open(Level::Subcategory);
    } else if category_changed || sub_changed {
        nesting.open(Level::Subcategory);
    }
}

fn emit(nesting: &mut Nesting, node: &ScanNode) {
    if node.terminal {
        nesting.tokens.push(Markup::Option(OptionLeaf {
            label: node.name().to_string(),
            value: node.encoded(),
            group: node.top_level().to_string(),
        }));
    } else {
        nesting.open(Level::Content {
            depth: node.depth(),
        });
        nesting.tokens.push(Markup::Title(node.name().to_string()));
    }
}

fn close_groups(nesting: &mut Nesting, window: &Window<'_, ScanNode>) {
    let Some(next) = window.next else {
        nesting.close_all();
        return;
    };
    let (category, sub) = window.current.tokens();
    let (next_category, next_sub) = next.tokens();

    if next_category != category {
        nesting.close_category();
        nesting.tokens.push(Markup::Separator);
    } else if next_sub != sub {
        nesting.close_subcategory();
    } else {
        nesting.close_content_to(next.depth().saturating_sub(1));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::path::Path;
    use tempfile::TempDir;

    fn seq(paths: &[&str]) -> DiscoverySequence {
        paths.iter().map(|p| ScanNode::parse(p)).collect()
    }

    fn option(label: &str, value: &str, group: &str) -> Markup {
        Markup::Option(OptionLeaf {
            label: label.to_string(),
            value: value.to_string(),
            group: group.to_string(),
        })
    }

    fn separators(markup: &NestedMarkup) -> usize {
        markup
            .tokens()
            .iter()
            .filter(|t| **t == Markup::Separator)
            .count()
    }

    #[test]
    fn empty_sequence_renders_nothing() {
        let markup = render(&DiscoverySequence::default()).unwrap();
        assert!(markup.is_empty());
        assert_eq!(markup.to_html(), "");
    }

    #[test]
    fn single_module_has_outer_groups_and_no_separator() {
        let markup = render(&seq(&["001_buildEND"])).unwrap();
        assert_eq!(
            markup.tokens(),
            &[
                Markup::Open(Level::Category),
                Markup::Open(Level::Subcategory),
                option("001_build", "001_buildEND", "001_build"),
                Markup::Close(Level::Subcategory),
                Markup::Close(Level::Category),
            ]
        );
        assert_eq!(separators(&markup), 0);
    }

    #[test]
    fn different_categories_are_separated() {
        let markup = render(&seq(&["001_aEND", "002_bEND"])).unwrap();
        assert_eq!(separators(&markup), 1);
        assert_eq!(markup.opens(), 4);
        assert_eq!(markup.closes(), 4);
        let html = markup.to_html();
        let sep = html.find("separator").unwrap();
        assert!(html.find("value='001_aEND'").unwrap() < sep);
        assert!(html.find("value='002_bEND'").unwrap() > sep);
    }

    #[test]
    fn same_category_different_sub_shares_category_group() {
        let markup = render(&seq(&["001_aEND", "001_bEND"])).unwrap();
        assert_eq!(separators(&markup), 0);
        assert_eq!(
            markup.tokens(),
            &[
                Markup::Open(Level::Category),
                Markup::Open(Level::Subcategory),
                option("001_a", "001_aEND", "001_a"),
                Markup::Close(Level::Subcategory),
                Markup::Open(Level::Subcategory),
                option("001_b", "001_bEND", "001_b"),
                Markup::Close(Level::Subcategory),
                Markup::Close(Level::Category),
            ]
        );
    }

    #[test]
    fn directories_nest_their_modules() {
        let markup = render(&seq(&[
            "001_base",
            "001_base/alpineEND",
            "001_base/debian",
            "001_base/debian/bookwormEND",
            "001_base/debian/trixieEND",
            "001_base/ubuntuEND",
        ]))
        .unwrap();
        assert_eq!(
            markup.tokens(),
            &[
                Markup::Open(Level::Category),
                Markup::Open(Level::Subcategory),
                Markup::Open(Level::Content { depth: 1 }),
                Markup::Title("001_base".to_string()),
                option("alpine", "001_base/alpineEND", "001_base"),
                Markup::Open(Level::Content { depth: 2 }),
                Markup::Title("debian".to_string()),
                option("bookworm", "001_base/debian/bookwormEND", "001_base"),
                option("trixie", "001_base/debian/trixieEND", "001_base"),
                Markup::Close(Level::Content { depth: 2 }),
                option("ubuntu", "001_base/ubuntuEND", "001_base"),
                Markup::Close(Level::Content { depth: 1 }),
                Markup::Close(Level::Subcategory),
                Markup::Close(Level::Category),
            ]
        );
    }

    #[test]
    fn category_change_closes_open_content() {
        let markup = render(&seq(&[
            "001_base",
            "001_base/deep",
            "001_base/deep/modEND",
            "101_merge",
            "101_merge/allEND",
        ]))
        .unwrap();
        assert_eq!(separators(&markup), 1);
        assert_eq!(markup.opens(), markup.closes());
        let sep = markup
            .tokens()
            .iter()
            .position(|t| *t == Markup::Separator)
            .unwrap();
        let before = &markup.tokens()[..sep];
        let opens = before.iter().filter(|t| matches!(t, Markup::Open(_))).count();
        let closes = before.iter().filter(|t| matches!(t, Markup::Close(_))).count();
        assert_eq!(opens, closes, "first category fully closed before separator");
    }

    #[test]
    fn empty_directories_stay_balanced() {
        let markup = render(&seq(&[
            "001_a",
            "001_a/empty",
            "001_a/other",
            "001_a/other/modEND",
            "002_b",
        ]))
        .unwrap();
        assert_eq!(markup.opens(), markup.closes());
    }

    #[test]
    fn balanced_for_assorted_sequences() {
        let cases: &[&[&str]] = &[
            &["001_aEND"],
            &["001_a", "001_a/xEND", "001_a/yEND"],
            &["001_a", "001_a/b", "001_a/b/c", "001_a/b/c/dEND", "001_a/eEND"],
            &["001_aEND", "001_bEND", "002_cEND", "002_c_dEND"],
            &["0_x", "0_x/yEND", "1_z", "1_z/w", "1_z/w/vEND", "1_z/uEND", "3_tEND"],
            &["001_a", "001_a/b", "001_a/b/cEND", "001_other", "001_other/dEND"],
            &["_loneEND", "001_aEND"],
        ];
        for case in cases {
            let markup = render(&seq(case)).unwrap();
            assert_eq!(markup.opens(), markup.closes(), "unbalanced: {case:?}");
        }
    }

    fn grow(rng: &mut StdRng, dir: &Path, depth: usize) {
        if rng.gen_bool(0.35) {
            std::fs::write(dir.join(crate::paths::SENTINEL_FILE), "").unwrap();
            return;
        }
        if depth >= 4 {
            return;
        }
        for i in 0..rng.gen_range(0..4) {
            let name = if rng.gen_bool(0.1) {
                format!(".hidden{i}")
            } else {
                format!("d{i}")
            };
            let child = dir.join(name);
            std::fs::create_dir_all(&child).unwrap();
            grow(rng, &child, depth + 1);
        }
    }

    #[test]
    fn balanced_for_generated_trees() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for round in 0..200 {
            let dir = TempDir::new().unwrap();
            for _ in 0..rng.gen_range(1..5) {
                let name = match rng.gen_range(0..8) {
                    0 => "notes".to_string(),
                    n => format!("{:03}_{}", n % 3, ["a", "b", "c"][rng.gen_range(0..3)]),
                };
                let top = dir.path().join(name);
                std::fs::create_dir_all(&top).unwrap();
                grow(&mut rng, &top, 1);
            }

            let sequence = crate::scan::scan(dir.path()).unwrap();
            let markup = render(&sequence).unwrap();

            let mut depth = 0usize;
            for token in markup.tokens() {
                match token {
                    Markup::Open(_) => depth += 1,
                    Markup::Close(_) => {
                        depth = depth
                            .checked_sub(1)
                            .unwrap_or_else(|| panic!("close without open in round {round}"));
                    }
                    Markup::Title(_) | Markup::Option(_) => {
                        assert!(depth > 0, "content outside any group in round {round}")
                    }
                    Markup::Separator => {}
                }
            }
            assert_eq!(depth, 0, "unclosed levels in round {round}");
            assert_eq!(markup.opens(), markup.closes());
            assert_eq!(markup.options().count(), sequence.modules().count());
        }
    }

    #[test]
    fn directory_without_category_token_is_structure_error() {
        let err = render(&seq(&["_nameless", "_nameless/modEND"])).unwrap_err();
        assert!(matches!(err, DfgError::Structure(_)));
    }

    #[test]
    fn html_uses_container_classes() {
        let html = render(&seq(&["001_a", "001_a/modEND"])).unwrap().to_html();
        assert_eq!(
            html,
            "<span class='container'><span class='subcontainer'>\
             <span class='content n1'><span class='title'>001_a</span>\
             <span class='options' id='optionmod'><input type='checkbox' id='mod' \
             onchange='grey(\"001_a\")' name='checkbox' class='001_a' value='001_a/modEND'>mod</span>\
             </span></span></span>"
        );
    }

    #[test]
    fn html_escapes_names() {
        let html = render(&seq(&["001_a", "001_a/it'sEND"])).unwrap().to_html();
        assert!(html.contains("id='it&#39;s'"));
        assert!(!html.contains("it's"));
    }
}
