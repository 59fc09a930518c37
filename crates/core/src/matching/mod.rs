//! Matchers that decide whether a C source file defines a given function.
//!
//! - `syntax`: tree-sitter based search over the whole file (primary check),
//!   plus the wrapper-marker convention.
//! - `heuristic`: line-oriented checks (fortify marker, opening near the declared line).
//! - `alias`: macro-rename and prefix-stripping conventions.
//!
//! All matchers operate on a `SourceFile`, which holds the fully read contents
//! of one file; no file handle outlives `SourceFile::load`.

use std::io;
use std::path::{Path, PathBuf};

pub mod alias;
pub mod heuristic;
pub mod syntax;

pub use alias::{macro_aliases, strip_known_prefix, AliasResolver, Resolution};
pub use heuristic::{has_fortify_marker, matches_near_line};
pub use syntax::{wrapper_marker_match, DefinitionHit, DefinitionIndex, SyntaxMatcher};

/// In-memory contents of one source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

impl SourceFile {
    /// Read the whole file. Invalid UTF-8 is replaced rather than rejected.
    pub fn load(path: &Path) -> io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        Ok(Self { path: path.to_path_buf(), text })
    }

    /// Build a file from text already in memory.
    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self { path: path.into(), text: text.into() }
    }

    pub fn lines(&self) -> Vec<&str> {
        self.text.lines().collect()
    }
}

pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Byte offsets just past every whole-identifier occurrence of `ident` in `line`.
pub(crate) fn identifier_ends(line: &str, ident: &str) -> Vec<usize> {
    if ident.is_empty() {
        return Vec::new();
    }
    line.match_indices(ident)
        .filter(|(start, _)| {
            let end = start + ident.len();
            let before_ok = line[..*start].chars().next_back().map_or(true, |c| !is_ident_char(c));
            let after_ok = line[end..].chars().next().map_or(true, |c| !is_ident_char(c));
            before_ok && after_ok
        })
        .map(|(start, _)| start + ident.len())
        .collect()
}

/// Whether `ident` occurs in `line` as a whole identifier.
pub(crate) fn contains_identifier(line: &str, ident: &str) -> bool {
    !identifier_ends(line, ident).is_empty()
}
