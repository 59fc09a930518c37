//! Alias resolution: alternate candidate names for a target identifier.
//!
//! Two conventions are recognized, tried in order:
//! 1. Macro renames: `#define ALIAS target` means the definition may be
//!    spelled `ALIAS`.
//! 2. Prefix stripping: relocation and internal-binding prefixes (`rlp_`,
//!    `__GI_`, ...) are removed, one prefix per attempt.
//!
//! The record's own name is never changed; the alias is a working name only.

use log::debug;

use crate::config::VerifierConfig;
use crate::matching::syntax::{wrapper_marker_match, DefinitionIndex};
use crate::matching::{is_ident_char, SourceFile};
use crate::model::MatchStrategy;

/// A successful alias lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub strategy: MatchStrategy,
    /// The working name whose definition was found.
    pub alias: String,
}

/// Every object-like macro in `file` whose replacement text is exactly `target`.
///
/// Function-like macros (`#define NAME(args) ...`) are ignored, as is a
/// trailing `//` or `/* */` comment on the definition line.
pub fn macro_aliases(file: &SourceFile, target: &str) -> Vec<String> {
    let mut aliases: Vec<String> = Vec::new();
    if target.is_empty() {
        return aliases;
    }
    for line in file.text.lines() {
        let Some((alias, value)) = parse_object_define(line) else {
            continue;
        };
        if value == target && alias != target && !aliases.iter().any(|a| a == alias) {
            aliases.push(alias.to_string());
        }
    }
    aliases
}

/// Split `#define NAME VALUE` into `(NAME, VALUE)`.
fn parse_object_define(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim_start().strip_prefix('#')?.trim_start();
    let rest = rest.strip_prefix("define")?;
    if !rest.starts_with(|c: char| c == ' ' || c == '\t') {
        return None;
    }
    let rest = rest.trim_start();
    let name_len = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
    if name_len == 0 {
        return None;
    }
    let (name, after) = rest.split_at(name_len);
    if after.starts_with('(') {
        return None;
    }
    let value = strip_trailing_comment(after).trim();
    Some((name, value))
}

fn strip_trailing_comment(text: &str) -> &str {
    let cut = [text.find("//"), text.find("/*")].into_iter().flatten().min();
    match cut {
        Some(pos) => &text[..pos],
        None => text,
    }
}

/// Strip the first prefix from `prefixes` that `target` starts with.
///
/// Only one prefix is removed; the result is never re-stripped. A prefix that
/// would leave an empty name does not apply.
pub fn strip_known_prefix<'a>(target: &'a str, prefixes: &[String]) -> Option<&'a str> {
    prefixes
        .iter()
        .find(|prefix| {
            !prefix.is_empty() && target.len() > prefix.len() && target.starts_with(prefix.as_str())
        })
        .map(|prefix| &target[prefix.len()..])
}

/// Applies the alias conventions against one already-parsed file.
#[derive(Debug, Clone)]
pub struct AliasResolver {
    strip_prefixes: Vec<String>,
    wrapper_markers: Vec<String>,
}

impl AliasResolver {
    pub fn new(config: &VerifierConfig) -> Self {
        Self {
            strip_prefixes: config.strip_prefixes.clone(),
            wrapper_markers: config.wrapper_markers.clone(),
        }
    }

    /// Re-run definition matching for a candidate name: the file's syntax
    /// index first, then the wrapper-marker convention.
    fn defines(&self, file: &SourceFile, index: Option<&DefinitionIndex>, name: &str) -> bool {
        index.is_some_and(|index| index.contains(name))
            || wrapper_marker_match(file, name, &self.wrapper_markers)
    }

    /// Try macro renames, then prefix stripping. First success wins.
    pub fn resolve(
        &self,
        file: &SourceFile,
        index: Option<&DefinitionIndex>,
        target: &str,
    ) -> Option<Resolution> {
        for alias in macro_aliases(file, target) {
            if self.defines(file, index, &alias) {
                debug!("{}: '{}' resolved via #define {}", file.path.display(), target, alias);
                return Some(Resolution { strategy: MatchStrategy::MacroAlias, alias });
            }
        }

        if let Some(stripped) = strip_known_prefix(target, &self.strip_prefixes) {
            if self.defines(file, index, stripped) {
                debug!(
                    "{}: '{}' resolved by stripping to '{}'",
                    file.path.display(),
                    target,
                    stripped
                );
                return Some(Resolution {
                    strategy: MatchStrategy::PrefixStrip,
                    alias: stripped.to_string(),
                });
            }
        }

        None
    }
}
