//! Mapping of debug-reported declaration paths onto files under a source root.
//!
//! The locator is pure path arithmetic: it never touches the filesystem.
//! Failing to open the resolved path is the caller's concern.

use std::path::{Path, PathBuf};

use crate::config::{IncludeMirror, VerifierConfig};

const PARENT_SEGMENT: &str = "../";
const CURRENT_SEGMENT: &str = "./";

/// Kind of file a concrete path points at, decided by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Source,
    Header,
    Unsupported,
}

impl SourceKind {
    pub fn of(path: &Path, config: &VerifierConfig) -> Self {
        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext,
            None => return SourceKind::Unsupported,
        };
        if config.header_extensions.iter().any(|h| h == ext) {
            SourceKind::Header
        } else if config.source_extensions.iter().any(|s| s == ext) {
            SourceKind::Source
        } else {
            SourceKind::Unsupported
        }
    }
}

/// Path rules derived from a `VerifierConfig`.
#[derive(Debug, Clone)]
pub struct SourceLocator {
    excluded_roots: Vec<String>,
    include_mirrors: Vec<IncludeMirror>,
}

impl SourceLocator {
    pub fn new(config: &VerifierConfig) -> Self {
        Self {
            excluded_roots: config.excluded_roots.clone(),
            include_mirrors: config.include_mirrors.clone(),
        }
    }

    /// True when `declared_path` lives under a designated system root and the
    /// record should be left out of the pass altogether.
    pub fn is_excluded(&self, declared_path: &str) -> bool {
        self.excluded_roots.iter().any(|root| !root.is_empty() && declared_path.starts_with(root))
    }

    /// Combine `root` with a normalized `declared_path`.
    pub fn resolve(&self, root: &Path, declared_path: &str) -> PathBuf {
        let mut rel = strip_leading_relative(declared_path);

        let mirrored;
        if let Some(rule) =
            self.include_mirrors.iter().find(|m| !m.prefix.is_empty() && rel.starts_with(&m.prefix))
        {
            let rest = rel[rule.prefix.len()..].trim_start_matches('/');
            mirrored = format!("{}/{}", rule.mirror.trim_end_matches('/'), rest);
            rel = mirrored.as_str();
        }

        // Absolute debug paths are concatenated under the root, not substituted for it.
        root.join(rel.trim_start_matches('/'))
    }
}

/// Strip the leading run of `../` and `./` segments; inner segments are kept.
fn strip_leading_relative(path: &str) -> &str {
    let mut rest = path;
    loop {
        if let Some(stripped) = rest.strip_prefix(PARENT_SEGMENT) {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix(CURRENT_SEGMENT) {
            rest = stripped;
        } else {
            return rest;
        }
    }
}
