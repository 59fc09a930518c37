use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;

use crate::config::VerifierConfig;
use crate::locate::{SourceKind, SourceLocator};
use crate::matching::{
    has_fortify_marker, matches_near_line, wrapper_marker_match, AliasResolver, SourceFile,
    SyntaxMatcher,
};
use crate::model::{
    FailedRecord, FailureReason, FunctionRecord, MatchStrategy, Verdict, VerificationOutcome,
    VerificationReport,
};

/// Errors that abort a whole verification pass.
///
/// Everything that goes wrong with a single record is a `Failed` verdict instead.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("Source root not found at {0}")]
    MissingSourceRoot(PathBuf),
}

/// Sequences locator, matchers and alias resolver for each record.
#[derive(Debug, Clone)]
pub struct Verifier {
    config: VerifierConfig,
    locator: SourceLocator,
    syntax: SyntaxMatcher,
    aliases: AliasResolver,
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new(VerifierConfig::default())
    }
}

impl Verifier {
    pub fn new(config: VerifierConfig) -> Self {
        let locator = SourceLocator::new(&config);
        let aliases = AliasResolver::new(&config);
        Self { config, locator, syntax: SyntaxMatcher::new(), aliases }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Verify one record against the tree at `root`.
    ///
    /// Does not touch the record and caches nothing, so an unchanged record
    /// against an unchanged tree always yields the same outcome.
    pub fn verify(&self, root: &Path, record: &FunctionRecord) -> VerificationOutcome {
        let name = record.name.as_str();
        // Excluded records never reach a verdict, not even a missing-name failure.
        if self.locator.is_excluded(&record.declared_path) {
            debug!("Skipping {} under excluded root: {}", name, record.declared_path);
            return VerificationOutcome::skipped(name);
        }
        if name.trim().is_empty() {
            return VerificationOutcome::failed(name, None, FailureReason::MissingName);
        }

        let path = self.locator.resolve(root, &record.declared_path);
        let kind = SourceKind::of(&path, &self.config);
        if kind == SourceKind::Unsupported {
            return VerificationOutcome::failed(
                name,
                Some(path),
                FailureReason::UnsupportedLanguage,
            );
        }

        let file = match SourceFile::load(&path) {
            Ok(file) => file,
            Err(err) => {
                warn!("Cannot read {} for {}: {}", path.display(), name, err);
                return VerificationOutcome::failed(
                    name,
                    Some(path),
                    FailureReason::SourceUnreadable,
                );
            }
        };

        if kind == SourceKind::Header && has_fortify_marker(&file, &self.config.fortify_marker) {
            return VerificationOutcome::verified(name, path, MatchStrategy::Fortified);
        }

        let index = self.syntax.definitions(&file);
        if index.as_ref().is_some_and(|index| index.contains(name)) {
            return VerificationOutcome::verified(name, path, MatchStrategy::Definition);
        }
        if wrapper_marker_match(&file, name, &self.config.wrapper_markers) {
            return VerificationOutcome::verified(name, path, MatchStrategy::WrapperMarker);
        }
        if matches_near_line(&file, name, record.declared_line, self.config.line_window) {
            return VerificationOutcome::verified(name, path, MatchStrategy::LineHeuristic);
        }

        if let Some(resolution) = self.aliases.resolve(&file, index.as_ref(), name) {
            return VerificationOutcome::verified(name, path, resolution.strategy)
                .with_alias(Some(resolution.alias));
        }

        let reason = match kind {
            SourceKind::Header => FailureReason::NoDefinitionFound,
            _ => FailureReason::NoAliasFound,
        };
        debug!("No definition of {} in {} (parsed: {})", name, path.display(), index.is_some());
        VerificationOutcome::failed(name, Some(path), reason)
    }

    /// Verify every pending record in order and conclude it.
    ///
    /// Records that already carry a verdict are left alone and are not counted.
    /// The only fatal condition is a source root that is not a directory.
    pub fn run(
        &self,
        root: &Path,
        records: &mut [FunctionRecord],
    ) -> Result<VerificationReport, VerifyError> {
        if !root.is_dir() {
            return Err(VerifyError::MissingSourceRoot(root.to_path_buf()));
        }

        let mut report = VerificationReport::default();
        for record in records.iter_mut() {
            if !record.is_pending() {
                warn!(
                    "Record {} ({}) already concluded as {}; not re-verified",
                    record.name,
                    record.declared_path,
                    record.verdict.as_str()
                );
                report.skipped += 1;
                continue;
            }

            let outcome = self.verify(root, record);
            if outcome.skipped {
                report.skipped += 1;
                report.outcomes.push(outcome);
                continue;
            }

            report.analyzed += 1;
            record.conclude(&outcome);
            match outcome.verdict {
                Verdict::Verified => report.verified += 1,
                Verdict::Failed => report.failures.push(FailedRecord {
                    name: record.name.clone(),
                    declared_line: record.declared_line,
                    declared_path: record.declared_path.clone(),
                    reason: record.reason.clone().unwrap_or_default(),
                }),
                Verdict::Unverified => {}
            }
            report.outcomes.push(outcome);
        }

        info!(
            "Verified {}/{} records under {} ({} skipped)",
            report.verified,
            report.analyzed,
            root.display(),
            report.skipped
        );
        Ok(report)
    }
}
