//! Core data model for function records and verification results.
//!
//! A `FunctionRecord` is produced by whatever read the binary's debug
//! information and is consumed exactly once per verification pass. Matchers
//! only read it; the orchestrator is the only code that concludes it.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Verification state of a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    #[default]
    Unverified,
    Verified,
    Failed,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Unverified => "unverified",
            Verdict::Verified => "verified",
            Verdict::Failed => "failed",
        }
    }
}

/// One function as claimed by the debug information of a binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    /// Identifier reported by debug info. Never rewritten by alias resolution.
    pub name: String,
    /// Source path as recorded (absolute, relative, or under a system include root).
    pub declared_path: String,
    /// 1-based line of the claimed definition; `0` when unknown.
    #[serde(default)]
    pub declared_line: u32,
    /// Optional load offset, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<u64>,
    #[serde(default)]
    pub verdict: Verdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl FunctionRecord {
    pub fn new(name: impl Into<String>, declared_path: impl Into<String>, declared_line: u32) -> Self {
        Self {
            name: name.into(),
            declared_path: declared_path.into(),
            declared_line,
            address: None,
            verdict: Verdict::Unverified,
            reason: None,
        }
    }

    /// Builder-style helper to attach a load address.
    pub fn with_address(mut self, address: u64) -> Self {
        self.address = Some(address);
        self
    }

    /// Whether this record is still waiting for a verdict.
    pub fn is_pending(&self) -> bool {
        self.verdict == Verdict::Unverified
    }

    /// Apply the verdict of `outcome` to this record.
    ///
    /// A record concludes at most once; returns `false` (and changes nothing)
    /// if it already carries a verdict or if the outcome itself is a skip.
    pub fn conclude(&mut self, outcome: &VerificationOutcome) -> bool {
        if !self.is_pending() || outcome.skipped || outcome.verdict == Verdict::Unverified {
            return false;
        }
        self.verdict = outcome.verdict;
        self.reason = outcome.reason.map(|r| r.to_string());
        true
    }
}

/// Why a record ended up `Failed`. Every failed verdict carries one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    MissingName,
    UnsupportedLanguage,
    SourceUnreadable,
    /// Header prototype with no fortify marker and no recoverable body.
    NoDefinitionFound,
    /// Source file where direct matching and every alias strategy failed.
    NoAliasFound,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::MissingName => "missing function name",
            FailureReason::UnsupportedLanguage => "unsupported source language",
            FailureReason::SourceUnreadable => "source unreadable",
            FailureReason::NoDefinitionFound => "no definition found",
            FailureReason::NoAliasFound => "no alias found",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The rule that produced a `Verified` verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Header carrying the fortification marker.
    Fortified,
    /// A `function_definition` with the record's name in the syntax tree.
    Definition,
    /// Name found on the line following a wrapper marker.
    WrapperMarker,
    /// Function opening found at or next to the declared line.
    LineHeuristic,
    /// Definition found under a `#define ALIAS name` alias.
    MacroAlias,
    /// Definition found after stripping a known prefix.
    PrefixStrip,
}

impl MatchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrategy::Fortified => "fortified",
            MatchStrategy::Definition => "definition",
            MatchStrategy::WrapperMarker => "wrapper_marker",
            MatchStrategy::LineHeuristic => "line_heuristic",
            MatchStrategy::MacroAlias => "macro_alias",
            MatchStrategy::PrefixStrip => "prefix_strip",
        }
    }
}

/// Result of verifying a single record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub name: String,
    pub verdict: Verdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<MatchStrategy>,
    /// Working name that matched when it differs from `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concrete_path: Option<PathBuf>,
    /// Record fell under an excluded system root and was not verified.
    #[serde(default)]
    pub skipped: bool,
}

impl VerificationOutcome {
    pub fn verified(name: &str, path: PathBuf, strategy: MatchStrategy) -> Self {
        Self {
            name: name.to_string(),
            verdict: Verdict::Verified,
            reason: None,
            strategy: Some(strategy),
            resolved_alias: None,
            concrete_path: Some(path),
            skipped: false,
        }
    }

    pub fn failed(name: &str, path: Option<PathBuf>, reason: FailureReason) -> Self {
        Self {
            name: name.to_string(),
            verdict: Verdict::Failed,
            reason: Some(reason),
            strategy: None,
            resolved_alias: None,
            concrete_path: path,
            skipped: false,
        }
    }

    pub fn skipped(name: &str) -> Self {
        Self {
            name: name.to_string(),
            verdict: Verdict::Unverified,
            reason: None,
            strategy: None,
            resolved_alias: None,
            concrete_path: None,
            skipped: true,
        }
    }

    pub fn with_alias(mut self, alias: Option<String>) -> Self {
        self.resolved_alias = alias;
        self
    }
}

/// A failed record as handed to reporting: original provenance plus reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedRecord {
    pub name: String,
    pub declared_line: u32,
    pub declared_path: String,
    pub reason: String,
}

/// Aggregate result of one verification pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Records counted in the pass (everything not skipped).
    pub analyzed: usize,
    pub verified: usize,
    /// Records under an excluded root or already concluded before the pass.
    pub skipped: usize,
    pub failures: Vec<FailedRecord>,
    pub outcomes: Vec<VerificationOutcome>,
}

impl VerificationReport {
    /// Fraction of analyzed records that verified; `0.0` for an empty pass.
    pub fn score(&self) -> f64 {
        if self.analyzed == 0 {
            0.0
        } else {
            self.verified as f64 / self.analyzed as f64
        }
    }
}
