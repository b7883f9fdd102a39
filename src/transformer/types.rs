//! Core data model for the transformation rule engine.

use serde::Serialize;
use std::fmt;

use crate::detector::types::{Framework, Language, Platform, TestType};

/// Which transformer family handles a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArtifactKind {
    Source,
    Config,
    Ci,
    PackageManager,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArtifactKind::Source => "source",
            ArtifactKind::Config => "config",
            ArtifactKind::Ci => "ci",
            ArtifactKind::PackageManager => "package-manager",
        };
        write!(f, "{s}")
    }
}

/// Detection facts the transformers key their rule tables on.
#[derive(Debug, Clone, Copy)]
pub struct TransformContext {
    pub platform: Platform,
    pub framework: Framework,
    pub language: Language,
    pub test_type: TestType,
}

/// Pure per-file transformation result. `content` is the proposed text;
/// the caller compares it against the input to decide whether the file
/// changed.
#[derive(Debug, Clone, Default)]
pub struct TransformOutcome {
    pub content: String,
    /// Number of snapshot call sites rewritten in this file.
    pub snapshot_count: usize,
    /// Human-readable notes about constructs that could not be carried
    /// over. Never deduplicated: each occurrence is meaningful.
    pub warnings: Vec<String>,
}

impl TransformOutcome {
    /// Pass-through outcome: output identical to input, nothing to
    /// report.
    pub fn unchanged(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }
}

/// A warning tied to the file it arose in, accumulated append-only
/// across the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformationWarning {
    pub path: String,
    pub message: String,
}

impl fmt::Display for TransformationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Whether a proposed change creates a new file or modifies an existing
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeAction {
    Create,
    Modify,
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeAction::Create => "create",
            ChangeAction::Modify => "modify",
        };
        write!(f, "{s}")
    }
}

/// One proposed file change. Nothing is written to disk: the caller
/// decides what to do with the proposed content.
#[derive(Debug, Clone, Serialize)]
pub struct ProposedChange {
    pub path: String,
    pub action: ChangeAction,
    pub content: String,
    pub snapshot_count: usize,
}
