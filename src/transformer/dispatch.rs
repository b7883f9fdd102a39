//! Static dispatch transformer enum and the run coordinator.
//!
//! Exactly one transformer handles each `(artifact kind, language,
//! platform)` key. The coordinator streams the detection result's file
//! sets through the matching transformer; per-file failures become
//! warnings tied to the path and never abort the run.

use log::*;
use std::path::Path;

use crate::detector::types::{DetectionResult, Language};
use crate::error::Result;
use crate::transformer::ci::CiTransformer;
use crate::transformer::configfile::{
    ConfigTransformer, SMARTUI_CONFIG_FILE,
};
use crate::transformer::java::JavaTransformer;
use crate::transformer::js::JsTransformer;
use crate::transformer::package_manager::PackageManagerTransformer;
use crate::transformer::python::PythonTransformer;
use crate::transformer::types::{
    ArtifactKind, ChangeAction, ProposedChange, TransformContext,
    TransformOutcome, TransformationWarning,
};

/// Artifact transformer with static dispatch: the compiler sees every
/// concrete implementation, no trait objects involved.
pub enum Transformer {
    Js(JsTransformer),
    Java(JavaTransformer),
    Python(PythonTransformer),
    Config(ConfigTransformer),
    Ci(CiTransformer),
    PackageManager(PackageManagerTransformer),
}

impl Transformer {
    /// Select the transformer for one artifact kind under the detected
    /// context. Source files dispatch on language; the other kinds are
    /// language-independent.
    pub fn for_artifact(
        kind: ArtifactKind,
        ctx: &TransformContext,
    ) -> Result<Self> {
        let transformer = match kind {
            ArtifactKind::Source => match ctx.language {
                Language::JavaScript => {
                    Transformer::Js(JsTransformer::new(ctx)?)
                }
                Language::Java => {
                    Transformer::Java(JavaTransformer::new(ctx)?)
                }
                Language::Python => {
                    Transformer::Python(PythonTransformer::new(ctx)?)
                }
            },
            ArtifactKind::Config => {
                Transformer::Config(ConfigTransformer::new(ctx))
            }
            ArtifactKind::Ci => {
                Transformer::Ci(CiTransformer::new(ctx)?)
            }
            ArtifactKind::PackageManager => Transformer::PackageManager(
                PackageManagerTransformer::new(ctx)?,
            ),
        };
        Ok(transformer)
    }

    pub fn transform(
        &self,
        path: &str,
        content: &str,
    ) -> Result<TransformOutcome> {
        match self {
            Transformer::Js(t) => Ok(t.transform(content)),
            Transformer::Java(t) => Ok(t.transform(content)),
            Transformer::Python(t) => Ok(t.transform(path, content)),
            Transformer::Config(t) => t.transform(path, content),
            Transformer::Ci(t) => Ok(t.transform(content)),
            Transformer::PackageManager(t) => {
                t.transform(path, content)
            }
        }
    }
}

impl std::fmt::Debug for Transformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transformer::Js(_) => write!(f, "Transformer::Js"),
            Transformer::Java(_) => write!(f, "Transformer::Java"),
            Transformer::Python(_) => write!(f, "Transformer::Python"),
            Transformer::Config(_) => write!(f, "Transformer::Config"),
            Transformer::Ci(_) => write!(f, "Transformer::Ci"),
            Transformer::PackageManager(_) => {
                write!(f, "Transformer::PackageManager")
            }
        }
    }
}

/// Migration run statistics.
#[derive(Debug, Default, Clone)]
pub struct TransformStats {
    pub files_to_create: usize,
    pub files_to_modify: usize,
    pub snapshot_count: usize,
    pub warnings: usize,
}

impl std::fmt::Display for TransformStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Migration Summary:")?;
        writeln!(f, "  Files to create: {}", self.files_to_create)?;
        writeln!(f, "  Files to modify: {}", self.files_to_modify)?;
        writeln!(
            f,
            "  Snapshot calls migrated: {}",
            self.snapshot_count
        )?;
        writeln!(f, "  Warnings: {}", self.warnings)?;
        Ok(())
    }
}

/// Everything a migration run proposes. Nothing has been written to
/// disk; the caller renders or applies the changes.
#[derive(Debug, Default)]
pub struct TransformReport {
    pub changes: Vec<ProposedChange>,
    pub warnings: Vec<TransformationWarning>,
}

impl TransformReport {
    pub fn stats(&self) -> TransformStats {
        TransformStats {
            files_to_create: self
                .changes
                .iter()
                .filter(|c| c.action == ChangeAction::Create)
                .count(),
            files_to_modify: self
                .changes
                .iter()
                .filter(|c| c.action == ChangeAction::Modify)
                .count(),
            snapshot_count: self
                .changes
                .iter()
                .map(|c| c.snapshot_count)
                .sum(),
            warnings: self.warnings.len(),
        }
    }
}

/// Coordinates the whole transformation pass over a detection result.
pub struct TransformationManager {
    result: DetectionResult,
}

impl TransformationManager {
    pub fn new(result: DetectionResult) -> Self {
        Self { result }
    }

    /// Run every file set through its transformer and fold the
    /// per-file outcomes into one report. Files are processed in the
    /// order detection listed them, so the report is deterministic.
    pub async fn run(&self, root: &Path) -> Result<TransformReport> {
        let ctx = TransformContext {
            platform: self.result.platform,
            framework: self.result.framework,
            language: self.result.language,
            test_type: self.result.test_type,
        };

        info!(
            "migrating {} {} project ({} source files)",
            self.result.platform,
            self.result.framework,
            self.result.files.source.len()
        );

        let mut report = TransformReport::default();

        let file_sets: [(ArtifactKind, &[String]); 4] = [
            (ArtifactKind::Source, &self.result.files.source),
            (ArtifactKind::Config, &self.result.files.config),
            (ArtifactKind::Ci, &self.result.files.ci),
            (
                ArtifactKind::PackageManager,
                &self.result.files.package_manager,
            ),
        ];

        for (kind, files) in file_sets {
            let transformer = Transformer::for_artifact(kind, &ctx)?;
            for path in files {
                self.process_file(
                    root,
                    kind,
                    &transformer,
                    path,
                    &mut report,
                )
                .await;
            }
        }

        let stats = report.stats();
        info!("{stats}");

        Ok(report)
    }

    /// Transform one file. Any failure is recorded as a warning on the
    /// path; the run continues.
    async fn process_file(
        &self,
        root: &Path,
        kind: ArtifactKind,
        transformer: &Transformer,
        path: &str,
        report: &mut TransformReport,
    ) {
        let content =
            match tokio::fs::read_to_string(root.join(path)).await {
                Ok(c) => c,
                Err(e) => {
                    warn!("skipping unreadable {kind} file {path}: {e}");
                    report.warnings.push(TransformationWarning {
                        path: path.to_string(),
                        message: format!("file could not be read: {e}"),
                    });
                    return;
                }
            };

        let outcome = match transformer.transform(path, &content) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("transformation failed for {path}: {e}");
                report.warnings.push(TransformationWarning {
                    path: path.to_string(),
                    message: format!("transformation failed: {e}"),
                });
                return;
            }
        };

        for message in outcome.warnings {
            report.warnings.push(TransformationWarning {
                path: path.to_string(),
                message,
            });
        }

        if kind == ArtifactKind::Config {
            // Config files map to one generated .smartui.json. The
            // first config file wins; extras are flagged.
            let already_proposed = report
                .changes
                .iter()
                .any(|c| c.path == SMARTUI_CONFIG_FILE);
            if already_proposed {
                report.warnings.push(TransformationWarning {
                    path: path.to_string(),
                    message: format!(
                        "additional platform config ignored; {SMARTUI_CONFIG_FILE} was already generated"
                    ),
                });
            } else {
                report.changes.push(ProposedChange {
                    path: SMARTUI_CONFIG_FILE.to_string(),
                    action: ChangeAction::Create,
                    content: outcome.content,
                    snapshot_count: 0,
                });
            }
            return;
        }

        if outcome.content != content {
            debug!(
                "{path}: {} snapshot call sites migrated",
                outcome.snapshot_count
            );
            report.changes.push(ProposedChange {
                path: path.to_string(),
                action: ChangeAction::Modify,
                content: outcome.content,
                snapshot_count: outcome.snapshot_count,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::types::{
        DetectionEvidence, DetectionFiles, Evidence, Framework,
        FrameworkEvidence, Platform, TestType,
    };
    use std::fs;
    use tempfile::TempDir;

    fn percy_cypress_result(files: DetectionFiles) -> DetectionResult {
        DetectionResult {
            platform: Platform::Percy,
            framework: Framework::Cypress,
            language: Language::JavaScript,
            test_type: TestType::E2e,
            files,
            evidence: DetectionEvidence {
                platform: Evidence::new(
                    "package.json",
                    "@percy/cypress",
                ),
                framework: FrameworkEvidence::default(),
            },
        }
    }

    #[tokio::test]
    async fn test_full_percy_cypress_run() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("login.cy.js"),
            "import '@percy/cypress';\ncy.percySnapshot('Login');\n",
        )
        .unwrap();
        fs::write(
            temp_dir.path().join(".percy.yml"),
            "version: 2\nsnapshot:\n  widths: [1280]\n",
        )
        .unwrap();
        fs::write(
            temp_dir.path().join("package.json"),
            r#"{ "devDependencies": { "@percy/cypress": "^3.1.2" } }"#,
        )
        .unwrap();

        let result = percy_cypress_result(DetectionFiles {
            config: vec![".percy.yml".to_string()],
            source: vec!["login.cy.js".to_string()],
            ci: vec![],
            package_manager: vec!["package.json".to_string()],
        });

        let report = TransformationManager::new(result)
            .run(temp_dir.path())
            .await
            .unwrap();

        let stats = report.stats();
        assert_eq!(stats.files_to_create, 1);
        assert_eq!(stats.files_to_modify, 2);
        assert_eq!(stats.snapshot_count, 1);
        assert_eq!(stats.warnings, 0);

        let config = report
            .changes
            .iter()
            .find(|c| c.path == SMARTUI_CONFIG_FILE)
            .unwrap();
        assert_eq!(config.action, ChangeAction::Create);
        assert!(config.content.contains("viewports"));
    }

    #[tokio::test]
    async fn test_unreadable_file_becomes_warning() {
        let temp_dir = TempDir::new().unwrap();
        let result = percy_cypress_result(DetectionFiles {
            config: vec![],
            source: vec!["missing.cy.js".to_string()],
            ci: vec![],
            package_manager: vec![],
        });

        let report = TransformationManager::new(result)
            .run(temp_dir.path())
            .await
            .unwrap();

        assert!(report.changes.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].path, "missing.cy.js");
    }

    #[tokio::test]
    async fn test_second_config_file_is_flagged() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(".percy.yml"),
            "version: 2\n",
        )
        .unwrap();
        fs::write(
            temp_dir.path().join("percy.config.js"),
            "module.exports = {};\n",
        )
        .unwrap();

        let result = percy_cypress_result(DetectionFiles {
            config: vec![
                ".percy.yml".to_string(),
                "percy.config.js".to_string(),
            ],
            source: vec![],
            ci: vec![],
            package_manager: vec![],
        });

        let report = TransformationManager::new(result)
            .run(temp_dir.path())
            .await
            .unwrap();

        assert_eq!(report.stats().files_to_create, 1);
        assert!(report.warnings.iter().any(|w| {
            w.path == "percy.config.js"
                && w.message.contains("already generated")
        }));
    }

    #[tokio::test]
    async fn test_unchanged_file_not_reported() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("plain.cy.js"),
            "describe('plain', () => {});\n",
        )
        .unwrap();

        let result = percy_cypress_result(DetectionFiles {
            config: vec![],
            source: vec!["plain.cy.js".to_string()],
            ci: vec![],
            package_manager: vec![],
        });

        let report = TransformationManager::new(result)
            .run(temp_dir.path())
            .await
            .unwrap();
        assert!(report.changes.is_empty());
    }

    #[test]
    fn test_stats_display() {
        let stats = TransformStats {
            files_to_create: 1,
            files_to_modify: 4,
            snapshot_count: 9,
            warnings: 2,
        };
        let rendered = stats.to_string();
        assert!(rendered.contains("Files to create: 1"));
        assert!(rendered.contains("Files to modify: 4"));
        assert!(rendered.contains("Snapshot calls migrated: 9"));
        assert!(rendered.contains("Warnings: 2"));
    }
}
