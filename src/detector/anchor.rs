//! Anchor resolver: collapses manifest and config-file evidence into the
//! single highest-confidence platform anchor, or reports that none was
//! found.

use log::*;
use std::path::Path;

use crate::detector::config::{ConfigAnchor, DetectionConfig};
use crate::detector::manifest::ManifestReader;
use crate::detector::manifest::java::JavaReader;
use crate::detector::manifest::node::NodeReader;
use crate::detector::manifest::python::PythonReader;
use crate::detector::types::{
    AnchorResult, Evidence, ManifestScan, Platform,
};
use crate::error::{Result, SnapshiftError};

/// Combined structural evidence from all ecosystems.
#[derive(Debug, Clone, Default)]
pub struct AnchorEvidence {
    /// Dependency anchors from every manifest reader, conflicts
    /// included.
    pub anchors: Vec<AnchorResult>,
    /// Config-filename anchors (platform known, framework unknown).
    pub config_anchors: Vec<AnchorResult>,
    /// Platform config files found at the root, relative paths.
    pub config_files: Vec<String>,
    /// Package-manager files found, relative paths.
    pub package_manager_files: Vec<String>,
}

impl AnchorEvidence {
    /// Distinct platforms anchored by dependencies, in first-seen order.
    pub fn dependency_platforms(&self) -> Vec<Platform> {
        let mut platforms = Vec::new();
        for anchor in &self.anchors {
            if !platforms.contains(&anchor.platform) {
                platforms.push(anchor.platform);
            }
        }
        platforms
    }

    /// All anchors, dependency first, as multi-detection candidates.
    pub fn all_anchors(&self) -> Vec<&AnchorResult> {
        self.anchors.iter().chain(&self.config_anchors).collect()
    }
}

/// Resolves structural project evidence into a single anchor without
/// reading arbitrary source files.
pub struct AnchorResolver {
    readers: Vec<Box<dyn ManifestReader>>,
    config_anchors: Vec<ConfigAnchor>,
}

impl AnchorResolver {
    pub fn new(config: &DetectionConfig) -> Self {
        let readers: Vec<Box<dyn ManifestReader>> = vec![
            Box::new(NodeReader::new(
                config.node_dependencies.clone(),
            )),
            Box::new(JavaReader::new(
                config.java_dependencies.clone(),
            )),
            Box::new(PythonReader::new(
                config.python_dependencies.clone(),
            )),
        ];
        Self {
            readers,
            config_anchors: config.config_anchors.clone(),
        }
    }

    /// Collect every anchor the project's structure offers. Reader
    /// failures are non-fatal: the resolver logs and continues to the
    /// next ecosystem.
    pub async fn collect(&self, root: &Path) -> AnchorEvidence {
        let mut evidence = AnchorEvidence::default();

        for reader in &self.readers {
            match reader.scan(root).await {
                Ok(ManifestScan {
                    anchors,
                    package_manager_files,
                }) => {
                    evidence.anchors.extend(anchors);
                    evidence
                        .package_manager_files
                        .extend(package_manager_files);
                }
                Err(e) => {
                    debug!(
                        "manifest reader {} failed: {e}",
                        reader.name()
                    );
                }
            }
        }

        for anchor in &self.config_anchors {
            if root.join(anchor.filename).exists() {
                debug!(
                    "config anchor: {} -> {}",
                    anchor.filename, anchor.platform
                );
                evidence.config_files.push(anchor.filename.to_string());
                evidence.config_anchors.push(AnchorResult {
                    platform: anchor.platform,
                    framework: None,
                    language: None,
                    evidence: Evidence::new(
                        anchor.filename,
                        anchor.filename,
                    ),
                });
            }
        }

        evidence
    }

    /// Resolve collected evidence to at most one anchor.
    ///
    /// Multiple simultaneous dependency platforms are fatal. A
    /// config-file anchor is a fallback used only when no dependency
    /// evidence exists; it carries no framework.
    pub fn resolve(
        &self,
        evidence: &AnchorEvidence,
    ) -> Result<Option<AnchorResult>> {
        let platforms = evidence.dependency_platforms();

        if platforms.len() > 1 {
            return Err(SnapshiftError::multiple_platforms(
                platforms.iter().map(|p| p.name()),
            ));
        }

        if let Some(platform) = platforms.first() {
            // Prefer the anchor that carries a framework, if any does.
            let best = evidence
                .anchors
                .iter()
                .filter(|a| a.platform == *platform)
                .max_by_key(|a| a.framework.is_some());
            return Ok(best.cloned());
        }

        // Config-file fallback. Two different platforms' config files
        // at once is the same conflict as two dependencies.
        let config_platforms: Vec<Platform> = {
            let mut seen = Vec::new();
            for anchor in &evidence.config_anchors {
                if !seen.contains(&anchor.platform) {
                    seen.push(anchor.platform);
                }
            }
            seen
        };

        if config_platforms.len() > 1 {
            return Err(SnapshiftError::multiple_platforms(
                config_platforms.iter().map(|p| p.name()),
            ));
        }

        Ok(evidence.config_anchors.first().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::types::{Framework, Language};
    use std::fs;
    use tempfile::TempDir;

    fn resolver() -> AnchorResolver {
        AnchorResolver::new(&DetectionConfig::default())
    }

    #[tokio::test]
    async fn test_single_dependency_anchor_resolves() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("package.json"),
            r#"{ "devDependencies": { "@percy/cypress": "^3.1.2" } }"#,
        )
        .unwrap();

        let r = resolver();
        let evidence = r.collect(temp_dir.path()).await;
        let anchor = r.resolve(&evidence).unwrap().unwrap();

        assert_eq!(anchor.platform, Platform::Percy);
        assert_eq!(anchor.framework, Some(Framework::Cypress));
        assert_eq!(anchor.language, Some(Language::JavaScript));
        assert_eq!(anchor.evidence.source, "package.json");
    }

    #[tokio::test]
    async fn test_conflicting_dependencies_are_fatal() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("package.json"),
            r#"{ "devDependencies": {
                "@percy/cypress": "^3.1.2",
                "@applitools/eyes-cypress": "^3.40.0"
            } }"#,
        )
        .unwrap();

        let r = resolver();
        let evidence = r.collect(temp_dir.path()).await;
        let err = r.resolve(&evidence).unwrap_err();

        assert!(matches!(
            err,
            SnapshiftError::MultiplePlatformsDetected { .. }
        ));
        assert!(err.to_string().contains("Percy"));
        assert!(err.to_string().contains("Applitools"));
    }

    #[tokio::test]
    async fn test_cross_ecosystem_conflict_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("package.json"),
            r#"{ "devDependencies": { "@percy/cypress": "^3.1.2" } }"#,
        )
        .unwrap();
        fs::write(
            temp_dir.path().join("requirements.txt"),
            "eyes-selenium==5.0\n",
        )
        .unwrap();

        let r = resolver();
        let evidence = r.collect(temp_dir.path()).await;
        assert!(r.resolve(&evidence).is_err());
    }

    #[tokio::test]
    async fn test_config_file_fallback_has_no_framework() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".percy.yml"), "version: 2\n")
            .unwrap();

        let r = resolver();
        let evidence = r.collect(temp_dir.path()).await;
        let anchor = r.resolve(&evidence).unwrap().unwrap();

        assert_eq!(anchor.platform, Platform::Percy);
        assert_eq!(anchor.framework, None);
        assert!(evidence.config_files.contains(&".percy.yml".into()));
    }

    #[tokio::test]
    async fn test_dependency_anchor_outranks_config_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("package.json"),
            r#"{ "devDependencies": { "@applitools/eyes-cypress": "3.0" } }"#,
        )
        .unwrap();
        // Stale percy config left behind should not win over the
        // installed dependency... but it IS a second platform signal.
        fs::write(temp_dir.path().join(".percy.yml"), "version: 2\n")
            .unwrap();

        let r = resolver();
        let evidence = r.collect(temp_dir.path()).await;
        let anchor = r.resolve(&evidence).unwrap().unwrap();
        assert_eq!(anchor.platform, Platform::Applitools);
    }

    #[tokio::test]
    async fn test_empty_project_yields_no_anchor() {
        let temp_dir = TempDir::new().unwrap();
        let r = resolver();
        let evidence = r.collect(temp_dir.path()).await;
        assert!(r.resolve(&evidence).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_framework_bearing_anchor_preferred() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("package.json"),
            r#"{ "devDependencies": {
                "@percy/cli": "^1.28.0",
                "@percy/storybook": "^5.0.0"
            } }"#,
        )
        .unwrap();

        let r = resolver();
        let evidence = r.collect(temp_dir.path()).await;
        let anchor = r.resolve(&evidence).unwrap().unwrap();
        assert_eq!(anchor.framework, Some(Framework::Storybook));
    }
}
