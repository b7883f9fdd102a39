//! Python ecosystem evidence reader: `requirements.txt` and
//! `pyproject.toml` (PEP 621 and Poetry layouts).

use async_trait::async_trait;
use log::*;
use std::path::Path;

use crate::detector::config::DependencyAnchor;
use crate::detector::manifest::{ManifestReader, read_optional};
use crate::detector::types::{
    AnchorResult, Evidence, Language, ManifestScan,
};
use crate::error::Result;

pub const REQUIREMENTS_TXT: &str = "requirements.txt";
pub const PYPROJECT_TOML: &str = "pyproject.toml";

pub struct PythonReader {
    anchors: Vec<DependencyAnchor>,
}

impl PythonReader {
    pub fn new(anchors: Vec<DependencyAnchor>) -> Self {
        Self { anchors }
    }

    /// Package names from requirements.txt lines. Handles version
    /// specifiers, extras, comments, and option lines.
    fn requirements_names(content: &str) -> Vec<String> {
        let mut names = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty()
                || line.starts_with('#')
                || line.starts_with('-')
                || line.contains("://")
            {
                continue;
            }
            let name: String = line
                .chars()
                .take_while(|c| {
                    c.is_ascii_alphanumeric()
                        || *c == '-'
                        || *c == '_'
                        || *c == '.'
                })
                .collect();
            if !name.is_empty() {
                names.push(name);
            }
        }
        names
    }

    /// Package names from pyproject.toml: PEP 621 project.dependencies
    /// plus Poetry's tool.poetry.dependencies table.
    fn pyproject_names(content: &str) -> Result<Vec<String>> {
        let parsed: toml::Value = toml::from_str(content)?;
        let mut names = Vec::new();

        if let Some(deps) = parsed
            .get("project")
            .and_then(|p| p.get("dependencies"))
            .and_then(|d| d.as_array())
        {
            for dep in deps {
                if let Some(spec) = dep.as_str() {
                    let name: String = spec
                        .trim()
                        .chars()
                        .take_while(|c| {
                            c.is_ascii_alphanumeric()
                                || *c == '-'
                                || *c == '_'
                                || *c == '.'
                        })
                        .collect();
                    if !name.is_empty() {
                        names.push(name);
                    }
                }
            }
        }

        if let Some(deps) = parsed
            .get("tool")
            .and_then(|t| t.get("poetry"))
            .and_then(|p| p.get("dependencies"))
            .and_then(|d| d.as_table())
        {
            names.extend(
                deps.keys().filter(|k| *k != "python").cloned(),
            );
        }

        Ok(names)
    }

    /// Python package names compare case-insensitively with `-`/`_`
    /// interchangeable (PEP 503 normalization).
    fn normalize(name: &str) -> String {
        name.to_lowercase().replace('_', "-")
    }

    fn anchors_from(
        &self,
        names: &[String],
        source: &str,
        scan: &mut ManifestScan,
    ) {
        for name in names {
            for anchor in &self.anchors {
                if Self::normalize(name)
                    == Self::normalize(anchor.dependency)
                {
                    debug!(
                        "python anchor: {} -> {}",
                        name, anchor.platform
                    );
                    scan.anchors.push(AnchorResult {
                        platform: anchor.platform,
                        framework: anchor.framework,
                        language: Some(Language::Python),
                        evidence: Evidence::new(source, name),
                    });
                }
            }
        }
    }
}

#[async_trait]
impl ManifestReader for PythonReader {
    fn name(&self) -> &str {
        "python"
    }

    async fn scan(&self, root: &Path) -> Result<ManifestScan> {
        let mut scan = ManifestScan::default();

        if let Some(content) =
            read_optional(&root.join(REQUIREMENTS_TXT)).await?
        {
            scan.package_manager_files
                .push(REQUIREMENTS_TXT.to_string());
            let names = Self::requirements_names(&content);
            self.anchors_from(&names, REQUIREMENTS_TXT, &mut scan);
        }

        if let Some(content) =
            read_optional(&root.join(PYPROJECT_TOML)).await?
        {
            scan.package_manager_files
                .push(PYPROJECT_TOML.to_string());
            match Self::pyproject_names(&content) {
                Ok(names) => {
                    self.anchors_from(
                        &names,
                        PYPROJECT_TOML,
                        &mut scan,
                    );
                }
                Err(e) => {
                    warn!("failed to parse {PYPROJECT_TOML}: {e}");
                }
            }
        }

        Ok(scan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::config::DetectionConfig;
    use crate::detector::types::{Framework, Platform};
    use std::fs;
    use tempfile::TempDir;

    fn reader() -> PythonReader {
        PythonReader::new(DetectionConfig::default().python_dependencies)
    }

    #[tokio::test]
    async fn test_detects_percy_in_requirements() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("requirements.txt"),
            "selenium==4.21.0\npercy-selenium==2.0.4\n# a comment\n",
        )
        .unwrap();

        let scan = reader().scan(temp_dir.path()).await.unwrap();

        assert_eq!(scan.anchors.len(), 1);
        assert_eq!(scan.anchors[0].platform, Platform::Percy);
        assert_eq!(
            scan.anchors[0].framework,
            Some(Framework::Selenium)
        );
        assert_eq!(
            scan.anchors[0].evidence.source,
            "requirements.txt"
        );
    }

    #[tokio::test]
    async fn test_detects_applitools_in_pyproject_poetry() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("pyproject.toml"),
            r#"[tool.poetry.dependencies]
python = "^3.11"
eyes-robotframework = "^6.0"
"#,
        )
        .unwrap();

        let scan = reader().scan(temp_dir.path()).await.unwrap();

        assert_eq!(scan.anchors.len(), 1);
        assert_eq!(scan.anchors[0].platform, Platform::Applitools);
        assert_eq!(
            scan.anchors[0].framework,
            Some(Framework::RobotFramework)
        );
    }

    #[tokio::test]
    async fn test_detects_pep621_dependencies() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("pyproject.toml"),
            r#"[project]
name = "demo"
dependencies = ["saucelabs_visual>=0.5", "pytest>=8"]
"#,
        )
        .unwrap();

        let scan = reader().scan(temp_dir.path()).await.unwrap();

        assert_eq!(scan.anchors.len(), 1);
        assert_eq!(scan.anchors[0].platform, Platform::SauceLabs);
    }

    #[tokio::test]
    async fn test_normalization_underscore_vs_dash() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("requirements.txt"),
            "percy_selenium==2.0.4\n",
        )
        .unwrap();

        let scan = reader().scan(temp_dir.path()).await.unwrap();
        assert_eq!(scan.anchors.len(), 1);
        assert_eq!(scan.anchors[0].platform, Platform::Percy);
    }

    #[test]
    fn test_requirements_skips_options_and_urls() {
        let names = PythonReader::requirements_names(
            "-r base.txt\n--index-url https://x\ngit+https://repo\nflask>=2\n",
        );
        assert_eq!(names, vec!["flask".to_string()]);
    }
}
