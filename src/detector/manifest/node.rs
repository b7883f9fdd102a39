//! Node ecosystem evidence reader: `package.json` dependencies and
//! devDependencies.

use async_trait::async_trait;
use log::*;
use std::path::Path;

use crate::detector::config::DependencyAnchor;
use crate::detector::manifest::{ManifestReader, read_optional};
use crate::detector::types::{
    AnchorResult, Evidence, Language, ManifestScan,
};
use crate::error::Result;

pub const PACKAGE_JSON: &str = "package.json";

pub struct NodeReader {
    anchors: Vec<DependencyAnchor>,
}

impl NodeReader {
    pub fn new(anchors: Vec<DependencyAnchor>) -> Self {
        Self { anchors }
    }

    fn dependency_names(manifest: &serde_json::Value) -> Vec<String> {
        let mut names = Vec::new();
        for section in ["dependencies", "devDependencies"] {
            if let Some(deps) =
                manifest.get(section).and_then(|v| v.as_object())
            {
                names.extend(deps.keys().cloned());
            }
        }
        names
    }
}

#[async_trait]
impl ManifestReader for NodeReader {
    fn name(&self) -> &str {
        "node"
    }

    async fn scan(&self, root: &Path) -> Result<ManifestScan> {
        let manifest_path = root.join(PACKAGE_JSON);
        let Some(content) = read_optional(&manifest_path).await? else {
            return Ok(ManifestScan::default());
        };

        let manifest: serde_json::Value =
            match serde_json::from_str(&content) {
                Ok(v) => v,
                Err(e) => {
                    // Malformed manifests are non-fatal for detection
                    warn!("failed to parse {PACKAGE_JSON}: {e}");
                    return Ok(ManifestScan::default());
                }
            };

        let mut scan = ManifestScan {
            package_manager_files: vec![PACKAGE_JSON.to_string()],
            ..Default::default()
        };

        for name in Self::dependency_names(&manifest) {
            for anchor in &self.anchors {
                if name == anchor.dependency {
                    debug!(
                        "node anchor: {} -> {}",
                        name, anchor.platform
                    );
                    scan.anchors.push(AnchorResult {
                        platform: anchor.platform,
                        framework: anchor.framework,
                        language: Some(Language::JavaScript),
                        evidence: Evidence::new(PACKAGE_JSON, &name),
                    });
                }
            }
        }

        Ok(scan)
    }
}
