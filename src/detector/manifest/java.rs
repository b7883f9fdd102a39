//! Java ecosystem evidence reader: Maven `pom.xml` and Gradle build
//! scripts.
//!
//! Dependency anchors are matched on `groupId:artifactId` coordinates.

use async_trait::async_trait;
use log::*;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::path::Path;

use crate::detector::config::DependencyAnchor;
use crate::detector::manifest::{ManifestReader, read_optional};
use crate::detector::types::{
    AnchorResult, Evidence, Language, ManifestScan,
};
use crate::error::Result;

pub const POM_XML: &str = "pom.xml";
pub const GRADLE_FILES: &[&str] = &["build.gradle", "build.gradle.kts"];

pub struct JavaReader {
    anchors: Vec<DependencyAnchor>,
}

impl JavaReader {
    pub fn new(anchors: Vec<DependencyAnchor>) -> Self {
        Self { anchors }
    }

    /// Extract `groupId:artifactId` coordinates from a pom.xml document.
    fn pom_coordinates(content: &str) -> Result<Vec<String>> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        let mut coordinates = Vec::new();
        let mut in_dependency = false;
        let mut current_tag: Option<String> = None;
        let mut group_id = String::new();
        let mut artifact_id = String::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let tag = String::from_utf8_lossy(e.name().as_ref())
                        .to_string();
                    if tag == "dependency" {
                        in_dependency = true;
                        group_id.clear();
                        artifact_id.clear();
                    } else if in_dependency {
                        current_tag = Some(tag);
                    }
                }
                Event::Text(t) => {
                    if in_dependency {
                        match current_tag.as_deref() {
                            Some("groupId") => {
                                group_id =
                                    t.unescape()?.trim().to_string();
                            }
                            Some("artifactId") => {
                                artifact_id =
                                    t.unescape()?.trim().to_string();
                            }
                            _ => {}
                        }
                    }
                }
                Event::End(e) => {
                    let tag = String::from_utf8_lossy(e.name().as_ref())
                        .to_string();
                    if tag == "dependency" {
                        in_dependency = false;
                        if !group_id.is_empty()
                            && !artifact_id.is_empty()
                        {
                            coordinates.push(format!(
                                "{group_id}:{artifact_id}"
                            ));
                        }
                    } else {
                        current_tag = None;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(coordinates)
    }

    /// Extract `group:artifact` coordinates from a Gradle build script.
    /// Gradle scripts are code, so this is a bounded text match over
    /// quoted dependency notation, not a parse.
    fn gradle_coordinates(content: &str) -> Vec<String> {
        let mut coordinates = Vec::new();
        for line in content.lines() {
            for quote in ['\'', '"'] {
                let mut rest = line;
                while let Some(start) = rest.find(quote) {
                    let after = &rest[start + 1..];
                    let Some(end) = after.find(quote) else { break };
                    let literal = &after[..end];
                    let parts: Vec<&str> =
                        literal.split(':').collect();
                    if parts.len() >= 2
                        && !parts[0].is_empty()
                        && !parts[1].is_empty()
                    {
                        coordinates.push(format!(
                            "{}:{}",
                            parts[0], parts[1]
                        ));
                    }
                    rest = &after[end + 1..];
                }
            }
        }
        coordinates
    }

    fn anchors_from(
        &self,
        coordinates: &[String],
        source: &str,
        scan: &mut ManifestScan,
    ) {
        for coordinate in coordinates {
            for anchor in &self.anchors {
                if coordinate == anchor.dependency {
                    debug!(
                        "java anchor: {} -> {}",
                        coordinate, anchor.platform
                    );
                    scan.anchors.push(AnchorResult {
                        platform: anchor.platform,
                        framework: anchor.framework,
                        language: Some(Language::Java),
                        evidence: Evidence::new(source, coordinate),
                    });
                }
            }
        }
    }
}

#[async_trait]
impl ManifestReader for JavaReader {
    fn name(&self) -> &str {
        "java"
    }

    async fn scan(&self, root: &Path) -> Result<ManifestScan> {
        let mut scan = ManifestScan::default();

        if let Some(content) =
            read_optional(&root.join(POM_XML)).await?
        {
            scan.package_manager_files.push(POM_XML.to_string());
            match Self::pom_coordinates(&content) {
                Ok(coordinates) => {
                    self.anchors_from(&coordinates, POM_XML, &mut scan);
                }
                Err(e) => {
                    // Malformed pom is non-fatal for detection
                    warn!("failed to parse {POM_XML}: {e}");
                }
            }
        }

        for gradle_file in GRADLE_FILES {
            if let Some(content) =
                read_optional(&root.join(gradle_file)).await?
            {
                scan.package_manager_files
                    .push(gradle_file.to_string());
                let coordinates = Self::gradle_coordinates(&content);
                self.anchors_from(&coordinates, gradle_file, &mut scan);
            }
        }

        Ok(scan)
    }
}
