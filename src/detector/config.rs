//! Static detection tables: ignore patterns, marker strings, dependency
//! maps, and framework signature weights.
//!
//! All tables are immutable data injected into the resolver and scorer at
//! construction time, never module-level mutable state, so tests can
//! substitute alternate tables without process-wide side effects.

use crate::detector::types::{Framework, Language, Platform};

/// Directories never descended into by the anchor resolver or the content
/// scanner. Build output, package caches, version control.
pub const DEFAULT_IGNORES: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    "target",
    "__pycache__",
    ".pytest_cache",
    "coverage",
    ".nyc_output",
    "vendor",
    ".venv",
    "venv",
    ".tox",
    ".idea",
    ".vscode",
];

/// A dependency name that anchors a `(platform, framework)` pair within
/// one language ecosystem.
#[derive(Debug, Clone, Copy)]
pub struct DependencyAnchor {
    pub dependency: &'static str,
    pub platform: Platform,
    pub framework: Option<Framework>,
}

/// A config filename that anchors a platform with no framework attached.
#[derive(Debug, Clone, Copy)]
pub struct ConfigAnchor {
    pub filename: &'static str,
    pub platform: Platform,
}

/// One weighted regex signature for a framework within one ecosystem.
/// Stronger signals carry larger weights; a signature contributes its
/// weight at most once per file.
#[derive(Debug, Clone, Copy)]
pub struct FrameworkSignature {
    pub framework: Framework,
    pub language: Language,
    pub pattern: &'static str,
    pub weight: u32,
}

/// Immutable detection configuration shared by the resolver, scanner, and
/// scorer.
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    pub ignore_dirs: Vec<&'static str>,
    pub node_dependencies: Vec<DependencyAnchor>,
    pub java_dependencies: Vec<DependencyAnchor>,
    pub python_dependencies: Vec<DependencyAnchor>,
    pub config_anchors: Vec<ConfigAnchor>,
    pub markers: Vec<(Platform, Vec<&'static str>)>,
    pub signatures: Vec<FrameworkSignature>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            ignore_dirs: DEFAULT_IGNORES.to_vec(),
            node_dependencies: node_dependency_anchors(),
            java_dependencies: java_dependency_anchors(),
            python_dependencies: python_dependency_anchors(),
            config_anchors: config_file_anchors(),
            markers: platform_markers(),
            signatures: framework_signatures(),
        }
    }
}

impl DetectionConfig {
    /// Marker strings for a single platform.
    pub fn markers_for(&self, platform: Platform) -> Vec<&'static str> {
        self.markers
            .iter()
            .filter(|(p, _)| *p == platform)
            .flat_map(|(_, m)| m.iter().copied())
            .collect()
    }

    /// Union of all platforms' markers, used for cold search.
    pub fn all_markers(&self) -> Vec<&'static str> {
        self.markers
            .iter()
            .flat_map(|(_, m)| m.iter().copied())
            .collect()
    }

    /// Candidate source extensions across all supported ecosystems.
    pub fn candidate_extensions(&self) -> Vec<&'static str> {
        let mut exts = Vec::new();
        for lang in
            [Language::JavaScript, Language::Java, Language::Python]
        {
            exts.extend_from_slice(lang.extensions());
        }
        exts
    }

    /// Fixed default framework per ecosystem, used when the scorer ties
    /// or finds nothing. This guarantees the pipeline never stalls on
    /// framework ambiguity.
    pub fn default_framework(&self, language: Language) -> Framework {
        match language {
            Language::JavaScript => Framework::Cypress,
            Language::Java => Framework::Selenium,
            Language::Python => Framework::Selenium,
        }
    }

    /// Signatures applicable to files of the given ecosystem.
    pub fn signatures_for(
        &self,
        language: Language,
    ) -> Vec<&FrameworkSignature> {
        self.signatures
            .iter()
            .filter(|s| s.language == language)
            .collect()
    }
}

fn node_dependency_anchors() -> Vec<DependencyAnchor> {
    use Framework::*;
    use Platform::*;
    let table: &[(&str, Platform, Option<Framework>)] = &[
        ("@percy/cypress", Percy, Some(Cypress)),
        ("@percy/playwright", Percy, Some(Playwright)),
        ("@percy/puppeteer", Percy, Some(Puppeteer)),
        ("@percy/selenium-webdriver", Percy, Some(Selenium)),
        ("@percy/storybook", Percy, Some(Storybook)),
        ("@percy/appium-app", Percy, Some(Appium)),
        ("@percy/cli", Percy, None),
        ("@applitools/eyes-cypress", Applitools, Some(Cypress)),
        ("@applitools/eyes-playwright", Applitools, Some(Playwright)),
        ("@applitools/eyes-puppeteer", Applitools, Some(Puppeteer)),
        ("@applitools/eyes-selenium", Applitools, Some(Selenium)),
        ("@applitools/eyes-webdriverio", Applitools, Some(WebdriverIO)),
        ("@applitools/eyes-storybook", Applitools, Some(Storybook)),
        ("@saucelabs/cypress-visual-plugin", SauceLabs, Some(Cypress)),
        ("@saucelabs/visual", SauceLabs, None),
        ("screener-storybook", SauceLabs, Some(Storybook)),
        ("screener-runner", SauceLabs, None),
    ];
    table
        .iter()
        .map(|&(dependency, platform, framework)| DependencyAnchor {
            dependency,
            platform,
            framework,
        })
        .collect()
}

fn java_dependency_anchors() -> Vec<DependencyAnchor> {
    use Framework::*;
    use Platform::*;
    let table: &[(&str, Platform, Option<Framework>)] = &[
        ("io.percy:percy-java-selenium", Percy, Some(Selenium)),
        ("io.percy:percy-appium-app", Percy, Some(Appium)),
        (
            "com.applitools:eyes-selenium-java5",
            Applitools,
            Some(Selenium),
        ),
        (
            "com.applitools:eyes-selenium-java3",
            Applitools,
            Some(Selenium),
        ),
        ("com.applitools:eyes-appium-java5", Applitools, Some(Appium)),
        ("com.saucelabs.visual:java-client", SauceLabs, Some(Selenium)),
    ];
    table
        .iter()
        .map(|&(dependency, platform, framework)| DependencyAnchor {
            dependency,
            platform,
            framework,
        })
        .collect()
}

fn python_dependency_anchors() -> Vec<DependencyAnchor> {
    use Framework::*;
    use Platform::*;
    let table: &[(&str, Platform, Option<Framework>)] = &[
        ("percy-selenium", Percy, Some(Selenium)),
        ("percy-appium-app", Percy, Some(Appium)),
        ("percy-playwright", Percy, Some(Playwright)),
        ("eyes-selenium", Applitools, Some(Selenium)),
        ("eyes-robotframework", Applitools, Some(RobotFramework)),
        ("eyes-playwright", Applitools, Some(Playwright)),
        ("saucelabs-visual", SauceLabs, Some(Selenium)),
    ];
    table
        .iter()
        .map(|&(dependency, platform, framework)| DependencyAnchor {
            dependency,
            platform,
            framework,
        })
        .collect()
}

fn config_file_anchors() -> Vec<ConfigAnchor> {
    use Platform::*;
    let table: &[(&str, Platform)] = &[
        (".percy.yml", Percy),
        (".percy.yaml", Percy),
        (".percy.json", Percy),
        ("percy.config.js", Percy),
        ("applitools.config.js", Applitools),
        ("eyes.config.js", Applitools),
        ("screener.config.js", SauceLabs),
        ("screener.config.json", SauceLabs),
    ];
    table
        .iter()
        .map(|&(filename, platform)| ConfigAnchor { filename, platform })
        .collect()
}

/// Magic strings: literal tokens whose presence in source text is treated
/// as evidence of a platform's API usage.
fn platform_markers() -> Vec<(Platform, Vec<&'static str>)> {
    vec![
        (
            Platform::Percy,
            vec![
                "percySnapshot",
                "percy_snapshot",
                "percyScreenshot",
                "percy_screenshot",
                "@percy/",
                "io.percy.selenium",
                "Percy Snapshot",
            ],
        ),
        (
            Platform::Applitools,
            vec![
                "eyes.open",
                "eyes.check",
                "eyes_open",
                "eyes.check_window",
                "eyesOpen",
                "eyesCheckWindow",
                "@applitools/",
                "com.applitools.eyes",
                "Eyes Check Window",
            ],
        ),
        (
            Platform::SauceLabs,
            vec![
                "sauceVisualCheck",
                "sauce_visual_check",
                "@saucelabs/visual",
                "com.saucelabs.visual",
                "screener-storybook",
                "sauce:visual",
            ],
        ),
    ]
}

/// Per-framework weighted signatures, strongest signal first. A generic
/// `describe(` block is shared across JS frameworks and must not dominate
/// library-specific call patterns.
fn framework_signatures() -> Vec<FrameworkSignature> {
    use Framework::*;
    use Language::*;
    let table: &[(Framework, Language, &str, u32)] = &[
        (Cypress, JavaScript, r"\bcy\.[a-zA-Z]", 10),
        (
            Cypress,
            JavaScript,
            r"\bCypress\.(Commands|config|env)\b",
            10,
        ),
        (Cypress, JavaScript, r#"require\(['"]cypress['"]\)"#, 8),
        (Cypress, JavaScript, r"\bdescribe\(", 1),
        (Cypress, JavaScript, r"\bit\(", 1),
        (
            Playwright,
            JavaScript,
            r#"from ['"]@playwright/test['"]"#,
            10,
        ),
        (Playwright, JavaScript, r#"require\(['"]playwright['"]\)"#, 8),
        (
            Playwright,
            JavaScript,
            r"\bpage\.(goto|locator|screenshot)\b",
            6,
        ),
        (Playwright, JavaScript, r"\btest\(", 2),
        (Puppeteer, JavaScript, r#"require\(['"]puppeteer['"]\)"#, 10),
        (Puppeteer, JavaScript, r"\bpuppeteer\.launch\b", 10),
        (
            WebdriverIO,
            JavaScript,
            r"\bbrowser\.(url|pause|execute)\b",
            8,
        ),
        (WebdriverIO, JavaScript, r#"from ['"]@wdio/"#, 10),
        (Storybook, JavaScript, r#"from ['"]@storybook/"#, 10),
        (Storybook, JavaScript, r"\bstoriesOf\(", 8),
        (Storybook, JavaScript, r"export default \{\s*title:", 6),
        (Selenium, Java, r"org\.openqa\.selenium", 10),
        (Selenium, Java, r"\bWebDriver\b", 6),
        (Selenium, Java, r"new ChromeDriver\(", 6),
        (Selenium, Python, r"from selenium import webdriver", 10),
        (Selenium, Python, r"\bwebdriver\.(Chrome|Firefox|Edge)\(", 8),
        (Appium, Python, r"from appium import", 10),
        (Appium, Python, r"\bwebdriver\.Remote\(", 6),
        (RobotFramework, Python, r"\*\*\* Test Cases \*\*\*", 10),
        (RobotFramework, Python, r"\*\*\* Settings \*\*\*", 8),
    ];
    table
        .iter()
        .map(|&(framework, language, pattern, weight)| {
            FrameworkSignature {
                framework,
                language,
                pattern,
                weight,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_for_single_platform() {
        let config = DetectionConfig::default();
        let percy = config.markers_for(Platform::Percy);
        assert!(percy.contains(&"percySnapshot"));
        assert!(!percy.contains(&"eyes.check"));
    }

    #[test]
    fn test_all_markers_is_union() {
        let config = DetectionConfig::default();
        let all = config.all_markers();
        for platform in Platform::all() {
            for marker in config.markers_for(platform) {
                assert!(all.contains(&marker));
            }
        }
    }

    #[test]
    fn test_default_frameworks() {
        let config = DetectionConfig::default();
        assert_eq!(
            config.default_framework(Language::JavaScript),
            Framework::Cypress
        );
        assert_eq!(
            config.default_framework(Language::Java),
            Framework::Selenium
        );
        assert_eq!(
            config.default_framework(Language::Python),
            Framework::Selenium
        );
    }

    #[test]
    fn test_signature_patterns_compile() {
        let config = DetectionConfig::default();
        for sig in &config.signatures {
            assert!(
                regex::Regex::new(sig.pattern).is_ok(),
                "invalid pattern: {}",
                sig.pattern
            );
        }
    }

    #[test]
    fn test_signatures_partition_by_ecosystem() {
        let config = DetectionConfig::default();
        let js = config.signatures_for(Language::JavaScript);
        assert!(js.iter().all(|s| s.language == Language::JavaScript));
        assert!(!js.is_empty());
    }
}
