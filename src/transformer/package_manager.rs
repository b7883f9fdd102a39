//! Package-manager transformer: swaps the source platform's SDK
//! dependencies for the SmartUI SDK.
//!
//! package.json is parsed and edited structurally (key order
//! preserved); requirements.txt, pyproject.toml, pom.xml, and Gradle
//! build files are rewritten with coordinate-level text rules.

use serde_json::{Map, Value, json};

use crate::detector::types::{Framework, Platform};
use crate::error::Result;
use crate::transformer::ci::script_rules;
use crate::transformer::rules::{RewriteRule, RuleSet};
use crate::transformer::types::{TransformContext, TransformOutcome};

const SMARTUI_CLI_PACKAGE: &str = "@smartui/cli";
const SMARTUI_VERSION: &str = "^1.0.0";

pub struct PackageManagerTransformer {
    ctx: TransformContext,
    scripts: RuleSet,
    python: RuleSet,
    java: RuleSet,
}

impl PackageManagerTransformer {
    pub fn new(ctx: &TransformContext) -> Result<Self> {
        Ok(Self {
            ctx: *ctx,
            scripts: script_rules(ctx.platform)?,
            python: python_rules(ctx.platform)?,
            java: java_rules(ctx.platform)?,
        })
    }

    pub fn transform(
        &self,
        path: &str,
        content: &str,
    ) -> Result<TransformOutcome> {
        let filename = path.rsplit('/').next().unwrap_or(path);
        match filename {
            "package.json" => self.node_package(content),
            "requirements.txt" | "pyproject.toml" => {
                Ok(self.python.apply(content))
            }
            "pom.xml" | "build.gradle" | "build.gradle.kts" => {
                Ok(self.java.apply(content))
            }
            _ => Ok(TransformOutcome::unchanged(content)),
        }
    }

    fn node_package(&self, content: &str) -> Result<TransformOutcome> {
        let mut package: Map<String, Value> =
            serde_json::from_str(content)?;
        let mut warnings = Vec::new();

        for table in ["dependencies", "devDependencies"] {
            if let Some(deps) =
                package.get_mut(table).and_then(Value::as_object_mut)
            {
                deps.retain(|name, _| {
                    !self.is_platform_package(name)
                });
            }
        }

        // New SDK dependencies land in devDependencies, where visual
        // testing tooling conventionally lives.
        let dev = package
            .entry("devDependencies".to_string())
            .or_insert_with(|| json!({}));
        if let Some(dev) = dev.as_object_mut() {
            dev.entry(SMARTUI_CLI_PACKAGE.to_string())
                .or_insert_with(|| json!(SMARTUI_VERSION));
            if let Some(sdk) = node_sdk_package(self.ctx.framework) {
                dev.entry(sdk.to_string())
                    .or_insert_with(|| json!(SMARTUI_VERSION));
            }
        }

        if let Some(scripts) =
            package.get_mut("scripts").and_then(Value::as_object_mut)
        {
            for value in scripts.values_mut() {
                if let Some(script) = value.as_str() {
                    let outcome = self.scripts.apply(script);
                    warnings.extend(outcome.warnings);
                    *value = json!(outcome.content);
                }
            }
        }

        let mut rendered =
            serde_json::to_string_pretty(&Value::Object(package))?;
        rendered.push('\n');

        Ok(TransformOutcome {
            content: rendered,
            snapshot_count: 0,
            warnings,
        })
    }

    fn is_platform_package(&self, name: &str) -> bool {
        let prefixes: &[&str] = match self.ctx.platform {
            Platform::Percy => &["@percy/"],
            Platform::Applitools => &["@applitools/"],
            Platform::SauceLabs => &["@saucelabs/", "screener-"],
        };
        prefixes.iter().any(|p| name.starts_with(p))
    }
}

/// Node SDK package for the detected framework, if one exists.
fn node_sdk_package(framework: Framework) -> Option<&'static str> {
    match framework {
        Framework::Cypress => Some("@smartui/cypress"),
        Framework::Playwright => Some("@smartui/playwright"),
        Framework::Puppeteer => Some("@smartui/puppeteer"),
        Framework::Selenium => Some("@smartui/selenium"),
        Framework::WebdriverIO => Some("@smartui/wdio"),
        Framework::Storybook => Some("@smartui/storybook"),
        Framework::Appium => Some("@smartui/appium"),
        Framework::RobotFramework => None,
    }
}

fn python_rules(platform: Platform) -> Result<RuleSet> {
    let name_map: &[(&str, &str)] = match platform {
        Platform::Percy => &[
            ("percy-selenium", "smartui-selenium"),
            ("percy-playwright", "smartui-playwright"),
            ("percy-appium-app", "smartui-appium"),
        ],
        Platform::Applitools => &[
            ("eyes-selenium", "smartui-selenium"),
            ("eyes-playwright", "smartui-playwright"),
            ("eyes-robotframework", "smartui-robotframework"),
        ],
        Platform::SauceLabs => {
            &[("saucelabs-visual", "smartui-selenium")]
        }
    };

    let mut rewrites = Vec::new();
    for (from, to) in name_map {
        let escaped = regex::escape(from);
        // requirements.txt line, version specifier dropped
        rewrites.push(RewriteRule::new(
            &format!(r"(?m)^{escaped}(?:[=<>~!\[][^\n]*)?$"),
            to,
        )?);
        // pyproject.toml quoted requirement string
        rewrites.push(RewriteRule::new(
            &format!(r#""{escaped}[^"]*""#),
            &format!(r#""{to}""#),
        )?);
    }

    Ok(RuleSet::new(rewrites, vec![]))
}

fn java_rules(platform: Platform) -> Result<RuleSet> {
    let rewrites = match platform {
        Platform::Percy => vec![
            RewriteRule::new(
                r"<groupId>io\.percy</groupId>",
                "<groupId>io.github.smartui</groupId>",
            )?,
            RewriteRule::new(
                r"<artifactId>percy-java-selenium</artifactId>",
                "<artifactId>smartui-java-selenium</artifactId>",
            )?,
            RewriteRule::new(
                r"<artifactId>percy-appium-app</artifactId>",
                "<artifactId>smartui-appium-app</artifactId>",
            )?,
            RewriteRule::new(
                r"io\.percy:percy-java-selenium",
                "io.github.smartui:smartui-java-selenium",
            )?,
            RewriteRule::new(
                r"io\.percy:percy-appium-app",
                "io.github.smartui:smartui-appium-app",
            )?,
        ],
        Platform::Applitools => vec![
            RewriteRule::new(
                r"<groupId>com\.applitools</groupId>",
                "<groupId>io.github.smartui</groupId>",
            )?,
            RewriteRule::new(
                r"<artifactId>eyes-selenium-java[35]</artifactId>",
                "<artifactId>smartui-java-selenium</artifactId>",
            )?,
            RewriteRule::new(
                r"<artifactId>eyes-appium-java5</artifactId>",
                "<artifactId>smartui-appium-app</artifactId>",
            )?,
            RewriteRule::new(
                r"com\.applitools:eyes-selenium-java[35]",
                "io.github.smartui:smartui-java-selenium",
            )?,
            RewriteRule::new(
                r"com\.applitools:eyes-appium-java5",
                "io.github.smartui:smartui-appium-app",
            )?,
        ],
        Platform::SauceLabs => vec![
            // groupId and artifactId swapped as a pair, so an
            // unrelated java-client artifact is never touched
            RewriteRule::new(
                r"<groupId>com\.saucelabs\.visual</groupId>(\s*)<artifactId>java-client</artifactId>",
                "<groupId>io.github.smartui</groupId>$1<artifactId>smartui-java-selenium</artifactId>",
            )?,
            RewriteRule::new(
                r"com\.saucelabs\.visual:java-client",
                "io.github.smartui:smartui-java-selenium",
            )?,
        ],
    };

    Ok(RuleSet::new(rewrites, vec![]))
}
