//! Platform config transformer: turns a Percy/Applitools/Sauce Labs
//! config file into proposed `.smartui.json` content.
//!
//! YAML and JSON configs are parsed and mapped key by key; JS-format
//! configs (`percy.config.js`, `applitools.config.js`,
//! `screener.config.js`) cannot be evaluated, so they produce a default
//! skeleton plus a warning per recognized setting found in the text.

use serde_json::json;

use crate::error::Result;
use crate::transformer::types::{TransformContext, TransformOutcome};

/// Proposed filename for the generated SmartUI project config.
pub const SMARTUI_CONFIG_FILE: &str = ".smartui.json";

const DEFAULT_BROWSERS: &[&str] = &["chrome", "firefox", "safari"];

pub struct ConfigTransformer;

impl ConfigTransformer {
    pub fn new(_ctx: &TransformContext) -> Self {
        Self
    }

    /// Map one platform config file to `.smartui.json` content.
    pub fn transform(
        &self,
        path: &str,
        content: &str,
    ) -> Result<TransformOutcome> {
        if path.ends_with(".yml") || path.ends_with(".yaml") {
            let value: serde_yaml::Value =
                serde_yaml::from_str(content)?;
            let json = serde_json::to_value(&value)?;
            self.from_percy_value(&json)
        } else if path.ends_with(".json") {
            let value: serde_json::Value =
                serde_json::from_str(content)?;
            if path.contains("screener") {
                self.from_screener_value(&value)
            } else {
                self.from_percy_value(&value)
            }
        } else {
            self.from_js_config(content)
        }
    }

    fn from_percy_value(
        &self,
        value: &serde_json::Value,
    ) -> Result<TransformOutcome> {
        let mut warnings = Vec::new();

        let snapshot = &value["snapshot"];
        let viewports = snapshot["widths"]
            .as_array()
            .map(|widths| {
                widths
                    .iter()
                    .filter_map(|w| w.as_u64())
                    .map(|w| json!([w]))
                    .collect::<Vec<_>>()
            })
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_viewports);

        if !snapshot["percy-css"].is_null()
            || !snapshot["percyCSS"].is_null()
        {
            warnings.push(
                "percy-css has no equivalent; move the styles into the pages under test"
                    .to_string(),
            );
        }
        if !snapshot["min-height"].is_null()
            || !snapshot["minHeight"].is_null()
        {
            warnings.push(
                "min-height is not carried over; SmartUI captures the full page by default"
                    .to_string(),
            );
        }
        if !value["discovery"].is_null() {
            warnings.push(
                "discovery settings have no equivalent and were not carried over"
                    .to_string(),
            );
        }

        render(viewports, warnings)
    }

    fn from_screener_value(
        &self,
        value: &serde_json::Value,
    ) -> Result<TransformOutcome> {
        let mut warnings = Vec::new();

        // Screener resolutions are "WxH" strings.
        let viewports = value["resolution"]
            .as_str()
            .and_then(parse_resolution)
            .map(|(w, h)| vec![json!([w, h])])
            .unwrap_or_else(default_viewports);

        if !value["apiKey"].is_null() {
            warnings.push(
                "apiKey was not carried over; provision a SMARTUI_PROJECT_TOKEN instead"
                    .to_string(),
            );
        }
        if !value["diffOptions"].is_null() {
            warnings.push(
                "diffOptions have no equivalent and were not carried over"
                    .to_string(),
            );
        }

        render(viewports, warnings)
    }

    fn from_js_config(
        &self,
        content: &str,
    ) -> Result<TransformOutcome> {
        let mut warnings = vec![
            "JS-format config cannot be evaluated; a default .smartui.json was proposed, review it manually"
                .to_string(),
        ];

        for key in
            ["apiKey", "batchName", "concurrency", "percyCSS", "browser"]
        {
            if content.contains(key) {
                warnings.push(format!(
                    "setting '{key}' was not carried over from the JS config"
                ));
            }
        }

        render(default_viewports(), warnings)
    }
}

fn default_viewports() -> Vec<serde_json::Value> {
    vec![json!([1920, 1080])]
}

fn parse_resolution(s: &str) -> Option<(u64, u64)> {
    let (w, h) = s.split_once('x')?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

fn render(
    viewports: Vec<serde_json::Value>,
    warnings: Vec<String>,
) -> Result<TransformOutcome> {
    let config = json!({
        "web": {
            "browsers": DEFAULT_BROWSERS,
            "viewports": viewports,
        }
    });

    let mut content = serde_json::to_string_pretty(&config)?;
    content.push('\n');

    Ok(TransformOutcome {
        content,
        snapshot_count: 0,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::types::{
        Framework, Language, Platform, TestType,
    };

    fn transformer() -> ConfigTransformer {
        ConfigTransformer::new(&TransformContext {
            platform: Platform::Percy,
            framework: Framework::Cypress,
            language: Language::JavaScript,
            test_type: TestType::E2e,
        })
    }

    #[test]
    fn test_percy_yaml_widths_become_viewports() {
        let outcome = transformer()
            .transform(
                ".percy.yml",
                "version: 2\nsnapshot:\n  widths: [375, 1280]\n",
            )
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&outcome.content).unwrap();
        assert_eq!(
            value["web"]["viewports"],
            serde_json::json!([[375], [1280]])
        );
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_percy_css_warns() {
        let outcome = transformer()
            .transform(
                ".percy.yml",
                "version: 2\nsnapshot:\n  widths: [1280]\n  percy-css: \".ad { display: none; }\"\n",
            )
            .unwrap();
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("percy-css"));
    }

    #[test]
    fn test_screener_resolution_parsed() {
        let outcome = transformer()
            .transform(
                "screener.config.json",
                r#"{ "apiKey": "abc", "resolution": "1024x768" }"#,
            )
            .unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&outcome.content).unwrap();
        assert_eq!(
            value["web"]["viewports"],
            serde_json::json!([[1024, 768]])
        );
        assert!(outcome.warnings.iter().any(|w| w.contains("apiKey")));
    }

    #[test]
    fn test_js_config_gets_default_skeleton() {
        let outcome = transformer()
            .transform(
                "applitools.config.js",
                "module.exports = { apiKey: 'abc', batchName: 'shop' };\n",
            )
            .unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&outcome.content).unwrap();
        assert!(value["web"]["browsers"].is_array());
        assert!(outcome.warnings.len() >= 3);
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let result = transformer()
            .transform(".percy.yml", "snapshot: [unclosed\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_widths_fall_back_to_default() {
        let outcome = transformer()
            .transform(".percy.yml", "version: 2\n")
            .unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&outcome.content).unwrap();
        assert_eq!(
            value["web"]["viewports"],
            serde_json::json!([[1920, 1080]])
        );
    }
}
