//! Java source transformer.
//!
//! Java suites drive snapshots through a client object (`Percy percy`,
//! `Eyes eyes`, `VisualApi visual`); the SmartUI equivalent is the
//! static `SmartUISnapshot.smartuiSnapshot(driver, name)` call, so the
//! rules rewrite imports to the single SmartUI import, drop the client
//! instantiation line, and rewrite each call site.

use crate::detector::types::Platform;
use crate::error::Result;
use crate::transformer::rules::{RewriteRule, RuleSet, WarnRule};
use crate::transformer::types::{TransformContext, TransformOutcome};

const SMARTUI_IMPORT: &str = "import io.github.smartui.SmartUISnapshot;";

pub struct JavaTransformer {
    rules: RuleSet,
}

impl JavaTransformer {
    pub fn new(ctx: &TransformContext) -> Result<Self> {
        let rules = match ctx.platform {
            Platform::Percy => percy_rules()?,
            Platform::Applitools => applitools_rules()?,
            Platform::SauceLabs => saucelabs_rules()?,
        };
        Ok(Self { rules })
    }

    pub fn transform(&self, content: &str) -> TransformOutcome {
        self.rules.apply(content)
    }
}

fn percy_rules() -> Result<RuleSet> {
    let rewrites = vec![
        RewriteRule::first(
            r"(?m)^import io\.percy\.(?:selenium|appium)\.[A-Za-z]+;[ \t]*$",
            SMARTUI_IMPORT,
        )?,
        RewriteRule::new(
            r"(?m)^import io\.percy\.(?:selenium|appium)\.[A-Za-z]+;[ \t]*\r?\n",
            "",
        )?,
        RewriteRule::new(
            r"(?m)^[ \t]*(?:private\s+|final\s+)*Percy\s+\w+\s*=\s*new Percy\([^)]*\);[ \t]*\r?\n",
            "",
        )?,
        RewriteRule::snapshot(
            r"\bpercy\.snapshot\(",
            "SmartUISnapshot.smartuiSnapshot(driver, ",
        )?,
        RewriteRule::snapshot(
            r"\bpercy\.screenshot\(",
            "SmartUISnapshot.smartuiSnapshot(driver, ",
        )?,
    ];

    Ok(RuleSet::new(rewrites, vec![]))
}

fn applitools_rules() -> Result<RuleSet> {
    let rewrites = vec![
        RewriteRule::first(
            r"(?m)^import com\.applitools\.eyes[^;\n]*;[ \t]*$",
            SMARTUI_IMPORT,
        )?,
        RewriteRule::new(
            r"(?m)^import com\.applitools\.eyes[^;\n]*;[ \t]*\r?\n",
            "",
        )?,
        RewriteRule::new(
            r"(?m)^[ \t]*(?:private\s+|final\s+)*Eyes\s+\w+\s*=\s*new Eyes\([^)]*\);[ \t]*\r?\n",
            "",
        )?,
        RewriteRule::with_warning(
            r"(?m)^[ \t]*\w+\.open\([^;]*\);[ \t]*\r?\n",
            "",
            "configuration passed to eyes.open was dropped; set app and project options in .smartui.json",
        )?,
        RewriteRule::new(
            r"(?m)^[ \t]*\w+\.close(?:Async)?\(\s*\);[ \t]*\r?\n",
            "",
        )?,
        RewriteRule::snapshot(
            r"\b\w+\.checkWindow\(",
            "SmartUISnapshot.smartuiSnapshot(driver, ",
        )?,
    ];

    let warns = vec![
        WarnRule::new(
            r"\b\w+\.check\(",
            "eyes.check with a region or layout target has no equivalent and was left in place",
        )?,
        // Lifecycle calls not in plain statement form survive the
        // removal rules above; flag whatever is still present.
        WarnRule::new(
            r"\b\w+\.open\(",
            "an eyes.open call was left in place and must be removed manually; SmartUI needs no session setup",
        )?,
        WarnRule::new(
            r"\b\w+\.close(?:Async)?\(\s*\)",
            "an eyes.close call was left in place and must be removed manually",
        )?,
    ];

    Ok(RuleSet::new(rewrites, warns))
}

fn saucelabs_rules() -> Result<RuleSet> {
    let rewrites = vec![
        RewriteRule::first(
            r"(?m)^import com\.saucelabs\.visual[^;\n]*;[ \t]*$",
            SMARTUI_IMPORT,
        )?,
        RewriteRule::new(
            r"(?m)^import com\.saucelabs\.visual[^;\n]*;[ \t]*\r?\n",
            "",
        )?,
        RewriteRule::new(
            r"(?m)^[ \t]*(?:private\s+|final\s+)*VisualApi\s+\w+\s*=\s*new VisualApi\([^;]*\);[ \t]*\r?\n",
            "",
        )?,
        RewriteRule::snapshot(
            r"\b\w+\.sauceVisualCheck\(",
            "SmartUISnapshot.smartuiSnapshot(driver, ",
        )?,
    ];

    Ok(RuleSet::new(rewrites, vec![]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::types::{
        Framework, Language, Platform, TestType,
    };

    fn ctx(platform: Platform) -> TransformContext {
        TransformContext {
            platform,
            framework: Framework::Selenium,
            language: Language::Java,
            test_type: TestType::E2e,
        }
    }

    #[test]
    fn test_percy_selenium_rewrite() {
        let t = JavaTransformer::new(&ctx(Platform::Percy)).unwrap();
        let outcome = t.transform(
            "import io.percy.selenium.Percy;\n\npublic class HomeTest {\n    private Percy percy = new Percy(driver);\n\n    public void homePage() {\n        percy.snapshot(\"Home Page\");\n    }\n}\n",
        );
        assert!(outcome
            .content
            .contains("import io.github.smartui.SmartUISnapshot;"));
        assert!(!outcome.content.contains("new Percy"));
        assert!(outcome.content.contains(
            "SmartUISnapshot.smartuiSnapshot(driver, \"Home Page\");"
        ));
        assert_eq!(outcome.snapshot_count, 1);
    }

    #[test]
    fn test_applitools_rewrite() {
        let t =
            JavaTransformer::new(&ctx(Platform::Applitools)).unwrap();
        let outcome = t.transform(
            "import com.applitools.eyes.selenium.Eyes;\nimport com.applitools.eyes.TestResults;\n\npublic class HomeTest {\n    Eyes eyes = new Eyes();\n\n    public void homePage() {\n        eyes.open(driver, \"shop\", \"home\");\n        eyes.checkWindow(\"Home Page\");\n        eyes.close();\n    }\n}\n",
        );
        assert!(outcome
            .content
            .contains("import io.github.smartui.SmartUISnapshot;"));
        assert!(!outcome.content.contains("com.applitools"));
        assert!(!outcome.content.contains("eyes.open"));
        assert!(!outcome.content.contains("eyes.close"));
        assert!(outcome.content.contains(
            "SmartUISnapshot.smartuiSnapshot(driver, \"Home Page\");"
        ));
        assert_eq!(outcome.snapshot_count, 1);
        assert!(outcome.warnings.iter().any(|w| w.contains("eyes.open")));
    }

    #[test]
    fn test_applitools_assigned_open_left_in_place_warns() {
        let t =
            JavaTransformer::new(&ctx(Platform::Applitools)).unwrap();
        let outcome = t.transform(
            "import com.applitools.eyes.selenium.Eyes;\n\npublic class HomeTest {\n    public void homePage() {\n        TestResults results = eyes.open(driver, \"shop\", \"home\");\n        eyes.checkWindow(\"Home Page\");\n    }\n}\n",
        );
        // The open call is part of an assignment, so the statement
        // removal rule cannot fire; it must be surfaced, not dropped.
        assert!(outcome.content.contains("eyes.open(driver"));
        assert!(outcome.content.contains(
            "SmartUISnapshot.smartuiSnapshot(driver, \"Home Page\");"
        ));
        assert!(outcome.warnings.iter().any(|w| {
            w.contains("eyes.open") && w.contains("manually")
        }));
    }

    #[test]
    fn test_saucelabs_rewrite() {
        let t =
            JavaTransformer::new(&ctx(Platform::SauceLabs)).unwrap();
        let outcome = t.transform(
            "import com.saucelabs.visual.VisualApi;\n\npublic class HomeTest {\n    VisualApi visual = new VisualApi(driver, region, accessKey);\n\n    public void homePage() {\n        visual.sauceVisualCheck(\"Home Page\");\n    }\n}\n",
        );
        assert!(outcome
            .content
            .contains("import io.github.smartui.SmartUISnapshot;"));
        assert!(!outcome.content.contains("VisualApi"));
        assert!(outcome.content.contains(
            "SmartUISnapshot.smartuiSnapshot(driver, \"Home Page\");"
        ));
        assert_eq!(outcome.snapshot_count, 1);
    }

    #[test]
    fn test_idempotent() {
        let t = JavaTransformer::new(&ctx(Platform::Percy)).unwrap();
        let first = t.transform(
            "import io.percy.selenium.Percy;\npercy.snapshot(\"x\");\n",
        );
        let second = t.transform(&first.content);
        assert_eq!(second.content, first.content);
        assert_eq!(second.snapshot_count, 0);
    }
}
