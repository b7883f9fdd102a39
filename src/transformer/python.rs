//! Python source transformer, including Robot Framework tabular files.
//!
//! `.py` files get import plus call-site rewrites targeting
//! `smartui_snapshot`; `.robot` files get keyword-row and Library-row
//! rewrites targeting `SmartUILibrary`. Both rule sets are built for
//! the detected platform and the file extension picks which applies.

use crate::detector::types::Platform;
use crate::error::Result;
use crate::transformer::rules::{RewriteRule, RuleSet, WarnRule};
use crate::transformer::types::{TransformContext, TransformOutcome};

const SMARTUI_IMPORT: &str =
    "from smartui_selenium import smartui_snapshot";

pub struct PythonTransformer {
    code: RuleSet,
    robot: RuleSet,
}

impl PythonTransformer {
    pub fn new(ctx: &TransformContext) -> Result<Self> {
        let (code, robot) = match ctx.platform {
            Platform::Percy => (percy_rules()?, percy_robot_rules()?),
            Platform::Applitools => {
                (applitools_rules()?, applitools_robot_rules()?)
            }
            Platform::SauceLabs => {
                (saucelabs_rules()?, RuleSet::default())
            }
        };
        Ok(Self { code, robot })
    }

    pub fn transform(
        &self,
        path: &str,
        content: &str,
    ) -> TransformOutcome {
        if path.ends_with(".robot") {
            self.robot.apply(content)
        } else {
            self.code.apply(content)
        }
    }
}

fn percy_rules() -> Result<RuleSet> {
    let rewrites = vec![
        RewriteRule::first(
            r"(?m)^from percy(?:\.[\w.]+)? import [^\n]+$",
            SMARTUI_IMPORT,
        )?,
        RewriteRule::new(
            r"(?m)^from percy(?:\.[\w.]+)? import [^\n]+\r?\n",
            "",
        )?,
        RewriteRule::snapshot(
            r"\bpercy_snapshot\s*\(",
            "smartui_snapshot(",
        )?,
        RewriteRule::snapshot(
            r"\bpercy_screenshot\s*\(",
            "smartui_snapshot(",
        )?,
        RewriteRule::new(r"\bpercy_snapshot\b", "smartui_snapshot")?,
        RewriteRule::new(r"\bpercy_screenshot\b", "smartui_snapshot")?,
    ];

    Ok(RuleSet::new(rewrites, vec![]))
}

fn applitools_rules() -> Result<RuleSet> {
    let rewrites = vec![
        RewriteRule::first(
            r"(?m)^from applitools[\w.]* import [^\n]+$",
            SMARTUI_IMPORT,
        )?,
        RewriteRule::new(
            r"(?m)^from applitools[\w.]* import [^\n]+\r?\n",
            "",
        )?,
        // Removal requires the closing paren on the same line; a call
        // spanning lines is left whole and flagged below.
        RewriteRule::new(
            r"(?m)^[ \t]*\w+\s*=\s*Eyes\([^\n]*\)[ \t]*\r?\n",
            "",
        )?,
        RewriteRule::with_warning(
            r"(?m)^[ \t]*eyes\.open\([^\n]*\)[ \t]*\r?\n",
            "",
            "configuration passed to eyes.open was dropped; set app and project options in .smartui.json",
        )?,
        RewriteRule::new(
            r"(?m)^[ \t]*eyes\.close(?:_async)?\(\s*\)[ \t]*\r?\n",
            "",
        )?,
        RewriteRule::snapshot(
            r"\beyes\.check_window\(",
            "smartui_snapshot(driver, ",
        )?,
    ];

    let warns = vec![
        WarnRule::new(
            r"\beyes\.check\(",
            "eyes.check with a region or layout target has no equivalent and was left in place",
        )?,
        WarnRule::new(
            r"\beyes\.open\(",
            "an eyes.open call was left in place and must be removed manually; SmartUI needs no session setup",
        )?,
        WarnRule::new(
            r"\beyes\.close(?:_async)?\(",
            "an eyes.close call was left in place and must be removed manually",
        )?,
    ];

    Ok(RuleSet::new(rewrites, warns))
}

fn saucelabs_rules() -> Result<RuleSet> {
    let rewrites = vec![
        RewriteRule::first(
            r"(?m)^from saucelabs_visual[\w.]* import [^\n]+$",
            SMARTUI_IMPORT,
        )?,
        RewriteRule::new(
            r"(?m)^from saucelabs_visual[\w.]* import [^\n]+\r?\n",
            "",
        )?,
        RewriteRule::snapshot(
            r"\b(?:self\.)?visual\.check\(",
            "smartui_snapshot(driver, ",
        )?,
        RewriteRule::snapshot(
            r"\bsauce_visual_check\s*\(",
            "smartui_snapshot(",
        )?,
    ];

    Ok(RuleSet::new(rewrites, vec![]))
}

fn percy_robot_rules() -> Result<RuleSet> {
    let rewrites = vec![
        RewriteRule::new(
            r"(?m)^Library\s+percy[^\n]*$",
            "Library    SmartUILibrary",
        )?,
        RewriteRule::snapshot("Percy Snapshot", "Smartui Snapshot")?,
    ];

    Ok(RuleSet::new(rewrites, vec![]))
}

fn applitools_robot_rules() -> Result<RuleSet> {
    let rewrites = vec![
        RewriteRule::new(
            r"(?m)^Library\s+EyesLibrary[^\n]*$",
            "Library    SmartUILibrary",
        )?,
        RewriteRule::snapshot(
            "Eyes Check Window",
            "Smartui Snapshot",
        )?,
        RewriteRule::with_warning(
            r"(?m)^[ \t]*Open Eyes[^\n]*\r?\n",
            "",
            "Open Eyes arguments were dropped; set app and project options in .smartui.json",
        )?,
        RewriteRule::new(r"(?m)^[ \t]*Close Eyes[^\n]*\r?\n", "")?,
    ];

    Ok(RuleSet::new(rewrites, vec![]))
}
