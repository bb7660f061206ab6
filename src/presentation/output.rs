//! Output Rendering
//!
//! Final summary of a build run, as text or JSON.

use serde_json::json;

use crate::application::BuildReport;

/// Output format for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Icons for output rendering
struct Icons {
    check: &'static str,
    skip: &'static str,
    write: &'static str,
}

impl Icons {
    fn unicode() -> Self {
        Self {
            check: "✓",
            skip: "○",
            write: "→",
        }
    }

    fn ascii() -> Self {
        Self {
            check: "[OK]",
            skip: "[ ]",
            write: "->",
        }
    }
}

/// Multi-line text summary
pub fn render_report(report: &BuildReport, unicode: bool) -> String {
    let icons = if unicode {
        Icons::unicode()
    } else {
        Icons::ascii()
    };
    let mut out = String::new();

    if !report.has_changes() {
        out.push_str(&format!("{} Assets up to date\n", icons.check));
    } else {
        out.push_str(&format!(
            "{} Built {} ({})\n",
            icons.check,
            plural(report.built.len(), "entrypoint"),
            report.built.join(", ")
        ));
    }
    for name in &report.skipped {
        out.push_str(&format!("  {} {} skipped\n", icons.skip, name));
    }
    for bundle in &report.bundles {
        out.push_str(&format!("  {} {}\n", icons.write, bundle));
    }
    if !report.warnings.is_empty() {
        out.push_str(&format!("  {}\n", plural(report.warnings.len(), "warning")));
    }
    if let Some(release) = &report.release {
        out.push_str(&format!(
            "{} Release {} published to {}\n",
            icons.check, release.release_id, release.location
        ));
    }
    out
}

/// Single JSON object, `command` field included
pub fn render_report_json(report: &BuildReport, command: &str) -> String {
    let release = report.release.as_ref().map(|r| {
        json!({
            "release_id": r.release_id,
            "location": r.location,
            "files": r.files,
        })
    });
    json!({
        "command": command,
        "event": "summary",
        "built": report.built,
        "skipped": report.skipped,
        "scenes": report.scenes,
        "bundles": report.bundles,
        "warnings": report.warnings,
        "release": release,
    })
    .to_string()
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
