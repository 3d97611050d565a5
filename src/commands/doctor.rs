//! `stackforge doctor` - check every tool the registry can require.

use anyhow::Result;
use serde::Serialize;

use crate::deps::{self, ToolState};
use crate::ui::Reporter;

#[derive(Serialize)]
struct ToolReport {
    id: &'static str,
    description: &'static str,
    available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    install_hint: Option<&'static str>,
}

pub fn execute(json: bool, reporter: &dyn Reporter) -> Result<()> {
    let ids: Vec<&str> = deps::known_tools().map(|t| t.id).collect();
    let checks = deps::check_all(&ids);

    if json {
        let reports: Vec<ToolReport> = deps::known_tools()
            .zip(checks.iter())
            .map(|(tool, check)| {
                let version = match &check.state {
                    ToolState::Available { version } => Some(version.clone()),
                    _ => None,
                };
                ToolReport {
                    id: tool.id,
                    description: tool.description,
                    available: check.available(),
                    version,
                    install_hint: if check.available() {
                        None
                    } else {
                        Some(tool.install_hint)
                    },
                }
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    reporter.info("🩺 Checking all known tools...\n");
    deps::display_results(&checks, reporter);

    let missing = checks.iter().filter(|c| !c.available()).count();
    if missing == 0 {
        reporter.success("All tools are available");
    } else {
        reporter.warn(&format!("{} tool(s) missing", missing));
        deps::show_install_hints(&checks, reporter);
    }
    Ok(())
}
