//! Installation dispatcher - takes a registry entry and a target name and
//! runs either the entry's generator command or its in-process template
//! writer, then the lenient post-install steps.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};

use crate::registry::{InstallMethod, StackEntry};
use crate::runner::{RunOutcome, RunRequest, Runner, DEFAULT_TIMEOUT};
use crate::ui::Reporter;

#[derive(Debug, Clone)]
pub struct InstallOutcome {
    pub success: bool,
    pub path: PathBuf,
    /// Failure reason for display. Empty on success.
    pub reason: String,
}

pub struct Installer<'a> {
    runner: &'a dyn Runner,
    reporter: &'a dyn Reporter,
}

impl<'a> Installer<'a> {
    pub fn new(runner: &'a dyn Runner, reporter: &'a dyn Reporter) -> Self {
        Installer { runner, reporter }
    }

    /// Create a project from `entry` under `parent_dir`. The primary step
    /// must succeed; post-install failures are reported but the outcome
    /// stays successful. Monorepo installs pass `skip_post_install` so the
    /// caller can batch dependency installation itself.
    pub fn install(
        &self,
        entry: &StackEntry,
        name: &str,
        parent_dir: &Path,
        skip_post_install: bool,
    ) -> Result<InstallOutcome> {
        validate_project_name(name)?;
        let target = parent_dir.join(name);

        self.reporter
            .info(&format!("🚀 Creating {} project '{}'...", entry.display_name, name));

        match &entry.method {
            InstallMethod::Custom(kind) => {
                // IO failures stay inside the outcome, like command failures
                if let Err(e) = kind.write(&target) {
                    let reason = format!("{:#}", e);
                    self.reporter
                        .error(&format!("Project creation failed: {}", reason));
                    return Ok(InstallOutcome {
                        success: false,
                        path: target,
                        reason,
                    });
                }
            }
            InstallMethod::Command {
                template,
                interactive,
            } => {
                let command = template.replace("{name}", name);
                let outcome = self.runner.run(&RunRequest {
                    command: &command,
                    cwd: parent_dir,
                    interactive: *interactive,
                    timeout: DEFAULT_TIMEOUT,
                });
                if let Some(reason) = failure_reason(&outcome, DEFAULT_TIMEOUT) {
                    self.reporter.error(&format!("Project creation failed: {}", reason));
                    if let RunOutcome::Failed { stderr_tail, .. } = &outcome {
                        if !stderr_tail.is_empty() {
                            self.reporter.detail(stderr_tail);
                        }
                    }
                    return Ok(InstallOutcome {
                        success: false,
                        path: target,
                        reason,
                    });
                }
            }
        }

        if !skip_post_install {
            self.run_post_install(entry, &target);
        }

        self.reporter
            .success(&format!("Created {}", target.display()));
        Ok(InstallOutcome {
            success: true,
            path: target,
            reason: String::new(),
        })
    }

    fn run_post_install(&self, entry: &StackEntry, target: &Path) {
        for command in entry.post_install {
            self.reporter.info(&format!("📦 Running: {}", command));
            let outcome = self.runner.run(&RunRequest {
                command,
                cwd: target,
                interactive: false,
                timeout: DEFAULT_TIMEOUT,
            });
            if let Some(reason) = failure_reason(&outcome, DEFAULT_TIMEOUT) {
                // Lenient by design: the project exists, the user can rerun
                // the step by hand.
                self.reporter
                    .warn(&format!("Post-install step failed ({}): {}", reason, command));
            }
        }
    }
}

fn failure_reason(outcome: &RunOutcome, timeout: Duration) -> Option<String> {
    match outcome {
        RunOutcome::Success => None,
        RunOutcome::Failed { exit_code, .. } => Some(match exit_code {
            Some(code) => format!("non-zero exit ({})", code),
            None => "terminated by signal".to_string(),
        }),
        RunOutcome::TimedOut { .. } => {
            Some(format!("timed out after {}s", timeout.as_secs()))
        }
        RunOutcome::Error(e) => Some(e.clone()),
    }
}

/// Project names are substituted into shell command templates, so reject
/// anything beyond a conservative character set before any substitution
/// happens.
pub fn validate_project_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("project name cannot be empty");
    }
    if name == "." || name == ".." {
        bail!("project name cannot be '{}'", name);
    }
    if name.starts_with('-') {
        bail!("project name cannot start with '-'");
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        bail!(
            "project name contains unsupported character '{}' (use letters, digits, '-', '_', '.')",
            bad
        );
    }
    Ok(())
}
