//! Git repository initialization for freshly scaffolded projects. Runs git
//! as an argument vector, never through a shell.

use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};

use crate::ui::Reporter;

const FALLBACK_GITIGNORE: &str = "node_modules/\n__pycache__/\ntarget/\n.env\n.DS_Store\n";

pub fn is_git_available() -> bool {
    which::which("git").is_ok()
}

/// Initialize a repository in `path` and make an initial commit. A directory
/// that is already a repository is left alone.
pub fn init_repository(path: &Path, reporter: &dyn Reporter) -> Result<()> {
    if path.join(".git").exists() {
        reporter.detail("Already a git repository, skipping init");
        return Ok(());
    }

    reporter.info("🔧 Initializing git repository...");
    run_git(path, &["init"])?;
    run_git(path, &["config", "core.autocrlf", "input"])?;
    ensure_gitignore(path)?;
    run_git(path, &["add", "-A"])?;

    let status = git_output(path, &["status", "--porcelain"])?;
    if status.trim().is_empty() {
        reporter.detail("Nothing to commit");
        return Ok(());
    }

    run_git(path, &["commit", "-m", "Initial commit"])?;
    run_git(path, &["branch", "-M", "master"])?;
    reporter.success("Git repository initialized with initial commit");
    Ok(())
}

/// Some generators don't write a .gitignore; drop a minimal one in so the
/// initial commit doesn't sweep up build artifacts.
fn ensure_gitignore(path: &Path) -> Result<()> {
    let gitignore = path.join(".gitignore");
    if !gitignore.exists() {
        fs::write(&gitignore, FALLBACK_GITIGNORE)
            .with_context(|| format!("failed to write {}", gitignore.display()))?;
    }
    Ok(())
}

fn run_git(cwd: &Path, args: &[&str]) -> Result<()> {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .with_context(|| format!("failed to run git {}", args.join(" ")))?;
    if !output.status.success() {
        bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(())
}

fn git_output(cwd: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .with_context(|| format!("failed to run git {}", args.join(" ")))?;
    if !output.status.success() {
        bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
