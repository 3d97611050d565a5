//! Interactive project creation flow. Walks the user from a name to an
//! installed project (or monorepo) through injected collaborators, so the
//! whole flow is scriptable in tests.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::deps::{self, ToolCheck};
use crate::git;
use crate::installer::{validate_project_name, Installer};
use crate::prompt::Prompter;
use crate::registry::{self, Category, StackEntry};
use crate::runner::Runner;
use crate::ui::Reporter;

type DepChecker<'a> = Box<dyn Fn(&[&str]) -> Vec<ToolCheck> + 'a>;

pub struct Orchestrator<'a> {
    runner: &'a dyn Runner,
    prompter: &'a dyn Prompter,
    reporter: &'a dyn Reporter,
    checker: DepChecker<'a>,
    parent_dir: PathBuf,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        runner: &'a dyn Runner,
        prompter: &'a dyn Prompter,
        reporter: &'a dyn Reporter,
        parent_dir: &Path,
    ) -> Self {
        Orchestrator {
            runner,
            prompter,
            reporter,
            checker: Box::new(|required| deps::check_all(required)),
            parent_dir: parent_dir.to_path_buf(),
        }
    }

    /// Replace the real dependency probe. Tests use this to script both
    /// outcomes of the availability gate.
    pub fn with_checker(mut self, checker: DepChecker<'a>) -> Self {
        self.checker = checker;
        self
    }

    /// Run the `new` flow. Returns `Ok(false)` when the user cancelled or
    /// the install failed; hard errors (IO, invalid name passed on the
    /// command line) propagate.
    pub fn create_project(&self, name: Option<String>, monorepo: bool) -> Result<bool> {
        registry::self_check()?;

        let name = match self.resolve_name(name)? {
            Some(name) => name,
            None => return self.cancelled(),
        };

        let target = self.parent_dir.join(&name);
        if target.exists() {
            let proceed = self.prompter.confirm(
                &format!("Directory '{}' already exists. Continue anyway?", name),
                false,
            )?;
            match proceed {
                Some(true) => {}
                _ => return self.cancelled(),
            }
        }

        if monorepo {
            self.create_monorepo(&name)
        } else {
            self.create_single(&name)
        }
    }

    fn resolve_name(&self, name: Option<String>) -> Result<Option<String>> {
        match name {
            Some(name) => {
                validate_project_name(&name)?;
                Ok(Some(name))
            }
            None => self
                .prompter
                .text("Project name", &|s| validate_project_name(s)),
        }
    }

    fn create_single(&self, name: &str) -> Result<bool> {
        let entry = match self.select_entry()? {
            Some(entry) => entry,
            None => return self.cancelled(),
        };

        if !self.dependency_gate(entry.requires)? {
            return self.cancelled();
        }

        let installer = Installer::new(self.runner, self.reporter);
        let outcome = installer.install(entry, name, &self.parent_dir, false)?;
        if !outcome.success {
            return Ok(false);
        }

        self.offer_git_init(&outcome.path)?;
        self.print_next_steps(entry, name);
        Ok(true)
    }

    fn create_monorepo(&self, name: &str) -> Result<bool> {
        self.reporter
            .info("📁 Monorepo layout: web/ (frontend) + api/ (backend)");

        let frontend = match self.select_from(Category::Frontend, "Choose a frontend stack")? {
            Some(entry) => entry,
            None => return self.cancelled(),
        };
        let api = match self.select_from(Category::Api, "Choose an API stack")? {
            Some(entry) => entry,
            None => return self.cancelled(),
        };

        let mut required: Vec<&str> = frontend.requires.to_vec();
        for tool in api.requires {
            if !required.contains(tool) {
                required.push(tool);
            }
        }
        if !self.dependency_gate(&required)? {
            return self.cancelled();
        }

        let root = self.parent_dir.join(name);
        fs::create_dir_all(&root)
            .with_context(|| format!("failed to create {}", root.display()))?;

        // Dependency installation is batched by the user afterwards, so both
        // halves skip their post-install steps.
        let installer = Installer::new(self.runner, self.reporter);
        let web = installer.install(frontend, "web", &root, true)?;
        let api_outcome = installer.install(api, "api", &root, true)?;

        self.write_root_readme(&root, name, frontend, api)?;

        if !web.success || !api_outcome.success {
            // Whatever was created stays on disk for inspection.
            self.reporter
                .error("Monorepo creation finished with failures");
            return Ok(false);
        }

        self.offer_git_init(&root)?;
        self.reporter.success(&format!(
            "Monorepo '{}' ready: web/ = {}, api/ = {}",
            name, frontend.display_name, api.display_name
        ));
        self.reporter.detail(&format!("  cd {}", name));
        self.reporter
            .detail("  Install dependencies in web/ and api/, then start both dev servers");
        Ok(true)
    }

    fn select_entry(&self) -> Result<Option<&'static StackEntry>> {
        let categories = registry::categories();
        let labels: Vec<String> = categories
            .iter()
            .map(|c| {
                format!(
                    "{} ({} options)",
                    c.label(),
                    registry::entries_in(*c).len()
                )
            })
            .collect();

        let index = match self.prompter.select("What are you building?", &labels)? {
            Some(i) => i,
            None => return Ok(None),
        };
        self.select_from(categories[index], "Choose a stack")
    }

    fn select_from(
        &self,
        category: Category,
        prompt: &str,
    ) -> Result<Option<&'static StackEntry>> {
        let entries = registry::entries_in(category);
        let labels: Vec<String> = entries
            .iter()
            .map(|e| e.display_name.to_string())
            .collect();

        match self.prompter.select(prompt, &labels)? {
            Some(i) => Ok(Some(entries[i])),
            None => Ok(None),
        }
    }

    /// Check required tools; if any are missing, let the user push through
    /// anyway (the generator may still work, e.g. a partial toolchain).
    fn dependency_gate(&self, required: &[&str]) -> Result<bool> {
        self.reporter.info("⚙️  Checking dependencies...");
        let checks = (self.checker)(required);
        deps::display_results(&checks, self.reporter);

        if deps::all_available(&checks) {
            return Ok(true);
        }

        deps::show_install_hints(&checks, self.reporter);
        match self.prompter.confirm("Continue anyway?", false)? {
            Some(true) => Ok(true),
            _ => Ok(false),
        }
    }

    fn offer_git_init(&self, path: &Path) -> Result<()> {
        if !git::is_git_available() {
            return Ok(());
        }
        if let Some(true) = self
            .prompter
            .confirm("Initialize a git repository?", true)?
        {
            git::init_repository(path, self.reporter)?;
        }
        Ok(())
    }

    fn write_root_readme(
        &self,
        root: &Path,
        name: &str,
        frontend: &StackEntry,
        api: &StackEntry,
    ) -> Result<()> {
        let body = format!(
            "# {name}\n\n\
             Monorepo created with Stackforge.\n\n\
             | Directory | Stack |\n\
             |-----------|-------|\n\
             | `web/` | {frontend} |\n\
             | `api/` | {api} |\n",
            name = name,
            frontend = frontend.display_name,
            api = api.display_name,
        );
        fs::write(root.join("README.md"), body)
            .with_context(|| format!("failed to write {}", root.join("README.md").display()))
    }

    fn print_next_steps(&self, entry: &StackEntry, name: &str) {
        self.reporter.info("Next steps:");
        self.reporter.detail(&format!("  cd {}", name));
        for step in next_steps(entry) {
            self.reporter.detail(&format!("  {}", step));
        }
    }

    fn cancelled(&self) -> Result<bool> {
        self.reporter.warn("Cancelled");
        Ok(false)
    }
}

/// Per-toolchain follow-up commands shown after a successful install.
fn next_steps(entry: &StackEntry) -> Vec<&'static str> {
    if entry.requires.contains(&"python3") {
        vec![
            "python3 -m venv .venv && source .venv/bin/activate",
            "pip install -r requirements.txt",
        ]
    } else if entry.requires.contains(&"node") {
        vec!["npm install", "npm run dev"]
    } else if entry.requires.contains(&"go") {
        vec!["go mod tidy", "go run ."]
    } else if entry.requires.contains(&"cargo") {
        vec!["cargo run"]
    } else {
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps::ToolState;
    use crate::prompt::{Answer, ScriptedPrompter};
    use crate::runner::{RunOutcome, RunRequest};
    use crate::ui::SilentReporter;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Pretends to be a generator CLI: records the command and creates the
    /// directory named by its last argument.
    struct CreatingRunner {
        commands: RefCell<Vec<String>>,
    }

    impl CreatingRunner {
        fn new() -> Self {
            CreatingRunner {
                commands: RefCell::new(Vec::new()),
            }
        }
    }

    impl Runner for CreatingRunner {
        fn run(&self, req: &RunRequest) -> RunOutcome {
            self.commands.borrow_mut().push(req.command.to_string());
            if let Some(dir) = req.command.split_whitespace().last() {
                let _ = fs::create_dir_all(req.cwd.join(dir));
            }
            RunOutcome::Success
        }
    }

    fn all_available(required: &[&str]) -> Vec<ToolCheck> {
        required
            .iter()
            .map(|id| ToolCheck {
                id: id.to_string(),
                state: ToolState::Available {
                    version: "1.0.0".to_string(),
                },
            })
            .collect()
    }

    fn orchestrator<'a>(
        runner: &'a dyn Runner,
        prompter: &'a dyn Prompter,
        parent: &Path,
    ) -> Orchestrator<'a> {
        Orchestrator::new(runner, prompter, &SilentReporter, parent)
            .with_checker(Box::new(all_available))
    }

    #[test]
    fn test_single_project_with_custom_template() {
        let tmp = TempDir::new().unwrap();
        let runner = CreatingRunner::new();
        // api category, then fastapi within it; decline git init
        let prompter = ScriptedPrompter::new(vec![
            Answer::Select(1),
            Answer::Select(3),
            Answer::Confirm(false),
        ]);
        let orch = orchestrator(&runner, &prompter, tmp.path());

        let ok = orch
            .create_project(Some("svc".to_string()), false)
            .unwrap();

        assert!(ok);
        assert!(tmp.path().join("svc/main.py").exists());
        assert!(runner.commands.borrow().is_empty());
    }

    #[test]
    fn test_monorepo_creates_siblings_without_post_install() {
        let tmp = TempDir::new().unwrap();
        let runner = CreatingRunner::new();
        // frontend react-vite, api fastapi; decline git init
        let prompter = ScriptedPrompter::new(vec![
            Answer::Select(0),
            Answer::Select(3),
            Answer::Confirm(false),
        ]);
        let orch = orchestrator(&runner, &prompter, tmp.path());

        let ok = orch
            .create_project(Some("shop".to_string()), true)
            .unwrap();

        assert!(ok);
        assert!(tmp.path().join("shop/web").is_dir());
        assert!(tmp.path().join("shop/api/main.py").exists());
        assert!(tmp.path().join("shop/README.md").exists());
        // Only the frontend generator command ran; no post-install steps.
        assert_eq!(runner.commands.borrow().len(), 1);
        assert!(runner.commands.borrow()[0].contains("web"));
    }

    #[test]
    fn test_monorepo_half_failure_leaves_sibling_and_readme() {
        let tmp = TempDir::new().unwrap();
        // a plain file blocks the api half's target
        fs::create_dir_all(tmp.path().join("shop")).unwrap();
        fs::write(tmp.path().join("shop/api"), "in the way").unwrap();
        let runner = CreatingRunner::new();
        // existing dir confirm, then frontend react-vite, api fastapi
        let prompter = ScriptedPrompter::new(vec![
            Answer::Confirm(true),
            Answer::Select(0),
            Answer::Select(3),
        ]);
        let orch = orchestrator(&runner, &prompter, tmp.path());

        let ok = orch
            .create_project(Some("shop".to_string()), true)
            .unwrap();

        assert!(!ok);
        // the web half and the root README survive the api failure
        assert!(tmp.path().join("shop/web").is_dir());
        assert!(tmp.path().join("shop/README.md").exists());
    }

    #[test]
    fn test_cancel_at_category_select() {
        let tmp = TempDir::new().unwrap();
        let runner = CreatingRunner::new();
        let prompter = ScriptedPrompter::new(vec![Answer::Cancel]);
        let orch = orchestrator(&runner, &prompter, tmp.path());

        let ok = orch
            .create_project(Some("svc".to_string()), false)
            .unwrap();

        assert!(!ok);
        assert!(!tmp.path().join("svc").exists());
    }

    #[test]
    fn test_missing_dependency_gate_declined() {
        let tmp = TempDir::new().unwrap();
        let runner = CreatingRunner::new();
        // select fastapi, then refuse to continue without python3
        let prompter = ScriptedPrompter::new(vec![
            Answer::Select(1),
            Answer::Select(3),
            Answer::Confirm(false),
        ]);
        let orch = Orchestrator::new(&runner, &prompter, &SilentReporter, tmp.path())
            .with_checker(Box::new(|required| {
                required
                    .iter()
                    .map(|id| ToolCheck {
                        id: id.to_string(),
                        state: ToolState::Missing,
                    })
                    .collect()
            }));

        let ok = orch
            .create_project(Some("svc".to_string()), false)
            .unwrap();

        assert!(!ok);
        assert!(!tmp.path().join("svc").exists());
    }

    #[test]
    fn test_existing_directory_requires_confirmation() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("svc")).unwrap();
        let runner = CreatingRunner::new();
        let prompter = ScriptedPrompter::new(vec![Answer::Confirm(false)]);
        let orch = orchestrator(&runner, &prompter, tmp.path());

        let ok = orch
            .create_project(Some("svc".to_string()), false)
            .unwrap();

        assert!(!ok);
    }

    #[test]
    fn test_invalid_cli_name_is_a_hard_error() {
        let tmp = TempDir::new().unwrap();
        let runner = CreatingRunner::new();
        let prompter = ScriptedPrompter::new(vec![]);
        let orch = orchestrator(&runner, &prompter, tmp.path());

        let result = orch.create_project(Some("a;b".to_string()), false);
        assert!(result.is_err());
    }
}
