//! `stackforge init` - analyze an existing project and set up its
//! development environment: dependencies, git, .env files, docker.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::deps::{self, ToolCheck};
use crate::detect::{DetectedProject, PackageManager, ProjectDetector, ProjectKind};
use crate::generators::docker::DockerGenerator;
use crate::generators::env::{
    EnvGenerator, DATABASES, EMAIL_PROVIDERS, PAYMENT_PROVIDERS, STORAGE_PROVIDERS,
};
use crate::git;
use crate::prompt::{Prompter, StdinPrompter};
use crate::runner::{RunOutcome, RunRequest, Runner, ShellRunner, DEFAULT_TIMEOUT};
use crate::ui::{ConsoleReporter, Reporter};

pub fn execute(path: Option<PathBuf>) -> Result<bool> {
    let path = match path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    if !path.exists() {
        bail!("directory not found: {}", path.display());
    }

    let runner = ShellRunner;
    let prompter = StdinPrompter;
    let reporter = ConsoleReporter;
    let flow = InitFlow::new(&path, &runner, &prompter, &reporter);
    flow.run()
}

type DepChecker<'a> = Box<dyn Fn(&[&str]) -> Vec<ToolCheck> + 'a>;

pub struct InitFlow<'a> {
    path: &'a Path,
    runner: &'a dyn Runner,
    prompter: &'a dyn Prompter,
    reporter: &'a dyn Reporter,
    checker: DepChecker<'a>,
}

impl<'a> InitFlow<'a> {
    pub fn new(
        path: &'a Path,
        runner: &'a dyn Runner,
        prompter: &'a dyn Prompter,
        reporter: &'a dyn Reporter,
    ) -> Self {
        InitFlow {
            path,
            runner,
            prompter,
            reporter,
            checker: Box::new(|required| deps::check_all(required)),
        }
    }

    pub fn with_checker(mut self, checker: DepChecker<'a>) -> Self {
        self.checker = checker;
        self
    }

    pub fn run(&self) -> Result<bool> {
        self.reporter.info("🔍 Analyzing project...");
        let detector = ProjectDetector::new(self.path);
        let project = detector.detect();

        if project.kind == ProjectKind::Unknown {
            self.reporter.error("Could not detect project type");
            self.reporter
                .detail("This directory doesn't appear to be a recognized project");
            return Ok(false);
        }

        self.display_project(&project);
        let missing = detector.missing_files();
        if !missing.is_empty() {
            self.reporter.detail(&format!(
                "  Recommended additions: {}",
                missing.join(", ")
            ));
        }

        if !self.check_system_dependencies(&project)? {
            self.reporter.warn("Cancelled");
            return Ok(false);
        }

        if !project.dependencies_installed {
            if let Some(true) = self
                .prompter
                .confirm("📦 Install project dependencies?", true)?
            {
                self.install_dependencies(&project);
            }
        }

        if !project.has_git && git::is_git_available() {
            if let Some(true) = self
                .prompter
                .confirm("🔧 Initialize git repository?", true)?
            {
                git::init_repository(self.path, self.reporter)?;
            }
        }

        if let Some(true) = self
            .prompter
            .confirm("🔧 Set up environment configuration?", true)?
        {
            self.setup_environment(&project)?;
        }

        if let Some(true) = self.prompter.confirm("🐳 Set up Docker?", true)? {
            self.setup_docker(&project)?;
        }

        self.show_summary(&project);
        Ok(true)
    }

    fn display_project(&self, project: &DetectedProject) {
        self.reporter.success("Project detected");
        self.reporter
            .detail(&format!("  Name:            {}", project.name));
        self.reporter
            .detail(&format!("  Type:            {}", project.kind.label()));
        if !project.frameworks.is_empty() {
            self.reporter.detail(&format!(
                "  Frameworks:      {}",
                project.frameworks.join(", ")
            ));
        }
        if let Some(pm) = project.package_manager {
            self.reporter
                .detail(&format!("  Package manager: {}", pm.label()));
        }
        let status = |present: bool| if present { "✓" } else { "✗" };
        self.reporter.detail(&format!(
            "  Git {}  Dependencies {}  Env {}  Docker {}",
            status(project.has_git),
            status(project.dependencies_installed),
            status(project.has_env),
            status(project.has_docker),
        ));
    }

    fn check_system_dependencies(&self, project: &DetectedProject) -> Result<bool> {
        let mut required: Vec<&str> = Vec::new();
        match project.package_manager {
            Some(PackageManager::Npm) | Some(PackageManager::Yarn) | Some(PackageManager::Pnpm) => {
                required.extend(["node", "npm"]);
            }
            Some(PackageManager::Pip) => required.extend(["python3", "pip"]),
            None => {}
        }
        if !project.has_git {
            required.push("git");
        }
        if required.is_empty() {
            return Ok(true);
        }

        self.reporter.info("⚙️  Checking system dependencies...");
        let checks = (self.checker)(&required);
        deps::display_results(&checks, self.reporter);

        if deps::all_available(&checks) {
            return Ok(true);
        }
        deps::show_install_hints(&checks, self.reporter);
        Ok(matches!(
            self.prompter.confirm("Continue anyway?", false)?,
            Some(true)
        ))
    }

    fn install_dependencies(&self, project: &DetectedProject) {
        self.reporter.info("📦 Installing dependencies...");

        let commands: &[&str] = match project.package_manager {
            Some(PackageManager::Npm) => &["npm install"],
            Some(PackageManager::Yarn) => &["yarn install"],
            Some(PackageManager::Pnpm) => &["pnpm install"],
            Some(PackageManager::Pip) => &[
                "python3 -m venv venv",
                "./venv/bin/pip install -r requirements.txt",
            ],
            None => {
                self.reporter.warn("No package manager detected, skipping");
                return;
            }
        };

        for &command in commands {
            let outcome = self.runner.run(&RunRequest {
                command,
                cwd: self.path,
                interactive: false,
                timeout: DEFAULT_TIMEOUT,
            });
            if !matches!(outcome, RunOutcome::Success) {
                self.reporter
                    .warn(&format!("Failed: {} (run it manually)", command));
                return;
            }
        }
        self.reporter.success("Dependencies installed");
    }

    fn setup_environment(&self, project: &DetectedProject) -> Result<()> {
        let mut gen = EnvGenerator::new(self.path, project.kind, &project.name);

        if let Some(true) = self
            .prompter
            .confirm("Configure additional services?", true)?
        {
            self.pick_service(&mut gen, "🗄️  Configure database?", DATABASES)?;
            self.pick_service(&mut gen, "📧 Configure email service?", EMAIL_PROVIDERS)?;
            self.pick_service(&mut gen, "💳 Configure payment gateway?", PAYMENT_PROVIDERS)?;
            self.pick_service(&mut gen, "☁️  Configure cloud storage?", STORAGE_PROVIDERS)?;
        }

        let overwrite = if self.path.join(".env").exists() {
            matches!(
                self.prompter.confirm(".env already exists. Overwrite?", false)?,
                Some(true)
            )
        } else {
            true
        };

        gen.write_files(overwrite, self.reporter)?;
        self.reporter
            .detail(&format!("  → {} variables configured", gen.var_count()));
        Ok(())
    }

    fn pick_service(
        &self,
        gen: &mut EnvGenerator,
        question: &str,
        options: &[crate::generators::env::Service],
    ) -> Result<()> {
        if !matches!(self.prompter.confirm(question, false)?, Some(true)) {
            return Ok(());
        }
        let mut labels: Vec<String> = options.iter().map(|s| s.label().to_string()).collect();
        labels.push("Skip".to_string());

        if let Some(index) = self.prompter.select("Select provider", &labels)? {
            if index < options.len() {
                gen.add_service(options[index]);
                self.reporter
                    .success(&format!("Added {} configuration", options[index].label()));
            }
        }
        Ok(())
    }

    fn setup_docker(&self, project: &DetectedProject) -> Result<()> {
        let gen = DockerGenerator::new(self.path, project.kind, &project.name);

        if !gen.supported() {
            // no Dockerfile template for this layout; compose still applies
            let with_db = matches!(
                self.prompter
                    .confirm("Include database in docker-compose?", false)?,
                Some(true)
            );
            return gen.write_compose(with_db, self.reporter);
        }

        let choices: Vec<String> = [
            "Dockerfile only",
            "Docker Compose (recommended)",
            "Both",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let choice = match self.prompter.select("What would you like to set up?", &choices)? {
            Some(i) => i,
            None => return Ok(()),
        };

        if choice == 0 || choice == 2 {
            gen.write_dockerfile(self.reporter)?;
        }
        if choice == 1 || choice == 2 {
            let with_db = matches!(
                self.prompter
                    .confirm("Include database in docker-compose?", false)?,
                Some(true)
            );
            gen.write_compose(with_db, self.reporter)?;
        }
        Ok(())
    }

    fn show_summary(&self, project: &DetectedProject) {
        self.reporter.success("✨ Initialization complete!");
        self.reporter.info("🚀 Next steps:");

        if self.path.join(".env.example").exists() {
            self.reporter.detail("  cp .env.example .env   # then fill in real values");
        }
        match project.package_manager {
            Some(PackageManager::Npm) => self.reporter.detail("  npm run dev"),
            Some(PackageManager::Pip) => match project.kind {
                ProjectKind::Django => {
                    self.reporter.detail("  source venv/bin/activate");
                    self.reporter.detail("  python manage.py runserver");
                }
                _ => {
                    self.reporter.detail("  source venv/bin/activate");
                    self.reporter.detail("  uvicorn main:app --reload");
                }
            },
            _ => {}
        }
        if self.path.join("docker-compose.yml").exists() {
            self.reporter.detail("  docker-compose up");
        } else if self.path.join("Dockerfile").exists() {
            self.reporter
                .detail(&format!("  docker build -t {} .", project.name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps::ToolState;
    use crate::prompt::{Answer, ScriptedPrompter};
    use crate::ui::SilentReporter;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    struct RecordingRunner {
        commands: RefCell<Vec<String>>,
    }

    impl RecordingRunner {
        fn new() -> Self {
            RecordingRunner {
                commands: RefCell::new(Vec::new()),
            }
        }
    }

    impl Runner for RecordingRunner {
        fn run(&self, req: &RunRequest) -> RunOutcome {
            self.commands.borrow_mut().push(req.command.to_string());
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

    fn fastapi_project(tmp: &TempDir) {
        fs::write(tmp.path().join("main.py"), "app = None\n").unwrap();
        fs::write(
            tmp.path().join("requirements.txt"),
            "fastapi==0.104.1\nuvicorn\n",
        )
        .unwrap();
        // mark git and deps as present so those prompts are skipped
        fs::create_dir_all(tmp.path().join(".git")).unwrap();
        fs::create_dir_all(tmp.path().join(".venv")).unwrap();
    }

    #[test]
    fn test_unknown_project_fails_cleanly() {
        let tmp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        let prompter = ScriptedPrompter::new(vec![]);
        let flow = InitFlow::new(tmp.path(), &runner, &prompter, &SilentReporter);

        assert!(!flow.run().unwrap());
    }

    #[test]
    fn test_declining_everything_still_succeeds() {
        let tmp = TempDir::new().unwrap();
        fastapi_project(&tmp);
        let runner = RecordingRunner::new();
        let prompter = ScriptedPrompter::new(vec![
            Answer::Confirm(false), // env setup
            Answer::Confirm(false), // docker
        ]);
        let flow = InitFlow::new(tmp.path(), &runner, &prompter, &SilentReporter)
            .with_checker(Box::new(all_available));

        assert!(flow.run().unwrap());
        assert!(runner.commands.borrow().is_empty());
        assert!(!tmp.path().join(".env").exists());
    }

    #[test]
    fn test_env_setup_with_database() {
        let tmp = TempDir::new().unwrap();
        fastapi_project(&tmp);
        let runner = RecordingRunner::new();
        let prompter = ScriptedPrompter::new(vec![
            Answer::Confirm(true),  // env setup
            Answer::Confirm(true),  // configure services
            Answer::Confirm(true),  // database?
            Answer::Select(0),      // postgres
            Answer::Confirm(false), // email?
            Answer::Confirm(false), // payment?
            Answer::Confirm(false), // storage?
            Answer::Confirm(false), // docker
        ]);
        let flow = InitFlow::new(tmp.path(), &runner, &prompter, &SilentReporter)
            .with_checker(Box::new(all_available));

        assert!(flow.run().unwrap());
        let env = fs::read_to_string(tmp.path().join(".env")).unwrap();
        assert!(env.contains("DATABASE_URL=postgresql://"));
        assert!(env.contains("SECRET_KEY="));
        assert!(tmp.path().join(".env.example").exists());
    }

    #[test]
    fn test_docker_setup_both() {
        let tmp = TempDir::new().unwrap();
        fastapi_project(&tmp);
        let runner = RecordingRunner::new();
        let prompter = ScriptedPrompter::new(vec![
            Answer::Confirm(false), // env setup
            Answer::Confirm(true),  // docker
            Answer::Select(2),      // both
            Answer::Confirm(true),  // with database
        ]);
        let flow = InitFlow::new(tmp.path(), &runner, &prompter, &SilentReporter)
            .with_checker(Box::new(all_available));

        assert!(flow.run().unwrap());
        assert!(tmp.path().join("Dockerfile").exists());
        let compose = fs::read_to_string(tmp.path().join("docker-compose.yml")).unwrap();
        assert!(compose.contains("postgres"));
    }

    struct CollectingReporter {
        lines: RefCell<Vec<String>>,
    }

    impl CollectingReporter {
        fn new() -> Self {
            CollectingReporter {
                lines: RefCell::new(Vec::new()),
            }
        }

        fn saw(&self, needle: &str) -> bool {
            self.lines.borrow().iter().any(|l| l.contains(needle))
        }
    }

    impl Reporter for CollectingReporter {
        fn info(&self, msg: &str) {
            self.lines.borrow_mut().push(msg.to_string());
        }
        fn success(&self, msg: &str) {
            self.lines.borrow_mut().push(msg.to_string());
        }
        fn warn(&self, msg: &str) {
            self.lines.borrow_mut().push(msg.to_string());
        }
        fn error(&self, msg: &str) {
            self.lines.borrow_mut().push(msg.to_string());
        }
        fn detail(&self, msg: &str) {
            self.lines.borrow_mut().push(msg.to_string());
        }
    }

    #[test]
    fn test_missing_recommended_files_reported() {
        let tmp = TempDir::new().unwrap();
        fastapi_project(&tmp);
        let runner = RecordingRunner::new();
        let prompter = ScriptedPrompter::new(vec![
            Answer::Confirm(false), // env setup
            Answer::Confirm(false), // docker
        ]);
        let reporter = CollectingReporter::new();
        let flow = InitFlow::new(tmp.path(), &runner, &prompter, &reporter)
            .with_checker(Box::new(all_available));

        assert!(flow.run().unwrap());
        assert!(reporter.saw("Recommended additions"));
        assert!(reporter.saw(".gitignore"));
    }

    #[test]
    fn test_monorepo_init_offers_compose_only() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("web")).unwrap();
        fs::create_dir_all(tmp.path().join("api")).unwrap();
        fs::create_dir_all(tmp.path().join(".git")).unwrap();
        let runner = RecordingRunner::new();
        let prompter = ScriptedPrompter::new(vec![
            Answer::Confirm(false), // env setup
            Answer::Confirm(true),  // docker
            Answer::Confirm(true),  // with database
        ]);
        let flow = InitFlow::new(tmp.path(), &runner, &prompter, &SilentReporter)
            .with_checker(Box::new(all_available));

        assert!(flow.run().unwrap());
        // no Dockerfile template for a monorepo root, only compose
        assert!(!tmp.path().join("Dockerfile").exists());
        let compose = fs::read_to_string(tmp.path().join("docker-compose.yml")).unwrap();
        assert!(compose.contains("build: ./web"));
        assert!(compose.contains("postgres:15-alpine"));
    }

    #[test]
    fn test_dependency_install_for_pip_project() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("main.py"), "app = None\n").unwrap();
        fs::write(tmp.path().join("requirements.txt"), "fastapi\n").unwrap();
        fs::create_dir_all(tmp.path().join(".git")).unwrap();
        // no venv: dependencies count as missing

        let runner = RecordingRunner::new();
        let prompter = ScriptedPrompter::new(vec![
            Answer::Confirm(true),  // install deps
            Answer::Confirm(false), // env setup
            Answer::Confirm(false), // docker
        ]);
        let flow = InitFlow::new(tmp.path(), &runner, &prompter, &SilentReporter)
            .with_checker(Box::new(all_available));

        assert!(flow.run().unwrap());
        let commands = runner.commands.borrow();
        assert_eq!(commands.len(), 2);
        assert!(commands[0].contains("venv"));
        assert!(commands[1].contains("pip install"));
    }
}
