//! `stackforge new` - create a new project.

use anyhow::{bail, Result};

use crate::orchestrator::Orchestrator;
use crate::prompt::{self, StdinPrompter};
use crate::runner::ShellRunner;
use crate::ui::{ConsoleReporter, Reporter};

pub fn execute(name: Option<String>, monorepo: bool) -> Result<bool> {
    // Stack selection is always interactive
    if !prompt::stdin_is_tty() {
        bail!("'new' is interactive and needs a terminal on stdin");
    }

    let cwd = std::env::current_dir()?;
    let runner = ShellRunner;
    let prompter = StdinPrompter;
    let reporter = ConsoleReporter;

    let orchestrator = Orchestrator::new(&runner, &prompter, &reporter, &cwd);
    let ok = orchestrator.create_project(name, monorepo)?;
    if ok {
        reporter.success("✨ Ready to build something awesome!");
    }
    Ok(ok)
}
