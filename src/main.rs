use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};

use stackforge::commands;
use stackforge::ui::ConsoleReporter;

#[derive(Parser)]
#[command(
    name = "stackforge",
    version,
    about = "🚀 Stackforge - modern project scaffolding",
    long_about = "Quickly create production-ready projects with best practices built in.\n\
                  Supports React, Vue, Next.js, Django, FastAPI, Express, and more."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project
    New {
        /// Project name (prompted for if omitted)
        name: Option<String>,
        /// Create a monorepo with web/ and api/ halves
        #[arg(short, long)]
        monorepo: bool,
    },
    /// Analyze and set up an existing project
    Init {
        /// Project directory (defaults to the current directory)
        path: Option<PathBuf>,
    },
    /// List all available project stacks
    List,
    /// Check which required tools are installed
    Doctor {
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::New { name, monorepo } => {
            if !commands::new::execute(name, monorepo)? {
                process::exit(1);
            }
        }
        Commands::Init { path } => {
            if !commands::init::execute(path)? {
                process::exit(1);
            }
        }
        Commands::List => commands::list::execute(&ConsoleReporter),
        Commands::Doctor { json } => commands::doctor::execute(json, &ConsoleReporter)?,
    }
    Ok(())
}
