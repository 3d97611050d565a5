pub mod commands;
pub mod deps;
pub mod detect;
pub mod generators;
pub mod git;
pub mod installer;
pub mod orchestrator;
pub mod prompt;
pub mod registry;
pub mod runner;
pub mod templates;
pub mod ui;

// Re-export commonly used types
pub use installer::{InstallOutcome, Installer};
pub use registry::{Category, InstallMethod, StackEntry};
pub use ui::Reporter;
