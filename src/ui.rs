//! Output sink abstraction - lets every component print through an injected
//! reporter so tests can run silently.

use colored::Colorize;

pub trait Reporter {
    fn info(&self, msg: &str);
    fn success(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
    /// Low-priority detail lines (captured stderr, hints).
    fn detail(&self, msg: &str);
}

/// Prints to the terminal with color.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn info(&self, msg: &str) {
        println!("{}", msg.cyan());
    }

    fn success(&self, msg: &str) {
        println!("{} {}", "✓".green(), msg.green());
    }

    fn warn(&self, msg: &str) {
        println!("{} {}", "⚠".yellow(), msg.yellow());
    }

    fn error(&self, msg: &str) {
        eprintln!("{} {}", "✗".red(), msg.red());
    }

    fn detail(&self, msg: &str) {
        println!("{}", msg.dimmed());
    }
}

/// Discards everything. Used by tests.
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn info(&self, _msg: &str) {}
    fn success(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
    fn detail(&self, _msg: &str) {}
}
