//! Dependency validation - checks that required external tools exist and
//! extracts their versions from `--version` style output.

use regex::Regex;
use std::process::Command;

use crate::ui::Reporter;

pub struct ToolSpec {
    pub id: &'static str,
    /// Version probe, run as an argument vector (never through a shell).
    pub check: &'static str,
    pub install_hint: &'static str,
    pub min_version: Option<&'static str>,
    pub description: &'static str,
}

static TOOLS: &[ToolSpec] = &[
    ToolSpec {
        id: "node",
        check: "node --version",
        install_hint: "https://nodejs.org/",
        min_version: Some("18.0.0"),
        description: "Node.js runtime",
    },
    ToolSpec {
        id: "npm",
        check: "npm --version",
        install_hint: "https://nodejs.org/ (comes with Node.js)",
        min_version: Some("9.0.0"),
        description: "Node package manager",
    },
    ToolSpec {
        id: "python3",
        check: "python3 --version",
        install_hint: "https://python.org/",
        min_version: Some("3.10.0"),
        description: "Python 3 runtime",
    },
    ToolSpec {
        id: "pip",
        check: "pip --version",
        install_hint: "python3 -m ensurepip",
        min_version: Some("20.0.0"),
        description: "Python package manager",
    },
    ToolSpec {
        id: "django-admin",
        check: "django-admin --version",
        install_hint: "pip install django",
        min_version: None,
        description: "Django CLI",
    },
    ToolSpec {
        id: "composer",
        check: "composer --version",
        install_hint: "https://getcomposer.org/",
        min_version: None,
        description: "PHP dependency manager",
    },
    ToolSpec {
        id: "git",
        check: "git --version",
        install_hint: "https://git-scm.com/",
        min_version: None,
        description: "Git version control",
    },
    ToolSpec {
        id: "php",
        check: "php --version",
        install_hint: "https://php.net/",
        min_version: Some("8.1.0"),
        description: "PHP runtime",
    },
    ToolSpec {
        id: "go",
        check: "go version",
        install_hint: "https://go.dev/doc/install",
        min_version: Some("1.20.0"),
        description: "Go toolchain",
    },
    ToolSpec {
        id: "cargo",
        check: "cargo --version",
        install_hint: "https://rustup.rs/",
        min_version: None,
        description: "Rust/Cargo",
    },
    ToolSpec {
        id: "ruby",
        check: "ruby --version",
        install_hint: "https://ruby-lang.org/",
        min_version: Some("3.0.0"),
        description: "Ruby runtime",
    },
    ToolSpec {
        id: "rails",
        check: "rails --version",
        install_hint: "gem install rails",
        min_version: None,
        description: "Rails CLI",
    },
    ToolSpec {
        id: "flutter",
        check: "flutter --version",
        install_hint: "https://docs.flutter.dev/",
        min_version: None,
        description: "Flutter SDK",
    },
];

pub fn is_known(id: &str) -> bool {
    spec(id).is_some()
}

pub fn spec(id: &str) -> Option<&'static ToolSpec> {
    TOOLS.iter().find(|t| t.id == id)
}

pub fn known_tools() -> impl Iterator<Item = &'static ToolSpec> {
    TOOLS.iter()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolState {
    Available { version: String },
    Missing,
    /// Not in the known-tool table. Reported, never treated as available.
    Unknown,
}

#[derive(Debug, Clone)]
pub struct ToolCheck {
    pub id: String,
    pub state: ToolState,
}

impl ToolCheck {
    pub fn available(&self) -> bool {
        matches!(self.state, ToolState::Available { .. })
    }
}

/// Check every required tool. Unknown ids never abort the check; they come
/// back as `ToolState::Unknown` so the caller can surface them.
pub fn check_all(required: &[&str]) -> Vec<ToolCheck> {
    let mut seen = Vec::new();
    let mut checks = Vec::new();

    for id in required {
        if seen.contains(id) {
            continue;
        }
        seen.push(id);

        let state = match spec(id) {
            Some(tool) => probe(tool),
            None => ToolState::Unknown,
        };
        checks.push(ToolCheck {
            id: (*id).to_string(),
            state,
        });
    }
    checks
}

/// True when every known tool is present. Unknown entries are excluded from
/// the pass/fail computation; the registry self-check keeps them out of
/// shipped entries, so hitting one here means an ad-hoc caller.
pub fn all_available(checks: &[ToolCheck]) -> bool {
    checks
        .iter()
        .all(|c| !matches!(c.state, ToolState::Missing))
}

fn probe(tool: &ToolSpec) -> ToolState {
    if which::which(tool.id).is_err() {
        return ToolState::Missing;
    }

    let mut parts = tool.check.split_whitespace();
    let program = match parts.next() {
        Some(p) => p,
        None => return ToolState::Missing,
    };

    match Command::new(program).args(parts).output() {
        Ok(out) if out.status.success() => {
            let mut text = String::from_utf8_lossy(&out.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&out.stderr));
            ToolState::Available {
                version: extract_version(&text),
            }
        }
        _ => ToolState::Missing,
    }
}

/// Pull a version number out of arbitrary `--version` output.
pub fn extract_version(output: &str) -> String {
    let patterns = [
        r"v?(\d+\.\d+\.\d+)",
        r"(?i)version\s+(\d+\.\d+\.\d+)",
        r"(\d+\.\d+)",
    ];

    for pattern in patterns {
        if let Ok(re) = Regex::new(pattern) {
            if let Some(caps) = re.captures(output) {
                return caps[1].to_string();
            }
        }
    }
    "unknown".to_string()
}

/// Print a check table through the reporter.
pub fn display_results(checks: &[ToolCheck], reporter: &dyn Reporter) {
    for check in checks {
        match &check.state {
            ToolState::Available { version } => {
                let desc = spec(&check.id).map(|t| t.description).unwrap_or("");
                reporter.success(&format!("{:<14} {:<10} {}", check.id, version, desc));
            }
            ToolState::Missing => {
                reporter.error(&format!("{:<14} missing", check.id));
            }
            ToolState::Unknown => {
                reporter.warn(&format!("{:<14} unknown tool, skipped", check.id));
            }
        }
    }
}

/// Show how to install whatever is missing.
pub fn show_install_hints(checks: &[ToolCheck], reporter: &dyn Reporter) {
    for check in checks {
        if matches!(check.state, ToolState::Missing) {
            if let Some(tool) = spec(&check.id) {
                reporter.info(&format!("{} - {}", check.id, tool.description));
                let hint = match tool.min_version {
                    Some(min) => format!("  Install (>= {}): {}", min, tool.install_hint),
                    None => format!("  Install: {}", tool.install_hint),
                };
                reporter.detail(&hint);
            }
        }
    }
}
