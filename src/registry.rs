//! Stack registry - the static catalog of installable project stacks.
//!
//! Entries are defined once, never mutated. `self_check` enforces the table
//! invariants so a bad entry fails fast instead of surfacing as a broken
//! install halfway through a run.

use std::fmt;

use anyhow::{bail, Result};

use crate::deps;
use crate::templates::TemplateKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Frontend,
    Api,
    Framework,
    Mobile,
    Cli,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Frontend,
        Category::Api,
        Category::Framework,
        Category::Mobile,
        Category::Cli,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Frontend => "frontend",
            Category::Api => "api",
            Category::Framework => "framework",
            Category::Mobile => "mobile",
            Category::Cli => "cli",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
pub enum InstallMethod {
    /// Shell command template; `{name}` is replaced with the target directory
    /// name. The generator itself creates the directory.
    Command {
        template: &'static str,
        /// The generator prompts the user itself; stream its output.
        interactive: bool,
    },
    /// In-process template writer. Creates the directory itself; post-install
    /// commands do not apply.
    Custom(TemplateKind),
}

#[derive(Debug, Clone)]
pub struct StackEntry {
    pub id: &'static str,
    pub display_name: &'static str,
    pub category: Category,
    pub method: InstallMethod,
    /// Run inside the new project after the primary step; failures are
    /// logged, never fatal.
    pub post_install: &'static [&'static str],
    pub requires: &'static [&'static str],
}

macro_rules! cmd {
    ($template:expr, interactive) => {
        InstallMethod::Command {
            template: $template,
            interactive: true,
        }
    };
    ($template:expr) => {
        InstallMethod::Command {
            template: $template,
            interactive: false,
        }
    };
}

static ENTRIES: &[StackEntry] = &[
    // Frontend
    StackEntry {
        id: "react-vite",
        display_name: "React (Vite)",
        category: Category::Frontend,
        method: cmd!("npm create vite@latest {name}", interactive),
        post_install: &[],
        requires: &["node", "npm"],
    },
    StackEntry {
        id: "react-vite-ts",
        display_name: "React + TypeScript (Vite)",
        category: Category::Frontend,
        method: cmd!("npm create vite@latest {name} -- --template react-ts", interactive),
        post_install: &[],
        requires: &["node", "npm"],
    },
    StackEntry {
        id: "nextjs",
        display_name: "Next.js",
        category: Category::Frontend,
        method: cmd!("npx create-next-app@latest {name}", interactive),
        post_install: &[],
        requires: &["node", "npm"],
    },
    StackEntry {
        id: "vue-vite",
        display_name: "Vue (Vite)",
        category: Category::Frontend,
        method: cmd!("npm create vite@latest {name} -- --template vue", interactive),
        post_install: &[],
        requires: &["node", "npm"],
    },
    StackEntry {
        id: "vue-vite-ts",
        display_name: "Vue + TypeScript (Vite)",
        category: Category::Frontend,
        method: cmd!("npm create vite@latest {name} -- --template vue-ts", interactive),
        post_install: &[],
        requires: &["node", "npm"],
    },
    StackEntry {
        id: "svelte",
        display_name: "Svelte (Vite)",
        category: Category::Frontend,
        method: cmd!("npm create vite@latest {name} -- --template svelte", interactive),
        post_install: &[],
        requires: &["node", "npm"],
    },
    StackEntry {
        id: "svelte-ts",
        display_name: "Svelte + TypeScript (Vite)",
        category: Category::Frontend,
        method: cmd!("npm create vite@latest {name} -- --template svelte-ts", interactive),
        post_install: &[],
        requires: &["node", "npm"],
    },
    StackEntry {
        id: "solidjs",
        display_name: "Solid.js (Vite)",
        category: Category::Frontend,
        method: cmd!("npm create vite@latest {name} -- --template solid", interactive),
        post_install: &[],
        requires: &["node", "npm"],
    },
    StackEntry {
        id: "solidjs-ts",
        display_name: "Solid.js + TypeScript (Vite)",
        category: Category::Frontend,
        method: cmd!("npm create vite@latest {name} -- --template solid-ts", interactive),
        post_install: &[],
        requires: &["node", "npm"],
    },
    StackEntry {
        id: "astro",
        display_name: "Astro",
        category: Category::Frontend,
        method: cmd!("npm create astro@latest {name}", interactive),
        post_install: &[],
        requires: &["node", "npm"],
    },
    StackEntry {
        id: "angular",
        display_name: "Angular",
        category: Category::Frontend,
        method: cmd!("npx @angular/cli new {name}", interactive),
        post_install: &[],
        requires: &["node", "npm"],
    },
    // API / backend
    StackEntry {
        id: "express",
        display_name: "Express.js",
        category: Category::Api,
        method: cmd!("npx express-generator {name} --view=ejs --git"),
        post_install: &["npm install"],
        requires: &["node", "npm"],
    },
    StackEntry {
        id: "express-ts",
        display_name: "Express + TypeScript",
        category: Category::Api,
        method: InstallMethod::Custom(TemplateKind::ExpressTs),
        post_install: &[],
        requires: &["node", "npm"],
    },
    StackEntry {
        id: "nestjs",
        display_name: "NestJS",
        category: Category::Api,
        method: cmd!("npx @nestjs/cli new {name}", interactive),
        post_install: &[],
        requires: &["node", "npm"],
    },
    StackEntry {
        id: "fastapi",
        display_name: "FastAPI",
        category: Category::Api,
        method: InstallMethod::Custom(TemplateKind::FastApi),
        post_install: &[],
        requires: &["python3"],
    },
    StackEntry {
        id: "flask",
        display_name: "Flask",
        category: Category::Api,
        method: InstallMethod::Custom(TemplateKind::Flask),
        post_install: &[],
        requires: &["python3"],
    },
    StackEntry {
        id: "go-gin",
        display_name: "Go (Gin)",
        category: Category::Api,
        method: InstallMethod::Custom(TemplateKind::GoGin),
        post_install: &[],
        requires: &["go"],
    },
    StackEntry {
        id: "go-fiber",
        display_name: "Go (Fiber)",
        category: Category::Api,
        method: InstallMethod::Custom(TemplateKind::GoFiber),
        post_install: &[],
        requires: &["go"],
    },
    StackEntry {
        id: "go-echo",
        display_name: "Go (Echo)",
        category: Category::Api,
        method: InstallMethod::Custom(TemplateKind::GoEcho),
        post_install: &[],
        requires: &["go"],
    },
    StackEntry {
        id: "rust-axum",
        display_name: "Rust (Axum)",
        category: Category::Api,
        method: InstallMethod::Custom(TemplateKind::RustAxum),
        post_install: &[],
        requires: &["cargo"],
    },
    StackEntry {
        id: "rust-actix",
        display_name: "Rust (Actix-web)",
        category: Category::Api,
        method: InstallMethod::Custom(TemplateKind::RustActix),
        post_install: &[],
        requires: &["cargo"],
    },
    StackEntry {
        id: "django-drf",
        display_name: "Django REST Framework",
        category: Category::Api,
        method: InstallMethod::Custom(TemplateKind::DjangoDrf),
        post_install: &[],
        requires: &["python3"],
    },
    StackEntry {
        id: "rails-api",
        display_name: "Ruby on Rails (API)",
        category: Category::Api,
        method: cmd!("rails new {name} --api"),
        post_install: &[],
        requires: &["ruby", "rails"],
    },
    // Full-stack frameworks
    StackEntry {
        id: "django",
        display_name: "Django",
        category: Category::Framework,
        method: cmd!("django-admin startproject {name}"),
        post_install: &[],
        requires: &["python3", "django-admin"],
    },
    StackEntry {
        id: "laravel",
        display_name: "Laravel",
        category: Category::Framework,
        method: cmd!("composer create-project laravel/laravel {name}"),
        post_install: &[],
        requires: &["composer", "php"],
    },
    StackEntry {
        id: "rails",
        display_name: "Ruby on Rails",
        category: Category::Framework,
        method: cmd!("rails new {name}"),
        post_install: &[],
        requires: &["ruby", "rails"],
    },
    StackEntry {
        id: "sveltekit",
        display_name: "SvelteKit",
        category: Category::Framework,
        method: cmd!("npm create svelte@latest {name}", interactive),
        post_install: &[],
        requires: &["node", "npm"],
    },
    // Mobile
    StackEntry {
        id: "react-native",
        display_name: "React Native",
        category: Category::Mobile,
        method: cmd!("npx react-native@latest init {name}"),
        post_install: &[],
        requires: &["node", "npm"],
    },
    StackEntry {
        id: "expo",
        display_name: "Expo (React Native)",
        category: Category::Mobile,
        method: cmd!("npx create-expo-app@latest {name}", interactive),
        post_install: &[],
        requires: &["node", "npm"],
    },
    StackEntry {
        id: "flutter",
        display_name: "Flutter",
        category: Category::Mobile,
        method: cmd!("flutter create {name}"),
        post_install: &[],
        requires: &["flutter"],
    },
    // CLI apps
    StackEntry {
        id: "python-cli-typer",
        display_name: "Python CLI (Typer)",
        category: Category::Cli,
        method: InstallMethod::Custom(TemplateKind::PythonCliTyper),
        post_install: &[],
        requires: &["python3"],
    },
    StackEntry {
        id: "python-cli-click",
        display_name: "Python CLI (Click)",
        category: Category::Cli,
        method: InstallMethod::Custom(TemplateKind::PythonCliClick),
        post_install: &[],
        requires: &["python3"],
    },
    StackEntry {
        id: "node-cli",
        display_name: "Node.js CLI",
        category: Category::Cli,
        method: InstallMethod::Custom(TemplateKind::NodeCli),
        post_install: &[],
        requires: &["node", "npm"],
    },
    StackEntry {
        id: "node-cli-ts",
        display_name: "Node.js CLI (TypeScript)",
        category: Category::Cli,
        method: InstallMethod::Custom(TemplateKind::NodeCliTs),
        post_install: &[],
        requires: &["node", "npm"],
    },
    StackEntry {
        id: "go-cli-cobra",
        display_name: "Go CLI (Cobra)",
        category: Category::Cli,
        method: InstallMethod::Custom(TemplateKind::GoCliCobra),
        post_install: &[],
        requires: &["go"],
    },
    StackEntry {
        id: "rust-cli-clap",
        display_name: "Rust CLI (Clap)",
        category: Category::Cli,
        method: InstallMethod::Custom(TemplateKind::RustCliClap),
        post_install: &[],
        requires: &["cargo"],
    },
];

pub fn categories() -> &'static [Category] {
    &Category::ALL
}

/// Entries for one category, in declaration order. Empty for a category with
/// no entries; never an error.
pub fn entries_in(category: Category) -> Vec<&'static StackEntry> {
    ENTRIES.iter().filter(|e| e.category == category).collect()
}

pub fn entry_by_id(id: &str) -> Option<&'static StackEntry> {
    ENTRIES.iter().find(|e| e.id == id)
}

pub fn all_entries() -> &'static [StackEntry] {
    ENTRIES
}

/// Validate the table invariants:
/// - every command template contains `{name}` exactly once
/// - every required tool is known to the dependency checker
/// - entry ids are unique
/// - custom entries declare no post-install commands
pub fn self_check() -> Result<()> {
    for entry in ENTRIES {
        match &entry.method {
            InstallMethod::Command { template, .. } => {
                let count = template.matches("{name}").count();
                if count != 1 {
                    bail!(
                        "registry entry '{}': command template must contain {{name}} exactly once (found {})",
                        entry.id,
                        count
                    );
                }
            }
            InstallMethod::Custom(_) => {
                if !entry.post_install.is_empty() {
                    bail!(
                        "registry entry '{}': custom templates do not support post-install commands",
                        entry.id
                    );
                }
            }
        }

        for tool in entry.requires {
            if !deps::is_known(tool) {
                bail!(
                    "registry entry '{}': required tool '{}' is not in the known-tool table",
                    entry.id,
                    tool
                );
            }
        }
    }

    for (i, entry) in ENTRIES.iter().enumerate() {
        if ENTRIES[i + 1..].iter().any(|other| other.id == entry.id) {
            bail!("registry entry id '{}' is duplicated", entry.id);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_check_passes() {
        self_check().unwrap();
    }

    #[test]
    fn test_every_category_has_entries() {
        for category in Category::ALL {
            assert!(
                !entries_in(category).is_empty(),
                "no entries for {}",
                category
            );
        }
    }

    #[test]
    fn test_entries_in_matches_category() {
        for entry in entries_in(Category::Frontend) {
            assert_eq!(entry.category, Category::Frontend);
        }
    }

    #[test]
    fn test_entry_by_id() {
        let entry = entry_by_id("react-vite").unwrap();
        assert_eq!(entry.display_name, "React (Vite)");
        assert!(entry_by_id("non-existent").is_none());
    }

    #[test]
    fn test_command_templates_resolve_placeholder() {
        for entry in all_entries() {
            if let InstallMethod::Command { template, .. } = &entry.method {
                let resolved = template.replace("{name}", "my-app");
                assert!(!resolved.contains("{name}"), "{} left a placeholder", entry.id);
                assert!(resolved.contains("my-app"));
            }
        }
    }

    #[test]
    fn test_required_fields_populated() {
        for entry in all_entries() {
            assert!(!entry.id.is_empty());
            assert!(!entry.display_name.is_empty());
            assert!(!entry.requires.is_empty());
        }
    }
}
