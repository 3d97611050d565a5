//! Analysis of existing projects, used by `init` to pick sensible defaults
//! before generating config files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    React,
    NextJs,
    Vue,
    Express,
    NodeJs,
    Django,
    FastApi,
    Flask,
    Python,
    Monorepo,
    Unknown,
}

impl ProjectKind {
    pub fn label(&self) -> &'static str {
        match self {
            ProjectKind::React => "react",
            ProjectKind::NextJs => "nextjs",
            ProjectKind::Vue => "vue",
            ProjectKind::Express => "express",
            ProjectKind::NodeJs => "nodejs",
            ProjectKind::Django => "django",
            ProjectKind::FastApi => "fastapi",
            ProjectKind::Flask => "flask",
            ProjectKind::Python => "python",
            ProjectKind::Monorepo => "monorepo",
            ProjectKind::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
    Pip,
}

impl PackageManager {
    pub fn label(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Pip => "pip",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetectedProject {
    pub kind: ProjectKind,
    pub name: String,
    pub path: PathBuf,
    pub package_manager: Option<PackageManager>,
    pub has_git: bool,
    pub has_env: bool,
    pub has_docker: bool,
    pub dependencies_installed: bool,
    pub frameworks: Vec<&'static str>,
}

#[derive(Deserialize, Default)]
struct PackageJson {
    #[serde(default)]
    dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(rename = "packageManager")]
    package_manager: Option<String>,
}

impl PackageJson {
    fn has_dep(&self, name: &str) -> bool {
        self.dependencies.contains_key(name) || self.dev_dependencies.contains_key(name)
    }
}

pub struct ProjectDetector {
    path: PathBuf,
}

impl ProjectDetector {
    pub fn new(path: &Path) -> Self {
        ProjectDetector {
            path: path.to_path_buf(),
        }
    }

    pub fn detect(&self) -> DetectedProject {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string());

        DetectedProject {
            kind: self.detect_kind(),
            name,
            path: self.path.clone(),
            package_manager: self.detect_package_manager(),
            has_git: self.path.join(".git").exists(),
            has_env: self.path.join(".env").exists(),
            has_docker: self.path.join("Dockerfile").exists(),
            dependencies_installed: self.dependencies_installed(),
            frameworks: self.detect_frameworks(),
        }
    }

    fn package_json(&self) -> Option<PackageJson> {
        let text = fs::read_to_string(self.path.join("package.json")).ok()?;
        serde_json::from_str(&text).ok()
    }

    fn detect_kind(&self) -> ProjectKind {
        if self.path.join("package.json").exists() {
            // malformed manifests still count as a node project
            let pkg = self.package_json().unwrap_or_default();
            return if pkg.has_dep("next") {
                ProjectKind::NextJs
            } else if pkg.has_dep("react") || pkg.has_dep("react-dom") {
                ProjectKind::React
            } else if pkg.has_dep("vue") {
                ProjectKind::Vue
            } else if pkg.has_dep("express") {
                ProjectKind::Express
            } else {
                ProjectKind::NodeJs
            };
        }

        if self.path.join("manage.py").exists() {
            return ProjectKind::Django;
        }

        if self.path.join("main.py").exists() {
            if let Ok(reqs) = fs::read_to_string(self.path.join("requirements.txt")) {
                let reqs = reqs.to_lowercase();
                if reqs.contains("fastapi") {
                    return ProjectKind::FastApi;
                }
                if reqs.contains("flask") {
                    return ProjectKind::Flask;
                }
            }
            return ProjectKind::Python;
        }

        if self.path.join("requirements.txt").exists()
            || self.path.join("pyproject.toml").exists()
        {
            return ProjectKind::Python;
        }

        if self.path.join("web").exists() && self.path.join("api").exists() {
            return ProjectKind::Monorepo;
        }

        ProjectKind::Unknown
    }

    fn detect_package_manager(&self) -> Option<PackageManager> {
        // lockfiles are authoritative
        if self.path.join("package-lock.json").exists() {
            return Some(PackageManager::Npm);
        }
        if self.path.join("yarn.lock").exists() {
            return Some(PackageManager::Yarn);
        }
        if self.path.join("pnpm-lock.yaml").exists() {
            return Some(PackageManager::Pnpm);
        }
        if self.path.join("requirements.txt").exists()
            || self.path.join("pyproject.toml").exists()
        {
            return Some(PackageManager::Pip);
        }

        // fall back to the packageManager field, e.g. "pnpm@8.0.0"
        if self.path.join("package.json").exists() {
            if let Some(pkg) = self.package_json() {
                if let Some(field) = pkg.package_manager {
                    if field.contains("pnpm") {
                        return Some(PackageManager::Pnpm);
                    }
                    if field.contains("yarn") {
                        return Some(PackageManager::Yarn);
                    }
                }
            }
            return Some(PackageManager::Npm);
        }

        None
    }

    fn detect_frameworks(&self) -> Vec<&'static str> {
        let mut frameworks = Vec::new();

        if let Some(pkg) = self.package_json() {
            let known = [
                ("react", "React"),
                ("next", "Next.js"),
                ("vue", "Vue"),
                ("express", "Express.js"),
                ("tailwindcss", "Tailwind CSS"),
                ("typescript", "TypeScript"),
                ("vite", "Vite"),
            ];
            for (dep, label) in known {
                if pkg.has_dep(dep) {
                    frameworks.push(label);
                }
            }
        }

        if let Ok(reqs) = fs::read_to_string(self.path.join("requirements.txt")) {
            let reqs = reqs.to_lowercase();
            if reqs.contains("django") {
                frameworks.push("Django");
            }
            if reqs.contains("fastapi") {
                frameworks.push("FastAPI");
            }
            if reqs.contains("flask") {
                frameworks.push("Flask");
            }
        }

        frameworks
    }

    fn dependencies_installed(&self) -> bool {
        if self.path.join("package.json").exists() {
            return self.path.join("node_modules").exists();
        }
        if self.path.join("requirements.txt").exists() {
            return self.path.join("venv").exists() || self.path.join(".venv").exists();
        }
        // no manifest to judge by
        true
    }

    /// Recommended files the project is missing.
    pub fn missing_files(&self) -> Vec<&'static str> {
        let recommended = [
            (".gitignore", ".gitignore"),
            (".env.example", ".env.example"),
            ("README.md", "README.md"),
            ("Dockerfile", "Dockerfile"),
            (".github/workflows", ".github/workflows/"),
        ];
        recommended
            .iter()
            .filter(|(path, _)| !self.path.join(path).exists())
            .map(|(_, label)| *label)
            .collect()
    }
}
