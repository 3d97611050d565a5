//! Custom template writers - minimal project skeletons written directly to
//! disk, used where no external generator CLI is worth shelling out to.
//!
//! Each kind is a fixed set of files templated only by the project name
//! (derived from the target directory). Writers are idempotent: re-running
//! against the same target produces identical bytes. No timestamps are
//! embedded, so output is reproducible.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

struct TemplateFile {
    path: &'static str,
    body: &'static str,
}

macro_rules! tpl {
    ($path:expr, $resource:expr) => {
        TemplateFile {
            path: $path,
            body: include_str!(concat!("../resources/templates/", $resource)),
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    FastApi,
    Flask,
    DjangoDrf,
    ExpressTs,
    GoGin,
    GoFiber,
    GoEcho,
    RustAxum,
    RustActix,
    PythonCliTyper,
    PythonCliClick,
    NodeCli,
    NodeCliTs,
    GoCliCobra,
    RustCliClap,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 15] = [
        TemplateKind::FastApi,
        TemplateKind::Flask,
        TemplateKind::DjangoDrf,
        TemplateKind::ExpressTs,
        TemplateKind::GoGin,
        TemplateKind::GoFiber,
        TemplateKind::GoEcho,
        TemplateKind::RustAxum,
        TemplateKind::RustActix,
        TemplateKind::PythonCliTyper,
        TemplateKind::PythonCliClick,
        TemplateKind::NodeCli,
        TemplateKind::NodeCliTs,
        TemplateKind::GoCliCobra,
        TemplateKind::RustCliClap,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            TemplateKind::FastApi => "fastapi",
            TemplateKind::Flask => "flask",
            TemplateKind::DjangoDrf => "django-drf",
            TemplateKind::ExpressTs => "express-ts",
            TemplateKind::GoGin => "go-gin",
            TemplateKind::GoFiber => "go-fiber",
            TemplateKind::GoEcho => "go-echo",
            TemplateKind::RustAxum => "rust-axum",
            TemplateKind::RustActix => "rust-actix",
            TemplateKind::PythonCliTyper => "python-cli-typer",
            TemplateKind::PythonCliClick => "python-cli-click",
            TemplateKind::NodeCli => "node-cli",
            TemplateKind::NodeCliTs => "node-cli-ts",
            TemplateKind::GoCliCobra => "go-cli-cobra",
            TemplateKind::RustCliClap => "rust-cli-clap",
        }
    }

    fn files(&self) -> &'static [TemplateFile] {
        match self {
            TemplateKind::FastApi => FASTAPI,
            TemplateKind::Flask => FLASK,
            TemplateKind::DjangoDrf => DJANGO_DRF,
            TemplateKind::ExpressTs => EXPRESS_TS,
            TemplateKind::GoGin => GO_GIN,
            TemplateKind::GoFiber => GO_FIBER,
            TemplateKind::GoEcho => GO_ECHO,
            TemplateKind::RustAxum => RUST_AXUM,
            TemplateKind::RustActix => RUST_ACTIX,
            TemplateKind::PythonCliTyper => PY_CLI_TYPER,
            TemplateKind::PythonCliClick => PY_CLI_CLICK,
            TemplateKind::NodeCli => NODE_CLI,
            TemplateKind::NodeCliTs => NODE_CLI_TS,
            TemplateKind::GoCliCobra => GO_CLI_COBRA,
            TemplateKind::RustCliClap => RUST_CLI_CLAP,
        }
    }

    /// Write the skeleton into `target`. Creates the directory if needed;
    /// a pre-existing directory is not an error. On failure, partial files
    /// are left in place (no rollback).
    pub fn write(&self, target: &Path) -> Result<()> {
        let name = project_name(target);
        fs::create_dir_all(target)
            .with_context(|| format!("failed to create {}", target.display()))?;

        for file in self.files() {
            let dest = target.join(file.path);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&dest, render(file.body, &name))
                .with_context(|| format!("failed to write {}", dest.display()))?;
        }
        Ok(())
    }
}

fn project_name(target: &Path) -> String {
    target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "app".to_string())
}

fn render(body: &str, name: &str) -> String {
    body.replace("{name}", name)
}

static FASTAPI: &[TemplateFile] = &[
    tpl!("main.py", "fastapi/main.py"),
    tpl!("requirements.txt", "fastapi/requirements.txt"),
    tpl!("README.md", "fastapi/README.md"),
    tpl!(".gitignore", "fastapi/gitignore"),
];

static FLASK: &[TemplateFile] = &[
    tpl!("app.py", "flask/app.py"),
    tpl!("requirements.txt", "flask/requirements.txt"),
    tpl!("README.md", "flask/README.md"),
    tpl!(".gitignore", "flask/gitignore"),
];

static DJANGO_DRF: &[TemplateFile] = &[
    tpl!("requirements.txt", "django-drf/requirements.txt"),
    tpl!("README.md", "django-drf/README.md"),
    tpl!(".gitignore", "django-drf/gitignore"),
];

static EXPRESS_TS: &[TemplateFile] = &[
    tpl!("package.json", "express-ts/package.json"),
    tpl!("src/index.ts", "express-ts/index.ts"),
    tpl!("tsconfig.json", "express-ts/tsconfig.json"),
    tpl!("README.md", "express-ts/README.md"),
    tpl!(".gitignore", "express-ts/gitignore"),
];

static GO_GIN: &[TemplateFile] = &[
    tpl!("main.go", "go-gin/main.go"),
    tpl!("go.mod", "go-gin/go.mod"),
    tpl!("README.md", "go-gin/README.md"),
];

static GO_FIBER: &[TemplateFile] = &[
    tpl!("main.go", "go-fiber/main.go"),
    tpl!("go.mod", "go-fiber/go.mod"),
    tpl!("README.md", "go-fiber/README.md"),
];

static GO_ECHO: &[TemplateFile] = &[
    tpl!("main.go", "go-echo/main.go"),
    tpl!("go.mod", "go-echo/go.mod"),
    tpl!("README.md", "go-echo/README.md"),
];

static RUST_AXUM: &[TemplateFile] = &[
    tpl!("Cargo.toml", "rust-axum/Cargo.toml"),
    tpl!("src/main.rs", "rust-axum/main.rs"),
    tpl!("README.md", "rust-axum/README.md"),
    tpl!(".gitignore", "rust-axum/gitignore"),
];

static RUST_ACTIX: &[TemplateFile] = &[
    tpl!("Cargo.toml", "rust-actix/Cargo.toml"),
    tpl!("src/main.rs", "rust-actix/main.rs"),
    tpl!("README.md", "rust-actix/README.md"),
    tpl!(".gitignore", "rust-actix/gitignore"),
];

static PY_CLI_TYPER: &[TemplateFile] = &[
    tpl!("cli.py", "python-cli-typer/cli.py"),
    tpl!("requirements.txt", "python-cli-typer/requirements.txt"),
    tpl!("README.md", "python-cli-typer/README.md"),
    tpl!(".gitignore", "python-cli-typer/gitignore"),
];

static PY_CLI_CLICK: &[TemplateFile] = &[
    tpl!("cli.py", "python-cli-click/cli.py"),
    tpl!("requirements.txt", "python-cli-click/requirements.txt"),
    tpl!("README.md", "python-cli-click/README.md"),
];

static NODE_CLI: &[TemplateFile] = &[
    tpl!("package.json", "node-cli/package.json"),
    tpl!("cli.js", "node-cli/cli.js"),
    tpl!("README.md", "node-cli/README.md"),
    tpl!(".gitignore", "node-cli/gitignore"),
];

static NODE_CLI_TS: &[TemplateFile] = &[
    tpl!("package.json", "node-cli-ts/package.json"),
    tpl!("src/cli.ts", "node-cli-ts/cli.ts"),
    tpl!("tsconfig.json", "node-cli-ts/tsconfig.json"),
    tpl!("README.md", "node-cli-ts/README.md"),
];

static GO_CLI_COBRA: &[TemplateFile] = &[
    tpl!("main.go", "go-cli-cobra/main.go"),
    tpl!("go.mod", "go-cli-cobra/go.mod"),
    tpl!("README.md", "go-cli-cobra/README.md"),
];

static RUST_CLI_CLAP: &[TemplateFile] = &[
    tpl!("Cargo.toml", "rust-cli-clap/Cargo.toml"),
    tpl!("src/main.rs", "rust-cli-clap/main.rs"),
    tpl!(".gitignore", "rust-cli-clap/gitignore"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<&str> = TemplateKind::ALL.iter().map(|k| k.id()).collect();
        assert_eq!(ids.len(), TemplateKind::ALL.len());
    }

    #[test]
    fn test_fastapi_writes_manifest_and_entry_point() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("demo-api");

        TemplateKind::FastApi.write(&target).unwrap();

        assert!(target.join("main.py").exists());
        let manifest = fs::read_to_string(target.join("requirements.txt")).unwrap();
        assert!(manifest.contains("fastapi"));
        assert!(manifest.contains("uvicorn"));
    }

    #[test]
    fn test_readme_embeds_project_name() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("my-service");

        TemplateKind::GoGin.write(&target).unwrap();

        let readme = fs::read_to_string(target.join("README.md")).unwrap();
        assert!(readme.starts_with("# my-service"));
        let gomod = fs::read_to_string(target.join("go.mod")).unwrap();
        assert!(gomod.contains("module my-service"));
    }

    #[test]
    fn test_nested_paths_created() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("svc");

        TemplateKind::ExpressTs.write(&target).unwrap();

        assert!(target.join("src/index.ts").exists());
        assert!(target.join(".gitignore").exists());
    }

    #[test]
    fn test_rewrite_is_byte_identical() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("repeat");

        for kind in TemplateKind::ALL {
            kind.write(&target).unwrap();
            let first = fs::read_to_string(target.join(kind.files()[0].path)).unwrap();
            kind.write(&target).unwrap();
            let second = fs::read_to_string(target.join(kind.files()[0].path)).unwrap();
            assert_eq!(first, second, "{} not reproducible", kind.id());
        }
    }

    #[test]
    fn test_preexisting_directory_is_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("already-there");
        fs::create_dir_all(&target).unwrap();

        TemplateKind::Flask.write(&target).unwrap();
        assert!(target.join("app.py").exists());
    }
}
