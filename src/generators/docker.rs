//! Dockerfile / docker-compose generation for existing projects.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::detect::ProjectKind;
use crate::ui::Reporter;

const DOCKERFILE_NEXTJS: &str = include_str!("../../resources/config/dockerfile-nextjs");
const DOCKERFILE_NODE_SPA: &str = include_str!("../../resources/config/dockerfile-node-spa");
const DOCKERFILE_DJANGO: &str = include_str!("../../resources/config/dockerfile-django");
const DOCKERFILE_FASTAPI: &str = include_str!("../../resources/config/dockerfile-fastapi");
const DOCKERFILE_PYTHON: &str = include_str!("../../resources/config/dockerfile-python");
const DOCKERIGNORE: &str = include_str!("../../resources/config/dockerignore");
const NGINX_CONF: &str = include_str!("../../resources/config/nginx.conf");

pub struct DockerGenerator<'a> {
    path: &'a Path,
    kind: ProjectKind,
    name: &'a str,
}

impl<'a> DockerGenerator<'a> {
    pub fn new(path: &'a Path, kind: ProjectKind, name: &'a str) -> Self {
        DockerGenerator { path, kind, name }
    }

    /// True when a Dockerfile template exists for this project kind.
    pub fn supported(&self) -> bool {
        !matches!(self.kind, ProjectKind::Monorepo | ProjectKind::Unknown)
    }

    pub fn write_dockerfile(&self, reporter: &dyn Reporter) -> Result<bool> {
        let body = match self.kind {
            ProjectKind::NextJs => DOCKERFILE_NEXTJS.to_string(),
            ProjectKind::React | ProjectKind::Vue | ProjectKind::NodeJs | ProjectKind::Express => {
                DOCKERFILE_NODE_SPA.to_string()
            }
            ProjectKind::Django => DOCKERFILE_DJANGO.replace("{name}", self.name),
            ProjectKind::FastApi => DOCKERFILE_FASTAPI.to_string(),
            ProjectKind::Flask | ProjectKind::Python => DOCKERFILE_PYTHON.to_string(),
            ProjectKind::Monorepo | ProjectKind::Unknown => {
                reporter.warn(&format!(
                    "No Dockerfile template for {} projects",
                    self.kind.label()
                ));
                return Ok(false);
            }
        };

        write_file(self.path, "Dockerfile", &body, reporter)?;
        write_file(self.path, ".dockerignore", DOCKERIGNORE, reporter)?;

        if matches!(self.kind, ProjectKind::React | ProjectKind::Vue) {
            write_file(self.path, "nginx.conf", NGINX_CONF, reporter)?;
        }
        Ok(true)
    }

    pub fn write_compose(&self, with_database: bool, reporter: &dyn Reporter) -> Result<()> {
        let body = if self.kind == ProjectKind::Monorepo {
            monorepo_compose(with_database)
        } else {
            self.single_compose(with_database)
        };
        write_file(self.path, "docker-compose.yml", &body, reporter)
    }

    fn single_compose(&self, with_database: bool) -> String {
        let service = self.name.replace('-', "_");
        let port = match self.kind {
            ProjectKind::React | ProjectKind::Vue => "80:80",
            ProjectKind::NextJs => "3000:3000",
            _ => "8000:8000",
        };

        let mut compose = format!(
            r#"version: '3.8'

services:
  {service}:
    build: .
    ports:
      - "{port}"
    env_file:
      - .env
    volumes:
      - .:/app
    restart: unless-stopped
"#
        );
        if with_database {
            compose.push_str(POSTGRES_SERVICE);
        }
        compose
    }
}

const POSTGRES_SERVICE: &str = r#"
  db:
    image: postgres:15-alpine
    environment:
      POSTGRES_DB: mydb
      POSTGRES_USER: user
      POSTGRES_PASSWORD: password
    ports:
      - "5432:5432"
    volumes:
      - pgdata:/var/lib/postgresql/data
    restart: unless-stopped

volumes:
  pgdata:
"#;

fn monorepo_compose(with_database: bool) -> String {
    let mut compose = String::from(
        r#"version: '3.8'

services:
  web:
    build: ./web
    ports:
      - "3000:3000"
    environment:
      - API_URL=http://api:8000
    volumes:
      - ./web:/app
      - /app/node_modules
    depends_on:
      - api
    restart: unless-stopped

  api:
    build: ./api
    ports:
      - "8000:8000"
    env_file:
      - ./api/.env
    volumes:
      - ./api:/app
    restart: unless-stopped
"#,
    );
    if with_database {
        compose.push_str("    depends_on:\n      - db\n");
        compose.push_str(POSTGRES_SERVICE);
    }
    compose
}

fn write_file(dir: &Path, file: &str, body: &str, reporter: &dyn Reporter) -> Result<()> {
    let dest = dir.join(file);
    fs::write(&dest, body).with_context(|| format!("failed to write {}", dest.display()))?;
    reporter.success(&format!("Created {}", file));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::SilentReporter;
    use tempfile::TempDir;

    #[test]
    fn test_fastapi_dockerfile() {
        let tmp = TempDir::new().unwrap();
        let gen = DockerGenerator::new(tmp.path(), ProjectKind::FastApi, "svc");

        assert!(gen.write_dockerfile(&SilentReporter).unwrap());

        let dockerfile = fs::read_to_string(tmp.path().join("Dockerfile")).unwrap();
        assert!(dockerfile.contains("uvicorn"));
        assert!(tmp.path().join(".dockerignore").exists());
        assert!(!tmp.path().join("nginx.conf").exists());
    }

    #[test]
    fn test_react_gets_nginx_config() {
        let tmp = TempDir::new().unwrap();
        let gen = DockerGenerator::new(tmp.path(), ProjectKind::React, "app");

        assert!(gen.write_dockerfile(&SilentReporter).unwrap());

        assert!(tmp.path().join("nginx.conf").exists());
        let dockerfile = fs::read_to_string(tmp.path().join("Dockerfile")).unwrap();
        assert!(dockerfile.contains("nginx"));
    }

    #[test]
    fn test_django_dockerfile_embeds_name() {
        let tmp = TempDir::new().unwrap();
        let gen = DockerGenerator::new(tmp.path(), ProjectKind::Django, "mysite");

        gen.write_dockerfile(&SilentReporter).unwrap();

        let dockerfile = fs::read_to_string(tmp.path().join("Dockerfile")).unwrap();
        assert!(dockerfile.contains("mysite.wsgi:application"));
    }

    #[test]
    fn test_unknown_kind_is_unsupported() {
        let tmp = TempDir::new().unwrap();
        let gen = DockerGenerator::new(tmp.path(), ProjectKind::Unknown, "x");

        assert!(!gen.supported());
        assert!(!gen.write_dockerfile(&SilentReporter).unwrap());
        assert!(!tmp.path().join("Dockerfile").exists());
    }

    #[test]
    fn test_single_compose_port_by_kind() {
        let tmp = TempDir::new().unwrap();
        let gen = DockerGenerator::new(tmp.path(), ProjectKind::NextJs, "my-app");

        gen.write_compose(false, &SilentReporter).unwrap();

        let compose = fs::read_to_string(tmp.path().join("docker-compose.yml")).unwrap();
        assert!(compose.contains("my_app:"));
        assert!(compose.contains("\"3000:3000\""));
        assert!(!compose.contains("postgres"));
    }

    #[test]
    fn test_monorepo_compose_with_database() {
        let tmp = TempDir::new().unwrap();
        let gen = DockerGenerator::new(tmp.path(), ProjectKind::Monorepo, "shop");

        gen.write_compose(true, &SilentReporter).unwrap();

        let compose = fs::read_to_string(tmp.path().join("docker-compose.yml")).unwrap();
        assert!(compose.contains("build: ./web"));
        assert!(compose.contains("build: ./api"));
        assert!(compose.contains("postgres:15-alpine"));
        assert!(compose.contains("pgdata:"));
    }
}
