//! Local project context.
//!
//! When flags are omitted, defaults come from the working tree: a `.ship.toml`
//! project file and the branch currently checked out in git.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::Deserialize;

/// Project file name.
pub const PROJECT_FILE: &str = ".ship.toml";

/// Contents of `.ship.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ProjectFile {
    #[serde(default)]
    pub application: ProjectApplication,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ProjectApplication {
    pub organization: Option<String>,
    pub project: Option<String>,
    pub environment: Option<String>,
    pub name: Option<String>,
}

/// Defaults discovered from the working directory.
#[derive(Debug, Clone, Default)]
pub struct LocalContext {
    pub project_file: Option<ProjectFile>,
    pub branch: Option<String>,
}

impl LocalContext {
    /// Discover context from `cwd`. Missing files are not an error.
    pub fn discover(cwd: &Path) -> Result<Self> {
        let project_file = match find_upwards(cwd, PROJECT_FILE) {
            Some(path) => Some(ProjectFile::load(&path)?),
            None => None,
        };

        Ok(Self {
            project_file,
            branch: current_branch(cwd),
        })
    }

    fn application(&self) -> Option<&ProjectApplication> {
        self.project_file.as_ref().map(|f| &f.application)
    }

    pub fn organization(&self) -> Option<&str> {
        self.application()?.organization.as_deref()
    }

    pub fn project(&self) -> Option<&str> {
        self.application()?.project.as_deref()
    }

    pub fn environment(&self) -> Option<&str> {
        self.application()?.environment.as_deref()
    }

    pub fn application_name(&self) -> Option<&str> {
        self.application()?.name.as_deref()
    }
}

impl ProjectFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read project file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse project file {}", path.display()))
    }
}

/// Walk up from `start` looking for `name`, stopping at the home directory or
/// the filesystem root.
fn find_upwards(start: &Path, name: &str) -> Option<PathBuf> {
    let home_dir = BaseDirs::new().map(|bd| bd.home_dir().to_path_buf());
    let mut current = start.to_path_buf();

    loop {
        let candidate = current.join(name);
        if candidate.exists() {
            return Some(candidate);
        }

        if home_dir.as_deref() == Some(current.as_path()) {
            return None;
        }

        match current.parent() {
            Some(parent) if parent != current => current = parent.to_path_buf(),
            _ => return None,
        }
    }
}

/// The branch checked out in the git repository containing `cwd`.
///
/// Returns `None` outside a repository or on a detached HEAD.
pub fn current_branch(cwd: &Path) -> Option<String> {
    let git = find_upwards(cwd, ".git")?;
    let head_path = git_dir(&git)?.join("HEAD");
    let head = fs::read_to_string(head_path).ok()?;
    parse_head(&head)
}

/// Resolve `.git` to the git directory; worktrees use a `gitdir:` file.
fn git_dir(dot_git: &Path) -> Option<PathBuf> {
    if dot_git.is_dir() {
        return Some(dot_git.to_path_buf());
    }

    let contents = fs::read_to_string(dot_git).ok()?;
    let target = contents.trim().strip_prefix("gitdir:")?.trim();
    let target = Path::new(target);
    if target.is_absolute() {
        Some(target.to_path_buf())
    } else {
        dot_git.parent().map(|p| p.join(target))
    }
}

fn parse_head(head: &str) -> Option<String> {
    head.trim()
        .strip_prefix("ref:")
        .map(str::trim)
        .and_then(|r| r.strip_prefix("refs/heads/"))
        .filter(|b| !b.is_empty())
        .map(str::to_string)
}
