use crate::engine::error::FoldError;
use std::ffi::OsString;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

/// Resolves the name of an external tool to an executable path.
pub trait ToolLocator: Debug + Send + Sync {
    /// # Errors
    ///
    /// Returns [`FoldError::ToolNotFound`] when no executable can be found.
    fn locate(&self, tool: &str) -> Result<PathBuf, FoldError>;
}

/// Searches the directories of an execution path, `PATH` by default.
#[derive(Debug, Clone, Default)]
pub struct PathLocator {
    search_path: Option<OsString>,
}

impl PathLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Searches `search_path` (same syntax as `PATH`) instead of the environment.
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }
}

impl ToolLocator for PathLocator {
    fn locate(&self, tool: &str) -> Result<PathBuf, FoldError> {
        if tool.contains(std::path::MAIN_SEPARATOR) {
            let candidate = PathBuf::from(tool);
            return if is_executable(&candidate) {
                Ok(candidate)
            } else {
                Err(FoldError::ToolNotFound {
                    tool: tool.to_string(),
                    message: format!("'{}' is not an executable file", candidate.display()),
                })
            };
        }

        let search_path = self
            .search_path
            .clone()
            .or_else(|| std::env::var_os("PATH"))
            .unwrap_or_default();

        std::env::split_paths(&search_path)
            .filter(|dir| !dir.as_os_str().is_empty())
            .flat_map(|dir| candidates(&dir, tool))
            .find(|candidate| is_executable(candidate))
            .ok_or_else(|| FoldError::ToolNotFound {
                tool: tool.to_string(),
                message: "not found on the execution path".to_string(),
            })
    }
}

/// Always resolves to one configured executable, whatever name is requested.
#[derive(Debug, Clone)]
pub struct FixedLocator {
    path: PathBuf,
}

impl FixedLocator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ToolLocator for FixedLocator {
    fn locate(&self, tool: &str) -> Result<PathBuf, FoldError> {
        if is_executable(&self.path) {
            Ok(self.path.clone())
        } else {
            Err(FoldError::ToolNotFound {
                tool: tool.to_string(),
                message: format!("'{}' is not an executable file", self.path.display()),
            })
        }
    }
}

#[cfg(windows)]
fn candidates(dir: &Path, tool: &str) -> Vec<PathBuf> {
    let mut found = vec![dir.join(tool)];
    if Path::new(tool).extension().is_none() {
        found.push(dir.join(format!("{}.exe", tool)));
    }
    found
}

#[cfg(not(windows))]
fn candidates(dir: &Path, tool: &str) -> Vec<PathBuf> {
    vec![dir.join(tool)]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
