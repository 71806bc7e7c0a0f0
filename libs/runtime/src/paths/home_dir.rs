//! Resolution of the application home directory.

use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HomeDirError {
    #[error("cannot determine the user home directory ({var} is not set)")]
    NoHome { var: &'static str },

    #[error("cannot determine the current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    #[error("failed to create home directory '{path}': {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(target_os = "windows")]
const HOME_VAR: &str = "APPDATA";
#[cfg(not(target_os = "windows"))]
const HOME_VAR: &str = "HOME";

fn user_home() -> Result<PathBuf, HomeDirError> {
    env::var_os(HOME_VAR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or(HomeDirError::NoHome { var: HOME_VAR })
}

/// Expand a leading `~` into the user home directory.
fn expand_tilde(raw: &str) -> Result<PathBuf, HomeDirError> {
    if raw == "~" {
        return user_home();
    }
    match raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        Some(rest) => Ok(user_home()?.join(rest)),
        None => Ok(PathBuf::from(raw)),
    }
}

fn absolutize(p: &Path) -> Result<PathBuf, HomeDirError> {
    if p.is_absolute() {
        Ok(p.to_path_buf())
    } else {
        Ok(env::current_dir()
            .map_err(HomeDirError::CurrentDir)?
            .join(p))
    }
}

/// Resolve the home directory into an absolute path.
///
/// - `Some(path)`: `~` is expanded, relative paths are joined to the current directory.
/// - `None`: `<user home>/<default_subdir>`.
///
/// With `create` set, the directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf, HomeDirError> {
    let path = match configured {
        Some(raw) => absolutize(&expand_tilde(raw.trim())?)?,
        None => user_home()?.join(default_subdir),
    };

    if create {
        std::fs::create_dir_all(&path).map_err(|source| HomeDirError::Create {
            path: path.clone(),
            source,
        })?;
    }

    Ok(path)
}
