//! Public key loading.
//!
//! The key path passed on the command line goes through home-directory and
//! environment-variable expansion before it is opened. The file content is
//! injected into instance metadata verbatim, so nothing is trimmed here.

use std::env;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use thiserror::Error;

/// Errors raised while loading the public key.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum KeyError {
    /// Raised when the key path is empty or only whitespace.
    #[error("public key path must not be empty")]
    EmptyPath,
    /// Raised when reading the key file fails.
    #[error("failed to read public key `{path}`: {message}")]
    Read {
        /// Expanded path that failed to read.
        path: String,
        /// Underlying error message.
        message: String,
    },
}

/// Expands `~` and `$VAR`/`${VAR}` references using the process environment.
///
/// Unknown variables are left in place.
///
/// # Examples
///
/// ```
/// # use oci_launch::key::expand_path;
/// assert_eq!(expand_path("/absolute/path"), "/absolute/path");
/// assert_eq!(expand_path("$OCI_LAUNCH_UNSET_VAR/x"), "$OCI_LAUNCH_UNSET_VAR/x");
/// ```
#[must_use]
pub fn expand_path(raw: &str) -> String {
    expand_path_with(raw, || env::var("HOME").ok(), |name| env::var(name).ok())
}

/// Expands a path using explicit home-directory and variable lookups.
pub fn expand_path_with<H, L>(raw: &str, home: H, lookup: L) -> String
where
    H: FnOnce() -> Option<String>,
    L: FnMut(&str) -> Option<String>,
{
    shellexpand::full_with_context_no_errors(raw, home, lookup).into_owned()
}

/// Reads the public key file at `raw_path` after expansion.
///
/// # Errors
///
/// Returns [`KeyError::EmptyPath`] for a blank path and [`KeyError::Read`]
/// when the file cannot be read as UTF-8 text.
pub fn load_public_key(raw_path: &str) -> Result<String, KeyError> {
    if raw_path.trim().is_empty() {
        return Err(KeyError::EmptyPath);
    }

    let expanded = expand_path(raw_path);
    read_to_string_ambient(Utf8Path::new(&expanded)).map_err(|message| KeyError::Read {
        path: expanded.clone(),
        message,
    })
}

/// Reads a whole file through an ambient directory handle.
pub(crate) fn read_to_string_ambient(path: &Utf8Path) -> Result<String, String> {
    let (dir_path, file_path) = if path.is_absolute() {
        let parent = path
            .parent()
            .ok_or_else(|| format!("path has no parent directory: {path}"))?;
        let file_name = path
            .file_name()
            .ok_or_else(|| format!("path has no file name: {path}"))?;
        (parent, Utf8Path::new(file_name))
    } else {
        (Utf8Path::new("."), path)
    };

    let dir =
        Dir::open_ambient_dir(dir_path, ambient_authority()).map_err(|err| err.to_string())?;
    dir.read_to_string(file_path).map_err(|err| err.to_string())
}
