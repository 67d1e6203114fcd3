//! Where config layers live on disk.

use super::{DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILE};
use crate::ConfigError;
use directories::UserDirs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// `/etc/askql/askql.json5` on Unix, the ProgramData equivalent on Windows.
pub(super) fn system_config_path() -> Option<PathBuf> {
    if cfg!(unix) {
        Some(Path::new("/etc/askql").join(DEFAULT_CONFIG_FILE))
    } else if cfg!(windows) {
        Some(Path::new("C:\\ProgramData\\askql").join(DEFAULT_CONFIG_FILE))
    } else {
        None
    }
}

/// `~/.askql/askql.json5`, when a home directory is known.
pub(super) fn user_config_path() -> Option<PathBuf> {
    let dirs = UserDirs::new()?;
    Some(
        dirs.home_dir()
            .join(DEFAULT_CONFIG_DIR)
            .join(DEFAULT_CONFIG_FILE),
    )
}

/// Closest directory at or above `start` holding one of `markers`.
pub(super) fn project_root(start: &Path, markers: &[String]) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| markers.iter().any(|marker| dir.join(marker).exists()))
        .map(Path::to_path_buf)
}

/// Absolute form of the working directory. A directory that does not exist
/// yet is kept as given.
pub(super) fn resolve_cwd(cwd: &Path) -> Result<PathBuf, ConfigError> {
    match cwd.canonicalize() {
        Ok(resolved) => Ok(resolved),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(cwd.to_path_buf()),
        Err(source) => Err(ConfigError::Read {
            path: cwd.to_path_buf(),
            source,
        }),
    }
}

/// Key identifying a layer file, so two routes to one file load it once.
pub(super) fn identity(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
