//! Preparing the directory that holds the database file.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::ProvisionError;

/// Name of the access-control file written into the database directory.
pub const ACCESS_FILE: &str = ".htaccess";

/// Contents of [`ACCESS_FILE`]; blocks web servers from serving the directory.
pub const ACCESS_RULE: &str = "deny from all";

/// Creates `path` and any missing parents. An existing directory is left alone.
///
/// # Errors
///
/// Returns [`ProvisionError::Create`].
pub fn create_db_dir(path: &Path) -> Result<(), ProvisionError> {
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|source| ProvisionError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "Created database directory");
    Ok(())
}

/// Writes [`ACCESS_FILE`] into `path`, replacing any existing one.
///
/// # Errors
///
/// Returns [`ProvisionError::Secure`].
pub fn secure_db_dir(path: &Path) -> Result<(), ProvisionError> {
    fs::write(path.join(ACCESS_FILE), ACCESS_RULE).map_err(|source| ProvisionError::Secure {
        path: path.to_path_buf(),
        source,
    })
}

/// Checks that `path` can be written, or created when absent.
///
/// A temporary file is created in the nearest existing ancestor, so
/// ownership, ACLs and read-only mounts are all honoured.
///
/// # Errors
///
/// Returns [`ProvisionError::PermissionDenied`].
pub fn check_writable(path: &Path) -> Result<(), ProvisionError> {
    let existing = path
        .ancestors()
        .find(|p| !p.as_os_str().is_empty() && p.exists())
        .unwrap_or_else(|| Path::new("."));
    if tempfile::tempfile_in(existing).is_ok() {
        Ok(())
    } else {
        Err(ProvisionError::PermissionDenied(path.to_path_buf()))
    }
}

/// Checks, creates and secures the database directory.
///
/// # Errors
///
/// Returns the first failing step's [`ProvisionError`].
pub fn prepare_db_dir(path: &Path) -> Result<(), ProvisionError> {
    check_writable(path)?;
    create_db_dir(path)?;
    secure_db_dir(path)?;
    info!(path = %path.display(), "Database directory ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_creates_and_secures() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("assets").join("db");

        prepare_db_dir(&dir).unwrap();

        assert!(dir.is_dir());
        let rule = fs::read_to_string(dir.join(ACCESS_FILE)).unwrap();
        assert_eq!(rule, "deny from all");
    }

    #[test]
    fn test_create_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        create_db_dir(root.path()).unwrap();
        create_db_dir(root.path()).unwrap();
        assert!(root.path().is_dir());
    }

    #[test]
    fn test_check_writable_absent_dir() {
        let root = tempfile::tempdir().unwrap();
        assert!(check_writable(&root.path().join("missing")).is_ok());
        assert!(check_writable(root.path()).is_ok());
    }

    #[test]
    fn test_check_writable_absent_ancestors() {
        let root = tempfile::tempdir().unwrap();
        let deep = root.path().join("a").join("b").join("c");
        assert!(check_writable(&deep).is_ok());
        prepare_db_dir(&deep).unwrap();
        assert!(deep.join(ACCESS_FILE).is_file());
    }

    #[test]
    fn test_check_writable_file_in_the_way() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("occupied");
        fs::write(&file, "x").unwrap();
        // a regular file can't hold a database directory
        let err = check_writable(&file.join("db")).unwrap_err();
        assert!(matches!(err, ProvisionError::PermissionDenied(_)));
    }

    #[test]
    fn test_secure_fails_without_dir() {
        let root = tempfile::tempdir().unwrap();
        let err = secure_db_dir(&root.path().join("nope")).unwrap_err();
        assert!(matches!(err, ProvisionError::Secure { .. }));
    }
}
