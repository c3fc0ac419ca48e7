//! Connection settings.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable overriding the database directory.
pub const PATH_ENV: &str = "SS_SQLITE_DATABASE_PATH";

/// Environment variable overriding the encryption key.
pub const KEY_ENV: &str = "SS_SQLITE_DATABASE_KEY";

/// Database filename used when none is configured.
pub const DEFAULT_DATABASE: &str = "database.sqlite";

fn default_database() -> String {
    String::from(DEFAULT_DATABASE)
}

/// Where the database lives and how to open it.
///
/// The database file is `<path>/<database>`. An empty key is the same as no
/// key.
///
/// ```
/// use oxide_sql_sqlite3::ConnectionConfig;
///
/// let config = ConnectionConfig::from_json(r#"{"path": "/var/db", "database": "site.sqlite"}"#)?;
/// assert_eq!(config.file_path(), std::path::Path::new("/var/db/site.sqlite"));
/// # Ok::<(), oxide_sql_sqlite3::ConfigError>(())
/// ```
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionConfig {
    path: PathBuf,
    #[serde(default = "default_database")]
    database: String,
    #[serde(default)]
    key: Option<String>,
}

impl ConnectionConfig {
    /// Creates a validated configuration without a key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingPath`] or [`ConfigError::MissingDatabase`]
    /// when either part is empty.
    pub fn new(path: impl Into<PathBuf>, database: impl Into<String>) -> Result<Self, ConfigError> {
        let config = Self {
            path: path.into(),
            database: database.into(),
            key: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the encryption key handed to the engine on connect.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into()).filter(|k| !k.is_empty());
        self
    }

    /// Parses and validates a JSON configuration.
    ///
    /// `database` defaults to [`DEFAULT_DATABASE`]; `key` is optional.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, otherwise the
    /// errors of [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.key = config.key.filter(|k| !k.is_empty());
        config.validate()?;
        Ok(config)
    }

    /// Checks that both the directory and the filename are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingPath`] or [`ConfigError::MissingDatabase`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::MissingPath);
        }
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingDatabase);
        }
        Ok(())
    }

    /// Applies [`PATH_ENV`] and [`KEY_ENV`] from the process environment.
    #[must_use]
    pub fn apply_env_overrides(self) -> Self {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    ///
    /// Empty values are ignored for the path and clear the key.
    #[must_use]
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(PATH_ENV).filter(|p| !p.is_empty()) {
            self.path = PathBuf::from(path);
        }
        if let Some(key) = lookup(KEY_ENV) {
            self.key = Some(key).filter(|k| !k.is_empty());
        }
        self
    }

    /// Returns the database directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the database filename.
    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Returns the encryption key, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Returns the full path of the database file.
    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        self.path.join(&self.database)
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("path", &self.path)
            .field("database", &self.database)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates() {
        assert_eq!(
            ConnectionConfig::new("", "db.sqlite").unwrap_err(),
            ConfigError::MissingPath
        );
        assert_eq!(
            ConnectionConfig::new("/tmp", "  ").unwrap_err(),
            ConfigError::MissingDatabase
        );
        let config = ConnectionConfig::new("/tmp", "db.sqlite").unwrap();
        assert_eq!(config.file_path(), PathBuf::from("/tmp/db.sqlite"));
        assert_eq!(config.key(), None);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{"path": "/srv/data", "key": "s3cret"}"#;
        let config = ConnectionConfig::from_json(json).unwrap();
        assert_eq!(config.database(), DEFAULT_DATABASE);
        assert_eq!(config.key(), Some("s3cret"));

        let config = ConnectionConfig::from_json(r#"{"path": "/srv/data", "key": ""}"#).unwrap();
        assert_eq!(config.key(), None);

        assert!(matches!(
            ConnectionConfig::from_json(r#"{"database": "x"}"#),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(
            ConnectionConfig::from_json(r#"{"path": ""}"#).unwrap_err(),
            ConfigError::MissingPath
        );
    }

    #[test]
    fn test_overrides() {
        let config = ConnectionConfig::new("/a", "db.sqlite")
            .unwrap()
            .with_key("old")
            .apply_overrides(|name| match name {
                PATH_ENV => Some(String::from("/b")),
                KEY_ENV => Some(String::new()),
                _ => None,
            });
        assert_eq!(config.path(), Path::new("/b"));
        assert_eq!(config.key(), None);

        let untouched = ConnectionConfig::new("/a", "db.sqlite")
            .unwrap()
            .apply_overrides(|_| None);
        assert_eq!(untouched.path(), Path::new("/a"));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ConnectionConfig::new("/a", "db.sqlite").unwrap().with_key("hunter2");
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }
}
