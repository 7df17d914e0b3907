//! Configuration file handling for pgschema.
//!
//! Looks for `.config/pgschema.styx` in the current directory or any parent
//! directory. Every setting is optional; a missing file means defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use facet::Facet;

/// Connection settings.
#[derive(Facet, Debug, Default, Clone, PartialEq)]
pub struct Config {
    /// Full connection string, URL or key/value form. Other settings
    /// override the parts they name.
    #[facet(default)]
    pub url: Option<String>,

    #[facet(default)]
    pub host: Option<String>,

    #[facet(default)]
    pub port: Option<u16>,

    #[facet(default)]
    pub database: Option<String>,

    #[facet(default)]
    pub user: Option<String>,

    #[facet(default)]
    pub password: Option<String>,

    #[facet(default)]
    pub connect_timeout_secs: Option<u64>,

    #[facet(default)]
    pub application_name: Option<String>,
}

impl Config {
    /// Build tokio-postgres connection settings.
    ///
    /// Falls back to `localhost` and the `postgres` role when neither the URL
    /// nor the individual settings name them.
    pub fn to_pg_config(&self) -> Result<tokio_postgres::Config, ConfigError> {
        let mut pg = match &self.url {
            Some(url) => url
                .parse::<tokio_postgres::Config>()
                .map_err(|e| ConfigError::Invalid(e.to_string()))?,
            None => tokio_postgres::Config::new(),
        };

        if let Some(host) = &self.host {
            pg.host(host.as_str());
        }
        if let Some(port) = self.port {
            pg.port(port);
        }
        if let Some(database) = &self.database {
            pg.dbname(database.as_str());
        }
        if let Some(user) = &self.user {
            pg.user(user.as_str());
        }
        if let Some(password) = &self.password {
            pg.password(password.as_str());
        }
        if let Some(secs) = self.connect_timeout_secs {
            pg.connect_timeout(Duration::from_secs(secs));
        }
        pg.application_name(self.application_name.as_deref().unwrap_or("pgschema"));

        if pg.get_hosts().is_empty() {
            pg.host("localhost");
        }
        if pg.get_user().is_none() {
            pg.user("postgres");
        }

        Ok(pg)
    }
}

/// Load configuration from `.config/pgschema.styx`, searching up the directory tree.
///
/// Returns the default configuration, and no path, when there is no file.
pub fn load() -> Result<(Config, Option<PathBuf>), ConfigError> {
    let cwd = std::env::current_dir().map_err(|e| ConfigError::Io(e.to_string()))?;
    match load_from(&cwd) {
        Ok((config, path)) => Ok((config, Some(path))),
        Err(ConfigError::NotFound) => Ok((Config::default(), None)),
        Err(e) => Err(e),
    }
}

/// Read and parse the nearest `.config/pgschema.styx` at or above `start`.
pub fn load_from(start: &Path) -> Result<(Config, PathBuf), ConfigError> {
    let path = find_config_file(start).ok_or(ConfigError::NotFound)?;
    let source = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io(e.to_string()))?;
    let config =
        facet_styx::from_str::<Config>(&source).map_err(|e| ConfigError::Parse(e.to_string()))?;
    Ok((config, path))
}

fn find_config_file(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_PATH))
        .find(|candidate| candidate.is_file())
}

const CONFIG_PATH: &str = ".config/pgschema.styx";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no .config/pgschema.styx in the current directory or any parent")]
    NotFound,

    #[error("could not read .config/pgschema.styx: {0}")]
    Io(String),

    #[error("could not parse .config/pgschema.styx: {0}")]
    Parse(String),

    /// The settings do not add up to a usable connection.
    #[error("invalid connection settings: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_host_and_user() {
        let pg = Config::default().to_pg_config().unwrap();
        assert_eq!(pg.get_user(), Some("postgres"));
        assert_eq!(pg.get_hosts().len(), 1);
        assert_eq!(pg.get_application_name(), Some("pgschema"));
    }

    #[test]
    fn test_settings_override_url() {
        let config = Config {
            url: Some("postgres://app@db.internal:6543/main".to_owned()),
            user: Some("admin".to_owned()),
            connect_timeout_secs: Some(5),
            ..Config::default()
        };
        let pg = config.to_pg_config().unwrap();
        assert_eq!(pg.get_user(), Some("admin"));
        assert_eq!(pg.get_dbname(), Some("main"));
        assert_eq!(pg.get_ports(), &[6543]);
        assert_eq!(pg.get_connect_timeout(), Some(&Duration::from_secs(5)));
    }

    #[test]
    fn test_bad_url_is_invalid() {
        let config = Config {
            url: Some("postgres://host:notaport".to_owned()),
            ..Config::default()
        };
        let err = config.to_pg_config().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
    }

    fn write_config(dir: &Path, source: &str) {
        std::fs::create_dir_all(dir.join(".config")).unwrap();
        std::fs::write(dir.join(CONFIG_PATH), source).unwrap();
    }

    #[test]
    fn test_config_file_is_found_from_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "");
        std::fs::create_dir_all(dir.path().join("a/b")).unwrap();

        let found = find_config_file(&dir.path().join("a/b"));
        assert_eq!(found, Some(dir.path().join(CONFIG_PATH)));
    }

    #[test]
    fn test_settings_are_read_from_styx() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            "host db.internal\nport 6543\nuser app\nconnect_timeout_secs 3\n",
        );

        let (config, path) = load_from(dir.path()).unwrap();
        assert_eq!(path, dir.path().join(CONFIG_PATH));
        assert_eq!(
            config,
            Config {
                host: Some("db.internal".to_owned()),
                port: Some(6543),
                user: Some("app".to_owned()),
                connect_timeout_secs: Some(3),
                ..Config::default()
            }
        );

        let pg = config.to_pg_config().unwrap();
        assert_eq!(pg.get_ports(), &[6543]);
        assert_eq!(pg.get_user(), Some("app"));
        assert_eq!(pg.get_dbname(), None);
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "host {db.internal\n");

        let err = load_from(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "{err}");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_from(dir.path()), Err(ConfigError::NotFound)));
    }
}
