//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. Built-in defaults
//! 2. User config: `~/.config/cypher-template/config.toml` (XDG) or platform config dir
//! 3. Project config: `.cypher-template.toml`
//! 4. Environment variables: `CYPHER_TEMPLATE_*` (nested keys separated by `__`)
//!
//! # Example
//!
//! ```toml
//! [neo4j]
//! uri = "bolt://localhost:7687"
//! user = "neo4j"
//! password = "secret"
//! db = "neo4j"
//! ```
//!
//! The same password can be supplied with `CYPHER_TEMPLATE_NEO4J__PASSWORD=secret`.

use std::ops::Deref;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Project-level config file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = ".cypher-template.toml";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "CYPHER_TEMPLATE_";

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub neo4j: Neo4jConfig,
}

/// Neo4j connection settings handed to the driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neo4jConfig {
    /// Bolt URI, e.g. `bolt://localhost:7687` or `neo4j+s://host`.
    #[serde(default = "default_uri")]
    pub uri: String,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default)]
    pub password: Option<String>,
    /// Database name. Uses the server default when unset.
    #[serde(default = "default_db")]
    pub db: String,
    /// Records fetched per PULL request.
    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,
    /// Connection pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_db() -> String {
    "neo4j".to_string()
}

fn default_fetch_size() -> usize {
    200
}

fn default_max_connections() -> usize {
    16
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            user: default_user(),
            password: None,
            db: default_db(),
            fetch_size: default_fetch_size(),
            max_connections: default_max_connections(),
        }
    }
}

impl Config {
    /// Load config with layered resolution (defaults → user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment(Self::user_config_path(), PathBuf::from(PROJECT_CONFIG_FILE))
            .extract()
            .map_err(ConfigError::from)
    }

    /// Load config from an explicit file, still honoring env overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(ConfigError::from)
    }

    fn figment(user_config: PathBuf, project_config: PathBuf) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            // Layer 1: User config (lowest priority)
            .merge(Toml::file(user_config))
            // Layer 2: Project config
            .merge(Toml::file(project_config))
            // Layer 3: Environment variables (highest priority)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// User config path: ~/.config/cypher-template/config.toml (XDG) or platform config dir.
    fn user_config_path() -> PathBuf {
        // Prefer XDG config location (~/.config) on all platforms
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home
                .join(".config")
                .join("cypher-template")
                .join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        // Fall back to platform-specific config dir
        dirs::config_dir()
            .map(|p| p.join("cypher-template").join("config.toml"))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let config: Config = Config::figment(
            dir.path().join("missing-user.toml"),
            dir.path().join("missing-project.toml"),
        )
        .extract()
        .unwrap();

        assert_eq!(config.neo4j.uri, "bolt://localhost:7687");
        assert_eq!(config.neo4j.user, "neo4j");
        assert_eq!(config.neo4j.fetch_size, 200);
        assert_eq!(config.neo4j.max_connections, 16);
    }

    #[test]
    fn test_project_overrides_user() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("user.toml");
        let project = dir.path().join("project.toml");

        let mut f = std::fs::File::create(&user).unwrap();
        writeln!(f, "[neo4j]\nuri = \"bolt://user-host:7687\"\nuser = \"alice\"").unwrap();
        let mut f = std::fs::File::create(&project).unwrap();
        writeln!(f, "[neo4j]\nuri = \"bolt://project-host:7687\"").unwrap();

        let config: Config = Config::figment(user, project).extract().unwrap();
        assert_eq!(config.neo4j.uri, "bolt://project-host:7687");
        assert_eq!(config.neo4j.user, "alice");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            "[neo4j]\npassword = \"secret\"\ndb = \"people\"\nfetch_size = 50"
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.neo4j.password.as_deref(), Some("secret"));
        assert_eq!(config.neo4j.db, "people");
        assert_eq!(config.neo4j.fetch_size, 50);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[neo4j]\nfetch_size = \"lots\"\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
