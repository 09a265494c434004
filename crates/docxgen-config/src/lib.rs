//! Configuration management for docxgen.
//!
//! Parses `docxgen.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `storage.public_base_url`
//! - `storage.key_prefix`
//! - `storage.s3.bucket`
//! - `storage.s3.region`
//! - `storage.s3.endpoint`
//! - `storage.fs.root`

mod expand;

use expand::{ExpandField, Expander};

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override the deployment environment.
    pub environment: Option<Environment>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docxgen.toml";

/// Deployment environment.
///
/// Development exposes error details in 500 responses.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Deployment environment.
    pub environment: Environment,
    /// Server configuration.
    pub server: ServerConfig,
    /// Blob storage configuration.
    pub storage: StorageConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Which blob store receives generated documents.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// S3 or an S3-compatible service.
    S3,
    /// Local directory.
    #[default]
    Fs,
}

/// Blob storage configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Selected backend.
    pub backend: StorageBackend,
    /// Base URL documents are served from.
    pub public_base_url: Option<String>,
    /// Key prefix for uploaded documents.
    pub key_prefix: Option<String>,
    /// S3 settings (required when `backend = "s3"`).
    pub s3: Option<S3StorageConfig>,
    /// Filesystem settings.
    pub fs: FsStorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Fs,
            public_base_url: None,
            key_prefix: Some("documents".to_owned()),
            s3: None,
            fs: FsStorageConfig::default(),
        }
    }
}

/// S3 storage settings.
#[derive(Debug, Deserialize)]
pub struct S3StorageConfig {
    /// Bucket name.
    pub bucket: String,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// S3-compatible endpoint URL (`LocalStack`, `MinIO`).
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Upload with the `public-read` canned ACL.
    #[serde(default = "default_public_read")]
    pub public_read: bool,
}

fn default_region() -> String {
    "us-east-1".to_owned()
}

fn default_public_read() -> bool {
    true
}

/// Filesystem storage settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FsStorageConfig {
    /// Root directory, relative to the config file.
    pub root: PathBuf,
}

impl Default for FsStorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("blobs"),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("{field} references ${{{var}}}, which is not set")]
    EnvVar {
        /// Config key holding the reference (e.g. "`storage.s3.bucket`").
        field: &'static str,
        /// Name of the unset variable.
        var: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `docxgen.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(environment) = settings.environment {
            self.environment = environment;
        }
    }

    /// Get validated S3 configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the `[storage.s3]` section is missing.
    pub fn require_s3(&self) -> Result<&S3StorageConfig, ConfigError> {
        self.storage.s3.as_ref().ok_or_else(|| {
            ConfigError::Validation("[storage.s3] section required when backend = \"s3\"".into())
        })
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self::default();
        config.resolve_paths(base);
        config
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_storage()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }
        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::Validation(
                "server.max_body_bytes must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_storage(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.storage.public_base_url {
            require_non_empty(url, "storage.public_base_url")?;
            require_http_url(url, "storage.public_base_url")?;
        }

        if let Some(s3) = &self.storage.s3 {
            require_non_empty(&s3.bucket, "storage.s3.bucket")?;
            require_non_empty(&s3.region, "storage.s3.region")?;
            if let Some(endpoint) = &s3.endpoint {
                require_http_url(endpoint, "storage.s3.endpoint")?;
            }
        }

        if self.storage.backend == StorageBackend::S3 {
            self.require_s3()?;
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.expand_with(&Expander::from_env())
    }

    fn expand_with<F: Fn(&str) -> Option<String>>(
        &mut self,
        expander: &Expander<F>,
    ) -> Result<(), ConfigError> {
        expander.string(&mut self.server.host, ExpandField::ServerHost)?;
        expander.optional(&mut self.storage.public_base_url, ExpandField::PublicBaseUrl)?;
        expander.optional(&mut self.storage.key_prefix, ExpandField::KeyPrefix)?;
        expander.path(&mut self.storage.fs.root, ExpandField::FsRoot)?;

        if let Some(ref mut s3) = self.storage.s3 {
            expander.string(&mut s3.bucket, ExpandField::S3Bucket)?;
            expander.string(&mut s3.region, ExpandField::S3Region)?;
            expander.optional(&mut s3.endpoint, ExpandField::S3Endpoint)?;
        }

        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.storage.fs.root = config_dir.join(&self.storage.fs.root);
    }
}
