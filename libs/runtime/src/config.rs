use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::paths::home_dir::resolve_home_dir;

/// Main application configuration with strongly-typed sections.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Working directory for storage and log files; normalized to an absolute path.
    #[serde(default)]
    pub home_dir: String,
    /// Remote API connection settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Persistent key-value storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration (optional, uses defaults if None).
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Origin every endpoint path is resolved against.
    pub base_url: String,
    /// Request timeout in seconds, 0 disables it.
    #[serde(default)]
    pub timeout_sec: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// JSON file backing the token storage; relative paths live under home_dir.
    pub file: String,
}

/// Logging configuration - maps subsystem names to their logging settings.
/// Key "default" is the catch-all for logs that don't match explicit subsystems.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Section {
    pub console_level: String, // "info", "debug", "error", "off"
    pub file: String,          // "logs/dashboard.log"
    #[serde(default)]
    pub file_level: String,
    pub max_age_days: Option<u32>, // Rotated files older than this are pruned
    #[serde(default)]
    pub max_backups: Option<usize>, // How many files to keep
    #[serde(default)]
    pub max_size_mb: Option<u64>, // Max size of the file in MB
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_sec: 0,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file: "storage.json".to_string(),
        }
    }
}

/// Create a default logging configuration.
pub fn default_logging_config() -> LoggingConfig {
    let mut logging = HashMap::new();
    logging.insert(
        "default".to_string(),
        Section {
            console_level: "warn".to_string(),
            file: "logs/api-dashboard.log".to_string(),
            file_level: "debug".to_string(),
            max_age_days: Some(7),
            max_backups: Some(3),
            max_size_mb: Some(100),
        },
    );
    logging
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            // Empty => use platform default resolved by resolve_home_dir():
            // Windows: %APPDATA%/.api-dashboard
            // Unix/macOS: $HOME/.api-dashboard
            home_dir: String::new(),
            api: ApiConfig::default(),
            storage: StorageConfig::default(),
            logging: Some(default_logging_config()),
        }
    }
}

impl AppConfig {
    /// Load configuration with layered loading: defaults → YAML file → environment variables.
    /// Also normalizes `home_dir` into an absolute path and creates the directory.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        // Logging stays None unless YAML/ENV provide it.
        let base = AppConfig {
            logging: None,
            ..AppConfig::default()
        };

        let figment = Figment::new()
            .merge(Serialized::defaults(base))
            .merge(Yaml::file(config_path.as_ref()))
            // Example: APP__API__BASE_URL=http://api.local maps to api.base_url
            .merge(Env::prefixed("APP__").split("__"));

        let mut config: AppConfig = figment
            .extract()
            .with_context(|| "Failed to extract config from figment".to_string())?;

        normalize_home_dir_inplace(&mut config).context("Failed to resolve home_dir")?;

        Ok(config)
    }

    /// Load configuration from file or create with default values.
    /// Also normalizes `home_dir` into an absolute path and creates the directory.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => {
                let path = path.as_ref();
                if !path.is_file() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Self::load_layered(path)
            }
            None => {
                let mut c = Self::default();
                normalize_home_dir_inplace(&mut c)
                    .context("Failed to resolve home_dir (defaults)")?;
                Ok(c)
            }
        }
    }

    /// Serialize configuration to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// Apply overrides from command line arguments.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(base_url) = &args.base_url {
            self.api.base_url = base_url.clone();
        }

        // Set logging level based on verbose flags for "default" section.
        let logging = self.logging.get_or_insert_with(default_logging_config);
        if let Some(default_section) = logging.get_mut("default") {
            default_section.console_level = match args.verbose {
                0 => default_section.console_level.clone(), // keep
                1 => "info".to_string(),
                2 => "debug".to_string(),
                _ => "trace".to_string(),
            };
        }
    }

    /// Parse `api.base_url`, rejecting anything that cannot serve as an origin.
    pub fn api_base_url(&self) -> Result<url::Url> {
        let url = url::Url::parse(self.api.base_url.trim())
            .with_context(|| format!("Invalid api.base_url '{}'", self.api.base_url))?;
        if url.cannot_be_a_base() {
            anyhow::bail!("api.base_url '{}' cannot be used as a base", url);
        }
        Ok(url)
    }

    /// Storage file path, resolved against `home_dir` when relative.
    pub fn storage_path(&self) -> PathBuf {
        let p = Path::new(&self.storage.file);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            Path::new(&self.home_dir).join(p)
        }
    }
}

/// Command line arguments structure.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<String>,
    pub base_url: Option<String>,
    pub print_config: bool,
    pub verbose: u8,
}

const fn default_subdir() -> &'static str {
    ".api-dashboard"
}

/// Normalize `home_dir` using `resolve_home_dir` and store the absolute path back.
fn normalize_home_dir_inplace(config: &mut AppConfig) -> Result<()> {
    // Treat empty string as "not provided" => None.
    let opt = if config.home_dir.trim().is_empty() {
        None
    } else {
        Some(config.home_dir.clone())
    };

    let resolved: PathBuf = resolve_home_dir(opt, default_subdir(), /*create*/ true)
        .context("home_dir normalization failed")?;

    config.home_dir = resolved.to_string_lossy().to_string();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    /// Helper: a normalized home_dir should be absolute and not start with '~'.
    fn is_normalized_path(p: &str) -> bool {
        let pb = PathBuf::from(p);
        pb.is_absolute() && !p.starts_with('~')
    }

    #[test]
    fn test_default_config_structure() {
        let config = AppConfig::default();

        assert_eq!(config.home_dir, "");
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_sec, 0);
        assert_eq!(config.storage.file, "storage.json");

        let logging = config.logging.as_ref().unwrap();
        let default_section = &logging["default"];
        assert_eq!(default_section.console_level, "warn");
        assert_eq!(default_section.file, "logs/api-dashboard.log");
    }

    #[test]
    fn test_load_layered_reads_api_and_storage() {
        let tmp = tempdir().unwrap();
        let cfg_path = tmp.path().join("cfg.yaml");
        let home = tmp.path().join("home").to_string_lossy().replace('\\', "/");

        let yaml = format!(
            r#"
home_dir: "{home}"

api:
  base_url: "http://api.internal:9000"
  timeout_sec: 15

storage:
  file: "state/tokens.json"

logging:
  default:
    console_level: debug
    file: "logs/default.log"
"#
        );
        fs::write(&cfg_path, yaml).unwrap();

        let config = AppConfig::load_layered(&cfg_path).unwrap();

        assert!(is_normalized_path(&config.home_dir));
        assert!(Path::new(&config.home_dir).exists());
        assert_eq!(config.api.base_url, "http://api.internal:9000");
        assert_eq!(config.api.timeout_sec, 15);
        assert!(config.storage_path().ends_with("state/tokens.json"));
        assert!(config.storage_path().starts_with(&config.home_dir));

        let def = &config.logging.as_ref().unwrap()["default"];
        assert_eq!(def.console_level, "debug");
        assert_eq!(def.file, "logs/default.log");
    }

    #[test]
    fn test_minimal_yaml_keeps_defaults() {
        let tmp = tempdir().unwrap();
        let cfg_path = tmp.path().join("cfg.yaml");
        let home = tmp.path().join("minimal").to_string_lossy().replace('\\', "/");
        fs::write(&cfg_path, format!("home_dir: \"{home}\"\n")).unwrap();

        let config = AppConfig::load_layered(&cfg_path).unwrap();

        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.storage.file, "storage.json");
        assert!(config.logging.is_none());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let tmp = tempdir().unwrap();
        let cfg_path = tmp.path().join("cfg.yaml");
        fs::write(
            &cfg_path,
            r#"
api:
  base_url: "http://localhost:8000"
  retries: 3
"#,
        )
        .unwrap();

        assert!(AppConfig::load_layered(&cfg_path).is_err());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let tmp = tempdir().unwrap();
        let err = AppConfig::load_or_default(Some(tmp.path().join("absent.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_absolute_storage_path_is_kept() {
        let tmp = tempdir().unwrap();
        let abs = tmp.path().join("tokens.json");
        let config = AppConfig {
            home_dir: "/somewhere/else".to_string(),
            storage: StorageConfig {
                file: abs.to_string_lossy().to_string(),
            },
            ..AppConfig::default()
        };
        assert_eq!(config.storage_path(), abs);
    }

    #[test]
    fn test_api_base_url_validation() {
        let mut config = AppConfig::default();
        assert_eq!(
            config.api_base_url().unwrap().as_str(),
            "http://localhost:8000/"
        );

        config.api.base_url = "not a url".to_string();
        assert!(config.api_base_url().is_err());

        config.api.base_url = "mailto:ops@example.com".to_string();
        assert!(config.api_base_url().is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = AppConfig::default();
        let args = CliArgs {
            base_url: Some("http://staging:8000".to_string()),
            verbose: 2,
            ..CliArgs::default()
        };

        config.apply_cli_overrides(&args);

        assert_eq!(config.api.base_url, "http://staging:8000");
        let default_section = &config.logging.as_ref().unwrap()["default"];
        assert_eq!(default_section.console_level, "debug");
    }

    #[test]
    fn test_cli_verbose_levels_matrix() {
        for (verbose_level, expected_log_level) in [
            (0, "warn"), // unchanged from default
            (1, "info"),
            (2, "debug"),
            (3, "trace"),
            (5, "trace"), // cap at trace
        ] {
            let mut config = AppConfig::default();
            let args = CliArgs {
                verbose: verbose_level,
                ..CliArgs::default()
            };

            config.apply_cli_overrides(&args);

            let default_section = &config.logging.as_ref().unwrap()["default"];
            assert_eq!(default_section.console_level, expected_log_level);
        }
    }

    #[test]
    fn test_cli_overrides_create_missing_logging() {
        let mut config = AppConfig {
            logging: None,
            ..AppConfig::default()
        };
        config.apply_cli_overrides(&CliArgs::default());
        assert!(config.logging.is_some());
    }

    #[test]
    fn test_to_yaml_roundtrip_basic() {
        let config = AppConfig::default();
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("api:"));
        assert!(yaml.contains("storage:"));
        assert!(yaml.contains("logging:"));

        let roundtrip: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(roundtrip.api.base_url, config.api.base_url);
    }
}
