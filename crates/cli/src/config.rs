//! CLI configuration

use config::{Config, ConfigError, Environment, File};
use medportal_client::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const STATE_DIR_ENV: &str = "MEDPORTAL_STATE_DIR";
const CREDENTIALS_FILE: &str = "credentials.json";

/// Settings read from `medportal.toml` and `MEDPORTAL_*` variables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Backend base URL, including the `/api` prefix
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Per-request timeout in seconds (0 = no timeout)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Where durable credentials are kept
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
    /// Emit logs as JSON
    #[serde(default)]
    pub log_json: bool,
}

fn default_api_url() -> String {
    medportal_client::config::DEFAULT_BASE_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            state_dir: None,
            log_json: false,
        }
    }
}

impl CliConfig {
    /// Load configuration from defaults, a config file and the environment
    ///
    /// An explicit `path` must exist. Without one, `medportal.toml` in the
    /// working directory and in `state_dir` are read when present.
    pub fn load(path: Option<&Path>, state_dir: &Path) -> Result<Self, ConfigError> {
        Self::load_with_env(path, state_dir, Self::environment())
    }

    /// `MEDPORTAL_API_URL`, `MEDPORTAL_TIMEOUT_SECS`, ... override file settings
    fn environment() -> Environment {
        Environment::with_prefix("MEDPORTAL")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn load_with_env(
        path: Option<&Path>,
        state_dir: &Path,
        env: Environment,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path.to_path_buf()));
            }
            None => {
                for candidate in [PathBuf::from("medportal.toml"), state_dir.join("medportal.toml")]
                {
                    builder = builder.add_source(File::from(candidate).required(false));
                }
            }
        }

        builder.add_source(env).build()?.try_deserialize()
    }

    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(&self.api_url);
        if self.timeout_secs == 0 {
            config
        } else {
            config.with_timeout(Duration::from_secs(self.timeout_secs))
        }
    }

    pub fn credentials_path(state_dir: &Path) -> PathBuf {
        state_dir.join(CREDENTIALS_FILE)
    }
}

/// State directory: `--data-dir`, then `MEDPORTAL_STATE_DIR`, then the
/// platform data directory
pub fn resolve_state_dir(data_dir: Option<PathBuf>) -> PathBuf {
    data_dir.unwrap_or_else(|| {
        if let Ok(state_dir) = std::env::var(STATE_DIR_ENV) {
            PathBuf::from(state_dir)
        } else {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("medportal")
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "api_url = \"https://portal.example/api\"\ntimeout_secs = 0\n")
            .unwrap();

        let config = CliConfig::load(Some(&path), dir.path()).unwrap();
        assert_eq!(config.api_url, "https://portal.example/api");
        assert_eq!(config.timeout_secs, 0);
        assert_eq!(config.client_config().timeout, None);
    }

    #[test]
    fn state_dir_file_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::load(None, dir.path()).unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert!(!config.log_json);
    }

    #[test]
    fn single_underscore_variables_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "api_url = \"https://file.example/api\"\n").unwrap();

        let vars = config::Map::from([
            (
                "MEDPORTAL_API_URL".to_string(),
                "https://env.example/api".to_string(),
            ),
            ("MEDPORTAL_TIMEOUT_SECS".to_string(), "5".to_string()),
            ("OTHER_API_URL".to_string(), "https://ignored.example".to_string()),
        ]);
        let env = CliConfig::environment().source(Some(vars));

        let config = CliConfig::load_with_env(Some(&path), dir.path(), env).unwrap();
        assert_eq!(config.api_url, "https://env.example/api");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(CliConfig::load(Some(&path), dir.path()).is_err());
    }

    #[test]
    fn data_dir_flag_wins() {
        let dir = PathBuf::from("/tmp/medportal-test");
        assert_eq!(resolve_state_dir(Some(dir.clone())), dir);
        assert_eq!(
            CliConfig::credentials_path(&dir),
            dir.join("credentials.json")
        );
    }
}
