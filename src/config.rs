use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use splitledger_core::gateway::DEFAULT_BASE_URL;
use splitledger_core::{
    AllocationPolicy, Credentials, GatewayError, Ledger, LedgerSettings, SplitwiseClient,
};

/// Source of a configuration value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Application configuration with source tracking.
///
/// Built once at startup and handed to the ledger; nothing reads the
/// environment after that.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    #[serde(skip)]
    pub api_key: Option<ConfigValue<String>>,
    #[serde(skip)]
    pub consumer_key: Option<ConfigValue<String>>,
    #[serde(skip)]
    pub consumer_secret: Option<ConfigValue<String>>,
    /// Splitwise API root
    pub base_url: ConfigValue<String>,
    /// Currency for new expenses
    pub currency_code: ConfigValue<String>,
    /// Maximum expenses per listing, 0 for all in the window
    pub expense_limit: ConfigValue<u32>,
    pub request_timeout_secs: ConfigValue<u64>,
    /// Reject expenses naming unknown participants instead of skipping them
    pub strict_participants: ConfigValue<bool>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    api_key: Option<String>,
    consumer_key: Option<String>,
    consumer_secret: Option<String>,
    base_url: Option<String>,
    currency_code: Option<String>,
    expense_limit: Option<u32>,
    request_timeout_secs: Option<u64>,
    strict_participants: Option<bool>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with_env(config_path, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`], reading environment variables through `env`.
    pub fn load_with_env<F>(config_path: Option<PathBuf>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::defaults();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config.config_file = Some(path.clone());
            config.apply_file(file_config);
        }

        config.apply_env(env)?;
        Ok(config)
    }

    fn defaults() -> Self {
        Self {
            api_key: None,
            consumer_key: None,
            consumer_secret: None,
            base_url: ConfigValue::new(DEFAULT_BASE_URL.to_string(), ConfigSource::Default),
            currency_code: ConfigValue::new("INR".to_string(), ConfigSource::Default),
            expense_limit: ConfigValue::new(0, ConfigSource::Default),
            request_timeout_secs: ConfigValue::new(30, ConfigSource::Default),
            strict_participants: ConfigValue::new(false, ConfigSource::Default),
            config_file: None,
        }
    }

    fn apply_file(&mut self, file: ConfigFile) {
        let from_file = |v| ConfigValue::new(v, ConfigSource::File);

        if let Some(v) = file.api_key {
            self.api_key = Some(from_file(v));
        }
        if let Some(v) = file.consumer_key {
            self.consumer_key = Some(from_file(v));
        }
        if let Some(v) = file.consumer_secret {
            self.consumer_secret = Some(from_file(v));
        }
        if let Some(v) = file.base_url {
            self.base_url = from_file(v);
        }
        if let Some(v) = file.currency_code {
            self.currency_code = from_file(v);
        }
        if let Some(v) = file.expense_limit {
            self.expense_limit = ConfigValue::new(v, ConfigSource::File);
        }
        if let Some(v) = file.request_timeout_secs {
            self.request_timeout_secs = ConfigValue::new(v, ConfigSource::File);
        }
        if let Some(v) = file.strict_participants {
            self.strict_participants = ConfigValue::new(v, ConfigSource::File);
        }
    }

    fn apply_env<F>(&mut self, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Prefixed names win over the bare names Splitwise tooling commonly uses.
        let secret = |prefixed: &str, bare: &str| {
            env(prefixed)
                .or_else(|| env(bare))
                .map(|v| ConfigValue::new(v, ConfigSource::Environment))
        };
        if let Some(v) = secret("SPLITLEDGER_API_KEY", "API_KEY") {
            self.api_key = Some(v);
        }
        if let Some(v) = secret("SPLITLEDGER_CONSUMER_KEY", "CONSUMER_KEY") {
            self.consumer_key = Some(v);
        }
        if let Some(v) = secret("SPLITLEDGER_CONSUMER_SECRET", "CONSUMER_SECRET") {
            self.consumer_secret = Some(v);
        }

        if let Some(url) = env("SPLITLEDGER_BASE_URL") {
            self.base_url = ConfigValue::new(url, ConfigSource::Environment);
        }
        if let Some(code) = env("SPLITLEDGER_CURRENCY") {
            self.currency_code = ConfigValue::new(code, ConfigSource::Environment);
        }
        if let Some(raw) = env("SPLITLEDGER_EXPENSE_LIMIT") {
            let v = parse_env("SPLITLEDGER_EXPENSE_LIMIT", &raw)?;
            self.expense_limit = ConfigValue::new(v, ConfigSource::Environment);
        }
        if let Some(raw) = env("SPLITLEDGER_TIMEOUT_SECS") {
            let v = parse_env("SPLITLEDGER_TIMEOUT_SECS", &raw)?;
            self.request_timeout_secs = ConfigValue::new(v, ConfigSource::Environment);
        }
        if let Some(raw) = env("SPLITLEDGER_STRICT") {
            let v = parse_env("SPLITLEDGER_STRICT", &raw)?;
            self.strict_participants = ConfigValue::new(v, ConfigSource::Environment);
        }

        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            api_key: self.api_key.as_ref().map(|v| v.value.clone()),
            consumer_key: self.consumer_key.as_ref().map(|v| v.value.clone()),
            consumer_secret: self.consumer_secret.as_ref().map(|v| v.value.clone()),
        }
    }

    pub fn ledger_settings(&self) -> LedgerSettings {
        LedgerSettings {
            currency_code: self.currency_code.value.clone(),
            expense_limit: self.expense_limit.value,
            allocation_policy: if self.strict_participants.value {
                AllocationPolicy::Strict
            } else {
                AllocationPolicy::SkipUnresolved
            },
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.value)
    }

    /// Builds the Splitwise-backed ledger. Missing credentials are not an error
    /// here; each operation reports them when it calls the ledger.
    pub fn build_ledger(&self) -> Result<Ledger<SplitwiseClient>, GatewayError> {
        let client = SplitwiseClient::new(
            self.base_url.value.clone(),
            self.credentials(),
            self.request_timeout(),
        )?;
        Ok(Ledger::new(client, self.ledger_settings()))
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/splitledger/
    /// - macOS: ~/Library/Application Support/splitledger/
    /// - Windows: %APPDATA%/splitledger/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("splitledger")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key, raw.to_string()))
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue(key, value) => {
                write!(f, "Invalid value for {}: '{}'", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::tempdir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load_with_env(Some(config_path), no_env).unwrap();
        assert_eq!(config.base_url.value, DEFAULT_BASE_URL);
        assert_eq!(config.base_url.source, ConfigSource::Default);
        assert_eq!(config.currency_code.value, "INR");
        assert_eq!(config.expense_limit.value, 0);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(!config.strict_participants.value);
        assert!(config.api_key.is_none());
        assert!(config.config_file.is_none());
        assert!(!config.credentials().is_complete());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "api_key: file-api").unwrap();
        writeln!(file, "consumer_key: file-ckey").unwrap();
        writeln!(file, "consumer_secret: file-csecret").unwrap();
        writeln!(file, "currency_code: USD").unwrap();
        writeln!(file, "strict_participants: true").unwrap();

        let config = Config::load_with_env(Some(config_path.clone()), no_env).unwrap();
        assert_eq!(config.currency_code.value, "USD");
        assert_eq!(config.currency_code.source, ConfigSource::File);
        assert_eq!(config.api_key.as_ref().unwrap().source, ConfigSource::File);
        assert!(config.credentials().is_complete());
        assert_eq!(
            config.ledger_settings().allocation_policy,
            AllocationPolicy::Strict
        );
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    fn test_env_var_overrides_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "api_key: fromfile").unwrap();
        writeln!(file, "currency_code: USD").unwrap();

        let env = env_from(&[("API_KEY", "fromenv"), ("SPLITLEDGER_CURRENCY", "EUR")]);
        let config = Config::load_with_env(Some(config_path), env).unwrap();

        let api_key = config.api_key.unwrap();
        assert_eq!(api_key.value, "fromenv");
        assert_eq!(api_key.source, ConfigSource::Environment);
        assert_eq!(config.currency_code.value, "EUR");
    }

    #[test]
    fn test_prefixed_env_var_wins_over_bare() {
        let temp_dir = tempdir().unwrap();
        let env = env_from(&[
            ("CONSUMER_KEY", "bare"),
            ("SPLITLEDGER_CONSUMER_KEY", "prefixed"),
        ]);
        let config =
            Config::load_with_env(Some(temp_dir.path().join("none.yaml")), env).unwrap();

        assert_eq!(config.consumer_key.unwrap().value, "prefixed");
    }

    #[test]
    fn test_invalid_numeric_env_value() {
        let temp_dir = tempdir().unwrap();
        let env = env_from(&[("SPLITLEDGER_EXPENSE_LIMIT", "many")]);

        let err = Config::load_with_env(Some(temp_dir.path().join("none.yaml")), env).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for SPLITLEDGER_EXPENSE_LIMIT: 'many'"
        );
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load_with_env(Some(config_path), no_env);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_json_output_omits_secrets() {
        let temp_dir = tempdir().unwrap();
        let env = env_from(&[("API_KEY", "super-secret")]);
        let config = Config::load_with_env(Some(temp_dir.path().join("none.yaml")), env).unwrap();

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("super-secret"));
        assert!(json.contains("currency_code"));
    }

    #[test]
    fn test_build_ledger_without_credentials() {
        let temp_dir = tempdir().unwrap();
        let config =
            Config::load_with_env(Some(temp_dir.path().join("none.yaml")), no_env).unwrap();

        let ledger = config.build_ledger().unwrap();
        assert_eq!(ledger.gateway().base_url(), DEFAULT_BASE_URL);
        assert_eq!(ledger.settings().currency_code, "INR");
    }
}
