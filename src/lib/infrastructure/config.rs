//! Application configuration
//!
//! Values come from command-line flags or environment variables. The OpenAI key is looked
//! up in the secrets file first and in the environment second.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::debug;

use crate::{
    domain::{delivery::DispatcherConfig, replies::ComposerConfig},
    infrastructure::{email::smtp::SmtpRelayConfig, llm::openai::DEFAULT_BASE_URL},
};

/// The key holding the OpenAI credential, in the secrets file and the environment
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Text generation provider configuration
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
pub struct ProviderConfig {
    /// The OpenAI API key
    #[arg(long = "openai-api-key", env = OPENAI_API_KEY, hide_env_values = true)]
    pub api_key: Option<String>,

    /// The OpenAI API base URL
    #[arg(long = "openai-base-url", env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// The model used to generate replies
    #[arg(long = "openai-model", env = "OPENAI_MODEL", default_value = "gpt-4.1-mini")]
    pub model: String,

    /// Seconds to wait for the provider before using the fallback reply
    #[arg(
        long = "provider-timeout-secs",
        env = "PROVIDER_TIMEOUT_SECS",
        default_value = "30"
    )]
    pub provider_timeout_secs: u64,
}

impl ProviderConfig {
    /// Resolves the API key, preferring the secrets file over the environment.
    ///
    /// Blank values count as missing.
    pub fn resolve_api_key(&self, secrets: &SecretStore) -> Option<String> {
        if let Some(key) = secrets.get(OPENAI_API_KEY) {
            debug!("using OpenAI API key from the secrets file");
            return Some(key.to_string());
        }

        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }

    /// The reply composer configuration
    pub fn composer_config(&self) -> ComposerConfig {
        ComposerConfig {
            model: self.model.clone(),
            timeout: Duration::from_secs(self.provider_timeout_secs),
        }
    }
}

/// SMTP relay configuration
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
pub struct SmtpConfig {
    /// The SMTP relay host; replies are only simulated when unset
    #[arg(long = "smtp-host", env = "SMTP_HOST")]
    pub host: Option<String>,

    /// The SMTP submission port
    #[arg(long = "smtp-port", env = "SMTP_PORT", default_value = "587")]
    pub smtp_port: u16,

    /// Seconds to wait for each SMTP operation
    #[arg(long = "smtp-timeout-secs", env = "SMTP_TIMEOUT_SECS", default_value = "30")]
    pub smtp_timeout_secs: u64,

    /// Upgrade SMTP connections with STARTTLS; only disable for a trusted local relay
    #[arg(
        long = "smtp-starttls",
        env = "SMTP_STARTTLS",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub smtp_starttls: bool,
}

impl SmtpConfig {
    /// The relay configuration, if a host is set
    pub fn relay_config(&self) -> Option<SmtpRelayConfig> {
        let host = self.host.as_deref().map(str::trim).filter(|h| !h.is_empty())?;

        Some(SmtpRelayConfig {
            host: host.to_string(),
            port: self.smtp_port,
            timeout: Duration::from_secs(self.smtp_timeout_secs),
            starttls: self.smtp_starttls,
        })
    }

    /// The dispatcher configuration
    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            timeout: Duration::from_secs(self.smtp_timeout_secs),
        }
    }
}

/// Secrets file location
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
pub struct SecretsConfig {
    /// A TOML file of secrets consulted before the environment
    #[arg(long = "secrets-file", env = "SECRETS_FILE", default_value = "secrets.toml")]
    pub secrets_file: PathBuf,
}

/// Secrets read from a TOML file
#[derive(Clone, Default)]
pub struct SecretStore {
    values: toml::Table,
}

impl fmt::Debug for SecretStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretStore")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SecretStore {
    /// Loads secrets from `path`; a missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("no secrets file at {}", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read secrets file {}", path.display()))?;

        Self::parse(&raw).with_context(|| format!("failed to parse secrets file {}", path.display()))
    }

    /// Parses secrets from TOML
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(Self {
            values: raw.parse()?,
        })
    }

    /// A non-blank top-level string secret
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|value| value.as_str())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use testresult::TestResult;

    use super::*;

    fn provider_config(api_key: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            api_key: api_key.map(str::to_string),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: "gpt-4.1-mini".to_string(),
            provider_timeout_secs: 30,
        }
    }

    #[test]
    fn test_provider_defaults() {
        let config = ProviderConfig::parse_from(["server", "--openai-api-key", "env-key"]);

        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4.1-mini");
        assert_eq!(
            config.composer_config(),
            ComposerConfig {
                model: "gpt-4.1-mini".to_string(),
                timeout: Duration::from_secs(30),
            }
        );
    }

    #[test]
    fn test_secrets_file_wins_over_environment() -> TestResult {
        let secrets = SecretStore::parse(r#"OPENAI_API_KEY = "file-key""#)?;

        let key = provider_config(Some("env-key")).resolve_api_key(&secrets);

        assert_eq!(key.as_deref(), Some("file-key"));

        Ok(())
    }

    #[test]
    fn test_environment_used_when_secrets_file_has_no_key() -> TestResult {
        let secrets = SecretStore::parse(r#"OPENAI_API_KEY = "  ""#)?;

        let key = provider_config(Some("env-key")).resolve_api_key(&secrets);

        assert_eq!(key.as_deref(), Some("env-key"));

        Ok(())
    }

    #[test]
    fn test_no_key_anywhere_is_none() {
        let key = provider_config(Some(" ")).resolve_api_key(&SecretStore::default());

        assert_eq!(key, None);
        assert_eq!(
            provider_config(None).resolve_api_key(&SecretStore::default()),
            None
        );
    }

    #[test]
    fn test_load_missing_secrets_file_is_empty() -> TestResult {
        let dir = tempfile::tempdir()?;

        let secrets = SecretStore::load(&dir.path().join("secrets.toml"))?;

        assert_eq!(secrets.get(OPENAI_API_KEY), None);

        Ok(())
    }

    #[test]
    fn test_load_secrets_file() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "OPENAI_API_KEY = \"sk-from-file\"")?;

        let secrets = SecretStore::load(file.path())?;

        assert_eq!(secrets.get(OPENAI_API_KEY), Some("sk-from-file"));
        assert!(!format!("{secrets:?}").contains("sk-from-file"));

        Ok(())
    }

    #[test]
    fn test_load_malformed_secrets_file_fails() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "OPENAI_API_KEY = ")?;

        assert!(SecretStore::load(file.path()).is_err());

        Ok(())
    }

    #[test]
    fn test_smtp_without_host_has_no_relay() {
        let config = SmtpConfig {
            host: Some("  ".to_string()),
            smtp_port: 587,
            smtp_timeout_secs: 30,
            smtp_starttls: true,
        };

        assert_eq!(config.relay_config(), None);
        assert_eq!(config.dispatcher_config().timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_smtp_relay_config() {
        let config = SmtpConfig::parse_from([
            "server",
            "--smtp-host",
            "smtp.example.com",
            "--smtp-port",
            "2525",
            "--smtp-timeout-secs",
            "5",
        ]);

        assert_eq!(
            config.relay_config(),
            Some(SmtpRelayConfig {
                host: "smtp.example.com".to_string(),
                port: 2525,
                timeout: Duration::from_secs(5),
                starttls: true,
            })
        );
    }

    #[test]
    fn test_smtp_starttls_can_be_disabled() {
        let config = SmtpConfig::parse_from([
            "server",
            "--smtp-host",
            "localhost",
            "--smtp-starttls",
            "false",
        ]);

        assert_eq!(config.relay_config().map(|relay| relay.starttls), Some(false));
    }
}
