//! Sync configuration
//!
//! Settings come from the process environment; the CLI overrides the
//! feature directory and dry-run flag on top.

use crate::error::ConfigError;
use std::fmt;
use std::path::PathBuf;

/// Conventional location of feature files
pub const DEFAULT_FEATURE_DIR: &str = "src/test/resources/features";

/// Default remote catalog API root
pub const DEFAULT_API_BASE_URL: &str = "https://xray.cloud.getxray.app/api/v2";

/// Client id variable (required)
pub const ENV_CLIENT_ID: &str = "CLIENT_ID";
/// Client secret variable (required)
pub const ENV_CLIENT_SECRET: &str = "CLIENT_SECRET";
/// Project scope for imports (optional)
pub const ENV_PROJECT_KEY: &str = "PROJECT_KEY";
/// API root override (optional)
pub const ENV_API_BASE_URL: &str = "API_BASE_URL";
/// Markdown step summary file (optional)
pub const ENV_STEP_SUMMARY: &str = "GITHUB_STEP_SUMMARY";

/// Catalog client credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    /// Create credentials
    #[inline]
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Sync run configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Root of the feature tree
    pub feature_dir: PathBuf,
    /// Report planned imports without performing them
    pub dry_run: bool,
    /// Catalog credentials
    pub credentials: Credentials,
    /// Project scope for imports
    pub project_key: Option<String>,
    /// Catalog API root
    pub api_base_url: String,
    /// Markdown summary file to append to
    pub step_summary: Option<PathBuf>,
}

impl SyncConfig {
    /// Create configuration with defaults for everything but credentials
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            feature_dir: PathBuf::from(DEFAULT_FEATURE_DIR),
            dry_run: false,
            credentials,
            project_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            step_summary: None,
        }
    }

    /// Load configuration from the process environment
    ///
    /// # Errors
    /// `ConfigError::MissingVariable` if a credential is absent or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Empty values count as absent.
    ///
    /// # Errors
    /// `ConfigError::MissingVariable` if a credential is absent or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let client_id = get(ENV_CLIENT_ID).ok_or(ConfigError::MissingVariable(ENV_CLIENT_ID))?;
        let client_secret =
            get(ENV_CLIENT_SECRET).ok_or(ConfigError::MissingVariable(ENV_CLIENT_SECRET))?;

        let mut config = Self::new(Credentials::new(client_id, client_secret));
        if let Some(project_key) = get(ENV_PROJECT_KEY) {
            config = config.with_project_key(project_key);
        }
        if let Some(base_url) = get(ENV_API_BASE_URL) {
            config = config.with_api_base_url(base_url);
        }
        if let Some(summary) = get(ENV_STEP_SUMMARY) {
            config = config.with_step_summary(summary);
        }
        Ok(config)
    }

    /// With feature directory
    #[inline]
    #[must_use]
    pub fn with_feature_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.feature_dir = dir.into();
        self
    }

    /// With dry-run flag
    #[inline]
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// With import project scope
    #[inline]
    #[must_use]
    pub fn with_project_key(mut self, project_key: impl Into<String>) -> Self {
        self.project_key = Some(project_key.into());
        self
    }

    /// With catalog API root
    #[inline]
    #[must_use]
    pub fn with_api_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = base_url.into();
        self
    }

    /// With step summary file
    #[inline]
    #[must_use]
    pub fn with_step_summary(mut self, path: impl Into<PathBuf>) -> Self {
        self.step_summary = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn requires_both_credentials() {
        let err = SyncConfig::from_lookup(lookup(&[(ENV_CLIENT_SECRET, "s")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVariable(ENV_CLIENT_ID)));

        let err = SyncConfig::from_lookup(lookup(&[(ENV_CLIENT_ID, "id")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVariable(ENV_CLIENT_SECRET)));
    }

    #[test]
    fn empty_credential_counts_as_missing() {
        let err = SyncConfig::from_lookup(lookup(&[(ENV_CLIENT_ID, ""), (ENV_CLIENT_SECRET, "s")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVariable(ENV_CLIENT_ID)));
    }

    #[test]
    fn applies_defaults() {
        let config =
            SyncConfig::from_lookup(lookup(&[(ENV_CLIENT_ID, "id"), (ENV_CLIENT_SECRET, "s")])).unwrap();
        assert_eq!(config.feature_dir, PathBuf::from(DEFAULT_FEATURE_DIR));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert!(config.project_key.is_none());
        assert!(config.step_summary.is_none());
        assert!(!config.dry_run);
    }

    #[test]
    fn reads_optional_settings() {
        let config = SyncConfig::from_lookup(lookup(&[
            (ENV_CLIENT_ID, "id"),
            (ENV_CLIENT_SECRET, "s"),
            (ENV_PROJECT_KEY, "ABC"),
            (ENV_API_BASE_URL, "http://localhost:9000/api"),
            (ENV_STEP_SUMMARY, "/tmp/summary.md"),
        ]))
        .unwrap();
        assert_eq!(config.project_key.as_deref(), Some("ABC"));
        assert_eq!(config.api_base_url, "http://localhost:9000/api");
        assert_eq!(config.step_summary, Some(PathBuf::from("/tmp/summary.md")));
    }

    #[test]
    fn credentials_debug_hides_secret() {
        let creds = Credentials::new("id", "hunter2");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("id"));
        assert!(!rendered.contains("hunter2"));
    }
}
