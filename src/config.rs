use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://jira.atlassian.com/rest/api/";
pub const DEFAULT_API_VERSION: &str = "2022-02-22";
pub const DEFAULT_SECRET_LABEL: &str = "JIRA_PRIVATE_SECRET";

/// Which remote list populates the selector field on load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopLevelSource {
    Projects,
    #[default]
    Databases,
}

impl std::str::FromStr for TopLevelSource {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "projects" => Ok(TopLevelSource::Projects),
            "databases" => Ok(TopLevelSource::Databases),
            other => bail!("unknown top-level source '{other}'"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IntegrationOptions {
    pub base_url: Url,
    pub api_version: String,
    pub secret_label: String,
    pub timeout: Duration,
    pub top_level: TopLevelSource,
    pub search_debounce: Duration,
}

impl Default for IntegrationOptions {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_version: DEFAULT_API_VERSION.to_string(),
            secret_label: DEFAULT_SECRET_LABEL.to_string(),
            timeout: Duration::from_secs(30),
            top_level: TopLevelSource::default(),
            search_debounce: Duration::from_millis(300),
        }
    }
}

impl IntegrationOptions {
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = normalize_base(base_url);
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_secret_label(mut self, label: impl Into<String>) -> Self {
        self.secret_label = label.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_top_level(mut self, source: TopLevelSource) -> Self {
        self.top_level = source;
        self
    }

    pub fn with_search_debounce(mut self, debounce: Duration) -> Self {
        self.search_debounce = debounce;
        self
    }

    /// Defaults overridden by `JIRAFORM_BASE_URL`, `JIRAFORM_API_VERSION` and
    /// `JIRAFORM_TOP_LEVEL` when set.
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();
        if let Ok(raw) = std::env::var("JIRAFORM_BASE_URL") {
            let url = Url::parse(&raw).context("JIRAFORM_BASE_URL is not a valid URL")?;
            options = options.with_base_url(url);
        }
        if let Ok(version) = std::env::var("JIRAFORM_API_VERSION") {
            options = options.with_api_version(version);
        }
        if let Ok(raw) = std::env::var("JIRAFORM_TOP_LEVEL") {
            options = options.with_top_level(raw.parse()?);
        }
        Ok(options)
    }

    /// Reads options from a TOML document. Every key is optional.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: OptionsFile =
            toml::from_str(contents).context("failed to parse integration options")?;
        let mut options = Self::default();
        if let Some(raw) = file.base_url {
            let url = Url::parse(&raw).with_context(|| format!("invalid base_url '{raw}'"))?;
            options = options.with_base_url(url);
        }
        if let Some(version) = file.api_version {
            options.api_version = version;
        }
        if let Some(label) = file.secret_label {
            options.secret_label = label;
        }
        if let Some(secs) = file.timeout_secs {
            options.timeout = Duration::from_secs(secs);
        }
        if let Some(source) = file.top_level {
            options.top_level = source;
        }
        if let Some(ms) = file.search_debounce_ms {
            options.search_debounce = Duration::from_millis(ms);
        }
        Ok(options)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OptionsFile {
    base_url: Option<String>,
    api_version: Option<String>,
    secret_label: Option<String>,
    timeout_secs: Option<u64>,
    top_level: Option<TopLevelSource>,
    search_debounce_ms: Option<u64>,
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).unwrap_or_else(|_| unreachable!("default base url is valid"))
}

// `Url::join` drops the last segment unless the base ends with a slash.
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
