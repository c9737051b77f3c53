use crate::error::{MetadataError, Result};
use std::time::Duration;

pub const METADATA_URL_ENV: &str = "AC_METADATA_URL";
pub const APP_NAME_ENV: &str = "AC_APP_NAME";
pub const TIMEOUT_ENV: &str = "AC_METADATA_TIMEOUT";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the metadata service lives and which app we're asking about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub metadata_url: String,
    pub app_name: String,
    pub timeout: Duration,
}

impl Config {
    pub fn new(metadata_url: impl Into<String>, app_name: impl Into<String>) -> Result<Config> {
        let metadata_url = metadata_url.into();
        let app_name = app_name.into();
        if metadata_url.is_empty() {
            return Err(MetadataError::MissingEnv(METADATA_URL_ENV));
        }
        if app_name.is_empty() {
            return Err(MetadataError::MissingEnv(APP_NAME_ENV));
        }
        Ok(Config {
            metadata_url: metadata_url.trim_end_matches('/').to_string(),
            app_name,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn from_env() -> Result<Config> {
        Config::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Config>
        where F: Fn(&str) -> Option<String>
    {
        let mut config = Config::new(lookup(METADATA_URL_ENV).unwrap_or_default(),
                                     lookup(APP_NAME_ENV).unwrap_or_default())?;

        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|v| !v.is_empty()) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                MetadataError::InvalidEnv {
                    name: TIMEOUT_ENV,
                    value: raw.clone(),
                }
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        debug!("loaded config: {:?}", config);
        Ok(config)
    }

    /// Full url for a path below `/acMetadata/v1/`.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/acMetadata/v1/{}", self.metadata_url, path)
    }
}
