// Config module: everything the run needs from the environment, read once
// at startup and passed by reference into each stage.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

pub const DEFAULT_XKCD_URL: &str = "https://xkcd.com";
pub const DEFAULT_VK_API_URL: &str = "https://api.vk.com/method";
pub const VK_API_VERSION: &str = "5.131";

/// Highest comic number a random draw can land on.
pub const MAX_COMIC_NUM: u32 = 2500;

#[derive(Clone)]
pub struct Config {
    pub group_id: u64,
    pub token: String,
    pub xkcd_url: String,
    pub vk_api_url: String,
    pub work_dir: PathBuf,
}

// Hand-written so the access token never ends up in a log line.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("group_id", &self.group_id)
            .field("token", &"<redacted>")
            .field("xkcd_url", &self.xkcd_url)
            .field("vk_api_url", &self.vk_api_url)
            .field("work_dir", &self.work_dir)
            .finish()
    }
}

impl Config {
    /// Build the config from the process environment. `VK_GROUP_ID` and
    /// `VK_TOKEN` are required; `XKCD_URL` and `VK_API_URL` fall back to the
    /// public endpoints.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_group = required(&lookup, "VK_GROUP_ID")?;
        let group_id = raw_group
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                Error::Config(format!(
                    "VK_GROUP_ID must be a positive integer, got `{raw_group}`"
                ))
            })?;
        let token = required(&lookup, "VK_TOKEN")?;

        let xkcd_url = lookup("XKCD_URL").unwrap_or_else(|| DEFAULT_XKCD_URL.into());
        let vk_api_url = lookup("VK_API_URL").unwrap_or_else(|| DEFAULT_VK_API_URL.into());

        Ok(Config {
            group_id,
            token,
            xkcd_url: xkcd_url.trim_end_matches('/').to_string(),
            vk_api_url: vk_api_url.trim_end_matches('/').to_string(),
            work_dir: PathBuf::from("."),
        })
    }

    pub fn with_work_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.work_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Wall owner id for community posts: the group id negated.
    pub fn wall_owner_id(&self) -> String {
        format!("-{}", self.group_id)
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Config(format!("{key} is not set"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_credentials_are_set() {
        let config =
            Config::from_lookup(lookup_from(&[("VK_GROUP_ID", "123"), ("VK_TOKEN", "secret")]))
                .unwrap();
        assert_eq!(config.group_id, 123);
        assert_eq!(config.token, "secret");
        assert_eq!(config.xkcd_url, DEFAULT_XKCD_URL);
        assert_eq!(config.vk_api_url, DEFAULT_VK_API_URL);
        assert_eq!(config.work_dir, PathBuf::from("."));
    }

    #[test]
    fn missing_token_is_a_config_error() {
        let err = Config::from_lookup(lookup_from(&[("VK_GROUP_ID", "123")])).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("VK_TOKEN")));
    }

    #[test]
    fn missing_group_is_a_config_error() {
        let err = Config::from_lookup(lookup_from(&[("VK_TOKEN", "secret")])).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("VK_GROUP_ID")));
    }

    #[test]
    fn non_numeric_group_is_rejected() {
        for bad in ["abc", "-5", "0", ""] {
            let err = Config::from_lookup(lookup_from(&[
                ("VK_GROUP_ID", bad),
                ("VK_TOKEN", "secret"),
            ]))
            .unwrap_err();
            assert!(matches!(err, Error::Config(_)), "accepted `{bad}`");
        }
    }

    #[test]
    fn overrides_are_trimmed_of_trailing_slash() {
        let config = Config::from_lookup(lookup_from(&[
            ("VK_GROUP_ID", "7"),
            ("VK_TOKEN", "t"),
            ("XKCD_URL", "http://127.0.0.1:9000/"),
            ("VK_API_URL", "http://127.0.0.1:9001/method/"),
        ]))
        .unwrap();
        assert_eq!(config.xkcd_url, "http://127.0.0.1:9000");
        assert_eq!(config.vk_api_url, "http://127.0.0.1:9001/method");
    }

    #[test]
    fn wall_owner_is_negated_group() {
        let config =
            Config::from_lookup(lookup_from(&[("VK_GROUP_ID", "123"), ("VK_TOKEN", "t")]))
                .unwrap();
        assert_eq!(config.wall_owner_id(), "-123");
    }

    #[test]
    fn debug_output_hides_token() {
        let config =
            Config::from_lookup(lookup_from(&[("VK_GROUP_ID", "1"), ("VK_TOKEN", "hunter2")]))
                .unwrap();
        let shown = format!("{config:?}");
        assert!(!shown.contains("hunter2"));
    }
}
