//! Tool configuration module.
//!
//! Handles loading and validating `keeper.toml`. The file is optional and
//! sparse — stock defaults cover everything, and a config file only needs
//! the values it wants to override:
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! content_dir = "content"   # Content root; blog/ and pages/ live under it
//! data_dir = "data"         # Where the *-ids.json records are kept
//!
//! # Timestamp offset for generated lastUpdated/date values, e.g. "+09:00".
//! # Omit to use the machine's local offset.
//! # utc_offset = "+09:00"
//! ```
//!
//! Unknown keys are rejected to catch typos early. Command-line `--content`
//! and `--data` flags override the file.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Name of the config file, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "keeper.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `keeper.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Content root directory.
    pub content_dir: String,
    /// Directory holding the persisted ID records.
    pub data_dir: String,
    /// Fixed UTC offset (`"+09:00"`) for generated timestamps; `None` means
    /// local time.
    pub utc_offset: Option<String>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            content_dir: "content".to_string(),
            data_dir: "data".to_string(),
            utc_offset: None,
        }
    }
}

impl ToolConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content_dir.is_empty() {
            return Err(ConfigError::Validation("content_dir must not be empty".into()));
        }
        if self.data_dir.is_empty() {
            return Err(ConfigError::Validation("data_dir must not be empty".into()));
        }
        if let Some(offset) = &self.utc_offset {
            parse_offset(offset).ok_or_else(|| {
                ConfigError::Validation(format!(
                    "utc_offset must look like \"+09:00\" or \"-05:00\", got {offset:?}"
                ))
            })?;
        }
        Ok(())
    }

    /// The configured offset as a chrono [`FixedOffset`], if set.
    ///
    /// Call after [`validate`](Self::validate); an unparsable value reads as
    /// unset here.
    pub fn fixed_offset(&self) -> Option<FixedOffset> {
        self.utc_offset.as_deref().and_then(parse_offset)
    }

    /// Offset string used when normalizing bare dates. Falls back to the
    /// local offset when none is configured.
    pub fn offset_string(&self) -> String {
        match &self.utc_offset {
            Some(offset) => offset.clone(),
            None => chrono::Local::now().format("%:z").to_string(),
        }
    }
}

/// Load config from `dir/keeper.toml`, or defaults if the file is absent.
pub fn load_config(dir: &Path) -> Result<ToolConfig, ConfigError> {
    let path = dir.join(CONFIG_FILENAME);
    let config = match std::fs::read_to_string(&path) {
        Ok(content) => toml::from_str(&content)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => ToolConfig::default(),
        Err(e) => return Err(e.into()),
    };
    config.validate()?;
    Ok(config)
}

/// Parse `±HH:MM` into a [`FixedOffset`].
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.bytes().next()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// The stock `keeper.toml` with all options documented, printed by
/// `mdx-keeper gen-config`.
pub fn stock_config_toml() -> &'static str {
    r#"# mdx-keeper configuration
# All options are optional - defaults shown below.

# Content root directory; blog posts live in <content_dir>/blog,
# standalone pages in <content_dir>/pages.
content_dir = "content"

# Directory holding tag-ids.json, category-ids.json, and blog-ids.json.
data_dir = "data"

# Fixed UTC offset for generated timestamps, e.g. "+09:00".
# Omit to use the machine's local offset.
# utc_offset = "+09:00"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.data_dir, "data");
        assert!(config.utc_offset.is_none());
    }

    #[test]
    fn sparse_file_overrides_only_named_keys() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "data_dir = \"state\"\n").unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.data_dir, "state");
        assert_eq!(config.content_dir, "content");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "contnt_dir = \"typo\"\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn bad_offset_fails_validation() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "utc_offset = \"0900\"\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn offset_parses_to_fixed_offset() {
        let config = ToolConfig {
            utc_offset: Some("+09:00".to_string()),
            ..Default::default()
        };
        config.validate().unwrap();
        assert_eq!(
            config.fixed_offset(),
            FixedOffset::east_opt(9 * 3600)
        );
        assert_eq!(config.offset_string(), "+09:00");
    }

    #[test]
    fn negative_offset_parses() {
        assert_eq!(parse_offset("-05:00"), FixedOffset::east_opt(-5 * 3600));
        assert_eq!(parse_offset("+05:30"), FixedOffset::east_opt(5 * 3600 + 1800));
        assert_eq!(parse_offset("09:00"), None);
        assert_eq!(parse_offset("+9:00"), None);
        assert_eq!(parse_offset("+09:75"), None);
    }

    #[test]
    fn stock_config_parses_cleanly() {
        let config: ToolConfig = toml::from_str(stock_config_toml()).unwrap();
        config.validate().unwrap();
        assert_eq!(config, ToolConfig::default());
    }
}
