//! Construction options for an atom set.
//!
//! Options can be built programmatically, converted from a `serde_json::Value`,
//! or loaded in layers (defaults, `atoms.toml`, `FOB_ATOMS_*` environment
//! variables) through figment.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, Result};
use crate::helpers::{DEFAULT_VENDOR_PATTERN, default_true};
use crate::mode::Mode;

/// Name of the optional config file read by [`AtomsOptions::load`].
pub const CONFIG_FILE_NAME: &str = "atoms.toml";

/// Prefix for environment variable overrides read by [`AtomsOptions::load`].
pub const ENV_PREFIX: &str = "FOB_ATOMS_";

/// Options accepted when constructing an atom set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomsOptions {
    /// Options forwarded to the script-transform (babel) loader when a call
    /// does not supply its own
    #[serde(default)]
    pub script_config: Map<String, Value>,

    /// Explicit browser target queries; wins over any ambient config
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browsers: Option<Vec<String>>,

    /// Explicit build mode; `NODE_ENV` is consulted when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,

    /// Regex source classifying dependency paths (default: `node_modules`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_pattern: Option<String>,

    /// Prefix for emitted asset names, e.g. `static/`
    #[serde(default)]
    pub asset_relative_root: String,

    /// Skip probing the project root for a browserslist config
    #[serde(default)]
    pub ignore_browserslist_config: bool,

    /// Inject styles at runtime instead of extracting them outside production
    #[serde(default = "default_true")]
    pub disable_extract_in_dev: bool,

    /// Directory searched for ambient configuration (default: current dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Page template for the html plugin (default: the bundled template)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_template: Option<PathBuf>,
}

impl Default for AtomsOptions {
    fn default() -> Self {
        Self {
            script_config: Map::new(),
            browsers: None,
            mode: None,
            vendor_pattern: None,
            asset_relative_root: String::new(),
            ignore_browserslist_config: false,
            disable_extract_in_dev: true,
            root: None,
            html_template: None,
        }
    }
}

impl AtomsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from serde_json::Value
    ///
    /// # Example
    ///
    /// ```
    /// use fob_atoms_config::{AtomsOptions, Mode};
    /// use serde_json::json;
    ///
    /// let options = AtomsOptions::from_value(json!({
    ///     "mode": "production",
    ///     "browsers": ["last 2 versions"]
    /// }))
    /// .unwrap();
    ///
    /// assert_eq!(options.mode, Some(Mode::Production));
    /// ```
    pub fn from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "options".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "options".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Layered figment for `root`.
    ///
    /// Priority: environment variables > `atoms.toml` > defaults. Nested keys
    /// in environment variables are separated by `__`.
    pub fn figment(root: impl AsRef<Path>) -> Figment {
        let root = root.as_ref();
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(root.join(CONFIG_FILE_NAME)))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load options for a project root.
    ///
    /// The returned options have `root` set to the given directory unless the
    /// config file or environment already set one.
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let mut options: Self =
            Self::figment(root)
                .extract()
                .map_err(|e| ConfigError::InvalidValue {
                    field: "configuration".to_string(),
                    hint: Some(e.to_string()),
                })?;
        if options.root.is_none() {
            options.root = Some(root.to_path_buf());
        }
        Ok(options)
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_browsers<I, S>(mut self, browsers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.browsers = Some(browsers.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_vendor_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.vendor_pattern = Some(pattern.into());
        self
    }

    pub fn with_asset_relative_root(mut self, root: impl Into<String>) -> Self {
        self.asset_relative_root = root.into();
        self
    }

    pub fn with_script_config(mut self, config: Map<String, Value>) -> Self {
        self.script_config = config;
        self
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_html_template(mut self, template: impl Into<PathBuf>) -> Self {
        self.html_template = Some(template.into());
        self
    }

    pub fn ignore_browserslist_config(mut self, ignore: bool) -> Self {
        self.ignore_browserslist_config = ignore;
        self
    }

    pub fn disable_extract_in_dev(mut self, disable: bool) -> Self {
        self.disable_extract_in_dev = disable;
        self
    }

    /// Compile the dependency-path pattern.
    pub fn vendor_regex(&self) -> Result<Regex> {
        let pattern = self
            .vendor_pattern
            .as_deref()
            .unwrap_or(DEFAULT_VENDOR_PATTERN);
        Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_null_is_default() {
        assert_eq!(AtomsOptions::from_value(Value::Null).unwrap(), AtomsOptions::default());
    }

    #[test]
    fn from_value_rejects_non_objects() {
        let err = AtomsOptions::from_value(json!(["production"])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn vendor_regex_defaults_to_node_modules() {
        let regex = AtomsOptions::default().vendor_regex().unwrap();
        assert!(regex.is_match("/app/node_modules/react/index.js"));
        assert!(!regex.is_match("/app/src/index.js"));
    }

    #[test]
    fn invalid_vendor_pattern_is_reported() {
        let err = AtomsOptions::new()
            .with_vendor_pattern("(unclosed")
            .vendor_regex()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"
        ));
    }

    #[test]
    fn to_value_round_trips_mode() {
        let value = AtomsOptions::new().with_mode(Mode::Test).to_value().unwrap();
        assert_eq!(value["mode"], json!("test"));
        assert_eq!(value["disable_extract_in_dev"], json!(true));
    }
}
