//! # fob-atoms-config
//!
//! Option types and environment resolution for `fob-atoms`.
//!
//! Everything environment-sensitive in the atom registries reads a single
//! [`EnvironmentContext`] produced here: the build [`Mode`] and the browser
//! target queries handed to autoprefixer.

pub mod browserslist;
pub mod environment;
pub mod error;
mod helpers;
pub mod mode;
pub mod options;

pub use browserslist::{
    BROWSERSLIST_ENV_VAR, BrowserslistConfig, BrowserslistLoader, BrowserslistSections,
    DEFAULTS_SECTION, FsBrowserslistLoader, NoBrowserslist, parse_sections, select_env,
};
pub use environment::{EnvironmentContext, EnvironmentResolver, TargetSource, resolve_environment};
pub use error::{ConfigError, Result};
pub use helpers::{DEFAULT_BROWSERS, DEFAULT_VENDOR_PATTERN, MODE_ENV_VAR};
pub use mode::Mode;
pub use options::{AtomsOptions, CONFIG_FILE_NAME, ENV_PREFIX};
