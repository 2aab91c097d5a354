/// Browser targets used when neither explicit nor ambient targets exist.
pub const DEFAULT_BROWSERS: &[&str] = &["> 1%", "Firefox ESR", "not ie < 9"];

/// Default pattern classifying a path as dependency code.
pub const DEFAULT_VENDOR_PATTERN: &str = "node_modules";

/// Environment variable consulted for the build mode.
pub const MODE_ENV_VAR: &str = "NODE_ENV";

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_browsers() -> Vec<String> {
    DEFAULT_BROWSERS.iter().map(|s| (*s).to_string()).collect()
}
