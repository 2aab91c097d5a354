//! Error types for atom construction.

use fob_atoms_config::ConfigError;
use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for fob-atoms operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced while building atoms.
///
/// Merging never fails on key collisions (caller values win), so every
/// variant here is a caller mistake reported at the call site.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// An options value was not an object
    #[error("options for `{factory}` must be an object, got {found}")]
    #[diagnostic(
        code(fob::atoms::misconfigured_options),
        help("Pass a JSON object (or null for defaults)")
    )]
    MisconfiguredOptions {
        factory: &'static str,
        found: &'static str,
    },

    /// Plugin lookup by name missed
    #[error("unknown plugin: {0}")]
    #[diagnostic(
        code(fob::atoms::unknown_plugin),
        help("See PluginAtoms::NAMES for the available plugins")
    )]
    UnknownPlugin(String),

    /// Construction options could not be resolved
    #[error(transparent)]
    #[diagnostic(code(fob::atoms::config))]
    Config(#[from] ConfigError),
}

impl Error {
    pub(crate) fn misconfigured(factory: &'static str, value: &serde_json::Value) -> Self {
        Self::MisconfiguredOptions {
            factory,
            found: json_type_name(value),
        }
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
