//! State shared by the registries of one atom set.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use fob_atoms_config::{AtomsOptions, EnvironmentContext};

use crate::Result;
use crate::condition::Matcher;
use crate::options::Options;
use crate::plugins::default_html_template;

/// Monotonic identifier source scoped to one atom set.
///
/// Each construction gets its own counter, so identifiers generated by two
/// independently constructed atom sets both start from 1 and never observe
/// each other's increments.
#[derive(Debug, Default)]
pub struct IdentCounter(AtomicU32);

impl IdentCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next identifier of the form `{prefix}-{n}`, starting at 1.
    pub fn next(&self, prefix: &str) -> String {
        let n = self.0.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::trace!(prefix, n, "allocated ident");
        format!("{prefix}-{n}")
    }

    /// Number of identifiers handed out so far.
    pub fn issued(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Resolved construction state read by every registry.
#[derive(Debug)]
pub struct AtomContext {
    pub env: EnvironmentContext,
    pub vendor: Matcher,
    pub asset_relative_root: String,
    pub script_config: Options,
    pub disable_extract_in_dev: bool,
    pub html_template: PathBuf,
    pub idents: IdentCounter,
}

impl AtomContext {
    pub fn new(options: &AtomsOptions, env: EnvironmentContext) -> Result<Self> {
        let vendor = Matcher::from(options.vendor_regex()?);
        Ok(Self::with_vendor(options, env, vendor))
    }

    /// Skips compiling `options.vendor_pattern`; `vendor` is used as given.
    pub(crate) fn with_vendor(
        options: &AtomsOptions,
        env: EnvironmentContext,
        vendor: Matcher,
    ) -> Self {
        Self {
            env,
            vendor,
            asset_relative_root: options.asset_relative_root.clone(),
            script_config: Options::from(options.script_config.clone()),
            disable_extract_in_dev: options.disable_extract_in_dev,
            html_template: options
                .html_template
                .clone()
                .unwrap_or_else(default_html_template),
            idents: IdentCounter::new(),
        }
    }

    /// Whether the extraction loader is swapped for its fallback by default.
    pub fn extract_disabled_by_default(&self) -> bool {
        !self.env.is_production() && self.disable_extract_in_dev
    }

    /// Asset name template honoring the configured root prefix.
    pub fn asset_name(&self) -> String {
        format!("{}[name]-[hash].[ext]", self.asset_relative_root)
    }
}
