//! # fob-atoms
//!
//! Composable building blocks for webpack-style bundler configuration.
//!
//! An [`AtomSet`] groups four registries bound to one resolved build
//! environment:
//!
//! - [`LoaderAtoms`]: loader descriptors (`css`, `postcss`, `url`, ...)
//! - [`RuleAtoms`]: module rules, with `internal`/`external` variants for the
//!   style rules and an `inline_css` extension for scripts
//! - [`PluginAtoms`]: plugin descriptors with environment-aware defaults
//! - [`StatsAtoms`]: the `none` and `minimal` reporting presets
//!
//! Everything produced is plain data. Running loaders and plugins is left to
//! the bundler consuming the descriptors.
//!
//! ## Quick Start
//!
//! ```
//! use fob_atoms::{AtomsOptions, Mode, RuleFactory, StyleRuleOptions, create_atoms};
//!
//! let atoms = create_atoms(
//!     AtomsOptions::new()
//!         .with_mode(Mode::Production)
//!         .ignore_browserslist_config(true),
//! )?;
//!
//! let css = atoms.rules.css.internal(StyleRuleOptions::new());
//! assert_eq!(css.one_of[1].uses[0].loader, "mini-css-extract-plugin/loader");
//! assert!(!css.matches("node_modules/normalize.css/normalize.css"));
//!
//! let plugins = vec![
//!     atoms.plugins.extract_css(Default::default()),
//!     atoms.plugins.html(Default::default()),
//! ];
//! assert_eq!(plugins.len(), 2);
//! # Ok::<(), fob_atoms::Error>(())
//! ```
//!
//! ## Custom rules
//!
//! Closures become factories through [`rule_fn`] and combine with the same
//! helpers the built-in rules use:
//!
//! ```
//! use fob_atoms::{ExtractionChain, Matcher, Rule, RuleFactory, default_atoms, rule_fn};
//! use regex::Regex;
//!
//! let atoms = default_atoms();
//! let stylus = rule_fn(|_: ()| {
//!     let chain = ExtractionChain {
//!         fallback: None,
//!         uses: vec![atoms.loaders.css(Default::default())],
//!     };
//!     Rule::new(
//!         Matcher::from(Regex::new(r"\.styl$").unwrap()),
//!         atoms.compose_extraction_chain(None, chain),
//!     )
//! });
//!
//! let vendored = atoms.derive_external_only(&stylus).create();
//! assert!(vendored.matches("node_modules/theme/index.styl"));
//! assert!(!vendored.matches("src/index.styl"));
//! ```

pub mod condition;
pub mod context;
pub mod error;
pub mod loaders;
pub mod options;
pub mod plugins;
pub mod rules;
pub mod stats;

use std::sync::Arc;

use once_cell::sync::Lazy;

use fob_atoms_config::{
    BrowserslistLoader, DEFAULT_VENDOR_PATTERN, EnvironmentContext, EnvironmentResolver,
};

pub use condition::{Condition, Matcher};
pub use context::{AtomContext, IdentCounter};
pub use error::{Error, Result};
pub use loaders::{ExtractOptions, LoaderAtoms, LoaderSpec, PostcssOptions, PostcssPlugin};
pub use options::Options;
pub use plugins::{MinifyJsOptions, PluginAtoms, PluginInstance};
pub use rules::{
    AssetKind, AssetRule, AstroturfRule, ContextualRule, ExternalOnly, ExtractionChain, FnRule,
    InlineCss, InlineCssOptions, InternalOnly, JsRule, Rule, RuleAtoms, RuleFactory, StyleLanguage,
    StyleRule, StyleRuleOptions, rule_fn,
};
pub use stats::{StatsAtoms, StatsPreset};

pub use fob_atoms_config::{
    AtomsOptions, ConfigError, DEFAULT_BROWSERS, Mode, TargetSource, resolve_environment,
};

/// Loader, rule and plugin registries sharing one resolved environment.
///
/// Independent constructions share nothing mutable: each owns its
/// environment and identifier counter.
#[derive(Debug, Clone)]
pub struct AtomSet {
    pub loaders: LoaderAtoms,
    pub rules: RuleAtoms,
    pub plugins: PluginAtoms,
    pub stats: StatsAtoms,
    ctx: Arc<AtomContext>,
}

impl AtomSet {
    /// Build against an already resolved environment.
    pub fn with_environment(options: &AtomsOptions, env: EnvironmentContext) -> Result<Self> {
        Ok(Self::from_context(AtomContext::new(options, env)?))
    }

    /// Build with a custom resolver, e.g. one with a fixed `NODE_ENV` or a
    /// stub browserslist loader.
    pub fn with_resolver<L: BrowserslistLoader>(
        options: &AtomsOptions,
        resolver: &EnvironmentResolver<L>,
    ) -> Result<Self> {
        Self::with_environment(options, resolver.resolve(options))
    }

    fn from_context(ctx: AtomContext) -> Self {
        let ctx = Arc::new(ctx);
        let loaders = LoaderAtoms::new(Arc::clone(&ctx));
        let rules = RuleAtoms::new(&ctx, &loaders);
        let plugins = PluginAtoms::new(Arc::clone(&ctx));

        tracing::debug!(
            mode = %ctx.env.mode(),
            vendor = ctx.vendor.as_str(),
            targets = ?ctx.env.browser_targets(),
            "constructed atom set"
        );

        Self {
            loaders,
            rules,
            plugins,
            stats: StatsAtoms::new(),
            ctx,
        }
    }

    pub fn environment(&self) -> &EnvironmentContext {
        &self.ctx.env
    }

    /// Pattern classifying dependency paths for the derived variants.
    pub fn vendor_pattern(&self) -> &Matcher {
        &self.ctx.vendor
    }

    /// [`rules::derive_external_only`] with this set's vendor pattern.
    pub fn derive_external_only<F: RuleFactory>(&self, base: F) -> ExternalOnly<F> {
        rules::derive_external_only(base, &self.ctx.vendor)
    }

    /// [`rules::derive_internal_only`] with this set's vendor pattern.
    pub fn derive_internal_only<F: RuleFactory>(&self, base: F) -> InternalOnly<F> {
        rules::derive_internal_only(base, &self.ctx.vendor)
    }

    /// [`rules::compose_extraction_chain`] against this set's loaders.
    pub fn compose_extraction_chain(
        &self,
        extract: Option<bool>,
        chain: ExtractionChain,
    ) -> Vec<LoaderSpec> {
        rules::compose_extraction_chain(&self.loaders, extract, chain)
    }
}

/// Build an atom set, resolving mode and browser targets from the process
/// environment where `options` leaves them unset.
///
/// # Errors
///
/// Fails when `options.vendor_pattern` is not a valid regex.
pub fn create_atoms(options: AtomsOptions) -> Result<AtomSet> {
    AtomSet::with_resolver(&options, &EnvironmentResolver::from_process())
}

static DEFAULT_ATOMS: Lazy<AtomSet> = Lazy::new(|| {
    let options = AtomsOptions::default();
    let env = resolve_environment(&options);
    let vendor = Matcher::builtin(DEFAULT_VENDOR_PATTERN);
    AtomSet::from_context(AtomContext::with_vendor(&options, env, vendor))
});

/// The atom set for default options, built on first use.
pub fn default_atoms() -> &'static AtomSet {
    &DEFAULT_ATOMS
}
