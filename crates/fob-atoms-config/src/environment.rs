//! Environment resolution.
//!
//! Turns [`AtomsOptions`] plus ambient state (`NODE_ENV`, browserslist config)
//! into an immutable [`EnvironmentContext`]. Precedence is the same for both
//! inputs: explicit option > ambient source > built-in default.

use std::path::{Path, PathBuf};

use crate::browserslist::{BROWSERSLIST_ENV_VAR, BrowserslistLoader, FsBrowserslistLoader};
use crate::helpers::{MODE_ENV_VAR, default_browsers};
use crate::mode::Mode;
use crate::options::AtomsOptions;

/// Where the resolved browser targets came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSource {
    /// Supplied through [`AtomsOptions::browsers`]
    Explicit,
    /// Read from an ambient browserslist config file
    Ambient(PathBuf),
    /// [`crate::DEFAULT_BROWSERS`]
    Default,
}

/// Resolved build environment.
///
/// Created once per atom set and never mutated. Source maps and minification
/// are derived from the mode rather than stored independently, so the two can
/// never disagree with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentContext {
    mode: Mode,
    browser_targets: Vec<String>,
    target_source: TargetSource,
}

impl EnvironmentContext {
    pub fn new(mode: Mode, browser_targets: Vec<String>, target_source: TargetSource) -> Self {
        Self {
            mode,
            browser_targets,
            target_source,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_production(&self) -> bool {
        self.mode.is_production()
    }

    pub fn browser_targets(&self) -> &[String] {
        &self.browser_targets
    }

    pub fn target_source(&self) -> &TargetSource {
        &self.target_source
    }

    pub fn source_maps_enabled(&self) -> bool {
        !self.is_production()
    }

    pub fn minify_enabled(&self) -> bool {
        self.is_production()
    }
}

impl Default for EnvironmentContext {
    fn default() -> Self {
        Self::new(Mode::default(), default_browsers(), TargetSource::Default)
    }
}

/// Resolves an [`EnvironmentContext`] from options and ambient sources.
///
/// # Example
///
/// ```
/// use fob_atoms_config::{AtomsOptions, EnvironmentResolver, Mode, NoBrowserslist};
///
/// let env = EnvironmentResolver::new(NoBrowserslist, None, ".")
///     .resolve(&AtomsOptions::new().with_mode(Mode::Production));
///
/// assert!(env.is_production());
/// assert!(!env.source_maps_enabled());
/// ```
pub struct EnvironmentResolver<L = FsBrowserslistLoader> {
    loader: L,
    ambient_mode: Option<String>,
    browserslist_env: Option<String>,
    root: PathBuf,
}

impl EnvironmentResolver<FsBrowserslistLoader> {
    /// Resolver backed by the process environment and the filesystem.
    ///
    /// Reads `NODE_ENV` and `BROWSERSLIST_ENV`, and uses the current directory
    /// as the discovery root.
    pub fn from_process() -> Self {
        let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(
            FsBrowserslistLoader,
            std::env::var(MODE_ENV_VAR).ok(),
            root,
        )
        .with_browserslist_env(std::env::var(BROWSERSLIST_ENV_VAR).ok())
    }
}

impl<L: BrowserslistLoader> EnvironmentResolver<L> {
    pub fn new(loader: L, ambient_mode: Option<String>, root: impl AsRef<Path>) -> Self {
        Self {
            loader,
            ambient_mode,
            browserslist_env: None,
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Browserslist section to read instead of the one named by the mode.
    pub fn with_browserslist_env(mut self, env: Option<String>) -> Self {
        self.browserslist_env = env.filter(|env| !env.trim().is_empty());
        self
    }

    pub fn resolve(&self, options: &AtomsOptions) -> EnvironmentContext {
        let mode = self.resolve_mode(options);
        let (browser_targets, target_source) = self.resolve_targets(options, mode);

        tracing::debug!(%mode, ?browser_targets, ?target_source, "resolved build environment");

        EnvironmentContext::new(mode, browser_targets, target_source)
    }

    fn resolve_mode(&self, options: &AtomsOptions) -> Mode {
        if let Some(mode) = options.mode {
            return mode;
        }

        match self.ambient_mode.as_deref().map(str::trim) {
            None | Some("") => Mode::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    value = raw,
                    "unrecognized {}, falling back to development",
                    MODE_ENV_VAR
                );
                Mode::default()
            }),
        }
    }

    fn resolve_targets(&self, options: &AtomsOptions, mode: Mode) -> (Vec<String>, TargetSource) {
        if let Some(browsers) = &options.browsers {
            return (browsers.clone(), TargetSource::Explicit);
        }

        if !options.ignore_browserslist_config {
            let root = options.root.as_deref().unwrap_or(&self.root);
            let env = self.browserslist_env.as_deref().unwrap_or(mode.as_str());
            if let Some(config) = self.loader.load_config(root, env) {
                if !config.queries.is_empty() {
                    return (config.queries, TargetSource::Ambient(config.path));
                }
            }
        }

        (default_browsers(), TargetSource::Default)
    }
}

/// Resolve against the process environment (`NODE_ENV`, current directory).
pub fn resolve_environment(options: &AtomsOptions) -> EnvironmentContext {
    EnvironmentResolver::from_process().resolve(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browserslist::{BrowserslistConfig, NoBrowserslist};
    use crate::helpers::DEFAULT_BROWSERS;

    struct FixedLoader(Vec<&'static str>);

    impl BrowserslistLoader for FixedLoader {
        fn load_config(&self, root: &Path, _env: &str) -> Option<BrowserslistConfig> {
            Some(BrowserslistConfig {
                path: root.join(".browserslistrc"),
                queries: self.0.iter().map(|s| s.to_string()).collect(),
            })
        }
    }

    /// Answers with the requested section name as the only query.
    struct SectionEcho;

    impl BrowserslistLoader for SectionEcho {
        fn load_config(&self, root: &Path, env: &str) -> Option<BrowserslistConfig> {
            Some(BrowserslistConfig {
                path: root.join(".browserslistrc"),
                queries: vec![env.to_string()],
            })
        }
    }

    #[test]
    fn explicit_mode_wins_over_node_env() {
        let resolver = EnvironmentResolver::new(NoBrowserslist, Some("production".into()), ".");
        let env = resolver.resolve(&AtomsOptions::new().with_mode(Mode::Test));
        assert_eq!(env.mode(), Mode::Test);
    }

    #[test]
    fn node_env_used_when_mode_unset() {
        let resolver = EnvironmentResolver::new(NoBrowserslist, Some("production".into()), ".");
        let env = resolver.resolve(&AtomsOptions::new());
        assert!(env.is_production());
        assert!(env.minify_enabled());
        assert!(!env.source_maps_enabled());
    }

    #[test]
    fn missing_or_bogus_node_env_is_development() {
        for ambient in [None, Some(String::new()), Some("staging".to_string())] {
            let env = EnvironmentResolver::new(NoBrowserslist, ambient, ".")
                .resolve(&AtomsOptions::new());
            assert_eq!(env.mode(), Mode::Development);
            assert!(env.source_maps_enabled());
        }
    }

    #[test]
    fn explicit_browsers_skip_ambient_config() {
        let env = EnvironmentResolver::new(FixedLoader(vec!["ie 11"]), None, ".")
            .resolve(&AtomsOptions::new().with_browsers(["chrome 100"]));
        assert_eq!(env.browser_targets(), ["chrome 100".to_string()]);
        assert_eq!(env.target_source(), &TargetSource::Explicit);
    }

    #[test]
    fn ambient_config_used_before_defaults() {
        let env = EnvironmentResolver::new(FixedLoader(vec!["ie 11"]), None, "/project")
            .resolve(&AtomsOptions::new());
        assert_eq!(env.browser_targets(), ["ie 11".to_string()]);
        assert_eq!(
            env.target_source(),
            &TargetSource::Ambient(PathBuf::from("/project/.browserslistrc"))
        );
    }

    #[test]
    fn ignoring_ambient_config_falls_back_to_defaults() {
        let env = EnvironmentResolver::new(FixedLoader(vec!["ie 11"]), None, ".")
            .resolve(&AtomsOptions::new().ignore_browserslist_config(true));
        assert_eq!(env.browser_targets(), DEFAULT_BROWSERS);
        assert_eq!(env.target_source(), &TargetSource::Default);
    }

    #[test]
    fn empty_ambient_config_falls_back_to_defaults() {
        let env = EnvironmentResolver::new(FixedLoader(vec![]), None, ".")
            .resolve(&AtomsOptions::new());
        assert_eq!(env.target_source(), &TargetSource::Default);
    }

    #[test]
    fn browserslist_section_follows_resolved_mode() {
        let env = EnvironmentResolver::new(SectionEcho, Some("production".into()), ".")
            .resolve(&AtomsOptions::new());
        assert_eq!(env.browser_targets(), ["production".to_string()]);

        let env = EnvironmentResolver::new(SectionEcho, Some("production".into()), ".")
            .resolve(&AtomsOptions::new().with_mode(Mode::Test));
        assert_eq!(env.browser_targets(), ["test".to_string()]);
    }

    #[test]
    fn browserslist_env_overrides_section() {
        let env = EnvironmentResolver::new(SectionEcho, Some("production".into()), ".")
            .with_browserslist_env(Some("legacy".into()))
            .resolve(&AtomsOptions::new());
        assert!(env.is_production());
        assert_eq!(env.browser_targets(), ["legacy".to_string()]);

        let blank = EnvironmentResolver::new(SectionEcho, None, ".")
            .with_browserslist_env(Some(" ".into()))
            .resolve(&AtomsOptions::new());
        assert_eq!(blank.browser_targets(), ["development".to_string()]);
    }
}
