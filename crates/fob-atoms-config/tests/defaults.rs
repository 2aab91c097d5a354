//! Tests for default values.

use fob_atoms_config::{
    AtomsOptions, DEFAULT_BROWSERS, DEFAULT_VENDOR_PATTERN, EnvironmentContext, Mode,
    TargetSource,
};

#[test]
fn atoms_options_defaults() {
    let opts = AtomsOptions::default();
    assert!(opts.script_config.is_empty());
    assert!(opts.browsers.is_none());
    assert!(opts.mode.is_none());
    assert!(opts.vendor_pattern.is_none());
    assert_eq!(opts.asset_relative_root, "");
    assert!(!opts.ignore_browserslist_config);
    assert!(opts.disable_extract_in_dev);
    assert!(opts.root.is_none());
    assert!(opts.html_template.is_none());
}

#[test]
fn environment_context_defaults() {
    let env = EnvironmentContext::default();
    assert_eq!(env.mode(), Mode::Development);
    assert_eq!(env.browser_targets(), DEFAULT_BROWSERS);
    assert_eq!(env.target_source(), &TargetSource::Default);
    assert!(env.source_maps_enabled());
    assert!(!env.minify_enabled());
}

#[test]
fn default_constants() {
    assert_eq!(DEFAULT_BROWSERS, ["> 1%", "Firefox ESR", "not ie < 9"]);
    assert_eq!(DEFAULT_VENDOR_PATTERN, "node_modules");
}

#[test]
fn source_maps_track_mode() {
    for mode in [Mode::Development, Mode::Production, Mode::Test] {
        let env = EnvironmentContext::new(mode, vec![], TargetSource::Explicit);
        assert_eq!(env.source_maps_enabled(), mode != Mode::Production);
        assert_eq!(env.minify_enabled(), mode == Mode::Production);
    }
}
