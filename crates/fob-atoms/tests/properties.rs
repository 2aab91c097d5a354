//! Property tests for rule derivation and loader purity.

use fob_atoms::{AtomSet, AtomsOptions, Mode, Options, Rule, RuleFactory, StyleRuleOptions};
use fob_atoms_config::{EnvironmentResolver, NoBrowserslist};
use proptest::prelude::*;
use serde_json::Value;

fn atoms(mode: Mode) -> AtomSet {
    let resolver = EnvironmentResolver::new(NoBrowserslist, None, ".");
    AtomSet::with_resolver(&AtomsOptions::new().with_mode(mode), &resolver).unwrap()
}

/// Project-like paths, some under dependency directories.
fn path_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (
            prop::bool::ANY,
            prop::collection::vec("[a-z]{1,8}", 1..=4),
            prop::bool::ANY,
            prop::sample::select(vec!["css", "scss", "sass", "less", "js", "jsx", "png", "woff2"]),
        )
            .prop_map(|(vendored, parts, module, ext)| {
                let prefix = if vendored { "node_modules/" } else { "src/" };
                let module = if module { ".module" } else { "" };
                format!("{prefix}{}{module}.{ext}", parts.join("/"))
            }),
        "[a-z_./]{0,40}",
    ]
}

fn options_strategy() -> impl Strategy<Value = Options> {
    prop::collection::btree_map("[a-zA-Z]{1,8}", any::<i64>(), 0..6)
        .prop_map(|map| map.into_iter().collect())
}

fn style_rules(atoms: &AtomSet) -> Vec<(Rule, Rule, Rule)> {
    let rules = &atoms.rules;
    [&rules.css, &rules.postcss, &rules.less, &rules.sass, &rules.fast_sass]
        .into_iter()
        .map(|rule| {
            (
                rule.build(StyleRuleOptions::new()),
                rule.internal(StyleRuleOptions::new()),
                rule.external(StyleRuleOptions::new()),
            )
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// A path is handled by at most one derived variant, and by one of them
    /// exactly when the base rule handles it.
    #[test]
    fn derived_variants_partition_base(path in path_strategy()) {
        let atoms = atoms(Mode::Development);
        for (base, internal, external) in style_rules(&atoms) {
            let (i, e) = (internal.matches(&path), external.matches(&path));
            prop_assert!(!(i && e), "both variants matched {}", path);
            prop_assert_eq!(base.matches(&path), i || e);
        }

        let js = &atoms.rules.js;
        let internal = atoms.derive_internal_only(js).create();
        let external = atoms.derive_external_only(js).create();
        prop_assert!(!(internal.matches(&path) && external.matches(&path)));
    }

    /// Module-flavored files never fall through to the general alternative.
    #[test]
    fn module_files_take_first_alternative(path in path_strategy()) {
        let atoms = atoms(Mode::Production);
        for (base, _, _) in style_rules(&atoms) {
            if let Some(hit) = base.resolve(&path) {
                let module_hit = base.one_of[0].matches(&path);
                prop_assert_eq!(hit == &base.one_of[0], module_hit);
            }
        }
    }

    /// Same inputs give structurally equal descriptors that share no state.
    #[test]
    fn loaders_are_pure(options in options_strategy()) {
        let atoms = atoms(Mode::Development);
        let loaders = &atoms.loaders;
        let factories: [&dyn Fn(Options) -> fob_atoms::LoaderSpec; 6] = [
            &|o: Options| loaders.css(o),
            &|o: Options| loaders.url(o),
            &|o: Options| loaders.file(o),
            &|o: Options| loaders.sass(o),
            &|o: Options| loaders.imports(o),
            &|o: Options| loaders.astroturf(o),
        ];
        for factory in factories {
            let mut first = factory(options.clone());
            let second = factory(options.clone());
            prop_assert_eq!(&first, &second);

            first.options.insert("mutated", Value::Bool(true));
            prop_assert!(!second.options.contains_key("mutated"));
        }
    }

    /// Caller keys always survive plugin default merging.
    #[test]
    fn plugin_caller_keys_win(options in options_strategy()) {
        let atoms = atoms(Mode::Production);
        let plugins = &atoms.plugins;
        for plugin in [
            plugins.define(options.clone()),
            plugins.extract_css(options.clone()),
            plugins.html(options.clone()),
        ] {
            for (key, value) in options.as_map() {
                prop_assert_eq!(plugin.option(key), Some(value));
            }
        }
    }
}
