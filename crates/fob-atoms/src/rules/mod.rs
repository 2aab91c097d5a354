//! Rule atoms.
//!
//! A rule pairs a match condition with an ordered loader chain. Style rules
//! come in two alternatives (module-flavored first, general second) and every
//! factory can be narrowed to first-party or dependency code through the
//! combinators in [`compose`].

mod asset;
pub mod compose;
mod script;
mod style;

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;

use crate::condition::{Condition, Matcher};
use crate::context::AtomContext;
use crate::loaders::{LoaderAtoms, LoaderSpec};

pub use asset::{AssetKind, AssetRule};
pub use compose::{
    ContextualRule, ExternalOnly, ExtractionChain, InlineCss, InlineCssOptions, InternalOnly,
    compose_extraction_chain, derive_external_only, derive_internal_only,
};
pub use script::{AstroturfRule, JsRule};
pub use style::{StyleLanguage, StyleRule, StyleRuleOptions};

/// A bundler module rule.
///
/// `uses` is in bundler order: the first loader runs last. When `one_of` is
/// non-empty the first alternative whose conditions match handles the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Condition>,
    #[serde(rename = "use", skip_serializing_if = "Vec::is_empty")]
    pub uses: Vec<LoaderSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<Rule>,
}

impl Rule {
    pub fn new(test: impl Into<Condition>, uses: Vec<LoaderSpec>) -> Self {
        Self {
            test: Some(test.into()),
            uses,
            ..Self::default()
        }
    }

    pub fn one_of(alternatives: Vec<Rule>) -> Self {
        Self {
            one_of: alternatives,
            ..Self::default()
        }
    }

    fn passes_filters(&self, path: &str) -> bool {
        self.test.as_ref().is_none_or(|c| c.is_match(path))
            && self.include.as_ref().is_none_or(|c| c.is_match(path))
            && !self.exclude.as_ref().is_some_and(|c| c.is_match(path))
    }

    /// The rule that would handle `path`, following `one_of` alternatives in
    /// order. Returns `None` when nothing matches.
    pub fn resolve(&self, path: &str) -> Option<&Rule> {
        if !self.passes_filters(path) {
            return None;
        }
        if self.one_of.is_empty() {
            return Some(self);
        }
        self.one_of.iter().find_map(|alt| alt.resolve(path))
    }

    pub fn matches(&self, path: &str) -> bool {
        self.resolve(path).is_some()
    }

    /// Loader names of this rule's own chain, in bundler order.
    pub fn loader_names(&self) -> Vec<&str> {
        self.uses.iter().map(|l| l.loader.as_str()).collect()
    }
}

/// Something that produces a [`Rule`] from options.
///
/// Absent options are the `Default` value, never an error.
pub trait RuleFactory {
    type Options: Default;

    fn build(&self, options: Self::Options) -> Rule;

    fn create(&self) -> Rule {
        self.build(Self::Options::default())
    }
}

impl<F: RuleFactory + ?Sized> RuleFactory for &F {
    type Options = F::Options;

    fn build(&self, options: Self::Options) -> Rule {
        (**self).build(options)
    }
}

/// Adapts a closure into a [`RuleFactory`].
pub struct FnRule<F, O> {
    f: F,
    _options: PhantomData<fn(O)>,
}

impl<F: Clone, O> Clone for FnRule<F, O> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _options: PhantomData,
        }
    }
}

/// Wrap a closure so it can be used with the rule combinators.
///
/// # Example
///
/// ```
/// use fob_atoms::{RuleFactory, rule_fn, Rule, Matcher};
/// use regex::Regex;
///
/// let svg = rule_fn(|_: ()| Rule::new(Matcher::from(Regex::new(r"\.svg$").unwrap()), vec![]));
/// assert!(svg.create().matches("logo.svg"));
/// ```
pub fn rule_fn<O, F>(f: F) -> FnRule<F, O>
where
    O: Default,
    F: Fn(O) -> Rule,
{
    FnRule {
        f,
        _options: PhantomData,
    }
}

impl<O: Default, F: Fn(O) -> Rule> RuleFactory for FnRule<F, O> {
    type Options = O;

    fn build(&self, options: O) -> Rule {
        (self.f)(options)
    }
}

/// Rule factories bound to one atom set's context.
#[derive(Debug, Clone)]
pub struct RuleAtoms {
    /// Script transform, excluding dependency code
    pub js: JsRule,
    pub yaml: AssetRule,
    pub fonts: AssetRule,
    pub images: AssetRule,
    pub audio_video: AssetRule,
    /// Catch-all for anything but scripts, html and json
    pub files: AssetRule,
    pub astroturf: AstroturfRule,

    pub css: ContextualRule<StyleRule>,
    pub postcss: ContextualRule<StyleRule>,
    pub less: ContextualRule<StyleRule>,
    pub sass: ContextualRule<StyleRule>,
    pub fast_sass: ContextualRule<StyleRule>,
}

impl RuleAtoms {
    pub(crate) fn new(ctx: &Arc<AtomContext>, loaders: &LoaderAtoms) -> Self {
        let vendor = &ctx.vendor;
        let style =
            |language| ContextualRule::new(StyleRule::new(language, loaders.clone()), vendor);

        Self {
            js: JsRule::new(loaders.clone(), vendor.clone()),
            yaml: AssetRule::new(AssetKind::Yaml, loaders.clone()),
            fonts: AssetRule::new(AssetKind::Fonts, loaders.clone()),
            images: AssetRule::new(AssetKind::Images, loaders.clone()),
            audio_video: AssetRule::new(AssetKind::AudioVideo, loaders.clone()),
            files: AssetRule::new(AssetKind::Files, loaders.clone()),
            astroturf: AstroturfRule::new(loaders.clone()),
            css: style(StyleLanguage::Css),
            postcss: style(StyleLanguage::Postcss),
            less: style(StyleLanguage::Less),
            sass: style(StyleLanguage::Sass),
            fast_sass: style(StyleLanguage::FastSass),
        }
    }

    /// The dependency-path pattern shared by every derived variant.
    pub fn vendor_pattern(&self) -> &Matcher {
        self.css.vendor_pattern()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(test: &'static str) -> Rule {
        Rule::new(Matcher::builtin(test), vec![])
    }

    #[test]
    fn one_of_takes_first_match() {
        let mut module = rule(r"\.module\.css$");
        module.uses.push(LoaderSpec::new("first"));
        let mut general = rule(r"\.css$");
        general.uses.push(LoaderSpec::new("second"));
        let outer = Rule::one_of(vec![module, general]);

        assert_eq!(outer.resolve("a.module.css").unwrap().loader_names(), ["first"]);
        assert_eq!(outer.resolve("a.css").unwrap().loader_names(), ["second"]);
        assert!(outer.resolve("a.less").is_none());
    }

    #[test]
    fn exclude_beats_test() {
        let mut r = rule(r"\.js$");
        r.exclude = Some(Matcher::builtin("node_modules").into());
        assert!(r.matches("src/app.js"));
        assert!(!r.matches("node_modules/react/index.js"));
    }

    #[test]
    fn serializes_with_bundler_keys() {
        let mut r = Rule::one_of(vec![rule(r"\.css$")]);
        r.include = Some(Matcher::builtin("node_modules").into());
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value["include"], "node_modules");
        assert_eq!(value["oneOf"][0]["test"], r"\.css$");
        assert!(value.get("use").is_none());
    }

    #[test]
    fn closures_are_factories() {
        let factory = rule_fn(|limit: Option<u32>| {
            let mut r = rule(r"\.svg$");
            r.uses.push(LoaderSpec::new(format!("svg-{}", limit.unwrap_or(0))));
            r
        });
        assert_eq!(factory.create().loader_names(), ["svg-0"]);
        assert_eq!(factory.build(Some(3)).loader_names(), ["svg-3"]);
    }
}
