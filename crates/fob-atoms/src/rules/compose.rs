//! Rule composition helpers.
//!
//! Two independent mechanisms live here:
//!
//! - filter overlays ([`derive_internal_only`], [`derive_external_only`]) that
//!   narrow any [`RuleFactory`] to first-party or dependency code, and
//! - chain extension ([`InlineCss`]) that appends a loader to a factory's chain.
//!
//! Both wrap a factory and are factories themselves, so they nest freely.

use crate::condition::Matcher;
use crate::loaders::{ExtractOptions, LoaderAtoms, LoaderSpec};
use crate::options::Options;

use super::{Rule, RuleFactory};

/// Factory restricted to dependency code. See [`derive_external_only`].
#[derive(Debug, Clone)]
pub struct ExternalOnly<F> {
    base: F,
    vendor: Matcher,
}

/// Factory restricted to first-party code. See [`derive_internal_only`].
#[derive(Debug, Clone)]
pub struct InternalOnly<F> {
    base: F,
    vendor: Matcher,
}

/// Narrow `base` to paths matching `vendor`.
///
/// Every call rebuilds the base rule and sets `include` to the pattern. Any
/// `exclude` from the base is dropped so the result is the exact complement
/// of [`derive_internal_only`] over the same pattern.
pub fn derive_external_only<F: RuleFactory>(base: F, vendor: &Matcher) -> ExternalOnly<F> {
    ExternalOnly {
        base,
        vendor: vendor.clone(),
    }
}

/// Narrow `base` to paths not matching `vendor`.
///
/// Every call rebuilds the base rule and sets `exclude` to the pattern,
/// dropping any `include` from the base.
pub fn derive_internal_only<F: RuleFactory>(base: F, vendor: &Matcher) -> InternalOnly<F> {
    InternalOnly {
        base,
        vendor: vendor.clone(),
    }
}

impl<F: RuleFactory> RuleFactory for ExternalOnly<F> {
    type Options = F::Options;

    fn build(&self, options: Self::Options) -> Rule {
        let mut rule = self.base.build(options);
        rule.include = Some(self.vendor.clone().into());
        rule.exclude = None;
        rule
    }
}

impl<F: RuleFactory> RuleFactory for InternalOnly<F> {
    type Options = F::Options;

    fn build(&self, options: Self::Options) -> Rule {
        let mut rule = self.base.build(options);
        rule.exclude = Some(self.vendor.clone().into());
        rule.include = None;
        rule
    }
}

/// A factory together with its internal and external variants.
///
/// The dependency pattern is fixed at construction and shared by both
/// variants; it cannot be set per variant.
#[derive(Debug, Clone)]
pub struct ContextualRule<F> {
    base: F,
    vendor: Matcher,
}

impl<F: RuleFactory> ContextualRule<F> {
    pub fn new(base: F, vendor: &Matcher) -> Self {
        Self {
            base,
            vendor: vendor.clone(),
        }
    }

    pub fn build(&self, options: F::Options) -> Rule {
        self.base.build(options)
    }

    /// Same rule, applied to first-party code only.
    pub fn internal(&self, options: F::Options) -> Rule {
        derive_internal_only(&self.base, &self.vendor).build(options)
    }

    /// Same rule, applied to dependency code only.
    pub fn external(&self, options: F::Options) -> Rule {
        derive_external_only(&self.base, &self.vendor).build(options)
    }

    pub fn base(&self) -> &F {
        &self.base
    }

    pub fn vendor_pattern(&self) -> &Matcher {
        &self.vendor
    }

    /// The internal variant as a standalone factory.
    pub fn internal_factory(&self) -> InternalOnly<F>
    where
        F: Clone,
    {
        derive_internal_only(self.base.clone(), &self.vendor)
    }

    /// The external variant as a standalone factory.
    pub fn external_factory(&self) -> ExternalOnly<F>
    where
        F: Clone,
    {
        derive_external_only(self.base.clone(), &self.vendor)
    }
}

impl<F: RuleFactory> RuleFactory for ContextualRule<F> {
    type Options = F::Options;

    fn build(&self, options: Self::Options) -> Rule {
        self.base.build(options)
    }
}

/// Options for [`InlineCss`]: the inline-style settings plus the wrapped
/// factory's own options.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineCssOptions<O> {
    /// Tagged template name recognized as a style literal
    pub tag_name: Option<String>,
    /// Extension given to the extracted style files
    pub extension: Option<String>,
    pub rule: O,
}

impl<O: Default> Default for InlineCssOptions<O> {
    fn default() -> Self {
        Self {
            tag_name: None,
            extension: None,
            rule: O::default(),
        }
    }
}

/// Appends the inline style-literal loader to a factory's chain.
#[derive(Debug, Clone)]
pub struct InlineCss<F> {
    base: F,
    loaders: LoaderAtoms,
}

impl<F: RuleFactory> InlineCss<F> {
    pub fn new(base: F, loaders: LoaderAtoms) -> Self {
        Self { base, loaders }
    }
}

impl<F: RuleFactory> RuleFactory for InlineCss<F> {
    type Options = InlineCssOptions<F::Options>;

    fn build(&self, options: Self::Options) -> Rule {
        let InlineCssOptions {
            tag_name,
            extension,
            rule,
        } = options;

        let mut literal = Options::new();
        if let Some(tag_name) = tag_name {
            literal.insert("tagName", tag_name);
        }
        if let Some(extension) = extension {
            literal.insert("extension", extension);
        }

        let mut rule = self.base.build(rule);
        rule.uses.push(self.loaders.css_literal(literal));
        rule
    }
}

/// A transform chain waiting for its leading style loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionChain {
    /// Used in place of extraction when it is disabled
    pub fallback: Option<LoaderSpec>,
    /// Transform loaders, in bundler order
    pub uses: Vec<LoaderSpec>,
}

/// Prefix `chain` with either the extraction loader or its fallback.
///
/// `extract` of `None` defers to the atom set's mode-derived default;
/// `Some(true)` forces extraction and `Some(false)` forces the fallback.
pub fn compose_extraction_chain(
    loaders: &LoaderAtoms,
    extract: Option<bool>,
    chain: ExtractionChain,
) -> Vec<LoaderSpec> {
    let ExtractionChain { fallback, uses } = chain;
    let lead = loaders.extract(ExtractOptions {
        disable: extract.map(|extract| !extract),
        fallback,
        options: Options::new(),
    });

    let mut out = Vec::with_capacity(uses.len() + 1);
    out.push(lead);
    out.extend(uses);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::tests::loaders_for;
    use crate::loaders::{EXTRACT_LOADER, STYLE_LOADER};
    use crate::rules::rule_fn;
    use fob_atoms_config::{AtomsOptions, Mode};

    fn vendor() -> Matcher {
        Matcher::builtin("node_modules")
    }

    fn scss() -> impl RuleFactory<Options = ()> + Clone {
        rule_fn(|_: ()| {
            let mut rule = Rule::new(Matcher::builtin(r"\.scss$"), vec![]);
            rule.include = Some(Matcher::builtin("^/app").into());
            rule.exclude = Some(Matcher::builtin("legacy").into());
            rule
        })
    }

    #[test]
    fn external_sets_include_only() {
        let rule = derive_external_only(scss(), &vendor()).create();
        assert_eq!(rule.include, Some(vendor().into()));
        assert!(rule.exclude.is_none());
    }

    #[test]
    fn internal_sets_exclude_only() {
        let rule = derive_internal_only(scss(), &vendor()).create();
        assert_eq!(rule.exclude, Some(vendor().into()));
        assert!(rule.include.is_none());
    }

    #[test]
    fn variants_are_complementary() {
        let internal = derive_internal_only(scss(), &vendor()).create();
        let external = derive_external_only(scss(), &vendor()).create();
        for path in ["/app/a.scss", "/app/node_modules/x/a.scss", "legacy/a.scss"] {
            assert_ne!(internal.matches(path), external.matches(path), "{path}");
        }
    }

    #[test]
    fn overlays_nest_with_chain_extension() {
        let loaders = loaders_for(Mode::Development, AtomsOptions::new());
        let factory = derive_internal_only(InlineCss::new(scss(), loaders), &vendor());
        let rule = factory.build(InlineCssOptions {
            tag_name: Some("css".into()),
            ..Default::default()
        });
        assert_eq!(rule.loader_names(), ["astroturf/loader"]);
        assert_eq!(rule.exclude, Some(vendor().into()));
    }

    #[test]
    fn extraction_chain_respects_explicit_flag() {
        let loaders = loaders_for(Mode::Development, AtomsOptions::new());
        let chain = ExtractionChain {
            fallback: None,
            uses: vec![LoaderSpec::new("css-loader")],
        };

        let default = compose_extraction_chain(&loaders, None, chain.clone());
        assert_eq!(default[0].loader, STYLE_LOADER);
        assert_eq!(default[1].loader, "css-loader");

        let forced = compose_extraction_chain(&loaders, Some(true), chain);
        assert_eq!(forced[0].loader, EXTRACT_LOADER);
    }
}
