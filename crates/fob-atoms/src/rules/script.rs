use super::compose::InlineCss;
use super::{Rule, RuleFactory};
use crate::condition::Matcher;
use crate::loaders::LoaderAtoms;
use crate::options::Options;

/// Script rule: `.js`/`.jsx` through the script transform loader, skipping
/// dependency code.
///
/// `None` options use the atom set's script config.
#[derive(Debug, Clone)]
pub struct JsRule {
    loaders: LoaderAtoms,
    vendor: Matcher,
}

impl JsRule {
    pub fn new(loaders: LoaderAtoms, vendor: Matcher) -> Self {
        Self { loaders, vendor }
    }

    /// This rule with the inline style-literal loader appended.
    ///
    /// # Example
    ///
    /// ```
    /// use fob_atoms::{InlineCssOptions, RuleFactory, create_atoms, AtomsOptions};
    ///
    /// let atoms = create_atoms(AtomsOptions::new().ignore_browserslist_config(true)).unwrap();
    /// let rule = atoms.rules.js.inline_css().build(InlineCssOptions {
    ///     tag_name: Some("css".into()),
    ///     ..Default::default()
    /// });
    /// assert_eq!(rule.loader_names(), ["babel-loader", "astroturf/loader"]);
    /// ```
    pub fn inline_css(&self) -> InlineCss<JsRule> {
        InlineCss::new(self.clone(), self.loaders.clone())
    }
}

impl RuleFactory for JsRule {
    type Options = Option<Options>;

    fn build(&self, options: Option<Options>) -> Rule {
        let mut rule = Rule::new(Matcher::builtin(r"\.jsx?$"), vec![self.loaders.js(options)]);
        rule.exclude = Some(self.vendor.clone().into());
        rule
    }
}

/// astroturf rule extracting style literals from script files.
#[derive(Debug, Clone)]
pub struct AstroturfRule {
    loaders: LoaderAtoms,
}

impl AstroturfRule {
    pub fn new(loaders: LoaderAtoms) -> Self {
        Self { loaders }
    }

    /// Emit `.module.scss` files; caller options still win.
    pub fn sass(&self, options: Options) -> Rule {
        self.build(options.layered_over(Options::new().with("extension", ".module.scss")))
    }

    /// Emit `.module.less` files; caller options still win.
    pub fn less(&self, options: Options) -> Rule {
        self.build(options.layered_over(Options::new().with("extension", ".module.less")))
    }
}

impl RuleFactory for AstroturfRule {
    type Options = Options;

    fn build(&self, options: Options) -> Rule {
        Rule::new(
            Matcher::builtin(r"\.(j|t)sx?$"),
            vec![self.loaders.astroturf(options)],
        )
    }
}
