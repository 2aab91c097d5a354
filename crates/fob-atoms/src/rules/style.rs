use serde_json::Value;

use super::compose::{ExtractionChain, compose_extraction_chain};
use super::{Rule, RuleFactory};
use crate::condition::Matcher;
use crate::loaders::{LoaderAtoms, LoaderSpec, PostcssOptions, PostcssPlugin};
use crate::options::Options;

/// The style dialects with a dedicated rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleLanguage {
    /// Plain CSS; extra options go to css-loader
    Css,
    /// Plain CSS; extra options go to postcss-loader
    Postcss,
    Less,
    Sass,
    /// Sass through `@4c/fast-sass-loader`
    FastSass,
}

impl StyleLanguage {
    fn test(&self) -> &'static str {
        match self {
            Self::Css | Self::Postcss => r"\.css$",
            Self::Less => r"\.less$",
            Self::Sass | Self::FastSass => r"\.s(a|c)ss$",
        }
    }

    fn module_test(&self) -> &'static str {
        match self {
            Self::Css | Self::Postcss => r"\.module\.css$",
            Self::Less => r"\.module\.less$",
            Self::Sass | Self::FastSass => r"\.module\.s(a|c)ss$",
        }
    }

    /// Loaders css-loader hands `@import`ed files to.
    fn import_loaders(&self) -> u32 {
        match self {
            Self::Css | Self::Postcss => 1,
            Self::Less | Self::Sass | Self::FastSass => 2,
        }
    }
}

/// Options shared by every style rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleRuleOptions {
    /// Autoprefixer targets; defaults to the resolved browser targets
    pub browsers: Option<Vec<String>>,
    /// css-loader `modules` for the general alternative
    pub modules: Option<Value>,
    /// Force extraction on (`true`) or off (`false`)
    pub extract: Option<bool>,
    /// Extra PostCSS plugins
    pub postcss_plugins: Vec<PostcssPlugin>,
    /// Dialect options: css-loader for `css`, postcss-loader for `postcss`,
    /// the preprocessor for `less`/`sass`/`fast_sass`
    pub options: Options,
}

impl StyleRuleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extract(mut self, extract: bool) -> Self {
        self.extract = Some(extract);
        self
    }

    pub fn browsers(mut self, browsers: Vec<String>) -> Self {
        self.browsers = Some(browsers);
        self
    }

    pub fn modules(mut self, modules: impl Into<Value>) -> Self {
        self.modules = Some(modules.into());
        self
    }

    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }
}

/// Two-alternative style rule: module-flavored files first with local
/// scoping, everything else second.
#[derive(Debug, Clone)]
pub struct StyleRule {
    language: StyleLanguage,
    loaders: LoaderAtoms,
}

impl StyleRule {
    pub fn new(language: StyleLanguage, loaders: LoaderAtoms) -> Self {
        Self { language, loaders }
    }

    pub fn language(&self) -> StyleLanguage {
        self.language
    }

    fn alternative(
        &self,
        options: &StyleRuleOptions,
        test: &'static str,
        modules: Option<Value>,
    ) -> Rule {
        let lang = self.language;
        let loaders = &self.loaders;

        let mut css = match lang {
            StyleLanguage::Css => options.options.clone(),
            _ => Options::new(),
        };
        css.insert("importLoaders", lang.import_loaders());
        if let Some(modules) = modules {
            css.insert("modules", modules);
        }

        let postcss = PostcssOptions {
            browsers: options.browsers.clone(),
            plugins: options.postcss_plugins.clone(),
            options: match lang {
                StyleLanguage::Postcss => options.options.clone(),
                _ => Options::new(),
            },
        };

        let mut uses: Vec<LoaderSpec> = vec![loaders.css(css), loaders.postcss(postcss)];
        match lang {
            StyleLanguage::Css | StyleLanguage::Postcss => {}
            StyleLanguage::Less => uses.push(loaders.less(options.options.clone())),
            StyleLanguage::Sass => uses.push(loaders.sass(options.options.clone())),
            StyleLanguage::FastSass => uses.push(loaders.fast_sass(options.options.clone())),
        }

        let uses = compose_extraction_chain(
            loaders,
            options.extract,
            ExtractionChain {
                fallback: Some(loaders.style()),
                uses,
            },
        );

        Rule::new(Matcher::builtin(test), uses)
    }
}

impl RuleFactory for StyleRule {
    type Options = StyleRuleOptions;

    fn build(&self, options: StyleRuleOptions) -> Rule {
        let modules =
            self.alternative(&options, self.language.module_test(), Some(Value::Bool(true)));
        let general = self.alternative(&options, self.language.test(), options.modules.clone());
        Rule::one_of(vec![modules, general])
    }
}
