use serde::Serialize;
use serde_json::{Value, json};

use super::{
    ASTROTURF_LOADER, CSS_LOADER, EXTRACT_LOADER, FAST_SASS_LOADER, LESS_LOADER, LoaderAtoms,
    LoaderSpec, POSTCSS_LOADER, SASS_LOADER, STYLE_LOADER,
};
use crate::options::Options;

const LOCAL_IDENT_NAME: &str = "[name]--[local]--[hash:base64:5]";

/// Options for [`LoaderAtoms::extract`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractOptions {
    /// Swap the extraction loader for `fallback`. Defaults to `true` outside
    /// production when the atom set disables extraction in development.
    pub disable: Option<bool>,
    /// Loader used instead of extraction; defaults to the style loader
    pub fallback: Option<LoaderSpec>,
    /// Forwarded to the extraction loader
    pub options: Options,
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disable(mut self, disable: bool) -> Self {
        self.disable = Some(disable);
        self
    }

    pub fn fallback(mut self, fallback: LoaderSpec) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

/// A PostCSS plugin reference, resolved by the external executor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostcssPlugin {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

impl PostcssPlugin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: None,
        }
    }

    pub fn with_options(name: impl Into<String>, options: Value) -> Self {
        Self {
            name: name.into(),
            options: Some(options),
        }
    }

    /// `{ "name": .. }`, plus `"options"` when set.
    pub fn to_value(&self) -> Value {
        let mut entry = serde_json::Map::new();
        entry.insert("name".to_string(), Value::String(self.name.clone()));
        if let Some(options) = &self.options {
            entry.insert("options".to_string(), options.clone());
        }
        Value::Object(entry)
    }
}

/// Options for [`LoaderAtoms::postcss`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostcssOptions {
    /// Autoprefixer targets; defaults to the resolved browser targets
    pub browsers: Option<Vec<String>>,
    /// Extra plugins, run after flexbugs-fixes and autoprefixer
    pub plugins: Vec<PostcssPlugin>,
    /// Forwarded to postcss-loader, overriding `ident`/`plugins` if present
    pub options: Options,
}

impl PostcssOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn browsers(mut self, browsers: Option<Vec<String>>) -> Self {
        self.browsers = browsers;
        self
    }

    pub fn plugin(mut self, plugin: PostcssPlugin) -> Self {
        self.plugins.push(plugin);
        self
    }
}

impl LoaderAtoms {
    pub fn style(&self) -> LoaderSpec {
        LoaderSpec::new(STYLE_LOADER)
    }

    /// Extraction loader, or its fallback when extraction is disabled.
    ///
    /// This is the only place that decides between runtime style injection
    /// and extraction to a separate file.
    pub fn extract(&self, options: ExtractOptions) -> LoaderSpec {
        let ExtractOptions {
            disable,
            fallback,
            options,
        } = options;
        let disable = disable.unwrap_or_else(|| self.context().extract_disabled_by_default());

        if disable {
            fallback.unwrap_or_else(|| self.style())
        } else {
            LoaderSpec::with_options(EXTRACT_LOADER, options)
        }
    }

    /// css-loader with source maps outside production and dashed camel-casing.
    pub fn css(&self, options: Options) -> LoaderSpec {
        let defaults = Options::new()
            .with("sourceMap", self.context().env.source_maps_enabled())
            .with("camelCase", "dashes")
            .with("localIdentName", LOCAL_IDENT_NAME);
        LoaderSpec::with_options(CSS_LOADER, options.layered_over(defaults))
    }

    /// astroturf loader for inline style literals, without defaults.
    pub fn css_literal(&self, options: Options) -> LoaderSpec {
        LoaderSpec::with_options(ASTROTURF_LOADER, options)
    }

    /// astroturf loader emitting `.module.css` by default.
    pub fn astroturf(&self, options: Options) -> LoaderSpec {
        let defaults = Options::new().with("extension", ".module.css");
        LoaderSpec::with_options(ASTROTURF_LOADER, options.layered_over(defaults))
    }

    /// postcss-loader with flexbugs fixes and autoprefixer.
    ///
    /// Every call takes a fresh `ident` from the atom set's counter.
    pub fn postcss(&self, options: PostcssOptions) -> LoaderSpec {
        let PostcssOptions {
            browsers,
            plugins,
            options,
        } = options;
        let ctx = self.context();
        let browsers = browsers.unwrap_or_else(|| ctx.env.browser_targets().to_vec());

        let mut chain = vec![
            PostcssPlugin::new("postcss-flexbugs-fixes"),
            PostcssPlugin::with_options(
                "autoprefixer",
                json!({ "browsers": browsers, "flexbox": "no-2009" }),
            ),
        ];
        chain.extend(plugins);

        let defaults = Options::new()
            .with("ident", ctx.idents.next("postcss"))
            .with(
                "plugins",
                Value::Array(chain.iter().map(PostcssPlugin::to_value).collect()),
            );

        LoaderSpec::with_options(POSTCSS_LOADER, options.layered_over(defaults))
    }

    pub fn less(&self, options: Options) -> LoaderSpec {
        LoaderSpec::with_options(LESS_LOADER, options)
    }

    pub fn sass(&self, options: Options) -> LoaderSpec {
        LoaderSpec::with_options(SASS_LOADER, options)
    }

    pub fn fast_sass(&self, options: Options) -> LoaderSpec {
        LoaderSpec::with_options(FAST_SASS_LOADER, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::tests::loaders_for;
    use fob_atoms_config::{AtomsOptions, Mode};

    #[test]
    fn extract_falls_back_to_style_in_development() {
        let loaders = loaders_for(Mode::Development, AtomsOptions::new());
        assert!(loaders.extract(ExtractOptions::new()).is(STYLE_LOADER));
    }

    #[test]
    fn extract_is_real_in_production() {
        let loaders = loaders_for(Mode::Production, AtomsOptions::new());
        let spec = loaders.extract(ExtractOptions::new());
        assert!(spec.is(EXTRACT_LOADER));
    }

    #[test]
    fn extract_can_be_enabled_in_development() {
        let loaders = loaders_for(
            Mode::Development,
            AtomsOptions::new().disable_extract_in_dev(false),
        );
        assert!(loaders.extract(ExtractOptions::new()).is(EXTRACT_LOADER));
    }

    #[test]
    fn explicit_disable_uses_custom_fallback() {
        let loaders = loaders_for(Mode::Production, AtomsOptions::new());
        let spec = loaders.extract(
            ExtractOptions::new()
                .disable(true)
                .fallback(LoaderSpec::new("vue-style-loader")),
        );
        assert!(spec.is("vue-style-loader"));
    }

    #[test]
    fn css_defaults_follow_mode() {
        let dev = loaders_for(Mode::Development, AtomsOptions::new()).css(Options::new());
        assert_eq!(dev.options.get("sourceMap"), Some(&json!(true)));
        assert_eq!(dev.options.get("camelCase"), Some(&json!("dashes")));

        let prod = loaders_for(Mode::Production, AtomsOptions::new())
            .css(Options::new().with("camelCase", false));
        assert_eq!(prod.options.get("sourceMap"), Some(&json!(false)));
        assert_eq!(prod.options.get("camelCase"), Some(&json!(false)));
    }

    #[test]
    fn postcss_idents_increment_per_call() {
        let loaders = loaders_for(Mode::Development, AtomsOptions::new());
        let first = loaders.postcss(PostcssOptions::new());
        let second = loaders.postcss(PostcssOptions::new());
        assert_eq!(first.options.get("ident"), Some(&json!("postcss-1")));
        assert_eq!(second.options.get("ident"), Some(&json!("postcss-2")));
    }

    #[test]
    fn postcss_plugins_put_builtins_first() {
        let loaders = loaders_for(Mode::Development, AtomsOptions::new());
        let spec = loaders.postcss(
            PostcssOptions::new()
                .browsers(Some(vec!["ie 11".into()]))
                .plugin(PostcssPlugin::new("postcss-nested")),
        );
        assert_eq!(
            spec.options.get("plugins"),
            Some(&json!([
                { "name": "postcss-flexbugs-fixes" },
                {
                    "name": "autoprefixer",
                    "options": { "browsers": ["ie 11"], "flexbox": "no-2009" }
                },
                { "name": "postcss-nested" }
            ]))
        );
    }

    #[test]
    fn postcss_plugin_options_are_kept() {
        let loaders = loaders_for(Mode::Development, AtomsOptions::new());
        let plugin = PostcssPlugin::with_options("postcss-preset-env", json!({ "stage": 3 }));
        assert_eq!(plugin.to_value(), serde_json::to_value(&plugin).unwrap());

        let spec = loaders.postcss(PostcssOptions::new().plugin(plugin));
        let plugins = spec.options.get("plugins").unwrap().as_array().unwrap();
        assert_eq!(plugins.len(), 3);
        assert_eq!(plugins[2], json!({ "name": "postcss-preset-env", "options": { "stage": 3 } }));
    }

    #[test]
    fn postcss_uses_resolved_targets_by_default() {
        let loaders = loaders_for(Mode::Development, AtomsOptions::new());
        let spec = loaders.postcss(PostcssOptions::new());
        assert_eq!(
            spec.options.get("plugins").unwrap()[1]["options"]["browsers"],
            json!(["chrome 100"])
        );
    }

    #[test]
    fn astroturf_extension_is_overridable() {
        let loaders = loaders_for(Mode::Development, AtomsOptions::new());
        assert_eq!(
            loaders.astroturf(Options::new()).options.get("extension"),
            Some(&json!(".module.css"))
        );
        assert_eq!(
            loaders
                .astroturf(Options::new().with("extension", ".module.scss"))
                .options
                .get("extension"),
            Some(&json!(".module.scss"))
        );
    }
}
