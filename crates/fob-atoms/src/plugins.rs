//! Plugin atoms.
//!
//! Plugin implementations live in the external build executor. A factory here
//! only decides the constructor options: environment-derived defaults with
//! caller options layered on top.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Value, json};

use crate::context::AtomContext;
use crate::error::{Error, Result};
use crate::options::Options;

pub const DEFINE_PLUGIN: &str = "DefinePlugin";
pub const LOADER_OPTIONS_PLUGIN: &str = "LoaderOptionsPlugin";
pub const TERSER_PLUGIN: &str = "TerserPlugin";
pub const MINI_CSS_EXTRACT_PLUGIN: &str = "MiniCssExtractPlugin";
pub const OPTIMIZE_CSS_ASSETS_PLUGIN: &str = "OptimizeCssAssetsPlugin";
pub const HTML_PLUGIN: &str = "HtmlWebpackPlugin";
pub const IGNORE_PLUGIN: &str = "IgnorePlugin";
pub const COPY_PLUGIN: &str = "CopyWebpackPlugin";
pub const UNUSED_FILES_PLUGIN: &str = "UnusedFilesWebpackPlugin";
pub const FAVICONS_PLUGIN: &str = "FaviconsWebpackPlugin";

/// Template bundled with this crate, used by [`PluginAtoms::html`] when
/// `AtomsOptions::html_template` is unset.
///
/// The path is fixed at compile time from the crate's source directory, so it
/// only exists where the crate was built. Binaries shipped elsewhere should
/// set `html_template` or pass a `template` option.
pub fn default_html_template() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets").join("index.html")
}

/// A plugin ready for the build executor to instantiate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginInstance {
    pub name: String,
    pub options: Value,
}

impl PluginInstance {
    pub fn new(name: impl Into<String>, options: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            options: options.into(),
        }
    }

    /// Option lookup for object-shaped options.
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }
}

/// Options for [`PluginAtoms::minify_js`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MinifyJsOptions {
    /// Merged over `{ ecma: 8, ie8: false }`
    pub terser_options: Options,
    /// Merged over the plugin defaults
    pub options: Options,
}

/// Plugin factories bound to one atom set's context.
#[derive(Debug, Clone)]
pub struct PluginAtoms {
    ctx: Arc<AtomContext>,
}

impl PluginAtoms {
    /// Names accepted by [`PluginAtoms::by_name`].
    pub const NAMES: &'static [&'static str] = &[
        "define",
        "loader_options",
        "minify_js",
        "extract_css",
        "minify_css",
        "html",
        "moment",
        "copy",
        "unused_files",
        "favicons",
    ];

    pub(crate) fn new(ctx: Arc<AtomContext>) -> Self {
        Self { ctx }
    }

    /// Compile-time replacements; always defines `process.env.NODE_ENV`.
    pub fn define(&self, defines: Options) -> PluginInstance {
        let mode = self.ctx.env.mode();
        let defaults = Options::new().with("process.env.NODE_ENV", format!("\"{mode}\""));
        PluginInstance::new(DEFINE_PLUGIN, defines.layered_over(defaults))
    }

    /// Loader option shim. `minimize`/`debug` always mirror the mode.
    pub fn loader_options(&self, options: Options) -> PluginInstance {
        let production = self.ctx.env.is_production();
        PluginInstance::new(
            LOADER_OPTIONS_PLUGIN,
            json!({
                "options": options,
                "minimize": production,
                "debug": !production,
            }),
        )
    }

    /// Parallel terser minification that skips pre-minified files and keeps
    /// source maps. Generally only added in production.
    pub fn minify_js(&self, options: MinifyJsOptions) -> PluginInstance {
        let MinifyJsOptions {
            terser_options,
            options,
        } = options;
        let terser = terser_options.layered_over(Options::new().with("ecma", 8).with("ie8", false));
        let defaults = Options::new()
            .with("cache", true)
            .with("parallel", true)
            .with("exclude", r"\.min\.js")
            .with("sourceMap", true)
            .with("terserOptions", terser);
        PluginInstance::new(TERSER_PLUGIN, options.layered_over(defaults))
    }

    /// Extracts styles into content-hashed files.
    pub fn extract_css(&self, options: Options) -> PluginInstance {
        let defaults = Options::new().with("filename", "[name]-[contenthash].css");
        PluginInstance::new(MINI_CSS_EXTRACT_PLUGIN, options.layered_over(defaults))
    }

    pub fn minify_css(&self, options: Options) -> PluginInstance {
        PluginInstance::new(OPTIMIZE_CSS_ASSETS_PLUGIN, options)
    }

    /// Generates an html page including the output bundles. Set `title` to
    /// change the page title or `template` to replace the configured template.
    pub fn html(&self, options: Options) -> PluginInstance {
        let template = self.ctx.html_template.to_string_lossy().into_owned();
        let defaults = Options::new()
            .with("inject", true)
            .with("template", template);
        PluginInstance::new(HTML_PLUGIN, options.layered_over(defaults))
    }

    /// Drops moment.js locale files from the bundle.
    pub fn moment(&self) -> PluginInstance {
        PluginInstance::new(
            IGNORE_PLUGIN,
            json!({
                "resourceRegExp": r"^\./locale$",
                "contextRegExp": "moment$",
            }),
        )
    }

    /// Copy patterns, passed through untouched.
    pub fn copy(&self, patterns: Value) -> PluginInstance {
        PluginInstance::new(COPY_PLUGIN, patterns)
    }

    pub fn unused_files(&self, options: Options) -> PluginInstance {
        PluginInstance::new(UNUSED_FILES_PLUGIN, options)
    }

    /// Favicon generation from a logo path or a full options object.
    pub fn favicons(&self, options: Value) -> PluginInstance {
        PluginInstance::new(FAVICONS_PLUGIN, options)
    }

    /// Look a factory up by name, for configs assembled from data.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownPlugin`] for names outside [`PluginAtoms::NAMES`] and
    /// [`Error::MisconfiguredOptions`] when an object was expected.
    pub fn by_name(&self, name: &str, options: Value) -> Result<PluginInstance> {
        let plugin = match name {
            "define" => self.define(Options::from_value("define", options)?),
            "loader_options" => {
                self.loader_options(Options::from_value("loader_options", options)?)
            }
            "minify_js" => {
                let mut options = Options::from_value("minify_js", options)?;
                let terser_options = match options.remove("terserOptions") {
                    Some(value) => Options::from_value("minify_js", value)?,
                    None => Options::new(),
                };
                self.minify_js(MinifyJsOptions {
                    terser_options,
                    options,
                })
            }
            "extract_css" => self.extract_css(Options::from_value("extract_css", options)?),
            "minify_css" => self.minify_css(Options::from_value("minify_css", options)?),
            "html" => self.html(Options::from_value("html", options)?),
            "moment" => self.moment(),
            "copy" => self.copy(options),
            "unused_files" => self.unused_files(Options::from_value("unused_files", options)?),
            "favicons" => self.favicons(options),
            other => return Err(Error::UnknownPlugin(other.to_string())),
        };
        tracing::debug!(name, plugin = %plugin.name, "built plugin by name");
        Ok(plugin)
    }
}
