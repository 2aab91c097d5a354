//! Loader atoms.
//!
//! Each factory describes one loader invocation: which loader to run and with
//! what options. Nothing here touches the filesystem; descriptors are plain
//! data for the bundler to execute.

mod asset;
mod style;

use std::sync::Arc;

use serde::Serialize;

use crate::context::AtomContext;
use crate::options::Options;

pub use asset::DEFAULT_INLINE_LIMIT;
pub use style::{ExtractOptions, PostcssOptions, PostcssPlugin};

pub const JSON_LOADER: &str = "json-loader";
pub const YAML_LOADER: &str = "yaml-loader";
pub const NULL_LOADER: &str = "null-loader";
pub const RAW_LOADER: &str = "raw-loader";
pub const STYLE_LOADER: &str = "style-loader";
pub const EXTRACT_LOADER: &str = "mini-css-extract-plugin/loader";
pub const CSS_LOADER: &str = "css-loader";
pub const ASTROTURF_LOADER: &str = "astroturf/loader";
pub const POSTCSS_LOADER: &str = "postcss-loader";
pub const LESS_LOADER: &str = "less-loader";
pub const SASS_LOADER: &str = "sass-loader";
pub const FAST_SASS_LOADER: &str = "@4c/fast-sass-loader";
pub const FILE_LOADER: &str = "file-loader";
pub const URL_LOADER: &str = "url-loader";
pub const BABEL_LOADER: &str = "babel-loader";
pub const IMPORTS_LOADER: &str = "imports-loader";
pub const EXPORTS_LOADER: &str = "exports-loader";

/// A single loader invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoaderSpec {
    pub loader: String,
    #[serde(skip_serializing_if = "Options::is_empty")]
    pub options: Options,
}

impl LoaderSpec {
    pub fn new(loader: impl Into<String>) -> Self {
        Self {
            loader: loader.into(),
            options: Options::new(),
        }
    }

    pub fn with_options(loader: impl Into<String>, options: Options) -> Self {
        Self {
            loader: loader.into(),
            options,
        }
    }

    pub fn is(&self, loader: &str) -> bool {
        self.loader == loader
    }
}

/// Loader factories bound to one atom set's context.
#[derive(Debug, Clone)]
pub struct LoaderAtoms {
    ctx: Arc<AtomContext>,
}

impl LoaderAtoms {
    pub(crate) fn new(ctx: Arc<AtomContext>) -> Self {
        Self { ctx }
    }

    pub(crate) fn context(&self) -> &AtomContext {
        &self.ctx
    }

    pub fn json(&self) -> LoaderSpec {
        LoaderSpec::new(JSON_LOADER)
    }

    pub fn yaml(&self) -> LoaderSpec {
        LoaderSpec::new(YAML_LOADER)
    }

    pub fn null(&self) -> LoaderSpec {
        LoaderSpec::new(NULL_LOADER)
    }

    pub fn raw(&self) -> LoaderSpec {
        LoaderSpec::new(RAW_LOADER)
    }

    /// Script transform loader.
    ///
    /// Without explicit options the atom set's `script_config` is used as is.
    pub fn js(&self, options: Option<Options>) -> LoaderSpec {
        let options = options.unwrap_or_else(|| self.ctx.script_config.clone());
        LoaderSpec::with_options(BABEL_LOADER, options)
    }

    pub fn imports(&self, options: Options) -> LoaderSpec {
        LoaderSpec::with_options(IMPORTS_LOADER, options)
    }

    pub fn exports(&self, options: Options) -> LoaderSpec {
        LoaderSpec::with_options(EXPORTS_LOADER, options)
    }
}
