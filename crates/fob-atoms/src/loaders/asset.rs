use super::{FILE_LOADER, LoaderAtoms, LoaderSpec, URL_LOADER};
use crate::options::Options;

/// Files smaller than this many bytes are inlined as data URIs by `url`.
pub const DEFAULT_INLINE_LIMIT: u64 = 10_000;

impl LoaderAtoms {
    /// Emit the file into the output, named `{asset_relative_root}[name]-[hash].[ext]`.
    pub fn file(&self, options: Options) -> LoaderSpec {
        let defaults = Options::new().with("name", self.context().asset_name());
        LoaderSpec::with_options(FILE_LOADER, options.layered_over(defaults))
    }

    /// Inline below `limit` bytes, otherwise behave like [`LoaderAtoms::file`].
    pub fn url(&self, options: Options) -> LoaderSpec {
        let defaults = Options::new()
            .with("limit", DEFAULT_INLINE_LIMIT)
            .with("name", self.context().asset_name());
        LoaderSpec::with_options(URL_LOADER, options.layered_over(defaults))
    }
}
