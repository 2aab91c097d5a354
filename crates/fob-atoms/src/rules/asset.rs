use super::{Rule, RuleFactory};
use crate::condition::{Condition, Matcher};
use crate::loaders::LoaderAtoms;
use crate::options::Options;

/// Non-style, non-script file kinds with a built-in rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// YAML documents, loaded as JSON
    Yaml,
    /// Web fonts, inlined below the size threshold
    Fonts,
    /// Images, inlined below the size threshold
    Images,
    /// Audio and video, always emitted as files
    AudioVideo,
    /// Catch-all emitting files. Meant as the last alternative of a `one_of`.
    Files,
}

/// Rule for one [`AssetKind`]; options go to the asset loader.
#[derive(Debug, Clone)]
pub struct AssetRule {
    kind: AssetKind,
    loaders: LoaderAtoms,
}

impl AssetRule {
    pub fn new(kind: AssetKind, loaders: LoaderAtoms) -> Self {
        Self { kind, loaders }
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }
}

impl RuleFactory for AssetRule {
    type Options = Options;

    fn build(&self, options: Options) -> Rule {
        let loaders = &self.loaders;
        match self.kind {
            AssetKind::Yaml => Rule::new(
                Matcher::builtin(r"\.ya?ml"),
                vec![loaders.json(), loaders.yaml()],
            ),
            AssetKind::Fonts => Rule::new(
                Matcher::builtin(r"\.(eot|otf|ttf|woff(2)?)(\?.*)?$"),
                vec![loaders.url(options)],
            ),
            AssetKind::Images => Rule::new(
                Matcher::builtin(r"\.(ico|svg|jpg|jpeg|png|gif|webp)(\?.*)?$"),
                vec![loaders.url(options)],
            ),
            AssetKind::AudioVideo => Rule::new(
                Matcher::builtin(r"\.(mp4|webm|wav|mp3|m4a|aac|oga|flac)$"),
                vec![loaders.file(options)],
            ),
            // Scripts are left alone so injected runtimes are not emitted as
            // files; html and json go to the bundler's own handling.
            AssetKind::Files => Rule {
                exclude: Some(Condition::Any(vec![
                    Matcher::builtin(r"\.jsx?$"),
                    Matcher::builtin(r"\.html$"),
                    Matcher::builtin(r"\.json$"),
                ])),
                uses: vec![loaders.file(options)],
                ..Rule::default()
            },
        }
    }
}
