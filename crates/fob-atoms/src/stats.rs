//! Build-report verbosity presets.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::Serialize;

/// Every stats key the presets control, in report order.
const STATS_KEYS: &[&str] = &[
    "assets",
    "cached",
    "cachedAssets",
    "children",
    "chunks",
    "chunkModules",
    "chunkOrigins",
    "colors",
    "depth",
    "entrypoints",
    "env",
    "errors",
    "errorDetails",
    "hash",
    "modules",
    "moduleTrace",
    "performance",
    "providedExports",
    "publicPath",
    "reasons",
    "source",
    "timings",
    "usedExports",
    "version",
    "warnings",
];

const MINIMAL_KEYS: &[&str] = &[
    "errors",
    "errorDetails",
    "assets",
    "chunks",
    "colors",
    "performance",
    "timings",
    "warnings",
];

/// A stats mapping, serialized as a flat `{ key: bool }` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatsPreset(IndexMap<&'static str, bool>);

impl StatsPreset {
    fn base() -> Self {
        Self(STATS_KEYS.iter().map(|&key| (key, false)).collect())
    }

    fn enabling(keys: &[&'static str]) -> Self {
        let mut preset = Self::base();
        for &key in keys {
            preset.0.insert(key, true);
        }
        preset
    }

    /// `false` for keys the preset does not know.
    pub fn is_enabled(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }

    pub fn enabled(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().filter(|(_, on)| **on).map(|(key, _)| *key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        self.0.iter().map(|(key, on)| (*key, *on))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

static NONE: Lazy<StatsPreset> = Lazy::new(StatsPreset::base);
static MINIMAL: Lazy<StatsPreset> = Lazy::new(|| StatsPreset::enabling(MINIMAL_KEYS));

/// The two presets. Both are process-wide constants shared by every atom set.
#[derive(Debug, Clone, Copy)]
pub struct StatsAtoms {
    /// Report nothing
    pub none: &'static StatsPreset,
    /// Errors, warnings, assets and timings
    pub minimal: &'static StatsPreset,
}

impl StatsAtoms {
    pub fn new() -> Self {
        Self {
            none: &NONE,
            minimal: &MINIMAL,
        }
    }
}

impl Default for StatsAtoms {
    fn default() -> Self {
        Self::new()
    }
}
