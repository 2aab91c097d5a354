//! Ambient browserslist config discovery.
//!
//! Looks for browser target queries the same places browserslist itself does:
//! `.browserslistrc`, `browserslist`, and the `browserslist` field of
//! `package.json`, starting at the project root and walking up through its
//! parents. The first directory holding a config wins. A missing or
//! unreadable config is never an error; callers fall back to explicit or
//! default targets.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

/// Section holding queries that apply to every environment.
pub const DEFAULTS_SECTION: &str = "defaults";

/// Environment variable naming the browserslist section to use.
pub const BROWSERSLIST_ENV_VAR: &str = "BROWSERSLIST_ENV";

/// Queries per environment section, top-level queries under `defaults`.
pub type BrowserslistSections = BTreeMap<String, Vec<String>>;

/// Browser targets loaded from an ambient config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserslistConfig {
    /// File the queries were read from
    pub path: PathBuf,
    /// Queries in file order
    pub queries: Vec<String>,
}

/// Source of ambient browser target configuration.
///
/// `env` names the section to read (`production`, `development`, ...);
/// configs without that section fall back to their `defaults` queries. The
/// default implementation searches the filesystem; tests and embedders can
/// supply their own.
pub trait BrowserslistLoader {
    fn load_config(&self, root: &Path, env: &str) -> Option<BrowserslistConfig>;
}

/// Filesystem-backed browserslist discovery.
///
/// # Example
///
/// ```no_run
/// use fob_atoms_config::{BrowserslistLoader, FsBrowserslistLoader};
/// use std::path::Path;
///
/// if let Some(config) = FsBrowserslistLoader.load_config(Path::new("."), "production") {
///     println!("targets from {}: {:?}", config.path.display(), config.queries);
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FsBrowserslistLoader;

impl BrowserslistLoader for FsBrowserslistLoader {
    fn load_config(&self, root: &Path, env: &str) -> Option<BrowserslistConfig> {
        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());

        for dir in root.ancestors() {
            let Some((path, sections)) = find_in_dir(dir) else {
                continue;
            };
            let Some(queries) = select_env(&sections, env) else {
                tracing::debug!(
                    path = %path.display(),
                    env,
                    "browserslist config has no matching section"
                );
                return None;
            };
            tracing::debug!(path = %path.display(), env, ?queries, "found browserslist config");
            return Some(BrowserslistConfig { path, queries });
        }

        tracing::debug!(root = %root.display(), "no browserslist config found");
        None
    }
}

/// Loader that never finds anything; used when ambient discovery is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBrowserslist;

impl BrowserslistLoader for NoBrowserslist {
    fn load_config(&self, _root: &Path, _env: &str) -> Option<BrowserslistConfig> {
        None
    }
}

/// Config in `dir` itself, without looking at parents.
fn find_in_dir(dir: &Path) -> Option<(PathBuf, BrowserslistSections)> {
    for name in [".browserslistrc", "browserslist"] {
        let path = dir.join(name);
        if !path.is_file() {
            continue;
        }
        match fs::read_to_string(&path) {
            Ok(content) => return Some((path, parse_sections(&content))),
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "unreadable browserslist config");
            }
        }
    }

    let pkg_path = dir.join("package.json");
    if pkg_path.is_file() {
        if let Some(sections) = read_package_json(&pkg_path) {
            return Some((pkg_path, sections));
        }
    }

    None
}

/// Queries for `env`, else the `defaults` queries.
pub fn select_env(sections: &BrowserslistSections, env: &str) -> Option<Vec<String>> {
    sections
        .get(env)
        .or_else(|| sections.get(DEFAULTS_SECTION))
        .cloned()
}

/// Parse a `.browserslistrc` style file.
///
/// One query per line (comma separated queries are split too); `#` starts a
/// comment. Lines before the first `[env]` header belong to `defaults`. A
/// header may name several environments separated by spaces.
pub fn parse_sections(content: &str) -> BrowserslistSections {
    let mut sections = BrowserslistSections::new();
    let mut current = vec![DEFAULTS_SECTION.to_string()];

    for line in content.lines() {
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            current = header.split_whitespace().map(str::to_string).collect();
            for name in &current {
                sections.entry(name.clone()).or_default();
            }
            continue;
        }

        let queries: Vec<String> = line
            .split(',')
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string)
            .collect();
        for name in &current {
            sections
                .entry(name.clone())
                .or_default()
                .extend(queries.iter().cloned());
        }
    }

    sections
}

fn read_package_json(path: &Path) -> Option<BrowserslistSections> {
    let content = fs::read_to_string(path).ok()?;
    let parsed: Value = serde_json::from_str(&content).ok()?;

    match parsed.get("browserslist")? {
        Value::String(query) => Some(parse_sections(query)),
        Value::Array(items) => Some(BrowserslistSections::from([(
            DEFAULTS_SECTION.to_string(),
            string_items(items),
        )])),
        Value::Object(envs) => Some(
            envs.iter()
                .filter_map(|(env, queries)| {
                    let queries = match queries {
                        Value::Array(items) => string_items(items),
                        Value::String(query) => vec![query.clone()],
                        _ => return None,
                    };
                    Some((env.clone(), queries))
                })
                .collect(),
        ),
        _ => None,
    }
}

fn string_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}
