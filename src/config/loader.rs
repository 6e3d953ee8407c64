//! Configuration loading and environment overrides

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::ConfigWarning;
use crate::error::{DeployError, DeployResult};

use super::types::ShipyardConfig;

/// Project configuration file name
pub const CONFIG_FILE: &str = "shipyard.toml";

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> DeployResult<(ShipyardConfig, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|e| DeployError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let mut config: ShipyardConfig = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| DeployError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;
    config.source = Some(path.to_path_buf());

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Apply environment variable overrides (SHIPYARD_* prefix)
pub fn with_env_overrides(config: ShipyardConfig) -> ShipyardConfig {
    with_overrides_from(config, |name| std::env::var(name).ok())
}

/// Apply overrides from any variable source
pub fn with_overrides_from<F>(mut config: ShipyardConfig, var: F) -> ShipyardConfig
where
    F: Fn(&str) -> Option<String>,
{
    let deploy = &mut config.deploy;

    if let Some(base) = var("SHIPYARD_BASE_REMOTE_PATH") {
        deploy.base_remote_path = Some(PathBuf::from(base));
    }

    if let Some(dir) = var("SHIPYARD_BUILD_DIR") {
        deploy.build_dir = PathBuf::from(dir);
    }

    if let Some(raw) = var("SHIPYARD_MAX_KEEP") {
        match raw.trim().parse::<usize>() {
            Ok(n) if n >= 1 => deploy.max_keep = n,
            _ => tracing::warn!(
                value = %raw,
                keeping = deploy.max_keep,
                "ignoring SHIPYARD_MAX_KEEP: expected a whole number of at least 1"
            ),
        }
    }

    if let Some(prefix) = var("SHIPYARD_CACHE_PREFIX") {
        deploy.cache_prefix = prefix;
    }

    if let Some(branch) = var("SHIPYARD_BRANCH") {
        deploy.default_branch = branch;
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "deploy",
        "base_remote_path",
        "build_dir",
        "cache_prefix",
        "static_subdir",
        "max_keep",
        "track_static",
        "default_branch",
        "staging_name",
        "shared_static_dir",
        "settings_file",
        "templates_dir",
        "settings_template",
        "lock_ttl_secs",
        "history_file",
        "hosts",
        "address",
        "role",
        "platform",
        "sudo",
        "reload",
        "context",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
