//! TOML game configuration.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use bomb_arena_core::GameConfig;

/// Loads the configuration at `path`, or the defaults when no path is given.
///
/// Missing tables and fields fall back to their defaults.
pub(crate) fn load(path: Option<&Path>) -> Result<GameConfig> {
    let config = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config at {}", path.display()))?;
            parse(&contents)
                .with_context(|| format!("failed to load config at {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    config.validate().context("invalid game configuration")?;
    Ok(config)
}

fn parse(contents: &str) -> Result<GameConfig> {
    toml::from_str(contents).context("failed to parse config toml contents")
}
