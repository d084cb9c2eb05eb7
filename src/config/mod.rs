use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod api;
pub use api::Api;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: Api,
}

impl Config {
    pub fn write_default(path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, toml::to_string_pretty(&Self::default())?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)?;
        let this = toml::from_str(&s)?;
        Ok(this)
    }
}

/// Load KEY=VALUE pairs from each file into the environment
///
/// Files are given least specific first; the last one wins.
pub fn load_env_from(paths: &[PathBuf]) {
    simple_env_load::load_env_from(paths);
}
