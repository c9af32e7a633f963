//! Repository configuration, stored as TOML under the metadata directory.

use std::path::Path;

use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub user: UserConfig,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Author recorded in commits.
    pub name: Option<String>,
}

impl Config {
    pub fn load(root: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(root.join(CONFIG_FILE)) {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, root: &Path) -> anyhow::Result<()> {
        std::fs::write(root.join(CONFIG_FILE), toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// The commit author: configured name, then `$USER`, then "unknown".
    pub fn author(&self) -> String {
        if let Some(name) = &self.user.name {
            return name.clone();
        }
        std::env::var("USER").unwrap_or_else(|_| "unknown".to_string())
    }
}
