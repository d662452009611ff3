//! Settings loaded with figment: defaults, then the TOML file, then
//! `CARDSET_`-prefixed environment variables.

use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use cardset_core::DEFAULT_SLOT;
use cardset_json::{paths, DEFAULT_MAX_BACKUPS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the slot files. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
    /// Storage slot holding the collection.
    pub slot: String,
    /// Timestamped backups kept per slot; 0 disables backups.
    pub max_backups: usize,
    /// Origin used to build share links.
    pub share_origin: String,
    /// Bind address for `serve`.
    pub listen_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            slot: DEFAULT_SLOT.to_string(),
            max_backups: DEFAULT_MAX_BACKUPS,
            share_origin: "http://127.0.0.1:8080".to_string(),
            listen_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

impl Config {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let file = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(paths::config_file);
        Self::from_figment(
            Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Toml::file(file))
                .merge(Env::prefixed("CARDSET_")),
        )
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.slot.trim().is_empty() {
            bail!("invalid configuration: slot must not be empty");
        }
        if self.listen_addr.parse::<SocketAddr>().is_err() {
            bail!(
                "invalid configuration: listen_addr {:?} is not host:port",
                self.listen_addr
            );
        }
        if !(self.share_origin.starts_with("http://") || self.share_origin.starts_with("https://")) {
            bail!(
                "invalid configuration: share_origin {:?} must be an http(s) URL",
                self.share_origin
            );
        }
        Ok(())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(paths::data_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let c = Config::default();
        c.validate().unwrap();
        assert_eq!(c.slot, "flashcards");
    }

    #[test]
    fn toml_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "slot = \"study\"\nmax_backups = 2\nshare_origin = \"https://cards.example\"\n",
        )
        .unwrap();
        let c = Config::from_figment(
            Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Toml::file(&path)),
        )
        .unwrap();
        assert_eq!(c.slot, "study");
        assert_eq!(c.max_backups, 2);
        assert_eq!(c.share_origin, "https://cards.example");
        assert_eq!(c.listen_addr, "127.0.0.1:8080");
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let c = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(c.max_backups, DEFAULT_MAX_BACKUPS);
    }

    #[test]
    fn bad_listen_addr_is_rejected() {
        let c = Config {
            listen_addr: "not an addr".into(),
            ..Config::default()
        };
        assert!(c.validate().is_err());
    }
}
