// SPDX-FileCopyrightText: 2026 Gauntlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-based configuration loading.
//!
//! Merge order, later wins: compiled defaults, `/etc/gauntlet/gauntlet.toml`,
//! `$XDG_CONFIG_HOME/gauntlet/gauntlet.toml`, `./gauntlet.toml`, then
//! `GAUNTLET_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::GauntletConfig;

pub const SYSTEM_CONFIG: &str = "/etc/gauntlet/gauntlet.toml";
pub const LOCAL_CONFIG: &str = "gauntlet.toml";

/// Top-level sections an environment variable may address.
const SECTIONS: &[&str] = &["host", "discovery", "log"];

/// `gauntlet/gauntlet.toml` under the user's configuration directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gauntlet").join("gauntlet.toml"))
}

/// Load configuration from the full file hierarchy with env overrides.
pub fn load_config() -> Result<GauntletConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only. No files, no environment.
pub fn load_config_from_str(toml_content: &str) -> Result<GauntletConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(GauntletConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one file with env overrides, skipping the hierarchy.
pub fn load_config_from_path(path: &Path) -> Result<GauntletConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(GauntletConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The layered figment before extraction.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(GauntletConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment.merge(Toml::file(LOCAL_CONFIG)).merge(env_provider())
}

/// `GAUNTLET_DISCOVERY_MODULE_PATTERN` maps to `discovery.module_pattern`.
///
/// Only the section prefix becomes a dot; underscores inside key names stay.
fn env_provider() -> Env {
    Env::prefixed("GAUNTLET_").map(|key| env_key(key.as_str()).into())
}

pub(crate) fn env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    SECTIONS
        .iter()
        .find_map(|section| {
            key.strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|rest| format!("{section}.{rest}"))
        })
        .unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_on_section_only() {
        assert_eq!(env_key("DISCOVERY_MODULE_PATTERN"), "discovery.module_pattern");
        assert_eq!(env_key("host_runtime"), "host.runtime");
        assert_eq!(env_key("LOG_LEVEL"), "log.level");
        assert_eq!(env_key("unrelated"), "unrelated");
    }

    #[test]
    fn user_config_lives_under_gauntlet_directory() {
        if let Some(path) = user_config_path() {
            assert!(path.ends_with("gauntlet/gauntlet.toml"));
        }
    }
}
