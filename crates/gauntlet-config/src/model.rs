// SPDX-FileCopyrightText: 2026 Gauntlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model.
//!
//! Every struct uses `#[serde(deny_unknown_fields)]` so typos are reported
//! instead of silently ignored.

use std::path::PathBuf;
use std::str::FromStr;

use gauntlet_core::{parse_version, GauntletError, RuntimeFamily};
use semver::Version;
use serde::{Deserialize, Serialize};

/// Top-level configuration. All sections are optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GauntletConfig {
    /// Facts about the running host.
    #[serde(default)]
    pub host: HostConfig,

    /// Where and how to look for plugins.
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Host runtime identity used for compatibility filtering.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    /// Runtime family the host runs under: `core` or `desktop`.
    #[serde(default = "default_runtime")]
    pub runtime: String,

    /// Host version compared against extension `engine_version` requirements.
    /// Defaults to the version of the binary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            runtime: default_runtime(),
            version: None,
        }
    }
}

impl HostConfig {
    pub fn runtime_family(&self) -> Result<RuntimeFamily, GauntletError> {
        RuntimeFamily::from_str(self.runtime.trim()).map_err(|_| {
            GauntletError::Config(format!("unknown host runtime `{}`", self.runtime))
        })
    }

    /// The configured host version, if any.
    pub fn parsed_version(&self) -> Result<Option<Version>, GauntletError> {
        self.version.as_deref().map(parse_version).transpose()
    }
}

fn default_runtime() -> String {
    "core".to_string()
}

/// Discovery settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Directory discovery starts from. Defaults to the directory of the binary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_directory: Option<PathBuf>,

    /// File-name pattern identifying manifest files.
    #[serde(default = "default_manifest_pattern")]
    pub manifest_pattern: String,

    /// File-name pattern of modules picked up from directories without a manifest.
    #[serde(default = "default_module_pattern")]
    pub module_pattern: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            start_directory: None,
            manifest_pattern: default_manifest_pattern(),
            module_pattern: default_module_pattern(),
        }
    }
}

fn default_manifest_pattern() -> String {
    "*.addins".to_string()
}

fn default_module_pattern() -> String {
    "*.wasm".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Default level for gauntlet crates (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
