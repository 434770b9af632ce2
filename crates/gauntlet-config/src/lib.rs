// SPDX-FileCopyrightText: 2026 Gauntlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the Gauntlet test engine.
//!
//! TOML files are layered system, user, then local, with `GAUNTLET_*`
//! environment overrides on top. Unknown keys are rejected and reported as
//! miette diagnostics with typo suggestions.
//!
//! ```no_run
//! use gauntlet_config::load_and_validate;
//!
//! match load_and_validate() {
//!     Ok(config) => println!("host runtime: {}", config.host.runtime),
//!     Err(errors) => gauntlet_config::render_errors(&errors),
//! }
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::{Path, PathBuf};

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{DiscoveryConfig, GauntletConfig, HostConfig, LogConfig};

/// Load the layered configuration and validate it.
pub fn load_and_validate() -> Result<GauntletConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load `path` plus environment overrides and validate the result.
pub fn load_and_validate_path(path: &Path) -> Result<GauntletConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        read_sources(std::iter::once(path.to_path_buf()))
    })
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<GauntletConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

fn finish(
    loaded: Result<GauntletConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<GauntletConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Contents of every configuration file that exists, for error spans.
fn collect_toml_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|dir| dir.join(loader::LOCAL_CONFIG))
        .unwrap_or_else(|_| PathBuf::from(loader::LOCAL_CONFIG));
    read_sources(
        [Some(local), loader::user_config_path(), Some(PathBuf::from(loader::SYSTEM_CONFIG))]
            .into_iter()
            .flatten(),
    )
}

fn read_sources(paths: impl Iterator<Item = PathBuf>) -> Vec<(String, String)> {
    paths
        .filter_map(|path| {
            std::fs::read_to_string(&path)
                .ok()
                .map(|content| (path.display().to_string(), content))
        })
        .collect()
}
