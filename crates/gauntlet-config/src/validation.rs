// SPDX-FileCopyrightText: 2026 Gauntlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Checks that serde attributes cannot express.

use std::str::FromStr;

use gauntlet_core::RuntimeFamily;
use glob::Pattern;

use crate::diagnostic::ConfigError;
use crate::model::GauntletConfig;

/// Validate `config`, collecting every problem rather than stopping at the first.
pub fn validate_config(config: &GauntletConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    match config.host.runtime_family() {
        Ok(RuntimeFamily::Neutral) => errors.push(validation(
            "host.runtime must name a concrete runtime (core or desktop), not `neutral`",
        )),
        Ok(_) => {}
        Err(e) => errors.push(validation(&e.to_string())),
    }

    if let Err(e) = config.host.parsed_version() {
        errors.push(validation(&format!("host.version: {e}")));
    }

    for (key, value) in [
        ("discovery.manifest_pattern", &config.discovery.manifest_pattern),
        ("discovery.module_pattern", &config.discovery.module_pattern),
    ] {
        if let Some(message) = check_file_pattern(value) {
            errors.push(validation(&format!("{key} `{value}` {message}")));
        }
    }

    if let Some(start) = &config.discovery.start_directory
        && start.as_os_str().is_empty()
    {
        errors.push(validation("discovery.start_directory must not be empty"));
    }

    if tracing::Level::from_str(config.log.level.trim()).is_err() {
        errors.push(validation(&format!(
            "log.level `{}` is not one of trace, debug, info, warn, error",
            config.log.level
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_file_pattern(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some("must not be empty".to_string());
    }
    if value.contains('/') || value.contains('\\') {
        return Some("must match file names, not paths".to_string());
    }
    Pattern::new(value)
        .err()
        .map(|e| format!("is not a valid pattern: {e}"))
}

fn validation(message: &str) -> ConfigError {
    ConfigError::Validation {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &GauntletConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&GauntletConfig::default()).is_ok());
    }

    #[test]
    fn neutral_host_is_rejected() {
        let mut config = GauntletConfig::default();
        config.host.runtime = "neutral".into();
        assert!(messages(&config)[0].contains("host.runtime"));
    }

    #[test]
    fn all_problems_are_reported() {
        let mut config = GauntletConfig::default();
        config.host.version = Some("one.two".into());
        config.discovery.manifest_pattern = "[".into();
        config.discovery.module_pattern = "mods/*.wasm".into();
        config.log.level = "loud".into();
        let errors = messages(&config);
        assert_eq!(errors.len(), 4);
        assert!(errors[0].contains("host.version"));
        assert!(errors[1].contains("manifest_pattern"));
        assert!(errors[2].contains("not paths"));
        assert!(errors[3].contains("log.level"));
    }

    #[test]
    fn empty_start_directory_is_rejected() {
        let mut config = GauntletConfig::default();
        config.discovery.start_directory = Some("".into());
        assert!(messages(&config)[0].contains("start_directory"));
    }
}
