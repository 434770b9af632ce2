// SPDX-FileCopyrightText: 2026 Gauntlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `gauntlet extensions` and `gauntlet points`.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use gauntlet_config::GauntletConfig;
use gauntlet_core::GauntletError;
use gauntlet_extension::{
    builtin_capabilities, search_capabilities, DiscoveryOptions, ExtensionDiscovery,
    ExtensionNode, ExtensionRegistry, HostCapability,
};
use serde::Serialize;
use tracing::debug;

/// One extension point and the extensions installed into it.
#[derive(Debug, Serialize)]
pub struct PointReport {
    pub path: String,
    pub capability: String,
    pub description: Option<String>,
    pub extensions: Vec<ExtensionReport>,
}

#[derive(Debug, Serialize)]
pub struct ExtensionReport {
    pub capability: String,
    pub module: String,
    pub version: String,
    pub enabled: bool,
    pub from_wildcard: bool,
}

impl From<&ExtensionNode> for ExtensionReport {
    fn from(node: &ExtensionNode) -> Self {
        Self {
            capability: node.capability.to_string(),
            module: node.module_path.display().to_string(),
            version: node.module_version.to_string(),
            enabled: node.enabled,
            from_wildcard: node.from_wildcard,
        }
    }
}

/// Discovery options from configuration.
pub fn discovery_options(config: &GauntletConfig) -> Result<DiscoveryOptions, GauntletError> {
    let mut options = DiscoveryOptions {
        manifest_pattern: config.discovery.manifest_pattern.clone(),
        module_pattern: config.discovery.module_pattern.clone(),
        host_runtime: config.host.runtime_family()?,
        ..DiscoveryOptions::default()
    };
    if let Some(version) = config.host.parsed_version()? {
        options.host_version = version;
    }
    Ok(options)
}

/// `--dir`, then the configured start directory, then the binary's directory.
fn start_directory(config: &GauntletConfig, dir: Option<PathBuf>) -> Result<PathBuf, GauntletError> {
    if let Some(dir) = dir.or_else(|| config.discovery.start_directory.clone()) {
        return Ok(dir);
    }
    let exe = std::env::current_exe().map_err(|e| {
        GauntletError::InvalidArgument(format!("cannot locate the gauntlet binary: {e}"))
    })?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        GauntletError::InvalidArgument("gauntlet binary has no parent directory".to_string())
    })
}

fn discover(config: &GauntletConfig, dir: Option<PathBuf>) -> Result<ExtensionRegistry, GauntletError> {
    let start = start_directory(config, dir)?;
    let options = discovery_options(config)?;
    debug!(
        start = %start.display(),
        runtime = %options.host_runtime,
        host_version = %options.host_version,
        "starting extension discovery"
    );
    ExtensionDiscovery::new(options)?.discover(&builtin_capabilities(), &start)
}

/// Per-point report; disabled extensions only when `all` is set.
pub fn report(registry: &ExtensionRegistry, all: bool) -> Vec<PointReport> {
    registry
        .points()
        .iter()
        .map(|point| PointReport {
            path: point.path.clone(),
            capability: point.required_capability.to_string(),
            description: point.description.clone(),
            extensions: point
                .nodes()
                .iter()
                .filter(|node| all || node.enabled)
                .map(ExtensionReport::from)
                .collect(),
        })
        .collect()
}

pub fn run_extensions(
    config: &GauntletConfig,
    dir: Option<PathBuf>,
    all: bool,
    json: bool,
    plain: bool,
) -> Result<(), GauntletError> {
    let registry = discover(config, dir)?;
    let points = report(&registry, all);

    if json {
        return print_json(&points);
    }

    let use_color = !plain && std::io::stdout().is_terminal();
    for point in points.iter().filter(|p| !p.extensions.is_empty()) {
        print_point_header(point, use_color);
        for extension in &point.extensions {
            print_extension(extension, use_color);
        }
        println!();
    }
    let total: usize = points.iter().map(|p| p.extensions.len()).sum();
    println!("{total} extension(s) in {} point(s)", points.len());
    Ok(())
}

pub fn run_points(
    config: &GauntletConfig,
    dir: Option<PathBuf>,
    json: bool,
) -> Result<(), GauntletError> {
    let registry = discover(config, dir)?;
    let points = report(&registry, true);

    if json {
        return print_json(&points);
    }
    for point in &points {
        println!(
            "{:<48} {:<32} {}",
            point.path,
            point.capability,
            point.extensions.len()
        );
    }
    Ok(())
}

/// Built-in capability as printed by `gauntlet capabilities`.
#[derive(Debug, Serialize)]
pub struct CapabilityReport {
    pub path: String,
    pub capability: String,
    pub description: String,
}

impl From<HostCapability> for CapabilityReport {
    fn from(capability: HostCapability) -> Self {
        Self {
            path: capability.path,
            capability: capability.capability.to_string(),
            description: capability.description,
        }
    }
}

/// Built-in capabilities whose path or description contains `query`.
pub fn capabilities(query: Option<&str>) -> Vec<CapabilityReport> {
    search_capabilities(query.unwrap_or_default())
        .into_iter()
        .map(CapabilityReport::from)
        .collect()
}

pub fn run_capabilities(query: Option<String>, json: bool) -> Result<(), GauntletError> {
    let found = capabilities(query.as_deref());
    if json {
        return print_json(&found);
    }
    if found.is_empty() {
        println!("no built-in capability matches");
    }
    for capability in &found {
        println!("{:<48} {}", capability.path, capability.description);
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), GauntletError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| GauntletError::InvalidArgument(format!("cannot render JSON: {e}")))?;
    println!("{rendered}");
    Ok(())
}

fn print_point_header(point: &PointReport, use_color: bool) {
    if use_color {
        use colored::Colorize;
        println!("{} ({})", point.path.bold(), point.capability.dimmed());
    } else {
        println!("{} ({})", point.path, point.capability);
    }
}

fn print_extension(extension: &ExtensionReport, use_color: bool) {
    let origin = if extension.from_wildcard { "" } else { " [explicit]" };
    if use_color {
        use colored::Colorize;
        let state = if extension.enabled {
            "✓".green()
        } else {
            "-".yellow()
        };
        println!(
            "  {state} {} {}{origin}  {}",
            extension.capability,
            extension.version.dimmed(),
            extension.module.dimmed()
        );
    } else {
        let state = if extension.enabled { "[on]" } else { "[off]" };
        println!(
            "  {state} {} {}{origin}  {}",
            extension.capability, extension.version, extension.module
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauntlet_extension::metadata::ExtensionAttribute;
    use gauntlet_test_utils::ModuleBuilder;

    #[test]
    fn options_follow_configuration() {
        let mut config = GauntletConfig::default();
        config.host.runtime = "desktop".into();
        config.host.version = Some("7".into());
        config.discovery.module_pattern = "*.mod".into();

        let options = discovery_options(&config).unwrap();
        assert_eq!(options.host_runtime, gauntlet_core::RuntimeFamily::Desktop);
        assert_eq!(options.host_version.to_string(), "7.0.0");
        assert_eq!(options.module_pattern, "*.mod");
        assert_eq!(options.manifest_pattern, "*.addins");
    }

    #[test]
    fn capabilities_filter_by_query() {
        assert_eq!(capabilities(None).len(), 5);

        let writers = capabilities(Some("resultwriter"));
        assert_eq!(writers.len(), 1);
        assert_eq!(writers[0].capability, "gauntlet::ResultWriter");

        assert!(capabilities(Some("no-such-capability")).is_empty());
    }

    #[test]
    fn explicit_dir_wins_over_configuration() {
        let mut config = GauntletConfig::default();
        config.discovery.start_directory = Some(PathBuf::from("/configured"));
        assert_eq!(
            start_directory(&config, Some(PathBuf::from("/cli"))).unwrap(),
            PathBuf::from("/cli")
        );
        assert_eq!(
            start_directory(&config, None).unwrap(),
            PathBuf::from("/configured")
        );
    }

    #[test]
    fn report_hides_disabled_extensions_unless_asked() {
        let dir = tempfile::tempdir().unwrap();
        ModuleBuilder::new("acme", "1.2")
            .extension("acme::Writer", &["gauntlet::ResultWriter"])
            .extension_with(
                "acme::Quiet",
                &["gauntlet::ResultWriter"],
                ExtensionAttribute {
                    enabled: Some(false),
                    ..ExtensionAttribute::default()
                },
            )
            .write(&dir.path().join("acme.wasm"))
            .unwrap();

        let registry = discover(&GauntletConfig::default(), Some(dir.path().to_path_buf())).unwrap();

        let writers = |all| {
            report(&registry, all)
                .into_iter()
                .find(|p| p.capability == "gauntlet::ResultWriter")
                .unwrap()
                .extensions
        };
        assert_eq!(writers(false).len(), 1);
        let everything = writers(true);
        assert_eq!(everything.len(), 2);
        assert_eq!(everything[0].version, "1.2.0");
        assert!(everything[0].from_wildcard);
        assert!(!everything[1].enabled);
    }
}
