// SPDX-FileCopyrightText: 2026 Gauntlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extraction of extension points and extension nodes from module metadata.

use gauntlet_core::{parse_version, GauntletError, TypeName};
use semver::Version;
use tracing::{debug, info};

use crate::candidate::CandidateModule;
use crate::registry::{ExtensionNode, ExtensionPoint};

/// Path prefix for points declared on a type without an explicit path.
pub const TYPE_EXTENSIONS_PREFIX: &str = "/Gauntlet/TypeExtensions/";

/// Default path of the point declared by type `ty`.
pub fn default_point_path(ty: &TypeName) -> String {
    format!("{TYPE_EXTENSIONS_PREFIX}{}", ty.short_name())
}

/// Points and nodes declared by one module.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub points: Vec<ExtensionPoint>,
    pub nodes: Vec<ExtensionNode>,
}

/// Turns candidate metadata into registry entries for a host of a given version.
#[derive(Debug, Clone)]
pub struct MetadataScanner {
    host_version: Version,
}

impl MetadataScanner {
    pub fn new(host_version: Version) -> Self {
        Self { host_version }
    }

    /// Collect the points and nodes `candidate` declares.
    ///
    /// Extensions requiring a newer host are skipped. Nodes are not yet
    /// bound to a point; that happens on install.
    pub fn scan(&self, candidate: &CandidateModule) -> Result<ScanResult, GauntletError> {
        let metadata = candidate.metadata();
        let mut result = ScanResult::default();

        for attr in &metadata.extension_points {
            result.points.push(ExtensionPoint::new(
                attr.path.clone(),
                attr.capability.clone(),
                attr.description.clone(),
            ));
        }

        for ty in &metadata.types {
            if let Some(point) = &ty.extension_point {
                let path = non_empty(&point.path).unwrap_or_else(|| default_point_path(&ty.name));
                result.points.push(ExtensionPoint::new(
                    path,
                    ty.name.clone(),
                    point.description.clone(),
                ));
            }

            let Some(extension) = &ty.extension else {
                continue;
            };

            if let Some(required) = &extension.engine_version {
                let required = parse_version(required).map_err(|e| GauntletError::ModuleRead {
                    path: candidate.path.clone(),
                    message: format!("extension {}: {e}", ty.name),
                })?;
                if required > self.host_version {
                    debug!(
                        extension = %ty.name,
                        required = %required,
                        host = %self.host_version,
                        "skipping extension that requires a newer host"
                    );
                    continue;
                }
            }

            let mut node = ExtensionNode::new(
                candidate.path.clone(),
                candidate.version.clone(),
                ty.name.clone(),
            );
            node.declared_path = non_empty(&extension.path);
            node.description = extension.description.clone();
            node.enabled = extension.enabled.unwrap_or(true);
            node.target_runtime = candidate.target_runtime.clone();
            node.from_wildcard = candidate.from_wildcard;
            for property in &extension.properties {
                node.add_property(property.name.clone(), property.value.clone());
            }

            info!(extension = %ty.name, module = %candidate.identity, "found extension");
            result.nodes.push(node);
        }

        Ok(result)
    }
}

fn non_empty(path: &Option<String>) -> Option<String> {
    path.as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}
