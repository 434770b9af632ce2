// SPDX-FileCopyrightText: 2026 Gauntlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static module metadata.
//!
//! Every plugin module carries a JSON description of the types it declares,
//! the relationships between them and the extension markers attached to
//! them. It is read without loading or running the module.

use std::path::Path;
use std::rc::Rc;

use gauntlet_core::{GauntletError, RuntimeDescriptor, TypeName};
use serde::{Deserialize, Serialize};

/// Structural metadata declared by a plugin module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleMetadata {
    /// Declared module name; two copies with the same name are the same module.
    pub name: String,
    /// Module version, leniently parsed (`1.2` is `1.2.0`).
    pub version: String,
    /// Runtime the module was built against. Absent means portable.
    #[serde(default)]
    pub target_runtime: Option<RuntimeDescriptor>,
    /// Module-level extension point declarations.
    #[serde(default)]
    pub extension_points: Vec<ExtensionPointAttribute>,
    /// Types declared by the module.
    #[serde(default)]
    pub types: Vec<TypeMetadata>,
}

/// Declares an extension point with an explicit path and capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionPointAttribute {
    pub path: String,
    pub capability: TypeName,
    #[serde(default)]
    pub description: Option<String>,
}

/// One declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeMetadata {
    pub name: TypeName,
    /// Interfaces or contracts the type implements, in declaration order.
    #[serde(default)]
    pub implements: Vec<TypeName>,
    /// Base type, if any.
    #[serde(default)]
    pub extends: Option<TypeName>,
    /// Present if the type itself is an extension point.
    #[serde(default)]
    pub extension_point: Option<TypedExtensionPointAttribute>,
    /// Present if the type is an extension.
    #[serde(default)]
    pub extension: Option<ExtensionAttribute>,
}

/// Marks a type as an extension point requiring that type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypedExtensionPointAttribute {
    /// Explicit path; defaults to `/Gauntlet/TypeExtensions/<short name>`.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Marks a type as an extension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtensionAttribute {
    /// Explicit extension point path. When absent the point is deduced from the type.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to enabled.
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Minimum host version required to install the extension.
    #[serde(default)]
    pub engine_version: Option<String>,
    #[serde(default)]
    pub properties: Vec<ExtensionProperty>,
}

/// A free-form named value attached to an extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionProperty {
    pub name: String,
    pub value: String,
}

/// Reads the static metadata of a module on disk.
///
/// Implementations must not execute code from the module.
pub trait ModuleMetadataProvider {
    fn read(&self, path: &Path) -> Result<ModuleMetadata, GauntletError>;
}

impl<P: ModuleMetadataProvider + ?Sized> ModuleMetadataProvider for Rc<P> {
    fn read(&self, path: &Path) -> Result<ModuleMetadata, GauntletError> {
        (**self).read(path)
    }
}

/// Deserialize a JSON metadata payload belonging to the module at `path`.
pub fn parse_metadata_payload(path: &Path, payload: &[u8]) -> Result<ModuleMetadata, GauntletError> {
    serde_json::from_slice(payload).map_err(|e| GauntletError::ModuleRead {
        path: path.to_path_buf(),
        message: format!("invalid metadata payload: {e}"),
    })
}
