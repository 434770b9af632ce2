// SPDX-FileCopyrightText: 2026 Gauntlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the extension engine and the host.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Fully qualified name of a declared type, e.g. `gauntlet::ResultWriter`.
///
/// Capabilities, base types and implemented interfaces are all referred to
/// by name; the relationships between them live in static metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(pub String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last path segment of the name (`ResultWriter` for `gauntlet::ResultWriter`).
    pub fn short_name(&self) -> &str {
        let name = self.0.as_str();
        let after_colons = name.rsplit("::").next().unwrap_or(name);
        after_colons.rsplit('.').next().unwrap_or(after_colons)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Family of runtimes a module can be built for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeFamily {
    /// Portable modules usable by any host.
    Neutral,
    /// The classic desktop runtime.
    Desktop,
    /// The cross-platform core runtime.
    Core,
}

/// Runtime a module declares it was built against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeDescriptor {
    pub family: RuntimeFamily,
    #[serde(default)]
    pub version: Option<String>,
}

impl RuntimeDescriptor {
    pub fn new(family: RuntimeFamily) -> Self {
        Self {
            family,
            version: None,
        }
    }

    pub fn with_version(family: RuntimeFamily, version: impl Into<String>) -> Self {
        Self {
            family,
            version: Some(version.into()),
        }
    }
}

impl fmt::Display for RuntimeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} {version}", self.family),
            None => write!(f, "{}", self.family),
        }
    }
}

/// A host-side type that extensions can provide.
///
/// Implemented by marker types so callers can ask the registry for
/// extensions with `registry.nodes_for::<ResultWriter>()`.
pub trait Capability {
    /// Fully qualified type name matched against extension point requirements.
    const TYPE_NAME: &'static str;

    fn type_name() -> TypeName {
        TypeName::new(Self::TYPE_NAME)
    }
}
