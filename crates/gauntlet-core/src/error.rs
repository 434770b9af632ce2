// SPDX-FileCopyrightText: 2026 Gauntlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Gauntlet test engine.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type used across extension discovery and the host.
#[derive(Debug, Error)]
pub enum GauntletError {
    /// A manifest file exists but could not be read.
    #[error("failed to read manifest {}: {source}", path.display())]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A candidate module's metadata could not be read (corrupt or foreign format).
    #[error("failed to read module metadata from {}: {message}", path.display())]
    ModuleRead { path: PathBuf, message: String },

    /// Two extension points claim the same path.
    #[error("extension point `{path}` is already registered")]
    DuplicateExtensionPoint { path: String },

    /// A node names an extension point path that is not registered.
    #[error("unable to locate extension point `{path}` for type {capability}")]
    UnknownExtensionPoint { path: String, capability: String },

    /// A node has no explicit path and none could be deduced from its type.
    #[error("unable to deduce an extension point for type {capability}")]
    UndeducedExtensionPoint { capability: String },

    /// A candidate module targets a runtime the host cannot use.
    #[error("module {} targets {target}, which is not available to a {host} host", path.display())]
    IncompatibleRuntime {
        path: PathBuf,
        target: String,
        host: String,
    },

    /// No installed extension has the given capability type name.
    #[error("no extension found with type {capability}")]
    ExtensionNotFound { capability: String },

    /// A version string could not be parsed.
    #[error("invalid version `{value}`")]
    InvalidVersion { value: String },

    /// An operation was called with an argument that violates its contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Host configuration errors.
    #[error("configuration error: {0}")]
    Config(String),
}
