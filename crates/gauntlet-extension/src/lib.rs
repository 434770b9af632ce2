// SPDX-FileCopyrightText: 2026 Gauntlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin discovery and extension registry.
//!
//! Discovery walks a directory tree guided by manifest files, collects
//! candidate plugin modules, keeps the best version of each, filters them by
//! runtime, reads their static metadata without executing them and installs
//! the extensions they declare into an [`ExtensionRegistry`].
//!
//! ```no_run
//! use std::path::Path;
//! use gauntlet_extension::{builtin_capabilities, DiscoveryOptions, ExtensionDiscovery};
//!
//! let mut discovery = ExtensionDiscovery::new(DiscoveryOptions::default())?;
//! let registry = discovery.discover(&builtin_capabilities(), Path::new("addins"))?;
//! for point in registry.points() {
//!     println!("{}: {} extensions", point.path, point.nodes().len());
//! }
//! # Ok::<(), gauntlet_core::GauntletError>(())
//! ```

pub mod candidate;
pub mod catalog;
pub mod discovery;
pub mod graph;
pub mod manifest;
pub mod metadata;
pub mod pattern;
pub mod registry;
pub mod scanner;
pub mod wasm;

pub use candidate::{CandidateIndex, CandidateModule, Offer};
pub use catalog::{builtin_capabilities, search_capabilities, HostCapability};
pub use discovery::{DiscoveryOptions, ExtensionDiscovery};
pub use graph::{TypeGraph, TypeRelations};
pub use manifest::{parse_manifest, read_manifest, ManifestEntry};
pub use metadata::{ModuleMetadata, ModuleMetadataProvider};
pub use pattern::{resolve_directories, resolve_files};
pub use registry::{ExtensionNode, ExtensionPoint, ExtensionRegistry, InstallOutcome};
pub use scanner::{MetadataScanner, ScanResult};
pub use wasm::{WasmMetadataProvider, METADATA_SECTION};
