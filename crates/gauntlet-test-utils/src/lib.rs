// SPDX-FileCopyrightText: 2026 Gauntlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Gauntlet integration tests.
//!
//! # Components
//!
//! - [`ModuleBuilder`] - Writes real WebAssembly plugin modules carrying metadata
//! - [`MockMetadataProvider`] - In-memory metadata keyed by path, recording reads
//! - [`write_manifest`] - Writes a manifest file from lines

pub mod mock_provider;
pub mod module;

pub use mock_provider::MockMetadataProvider;
pub use module::{write_manifest, ModuleBuilder};
