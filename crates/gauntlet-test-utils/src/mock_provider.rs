// SPDX-FileCopyrightText: 2026 Gauntlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory metadata provider.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use gauntlet_core::GauntletError;
use gauntlet_extension::{ModuleMetadata, ModuleMetadataProvider};

/// Serves pre-registered metadata by path and records every read.
///
/// Files still have to exist on disk to be found by discovery; their
/// contents are never looked at.
#[derive(Debug, Default)]
pub struct MockMetadataProvider {
    modules: HashMap<PathBuf, ModuleMetadata>,
    reads: RefCell<Vec<PathBuf>>,
}

impl MockMetadataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, metadata: ModuleMetadata) {
        self.modules.insert(path.into(), metadata);
    }

    /// Every path passed to `read`, in call order.
    pub fn reads(&self) -> Vec<PathBuf> {
        self.reads.borrow().clone()
    }

    fn lookup(&self, path: &Path) -> Option<&ModuleMetadata> {
        if let Some(metadata) = self.modules.get(path) {
            return Some(metadata);
        }
        let wanted = fs::canonicalize(path).ok()?;
        self.modules
            .iter()
            .find(|(known, _)| fs::canonicalize(known).ok().as_ref() == Some(&wanted))
            .map(|(_, metadata)| metadata)
    }
}

impl ModuleMetadataProvider for MockMetadataProvider {
    fn read(&self, path: &Path) -> Result<ModuleMetadata, GauntletError> {
        self.reads.borrow_mut().push(path.to_path_buf());
        self.lookup(path)
            .cloned()
            .ok_or_else(|| GauntletError::ModuleRead {
                path: path.to_path_buf(),
                message: "unknown module".to_string(),
            })
    }
}
