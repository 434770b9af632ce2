// SPDX-FileCopyrightText: 2026 Gauntlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Candidate plugin modules and the deduplicating index that collects them.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use gauntlet_core::{parse_version, GauntletError, RuntimeDescriptor, RuntimeFamily};
use semver::Version;
use tracing::{debug, info};

use crate::metadata::ModuleMetadata;

/// A module found on disk whose metadata could be read.
#[derive(Debug, Clone)]
pub struct CandidateModule {
    pub path: PathBuf,
    /// The module's declared name.
    pub identity: String,
    pub version: Version,
    pub target_runtime: Option<RuntimeDescriptor>,
    /// True if the module was found by pattern expansion rather than named explicitly.
    pub from_wildcard: bool,
    metadata: ModuleMetadata,
}

impl CandidateModule {
    /// Build a candidate from metadata read at `path`.
    pub fn from_metadata(
        path: &Path,
        metadata: ModuleMetadata,
        from_wildcard: bool,
    ) -> Result<Self, GauntletError> {
        let identity = metadata.name.trim().to_string();
        if identity.is_empty() {
            return Err(GauntletError::ModuleRead {
                path: path.to_path_buf(),
                message: "module name must not be empty".to_string(),
            });
        }
        let version = parse_version(&metadata.version).map_err(|e| GauntletError::ModuleRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            identity,
            version,
            target_runtime: metadata.target_runtime.clone(),
            from_wildcard,
            metadata,
        })
    }

    pub fn metadata(&self) -> &ModuleMetadata {
        &self.metadata
    }

    pub fn is_duplicate_of(&self, other: &CandidateModule) -> bool {
        self.identity == other.identity
    }

    /// Higher versions win. At equal versions an explicit reference beats a
    /// wildcard-discovered copy; any other tie keeps `other`.
    pub fn is_better_version_of(&self, other: &CandidateModule) -> bool {
        match self.version.cmp(&other.version) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => !self.from_wildcard && other.from_wildcard,
        }
    }
}

/// Result of offering a candidate to the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Offer {
    /// New identity; stored.
    Added,
    /// Better version of a stored identity; the old path was dropped.
    Replaced { previous: PathBuf },
    /// Not better than the stored copy; ignored.
    Kept { existing: PathBuf },
    /// Wildcard-discovered module for an incompatible runtime; ignored.
    Rejected,
}

/// Whether a host of family `host` can use a module built for `target`.
pub fn runtime_accepts(host: RuntimeFamily, target: Option<&RuntimeDescriptor>) -> bool {
    match target.map(|t| t.family) {
        None | Some(RuntimeFamily::Neutral) => true,
        Some(family) => family == host,
    }
}

/// Candidate modules keyed by identity, in discovery order.
#[derive(Debug)]
pub struct CandidateIndex {
    host_runtime: RuntimeFamily,
    candidates: Vec<CandidateModule>,
}

impl CandidateIndex {
    /// Create an index for a host running on `host_runtime`.
    ///
    /// A neutral runtime is a build target, not something that can host modules.
    pub fn new(host_runtime: RuntimeFamily) -> Result<Self, GauntletError> {
        if host_runtime == RuntimeFamily::Neutral {
            return Err(GauntletError::Config(
                "host runtime must be `desktop` or `core`, not `neutral`".to_string(),
            ));
        }
        Ok(Self {
            host_runtime,
            candidates: Vec::new(),
        })
    }

    pub fn host_runtime(&self) -> RuntimeFamily {
        self.host_runtime
    }

    /// Insert `candidate`, or supersede a stored duplicate with a worse version.
    ///
    /// An incompatible runtime is an error for explicit references and a
    /// silent rejection for wildcard-discovered modules.
    pub fn offer(&mut self, candidate: CandidateModule) -> Result<Offer, GauntletError> {
        if !runtime_accepts(self.host_runtime, candidate.target_runtime.as_ref()) {
            let target = candidate
                .target_runtime
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            if candidate.from_wildcard {
                info!(
                    path = %candidate.path.display(),
                    target = %target,
                    host = %self.host_runtime,
                    "skipping module built for an unavailable runtime"
                );
                return Ok(Offer::Rejected);
            }
            return Err(GauntletError::IncompatibleRuntime {
                path: candidate.path,
                target,
                host: self.host_runtime.to_string(),
            });
        }

        if let Some(existing) = self
            .candidates
            .iter_mut()
            .find(|existing| candidate.is_duplicate_of(existing))
        {
            if candidate.is_better_version_of(existing) {
                debug!(
                    identity = %candidate.identity,
                    version = %candidate.version,
                    replaces = %existing.path.display(),
                    "found better version of module"
                );
                let previous = std::mem::replace(existing, candidate).path;
                return Ok(Offer::Replaced { previous });
            }
            debug!(
                identity = %candidate.identity,
                path = %candidate.path.display(),
                kept = %existing.path.display(),
                "ignoring duplicate module"
            );
            return Ok(Offer::Kept {
                existing: existing.path.clone(),
            });
        }

        self.candidates.push(candidate);
        Ok(Offer::Added)
    }

    pub fn all(&self) -> &[CandidateModule] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn clear(&mut self) {
        self.candidates.clear();
    }
}
