// SPDX-FileCopyrightText: 2026 Gauntlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extension discovery.
//!
//! Discovery starts at one directory. If the directory holds manifest files
//! each entry is resolved relative to it: directory patterns are processed
//! recursively, file patterns become candidate modules. A directory without a
//! manifest is scanned for module files directly. Everything found by a
//! wildcard, or below something found by a wildcard, is treated leniently:
//! failures are logged and skipped instead of aborting discovery.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use gauntlet_core::{GauntletError, RuntimeFamily};
use glob::Pattern;
use semver::Version;
use tracing::{debug, info, warn};

use crate::candidate::{CandidateIndex, CandidateModule};
use crate::catalog::HostCapability;
use crate::manifest::{read_manifest, ManifestEntry};
use crate::metadata::ModuleMetadataProvider;
use crate::pattern::{resolve_directories, resolve_files};
use crate::registry::{ExtensionRegistry, InstallOutcome};
use crate::scanner::{MetadataScanner, ScanResult};
use crate::wasm::WasmMetadataProvider;

/// Default file-name pattern of manifest files.
pub const DEFAULT_MANIFEST_PATTERN: &str = "*.addins";
/// Default file-name pattern of module files in directories without a manifest.
pub const DEFAULT_MODULE_PATTERN: &str = "*.wasm";

/// Host facts and file patterns that drive discovery.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    pub manifest_pattern: String,
    pub module_pattern: String,
    pub host_runtime: RuntimeFamily,
    pub host_version: Version,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            manifest_pattern: DEFAULT_MANIFEST_PATTERN.to_string(),
            module_pattern: DEFAULT_MODULE_PATTERN.to_string(),
            host_runtime: RuntimeFamily::Core,
            host_version: Version::parse(env!("CARGO_PKG_VERSION"))
                .unwrap_or_else(|_| Version::new(0, 0, 0)),
        }
    }
}

/// Walks a directory tree and builds an [`ExtensionRegistry`].
pub struct ExtensionDiscovery {
    options: DiscoveryOptions,
    provider: Box<dyn ModuleMetadataProvider>,
    manifest_matcher: Pattern,
    module_matcher: Pattern,
    /// `(canonical path, from_wildcard)` of every directory and file already processed.
    visited: HashSet<(PathBuf, bool)>,
    index: CandidateIndex,
}

impl std::fmt::Debug for ExtensionDiscovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionDiscovery")
            .field("options", &self.options)
            .field("visited", &self.visited.len())
            .field("candidates", &self.index.len())
            .finish()
    }
}

impl ExtensionDiscovery {
    /// Discovery reading WebAssembly modules.
    pub fn new(options: DiscoveryOptions) -> Result<Self, GauntletError> {
        Self::with_provider(options, Box::new(WasmMetadataProvider))
    }

    pub fn with_provider(
        options: DiscoveryOptions,
        provider: Box<dyn ModuleMetadataProvider>,
    ) -> Result<Self, GauntletError> {
        let manifest_matcher = file_pattern("manifest_pattern", &options.manifest_pattern)?;
        let module_matcher = file_pattern("module_pattern", &options.module_pattern)?;
        let index = CandidateIndex::new(options.host_runtime)?;
        Ok(Self {
            options,
            provider,
            manifest_matcher,
            module_matcher,
            visited: HashSet::new(),
            index,
        })
    }

    pub fn options(&self) -> &DiscoveryOptions {
        &self.options
    }

    /// Candidates collected by the last run, in discovery order.
    pub fn candidates(&self) -> &[CandidateModule] {
        self.index.all()
    }

    /// Build a registry seeded with `capabilities` and populated from `start`.
    pub fn discover(
        &mut self,
        capabilities: &[HostCapability],
        start: &Path,
    ) -> Result<ExtensionRegistry, GauntletError> {
        let mut registry = ExtensionRegistry::new();
        for capability in capabilities {
            registry.register_point(capability.to_point())?;
        }

        self.collect(start)?;
        self.install_candidates(&mut registry)?;

        info!(
            points = registry.len(),
            extensions = registry.extensions().count(),
            modules = self.index.len(),
            "extension discovery complete"
        );
        Ok(registry)
    }

    /// Collect candidate modules below `start`, discarding any previous run.
    pub fn collect(&mut self, start: &Path) -> Result<&[CandidateModule], GauntletError> {
        if !start.is_dir() {
            return Err(GauntletError::InvalidArgument(format!(
                "start directory {} does not exist",
                start.display()
            )));
        }
        self.visited.clear();
        self.index.clear();
        self.process_directory(start, false)?;
        Ok(self.index.all())
    }

    fn process_directory(&mut self, dir: &Path, from_wildcard: bool) -> Result<(), GauntletError> {
        if !self.visited.insert((canonical(dir), from_wildcard)) {
            warn!(dir = %dir.display(), "skipping directory because it was already visited");
            return Ok(());
        }
        info!(dir = %dir.display(), "scanning directory for extensions");

        let manifests = files_matching(dir, &self.manifest_matcher);
        if manifests.is_empty() {
            for module in files_matching(dir, &self.module_matcher) {
                self.process_candidate(&module, true)?;
            }
            return Ok(());
        }

        for manifest in manifests {
            // An unreadable manifest ends this subtree; fatal unless under a wildcard.
            let entries = match read_manifest(&manifest) {
                Ok(entries) => entries,
                Err(e) => return tolerate(e, from_wildcard, &manifest.display().to_string()),
            };
            self.process_manifest(dir, &manifest, entries, from_wildcard)?;
        }
        Ok(())
    }

    fn process_manifest(
        &mut self,
        base: &Path,
        manifest: &Path,
        entries: Vec<ManifestEntry>,
        from_wildcard: bool,
    ) -> Result<(), GauntletError> {
        info!(manifest = %manifest.display(), "processing manifest");

        for entry in entries {
            let is_wild = from_wildcard || entry.has_wildcard();
            let pattern = entry.normalized_text.as_str();

            let resolved = if entry.is_directory_pattern() {
                resolve_directories(base, pattern)
            } else {
                resolve_files(base, pattern)
            };
            let paths = match resolved {
                Ok(paths) => paths,
                Err(e) => {
                    tolerate(e, is_wild, &manifest.display().to_string())?;
                    continue;
                }
            };

            if paths.is_empty() {
                debug!(
                    manifest = %manifest.display(),
                    line = entry.line_number,
                    pattern = pattern,
                    "manifest entry matched nothing"
                );
            }

            for path in paths {
                if entry.is_directory_pattern() {
                    self.process_directory(&path, is_wild)?;
                } else {
                    self.process_candidate(&path, is_wild)?;
                }
            }
        }
        Ok(())
    }

    fn process_candidate(&mut self, path: &Path, from_wildcard: bool) -> Result<(), GauntletError> {
        if !self.visited.insert((canonical(path), from_wildcard)) {
            return Ok(());
        }

        let candidate = self
            .provider
            .read(path)
            .and_then(|metadata| CandidateModule::from_metadata(path, metadata, from_wildcard))
            .and_then(|candidate| self.index.offer(candidate));

        match candidate {
            Ok(offer) => {
                debug!(path = %path.display(), offer = ?offer, "offered candidate module");
                Ok(())
            }
            Err(e) => tolerate(e, from_wildcard, &path.display().to_string()),
        }
    }

    /// Scan every surviving candidate, register its points, then install its nodes.
    ///
    /// All points are registered before any node is installed so a module
    /// may extend a point declared by another module.
    fn install_candidates(&self, registry: &mut ExtensionRegistry) -> Result<(), GauntletError> {
        let scanner = MetadataScanner::new(self.options.host_version.clone());

        let mut scanned: Vec<ScanResult> = Vec::new();
        for candidate in self.index.all() {
            match scanner.scan(candidate) {
                Ok(result) => {
                    registry.types_mut().merge_module(candidate.metadata());
                    scanned.push(result);
                }
                Err(e) => tolerate(e, candidate.from_wildcard, &candidate.path.display().to_string())?,
            }
        }

        for result in &mut scanned {
            for point in result.points.drain(..) {
                registry.register_point(point)?;
            }
        }

        for node in scanned.into_iter().flat_map(|result| result.nodes) {
            let capability = node.capability.clone();
            if let InstallOutcome::Installed { path } = registry.install(node)? {
                debug!(extension = %capability, point = %path, "installed extension");
            }
        }
        Ok(())
    }
}

/// Failures under a wildcard are logged and skipped; explicit ones propagate.
fn tolerate(err: GauntletError, from_wildcard: bool, subject: &str) -> Result<(), GauntletError> {
    if from_wildcard {
        warn!(subject = subject, error = %err, "skipping wildcard-discovered entry");
        Ok(())
    } else {
        Err(err)
    }
}

fn file_pattern(field: &str, pattern: &str) -> Result<Pattern, GauntletError> {
    Pattern::new(pattern)
        .map_err(|e| GauntletError::Config(format!("invalid {field} `{pattern}`: {e}")))
}

/// Files directly inside `dir` whose names match, in name order.
fn files_matching(dir: &Path, matcher: &Pattern) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| matcher.matches(name))
        })
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    files
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
