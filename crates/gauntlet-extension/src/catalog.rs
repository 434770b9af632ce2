// SPDX-FileCopyrightText: 2026 Gauntlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in host capability catalog.
//!
//! Returns the extension points the host itself declares. These are
//! registered before any module is scanned so that extensions can bind to
//! them by path or by capability.

use gauntlet_core::{Capability, TypeName};

use crate::registry::ExtensionPoint;
use crate::scanner::default_point_path;

/// A built-in extension point seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCapability {
    pub path: String,
    pub capability: TypeName,
    pub description: String,
}

impl HostCapability {
    /// A capability at the default type-extension path for `C`.
    pub fn of<C: Capability>(description: &str) -> Self {
        let capability = C::type_name();
        Self {
            path: default_point_path(&capability),
            capability,
            description: description.to_string(),
        }
    }

    pub fn to_point(&self) -> ExtensionPoint {
        ExtensionPoint::new(
            self.path.clone(),
            self.capability.clone(),
            Some(self.description.clone()),
        )
    }
}

/// Creates drivers able to run tests for a given framework.
pub struct DriverFactory;

/// Loads project files that list test modules.
pub struct ProjectLoader;

/// Writes test results in a particular format.
pub struct ResultWriter;

/// Receives test events while a run is in progress.
pub struct EventListener;

/// A long-lived engine service.
pub struct Service;

impl Capability for DriverFactory {
    const TYPE_NAME: &'static str = "gauntlet::DriverFactory";
}

impl Capability for ProjectLoader {
    const TYPE_NAME: &'static str = "gauntlet::ProjectLoader";
}

impl Capability for ResultWriter {
    const TYPE_NAME: &'static str = "gauntlet::ResultWriter";
}

impl Capability for EventListener {
    const TYPE_NAME: &'static str = "gauntlet::EventListener";
}

impl Capability for Service {
    const TYPE_NAME: &'static str = "gauntlet::Service";
}

/// Returns the host's built-in extension points.
///
/// The catalog contains 5 points:
/// - DriverFactory
/// - ProjectLoader
/// - ResultWriter
/// - EventListener
/// - Service
pub fn builtin_capabilities() -> Vec<HostCapability> {
    vec![
        HostCapability::of::<DriverFactory>("Supplies drivers for test frameworks"),
        HostCapability::of::<ProjectLoader>("Recognizes and loads project files"),
        HostCapability::of::<ResultWriter>("Writes test results in additional formats"),
        HostCapability::of::<EventListener>("Receives progress events during a test run"),
        HostCapability::of::<Service>("Provides additional engine services"),
    ]
}

/// Search the built-in catalog by query string.
///
/// Filters entries whose path or description contains the query (case-insensitive).
/// If query is empty, returns all entries.
pub fn search_capabilities(query: &str) -> Vec<HostCapability> {
    if query.is_empty() {
        return builtin_capabilities();
    }
    let query_lower = query.to_lowercase();
    builtin_capabilities()
        .into_iter()
        .filter(|c| {
            c.path.to_lowercase().contains(&query_lower)
                || c.description.to_lowercase().contains(&query_lower)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_returns_five_entries() {
        assert_eq!(builtin_capabilities().len(), 5);
    }

    #[test]
    fn builtin_paths_are_unique_and_derived_from_type() {
        let catalog = builtin_capabilities();
        let paths: std::collections::HashSet<&str> =
            catalog.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths.len(), catalog.len());
        assert!(paths.contains("/Gauntlet/TypeExtensions/ResultWriter"));
        assert!(paths.contains("/Gauntlet/TypeExtensions/DriverFactory"));
    }

    #[test]
    fn to_point_keeps_capability() {
        let point = HostCapability::of::<EventListener>("events").to_point();
        assert_eq!(point.path, "/Gauntlet/TypeExtensions/EventListener");
        assert_eq!(point.required_capability.as_str(), "gauntlet::EventListener");
        assert_eq!(point.description.as_deref(), Some("events"));
        assert!(point.nodes().is_empty());
    }

    #[test]
    fn search_is_case_insensitive() {
        let results = search_capabilities("RESULTWRITER");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].capability.as_str(), "gauntlet::ResultWriter");
    }

    #[test]
    fn search_by_description() {
        let results = search_capabilities("project files");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].capability.as_str(), "gauntlet::ProjectLoader");
    }

    #[test]
    fn search_empty_returns_all() {
        assert_eq!(search_capabilities("").len(), 5);
    }

    #[test]
    fn search_no_match() {
        assert!(search_capabilities("xyz_nonexistent").is_empty());
    }
}
