// SPDX-FileCopyrightText: 2026 Gauntlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry of extension points and the extension nodes installed in them.
//!
//! Points are keyed by path. A node either names its point explicitly or the
//! point is deduced by walking the node's capability type through the static
//! [`TypeGraph`]. Once discovery finishes the registry is read-only except
//! for enabling and disabling nodes.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use gauntlet_core::{Capability, GauntletError, RuntimeDescriptor, TypeName};
use semver::Version;
use tracing::debug;

use crate::graph::TypeGraph;

/// A named slot in the host that accepts extensions of one capability.
#[derive(Debug, Clone)]
pub struct ExtensionPoint {
    pub path: String,
    pub required_capability: TypeName,
    pub description: Option<String>,
    nodes: Vec<ExtensionNode>,
}

impl ExtensionPoint {
    pub fn new(
        path: impl Into<String>,
        required_capability: impl Into<TypeName>,
        description: Option<String>,
    ) -> Self {
        Self {
            path: path.into(),
            required_capability: required_capability.into(),
            description,
            nodes: Vec::new(),
        }
    }

    /// All installed nodes, in installation order.
    pub fn nodes(&self) -> &[ExtensionNode] {
        &self.nodes
    }

    pub fn enabled_nodes(&self) -> impl Iterator<Item = &ExtensionNode> {
        self.nodes.iter().filter(|node| node.enabled)
    }
}

/// One extension provided by a module.
#[derive(Debug, Clone)]
pub struct ExtensionNode {
    pub module_path: PathBuf,
    pub module_version: Version,
    /// The type providing the extension.
    pub capability: TypeName,
    /// Point path named by the module, if any.
    pub declared_path: Option<String>,
    /// Path of the point the node is installed in; set on install.
    pub path: Option<String>,
    pub description: Option<String>,
    pub enabled: bool,
    pub properties: BTreeMap<String, Vec<String>>,
    pub target_runtime: Option<RuntimeDescriptor>,
    /// True if the providing module was wildcard-discovered.
    pub from_wildcard: bool,
}

impl ExtensionNode {
    pub fn new(
        module_path: impl Into<PathBuf>,
        module_version: Version,
        capability: impl Into<TypeName>,
    ) -> Self {
        Self {
            module_path: module_path.into(),
            module_version,
            capability: capability.into(),
            declared_path: None,
            path: None,
            description: None,
            enabled: true,
            properties: BTreeMap::new(),
            target_runtime: None,
            from_wildcard: false,
        }
    }

    pub fn add_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.entry(name.into()).or_default().push(value.into());
    }

    /// Every value recorded for `name`, in declaration order.
    pub fn property(&self, name: &str) -> Vec<&str> {
        self.properties
            .get(name)
            .map(|values| values.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Outcome of [`ExtensionRegistry::install`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed { path: String },
    /// Wildcard-discovered node whose point could not be deduced.
    Dropped,
}

/// Queryable set of extension points.
#[derive(Debug, Default)]
pub struct ExtensionRegistry {
    points: Vec<ExtensionPoint>,
    by_path: HashMap<String, usize>,
    /// `(point, node)` indices in installation order.
    installed: Vec<(usize, usize)>,
    types: TypeGraph,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a point. Paths are unique.
    pub fn register_point(&mut self, point: ExtensionPoint) -> Result<(), GauntletError> {
        if self.by_path.contains_key(&point.path) {
            return Err(GauntletError::DuplicateExtensionPoint { path: point.path });
        }
        debug!(path = %point.path, capability = %point.required_capability, "registered extension point");
        self.by_path.insert(point.path.clone(), self.points.len());
        self.points.push(point);
        Ok(())
    }

    pub fn types(&self) -> &TypeGraph {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TypeGraph {
        &mut self.types
    }

    /// Install `node` into its declared point, or the point deduced from its capability.
    ///
    /// A declared path that is not registered is always an error. A node
    /// without a declared path whose point cannot be deduced is an error for
    /// explicit references and is dropped for wildcard-discovered modules.
    pub fn install(&mut self, mut node: ExtensionNode) -> Result<InstallOutcome, GauntletError> {
        let index = match &node.declared_path {
            Some(path) => *self.by_path.get(path).ok_or_else(|| {
                GauntletError::UnknownExtensionPoint {
                    path: path.clone(),
                    capability: node.capability.to_string(),
                }
            })?,
            None => match self.deduce_point(&node.capability) {
                Some(index) => index,
                None if node.from_wildcard => {
                    debug!(
                        capability = %node.capability,
                        module = %node.module_path.display(),
                        "dropping extension with no matching extension point"
                    );
                    return Ok(InstallOutcome::Dropped);
                }
                None => {
                    return Err(GauntletError::UndeducedExtensionPoint {
                        capability: node.capability.to_string(),
                    });
                }
            },
        };

        let point = &mut self.points[index];
        node.path = Some(point.path.clone());
        point.nodes.push(node);
        self.installed.push((index, point.nodes.len() - 1));
        Ok(InstallOutcome::Installed {
            path: point.path.clone(),
        })
    }

    /// First registered point required by `capability` or anything it implements or extends.
    fn deduce_point(&self, capability: &TypeName) -> Option<usize> {
        self.types
            .ancestry(capability)
            .iter()
            .find_map(|ty| self.points.iter().position(|p| &p.required_capability == ty))
    }

    pub fn point(&self, path: &str) -> Option<&ExtensionPoint> {
        self.by_path.get(path).map(|&index| &self.points[index])
    }

    /// The first point whose required capability is exactly `capability`.
    pub fn point_for_capability(&self, capability: &TypeName) -> Option<&ExtensionPoint> {
        self.points
            .iter()
            .find(|p| &p.required_capability == capability)
    }

    /// All points in registration order.
    pub fn points(&self) -> &[ExtensionPoint] {
        &self.points
    }

    /// All nodes installed at `path`, enabled or not. Unknown paths have none.
    pub fn nodes(&self, path: &str) -> &[ExtensionNode] {
        self.point(path).map(ExtensionPoint::nodes).unwrap_or(&[])
    }

    /// Every installed node across all points, in installation order.
    pub fn extensions(&self) -> impl Iterator<Item = &ExtensionNode> {
        self.installed
            .iter()
            .map(|&(point, node)| &self.points[point].nodes[node])
    }

    /// Nodes of the point requiring `capability`.
    pub fn nodes_for_capability(
        &self,
        capability: &TypeName,
        include_disabled: bool,
    ) -> Vec<&ExtensionNode> {
        self.point_for_capability(capability)
            .map(|point| {
                point
                    .nodes
                    .iter()
                    .filter(|node| include_disabled || node.enabled)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Enabled nodes providing capability `C`.
    pub fn nodes_for<C: Capability>(&self) -> Vec<&ExtensionNode> {
        self.nodes_for_capability(&C::type_name(), false)
    }

    /// Enable or disable every node whose capability type is `capability`.
    ///
    /// Returns how many nodes were updated.
    pub fn set_enabled(&mut self, capability: &str, enabled: bool) -> Result<usize, GauntletError> {
        let mut updated = 0;
        for point in &mut self.points {
            for node in point.nodes.iter_mut().filter(|n| n.capability.as_str() == capability) {
                node.enabled = enabled;
                updated += 1;
            }
        }
        if updated == 0 {
            return Err(GauntletError::ExtensionNotFound {
                capability: capability.to_string(),
            });
        }
        Ok(updated)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TypeRelations;

    fn node(capability: &str) -> ExtensionNode {
        ExtensionNode::new("plugins/acme.wasm", Version::new(1, 0, 0), capability)
    }

    fn registry_with_writers() -> ExtensionRegistry {
        let mut registry = ExtensionRegistry::new();
        registry
            .register_point(ExtensionPoint::new("/Host/Writers", "IWriter", None))
            .unwrap();
        registry
    }

    #[test]
    fn duplicate_path_is_rejected() {
        let mut registry = registry_with_writers();
        let err = registry
            .register_point(ExtensionPoint::new("/Host/Writers", "Other", None))
            .unwrap_err();
        assert!(matches!(err, GauntletError::DuplicateExtensionPoint { .. }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn explicit_path_installs_there() {
        let mut registry = registry_with_writers();
        let mut n = node("acme::Anything");
        n.declared_path = Some("/Host/Writers".into());
        let outcome = registry.install(n).unwrap();
        assert_eq!(outcome, InstallOutcome::Installed { path: "/Host/Writers".into() });
        assert_eq!(registry.nodes("/Host/Writers")[0].path.as_deref(), Some("/Host/Writers"));
    }

    #[test]
    fn unknown_explicit_path_fails_regardless_of_provenance() {
        let mut registry = registry_with_writers();
        let mut n = node("acme::Writer");
        n.declared_path = Some("/Host/Missing".into());
        n.from_wildcard = true;
        let err = registry.install(n).unwrap_err();
        assert!(matches!(err, GauntletError::UnknownExtensionPoint { .. }));
    }

    #[test]
    fn point_is_deduced_through_implemented_interface() {
        let mut registry = registry_with_writers();
        registry.types_mut().declare(
            "ReportWriter".into(),
            TypeRelations {
                implements: vec!["IWriter".into()],
                extends: None,
            },
        );
        let outcome = registry.install(node("ReportWriter")).unwrap();
        assert_eq!(outcome, InstallOutcome::Installed { path: "/Host/Writers".into() });
    }

    #[test]
    fn point_is_deduced_through_base_type() {
        let mut registry = registry_with_writers();
        registry.types_mut().declare(
            "HtmlWriter".into(),
            TypeRelations {
                implements: vec![],
                extends: Some("BaseWriter".into()),
            },
        );
        registry.types_mut().declare(
            "BaseWriter".into(),
            TypeRelations {
                implements: vec!["IWriter".into()],
                extends: None,
            },
        );
        registry.install(node("HtmlWriter")).unwrap();
        assert_eq!(registry.nodes("/Host/Writers").len(), 1);
    }

    #[test]
    fn own_type_is_checked_first() {
        let mut registry = registry_with_writers();
        registry
            .register_point(ExtensionPoint::new("/Host/Special", "SpecialWriter", None))
            .unwrap();
        registry.types_mut().declare(
            "SpecialWriter".into(),
            TypeRelations {
                implements: vec!["IWriter".into()],
                extends: None,
            },
        );
        let outcome = registry.install(node("SpecialWriter")).unwrap();
        assert_eq!(outcome, InstallOutcome::Installed { path: "/Host/Special".into() });
    }

    #[test]
    fn undeducible_node_depends_on_provenance() {
        let mut registry = registry_with_writers();

        let err = registry.install(node("acme::Unrelated")).unwrap_err();
        assert!(matches!(err, GauntletError::UndeducedExtensionPoint { .. }));

        let mut wild = node("acme::Unrelated");
        wild.from_wildcard = true;
        assert_eq!(registry.install(wild).unwrap(), InstallOutcome::Dropped);
        assert_eq!(registry.extensions().count(), 0);
    }

    #[test]
    fn capability_lookup_hides_disabled_nodes() {
        let mut registry = registry_with_writers();
        registry.install(node("IWriter")).unwrap();
        let mut b = node("acme::QuietWriter");
        b.declared_path = Some("/Host/Writers".into());
        b.enabled = false;
        registry.install(b).unwrap();

        let writer = TypeName::from("IWriter");
        assert_eq!(registry.nodes_for_capability(&writer, false).len(), 1);
        assert_eq!(registry.nodes_for_capability(&writer, true).len(), 2);
        assert_eq!(registry.nodes("/Host/Writers").len(), 2);
        assert!(registry.nodes_for_capability(&"Nope".into(), true).is_empty());
    }

    #[test]
    fn set_enabled_toggles_by_type_name() {
        let mut registry = registry_with_writers();
        let mut n = node("acme::XmlWriter");
        n.declared_path = Some("/Host/Writers".into());
        registry.install(n).unwrap();

        assert_eq!(registry.set_enabled("acme::XmlWriter", false).unwrap(), 1);
        assert!(!registry.nodes("/Host/Writers")[0].enabled);
        assert_eq!(registry.nodes_for_capability(&"IWriter".into(), false).len(), 0);

        registry.set_enabled("acme::XmlWriter", true).unwrap();
        assert!(registry.nodes("/Host/Writers")[0].enabled);
    }

    #[test]
    fn set_enabled_unknown_type_is_an_error() {
        let mut registry = registry_with_writers();
        assert!(matches!(
            registry.set_enabled("nope", true),
            Err(GauntletError::ExtensionNotFound { .. })
        ));
    }

    #[test]
    fn extensions_are_listed_in_installation_order() {
        let mut registry = registry_with_writers();
        registry
            .register_point(ExtensionPoint::new("/Host/Listeners", "IListener", None))
            .unwrap();
        for (capability, path) in [
            ("w1", "/Host/Writers"),
            ("l1", "/Host/Listeners"),
            ("w2", "/Host/Writers"),
        ] {
            let mut n = node(capability);
            n.declared_path = Some(path.into());
            registry.install(n).unwrap();
        }
        let order: Vec<&str> = registry.extensions().map(|n| n.capability.as_str()).collect();
        assert_eq!(order, vec!["w1", "l1", "w2"]);
    }

    #[test]
    fn properties_are_a_multimap() {
        let mut n = node("x");
        n.add_property("Format", "xml");
        n.add_property("Format", "junit");
        n.add_property("Other", "1");
        assert_eq!(n.property("Format"), vec!["xml", "junit"]);
        assert!(n.property("Missing").is_empty());
    }
}
