// SPDX-FileCopyrightText: 2026 Gauntlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static type relationships used to deduce extension points.

use std::collections::{HashMap, HashSet, VecDeque};

use gauntlet_core::TypeName;

use crate::metadata::ModuleMetadata;

/// What a type implements and extends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeRelations {
    pub implements: Vec<TypeName>,
    pub extends: Option<TypeName>,
}

/// Declared relationships of every known type.
///
/// Types that were never declared are leaves: they match only themselves.
#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
    relations: HashMap<TypeName, TypeRelations>,
}

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the relations of `name`. The first declaration of a type wins.
    pub fn declare(&mut self, name: TypeName, relations: TypeRelations) {
        self.relations.entry(name).or_insert(relations);
    }

    /// Record every type declared by a module.
    pub fn merge_module(&mut self, metadata: &ModuleMetadata) {
        for ty in &metadata.types {
            self.declare(
                ty.name.clone(),
                TypeRelations {
                    implements: ty.implements.clone(),
                    extends: ty.extends.clone(),
                },
            );
        }
    }

    pub fn relations(&self, name: &TypeName) -> Option<&TypeRelations> {
        self.relations.get(name)
    }

    /// `start` followed by everything it implements or extends, breadth first.
    ///
    /// Each level lists implemented types in declaration order before the base
    /// type. Every type appears once, so cyclic declarations terminate.
    pub fn ancestry(&self, start: &TypeName) -> Vec<TypeName> {
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([start.clone()]);

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(relations) = self.relations.get(&current) {
                queue.extend(relations.implements.iter().cloned());
                queue.extend(relations.extends.iter().cloned());
            }
            order.push(current);
        }
        order
    }
}
