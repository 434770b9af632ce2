// SPDX-FileCopyrightText: 2026 Gauntlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for on-disk plugin fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use gauntlet_core::{RuntimeDescriptor, RuntimeFamily, TypeName};
use gauntlet_extension::metadata::{
    ExtensionAttribute, ExtensionPointAttribute, ExtensionProperty, ModuleMetadata,
    TypeMetadata, TypedExtensionPointAttribute,
};
use gauntlet_extension::METADATA_SECTION;

/// Builds module metadata and writes it as a minimal WebAssembly binary.
#[derive(Debug, Clone)]
pub struct ModuleBuilder {
    metadata: ModuleMetadata,
}

impl ModuleBuilder {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            metadata: ModuleMetadata {
                name: name.to_string(),
                version: version.to_string(),
                target_runtime: None,
                extension_points: Vec::new(),
                types: Vec::new(),
            },
        }
    }

    pub fn runtime(mut self, family: RuntimeFamily) -> Self {
        self.metadata.target_runtime = Some(RuntimeDescriptor::new(family));
        self
    }

    /// Module-level extension point.
    pub fn extension_point(mut self, path: &str, capability: &str) -> Self {
        self.metadata.extension_points.push(ExtensionPointAttribute {
            path: path.to_string(),
            capability: capability.into(),
            description: None,
        });
        self
    }

    /// A type that is itself an extension point at its default path.
    pub fn typed_extension_point(mut self, name: &str) -> Self {
        self.metadata.types.push(TypeMetadata {
            extension_point: Some(TypedExtensionPointAttribute::default()),
            ..plain_type(name)
        });
        self
    }

    /// An extension type implementing `implements`, with no explicit path.
    pub fn extension(self, name: &str, implements: &[&str]) -> Self {
        self.extension_with(name, implements, ExtensionAttribute::default())
    }

    /// An extension bound to an explicit point path.
    pub fn extension_at(self, name: &str, path: &str) -> Self {
        self.extension_with(
            name,
            &[],
            ExtensionAttribute {
                path: Some(path.to_string()),
                ..ExtensionAttribute::default()
            },
        )
    }

    pub fn extension_with(mut self, name: &str, implements: &[&str], attribute: ExtensionAttribute) -> Self {
        self.metadata.types.push(TypeMetadata {
            implements: implements.iter().map(|s| TypeName::from(*s)).collect(),
            extension: Some(attribute),
            ..plain_type(name)
        });
        self
    }

    /// A non-extension type, e.g. a base class.
    pub fn base_type(mut self, name: &str, implements: &[&str], extends: Option<&str>) -> Self {
        self.metadata.types.push(TypeMetadata {
            implements: implements.iter().map(|s| TypeName::from(*s)).collect(),
            extends: extends.map(TypeName::from),
            ..plain_type(name)
        });
        self
    }

    /// Set the base type of the most recently added type.
    pub fn extends(mut self, base: &str) -> Self {
        if let Some(last) = self.metadata.types.last_mut() {
            last.extends = Some(base.into());
        }
        self
    }

    /// Add a property to the most recently added extension.
    pub fn property(mut self, name: &str, value: &str) -> Self {
        if let Some(extension) = self
            .metadata
            .types
            .last_mut()
            .and_then(|ty| ty.extension.as_mut())
        {
            extension.properties.push(ExtensionProperty {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
        self
    }

    pub fn metadata(&self) -> ModuleMetadata {
        self.metadata.clone()
    }

    /// Encode a WebAssembly module whose only section is the metadata custom section.
    ///
    /// # Panics
    ///
    /// If the metadata cannot be serialized.
    pub fn to_wasm(&self) -> Vec<u8> {
        let payload = serde_json::to_vec(&self.metadata).expect("metadata serializes");

        let mut body = Vec::new();
        write_leb(METADATA_SECTION.len(), &mut body);
        body.extend_from_slice(METADATA_SECTION.as_bytes());
        body.extend_from_slice(&payload);

        let mut bytes = b"\0asm".to_vec();
        bytes.extend_from_slice(&[1, 0, 0, 0]);
        bytes.push(0);
        write_leb(body.len(), &mut bytes);
        bytes.extend(body);
        bytes
    }

    /// Write the module to `path`, creating parent directories.
    pub fn write(&self, path: &Path) -> std::io::Result<PathBuf> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_wasm())?;
        Ok(path.to_path_buf())
    }
}

fn plain_type(name: &str) -> TypeMetadata {
    TypeMetadata {
        name: name.into(),
        implements: Vec::new(),
        extends: None,
        extension_point: None,
        extension: None,
    }
}

fn write_leb(mut value: usize, out: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Write a manifest at `path` from `lines`, creating parent directories.
pub fn write_manifest(path: &Path, lines: &[&str]) -> std::io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(path, content)?;
    Ok(path.to_path_buf())
}
