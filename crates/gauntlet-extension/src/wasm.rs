// SPDX-FileCopyrightText: 2026 Gauntlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebAssembly metadata adapter.
//!
//! Plugin modules are WebAssembly binaries. Their metadata lives in a custom
//! section named [`METADATA_SECTION`]. Only the section framing is walked:
//! nothing is compiled, validated beyond the header, or instantiated, so
//! modules built for any runtime can be inspected.

use std::fs;
use std::path::Path;

use gauntlet_core::GauntletError;

use crate::metadata::{parse_metadata_payload, ModuleMetadata, ModuleMetadataProvider};

/// Name of the custom section holding the JSON metadata payload.
pub const METADATA_SECTION: &str = "gauntlet.metadata";

const WASM_MAGIC: &[u8; 4] = b"\0asm";
const WASM_VERSION: &[u8; 4] = &[1, 0, 0, 0];
const CUSTOM_SECTION_ID: u8 = 0;

/// Reads metadata from the custom section of a WebAssembly module.
#[derive(Debug, Clone, Copy, Default)]
pub struct WasmMetadataProvider;

impl ModuleMetadataProvider for WasmMetadataProvider {
    fn read(&self, path: &Path) -> Result<ModuleMetadata, GauntletError> {
        let module_error = |message: String| GauntletError::ModuleRead {
            path: path.to_path_buf(),
            message,
        };

        let bytes = fs::read(path).map_err(|e| module_error(e.to_string()))?;
        let payload = find_custom_section(&bytes, METADATA_SECTION)
            .map_err(module_error)?
            .ok_or_else(|| module_error(format!("no `{METADATA_SECTION}` custom section")))?;
        parse_metadata_payload(path, payload)
    }
}

/// Return the payload of the first custom section called `name`.
pub fn find_custom_section<'a>(bytes: &'a [u8], name: &str) -> Result<Option<&'a [u8]>, String> {
    let mut reader = Reader::new(bytes);
    if reader.take(4)? != WASM_MAGIC {
        return Err("not a WebAssembly module".to_string());
    }
    if reader.take(4)? != WASM_VERSION {
        return Err("unsupported WebAssembly version".to_string());
    }

    while !reader.is_empty() {
        let id = reader.byte()?;
        let size = reader.leb_u32()? as usize;
        let body = reader.take(size)?;
        if id != CUSTOM_SECTION_ID {
            continue;
        }
        let mut section = Reader::new(body);
        let name_len = section.leb_u32()? as usize;
        let section_name = section.take(name_len)?;
        if section_name == name.as_bytes() {
            return Ok(Some(section.rest()));
        }
    }
    Ok(None)
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn byte(&mut self) -> Result<u8, String> {
        let byte = *self
            .bytes
            .get(self.pos)
            .ok_or_else(|| "unexpected end of module".to_string())?;
        self.pos += 1;
        Ok(byte)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], String> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| "section extends past end of module".to_string())?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn rest(&mut self) -> &'a [u8] {
        let slice = &self.bytes[self.pos..];
        self.pos = self.bytes.len();
        slice
    }

    /// Unsigned LEB128, at most five bytes.
    fn leb_u32(&mut self) -> Result<u32, String> {
        let mut result = 0u32;
        let mut shift = 0u32;
        loop {
            let byte = self.byte()?;
            result |= u32::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
            if shift >= 35 {
                return Err("malformed LEB128 integer".to_string());
            }
        }
    }
}
