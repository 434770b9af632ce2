// SPDX-FileCopyrightText: 2026 Gauntlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lenient version parsing.
//!
//! Module metadata often carries short versions such as `1.2`; those are
//! padded with zeros so every version compares as a full semver triple.

use semver::Version;

use crate::error::GauntletError;

/// Parse `value` as a semantic version, accepting `"1"` and `"1.2"` shorthands.
pub fn parse_version(value: &str) -> Result<Version, GauntletError> {
    let trimmed = value.trim();
    if let Ok(version) = Version::parse(trimmed) {
        return Ok(version);
    }

    let invalid = || GauntletError::InvalidVersion {
        value: value.to_string(),
    };

    let parts: Vec<&str> = trimmed.split('.').collect();
    if parts.len() > 3 {
        return Err(invalid());
    }

    let mut numbers = [0u64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        *slot = part.parse().map_err(|_| invalid())?;
    }

    Ok(Version::new(numbers[0], numbers[1], numbers[2]))
}
