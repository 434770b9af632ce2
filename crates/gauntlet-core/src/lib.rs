// SPDX-FileCopyrightText: 2026 Gauntlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Gauntlet test engine.
//!
//! This crate provides the error type and the common types shared by the
//! extension engine, the configuration layer and the host binary.

pub mod error;
pub mod types;
pub mod version;

// Re-export key items at crate root for ergonomic imports.
pub use error::GauntletError;
pub use types::{Capability, RuntimeDescriptor, RuntimeFamily, TypeName};
pub use version::parse_version;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn runtime_family_display_and_parse() {
        let variants = [
            RuntimeFamily::Neutral,
            RuntimeFamily::Desktop,
            RuntimeFamily::Core,
        ];
        for variant in &variants {
            let s = variant.to_string();
            assert_eq!(s, s.to_lowercase());
            let parsed = RuntimeFamily::from_str(&s).expect("should parse back");
            assert_eq!(*variant, parsed);
        }
        assert_eq!(RuntimeFamily::from_str("CORE").unwrap(), RuntimeFamily::Core);
    }

    #[test]
    fn runtime_descriptor_serialization() {
        let json = r#"{"family":"desktop","version":"4.8"}"#;
        let parsed: RuntimeDescriptor = serde_json::from_str(json).expect("should deserialize");
        assert_eq!(
            parsed,
            RuntimeDescriptor::with_version(RuntimeFamily::Desktop, "4.8")
        );
        assert_eq!(parsed.to_string(), "desktop 4.8");

        let bare: RuntimeDescriptor = serde_json::from_str(r#"{"family":"neutral"}"#).unwrap();
        assert_eq!(bare.version, None);
    }

    #[test]
    fn type_name_short_name() {
        assert_eq!(TypeName::from("gauntlet::ResultWriter").short_name(), "ResultWriter");
        assert_eq!(TypeName::from("Acme.Writers.IWriter").short_name(), "IWriter");
        assert_eq!(TypeName::from("Plain").short_name(), "Plain");
    }

    #[test]
    fn capability_type_name() {
        struct Sample;
        impl Capability for Sample {
            const TYPE_NAME: &'static str = "tests::Sample";
        }
        assert_eq!(Sample::type_name(), TypeName::from("tests::Sample"));
    }

    #[test]
    fn error_messages_name_the_subject() {
        let err = GauntletError::DuplicateExtensionPoint {
            path: "/Gauntlet/Writers".into(),
        };
        assert!(err.to_string().contains("/Gauntlet/Writers"));

        let err = GauntletError::ModuleRead {
            path: "plugins/bad.wasm".into(),
            message: "missing metadata".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("plugins/bad.wasm"));
        assert!(msg.contains("missing metadata"));
    }
}
