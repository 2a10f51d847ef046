//! Derivation of file and package keys for decoded units.

use bytemetrics_core::config::DecodeConfig;
use bytemetrics_core::constants::DEFAULT_PACKAGE_KEY;

use crate::classfile::DecodedUnit;

/// Where a unit sits in the ownership tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitLocation {
    pub file: String,
    pub package: String,
}

/// Maps a decoded unit to its file and package keys.
///
/// Hosts with better source metadata can supply their own layout.
pub trait KeyLayout: Send + Sync {
    fn locate(&self, unit: &DecodedUnit) -> UnitLocation;
}

/// Layout derived from the class file alone: the package is the internal
/// name up to the last `/`, the file is the package plus the `SourceFile`
/// attribute.
#[derive(Debug, Clone)]
pub struct BytecodeLayout {
    fallback_extension: String,
}

impl BytecodeLayout {
    pub fn new(config: &DecodeConfig) -> Self {
        Self {
            fallback_extension: config.effective_fallback_source_extension().to_string(),
        }
    }
}

impl Default for BytecodeLayout {
    fn default() -> Self {
        Self::new(&DecodeConfig::default())
    }
}

impl KeyLayout for BytecodeLayout {
    fn locate(&self, unit: &DecodedUnit) -> UnitLocation {
        // Without SourceFile, nested units still share the outer unit's file.
        let file_name = match &unit.source_file {
            Some(name) => name.clone(),
            None => format!("{}.{}", unit.outer_simple_name(), self.fallback_extension),
        };
        match unit.package_name() {
            Some(package) => UnitLocation {
                file: format!("{package}/{file_name}"),
                package: package.to_string(),
            },
            None => UnitLocation {
                file: file_name,
                package: DEFAULT_PACKAGE_KEY.to_string(),
            },
        }
    }
}
