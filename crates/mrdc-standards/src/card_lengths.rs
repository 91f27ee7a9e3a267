#![deny(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::StandardsError;

const STANDARDS_ENV_VAR: &str = "MRDC_STANDARDS_DIR";
const CARD_LENGTHS_FILE: &str = "card_lengths.toml";

/// On-disk shape of `card_lengths.toml`: digit counts (as bare keys) mapped
/// to the providers issuing numbers of that length.
#[derive(Debug, Deserialize)]
struct CardLengthsFile {
    lengths: BTreeMap<String, Vec<String>>,
}

/// Provider-to-mandated-digit-count lookup, inverted from the length table
/// at load time. Immutable once built; share it freely across cleaners.
#[derive(Debug, Clone)]
pub struct CardLengthRegistry {
    by_provider: BTreeMap<String, u32>,
    lengths: BTreeSet<u32>,
}

impl CardLengthRegistry {
    /// Parse and validate a length table. Fails fast on a non-numeric or
    /// zero length key, a blank provider, or a provider listed under two
    /// different lengths.
    pub fn load(path: &Path) -> Result<Self, StandardsError> {
        let raw = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
        let file: CardLengthsFile = toml::from_str(&raw).map_err(|source| StandardsError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_table(&file.lengths, path)
    }

    fn from_table(
        table: &BTreeMap<String, Vec<String>>,
        path: &Path,
    ) -> Result<Self, StandardsError> {
        if table.is_empty() {
            return Err(StandardsError::EmptyTable {
                path: path.to_path_buf(),
            });
        }
        let mut by_provider = BTreeMap::new();
        let mut lengths = BTreeSet::new();
        for (key, providers) in table {
            let length: u32 = key
                .trim()
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| StandardsError::InvalidLength {
                    path: path.to_path_buf(),
                    key: key.clone(),
                })?;
            lengths.insert(length);
            for provider in providers {
                let name = provider.trim();
                if name.is_empty() {
                    return Err(StandardsError::BlankProvider {
                        path: path.to_path_buf(),
                        length,
                    });
                }
                let lookup_key = name.to_uppercase();
                if let Some(existing) = by_provider.insert(lookup_key, length)
                    && existing != length
                {
                    return Err(StandardsError::DuplicateProvider {
                        provider: name.to_string(),
                        first: existing,
                        second: length,
                    });
                }
            }
        }
        Ok(Self {
            by_provider,
            lengths,
        })
    }

    /// Digit count mandated for a provider, case-insensitively. `None` for
    /// providers absent from the table; callers treat those as invalid.
    pub fn required_length(&self, provider: &str) -> Option<u32> {
        self.by_provider.get(&provider.trim().to_uppercase()).copied()
    }

    /// True when the identifier's digit count equals the provider's mandated
    /// length. Unknown providers never validate.
    pub fn is_valid(&self, provider: &str, digit_count: u32) -> bool {
        self.required_length(provider) == Some(digit_count)
    }

    /// The digit counts the table declares, ascending.
    pub fn known_lengths(&self) -> impl Iterator<Item = u32> + '_ {
        self.lengths.iter().copied()
    }

    /// Provider names with their mandated lengths, sorted by name.
    pub fn providers(&self) -> impl Iterator<Item = (&str, u32)> {
        self.by_provider.iter().map(|(name, len)| (name.as_str(), *len))
    }

    pub fn len(&self) -> usize {
        self.by_provider.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_provider.is_empty()
    }
}

/// Root directory holding the static reference files. `MRDC_STANDARDS_DIR`
/// overrides the checked-in default.
pub fn default_standards_root() -> PathBuf {
    if let Ok(root) = std::env::var(STANDARDS_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards")
}

pub fn load_default_card_lengths() -> Result<CardLengthRegistry, StandardsError> {
    CardLengthRegistry::load(&default_standards_root().join(CARD_LENGTHS_FILE))
}
