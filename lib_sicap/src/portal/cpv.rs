//! # CPV Lookup Table
//!
//! Common Procurement Vocabulary codes (`45000000-7`) mapped to their
//! descriptions. The crate bundles the top-level divisions; a fuller table can
//! be supplied as a JSON file of the same `{ "code": "description" }` shape.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SicapError};

/// The table shipped with the crate.
pub const BUNDLED_CPV_JSON: &str = include_str!("../../data/cpv_codes.json");

/// Immutable `code -> description` mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpvTable {
    entries: BTreeMap<String, String>,
}

impl CpvTable {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let entries: BTreeMap<String, String> =
            serde_json::from_str(raw).map_err(|e| SicapError::CpvTable(e.to_string()))?;
        Ok(Self { entries })
    }

    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED_CPV_JSON)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Looks a code up, with or without its check digit (`45000000` finds `45000000-7`).
    pub fn get(&self, code: &str) -> Option<&str> {
        let code = code.trim();
        if let Some(desc) = self.entries.get(code) {
            return Some(desc.as_str());
        }
        if code.contains('-') {
            return None;
        }
        let prefix = format!("{code}-");
        self.entries
            .range(prefix.clone()..)
            .next()
            .filter(|(k, _)| k.starts_with(&prefix))
            .map(|(_, v)| v.as_str())
    }

    /// Entries whose description contains `needle`, ignoring case.
    pub fn search<'a>(&'a self, needle: &str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let needle = needle.to_lowercase();
        self.iter()
            .filter(move |(_, desc)| desc.to_lowercase().contains(&needle))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where a client loads its table from on first use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CpvSource {
    #[default]
    Bundled,
    File(PathBuf),
}

impl CpvSource {
    pub fn load(&self) -> Result<CpvTable> {
        match self {
            CpvSource::Bundled => CpvTable::bundled(),
            CpvSource::File(path) => CpvTable::from_path(path),
        }
    }
}
