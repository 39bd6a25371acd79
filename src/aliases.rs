//! # Alias Table Module
//!
//! ## Purpose
//! Loads the law alias source data and builds the case-folded alias index
//! used for law-name resolution.
//!
//! ## Input/Output Specification
//! - **Input**: JSON object mapping law-id strings (parseable as integers)
//!   to ordered lists of alias strings
//! - **Output**: Read-only `AliasIndex` (folded alias -> law id)
//! - **Failure**: Malformed source data is a fatal startup error
//!
//! The index is built once at startup and never mutated afterwards. A
//! repeated folded alias silently keeps the most recently inserted mapping
//! for exact lookup; the insertion-ordered entry list retains every alias so
//! fuzzy scoring sees a fixed, reproducible iteration order (ascending law
//! id, aliases in listed order).

use crate::errors::{DetectError, Result};
use crate::LawId;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Case-fold a string for alias comparison
pub fn fold(s: &str) -> String {
    s.to_lowercase()
}

/// Law id -> ordered alias list, as loaded from the source file
#[derive(Debug, Clone)]
pub struct AliasTable {
    laws: BTreeMap<LawId, Vec<String>>,
}

impl AliasTable {
    /// Load the alias table from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| DetectError::AliasData {
            source_path: path.display().to_string(),
            details: format!("failed to read file: {}", e),
        })?;

        Self::from_json(&content).map_err(|e| match e {
            DetectError::AliasData { details, .. } => DetectError::AliasData {
                source_path: path.display().to_string(),
                details,
            },
            other => other,
        })
    }

    /// Parse the alias table from a JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: HashMap<String, Vec<String>> =
            serde_json::from_str(content).map_err(|e| DetectError::AliasData {
                source_path: "<inline>".to_string(),
                details: format!("expected an object of law-id -> alias list: {}", e),
            })?;

        let mut laws = BTreeMap::new();
        for (key, value) in raw {
            let law_id: LawId = key.parse().map_err(|_| DetectError::AliasData {
                source_path: "<inline>".to_string(),
                details: format!("law id '{}' is not an integer", key),
            })?;
            laws.insert(law_id, value);
        }

        Ok(Self { laws })
    }

    /// Number of laws in the table
    pub fn law_count(&self) -> usize {
        self.laws.len()
    }

    /// Total number of aliases across all laws
    pub fn alias_count(&self) -> usize {
        self.laws.values().map(|v| v.len()).sum()
    }

    /// Iterate laws in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (LawId, &[String])> {
        self.laws.iter().map(|(id, aliases)| (*id, aliases.as_slice()))
    }
}

/// Case-folded alias -> law id lookup, built once at startup
#[derive(Debug, Clone)]
pub struct AliasIndex {
    /// Folded alias -> law id; duplicate aliases keep the last insertion
    exact: HashMap<String, LawId>,
    /// Every inserted (folded alias, law id) pair in insertion order
    entries: Vec<(String, LawId)>,
}

impl AliasIndex {
    /// Build the index from an alias table. Laws are visited in ascending id
    /// order, aliases in their listed order within each law.
    pub fn from_table(table: &AliasTable) -> Self {
        let mut exact = HashMap::new();
        let mut entries = Vec::with_capacity(table.alias_count());

        for (law_id, aliases) in table.iter() {
            for alias in aliases {
                let folded = fold(alias);
                exact.insert(folded.clone(), law_id);
                entries.push((folded, law_id));
            }
        }

        Self { exact, entries }
    }

    /// Exact lookup of an already-folded phrase
    pub fn get(&self, folded: &str) -> Option<LawId> {
        self.exact.get(folded).copied()
    }

    /// Iterate all inserted entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, LawId)> {
        self.entries.iter().map(|(alias, id)| (alias.as_str(), *id))
    }

    /// Number of distinct folded aliases
    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}
