use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::CaseError;
use crate::types::CaseEntry;

/// CaseLibrary maps category labels to reference entries.
///
/// Categories keep insertion order; entries within a category keep
/// addition order. A category exists exactly while it has at least one
/// entry. Mutations are in-memory only; callers persist with [save].
///
/// [save]: CaseLibrary::save
#[derive(Debug, Clone, Default)]
pub struct CaseLibrary {
    categories: Vec<Category>,
}

#[derive(Debug, Clone)]
struct Category {
    label: String,
    entries: Vec<CaseEntry>,
}

impl CaseLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to the named category, creating the category if
    /// absent. Near-duplicate entries are allowed on purpose: multiple
    /// samples per label model intra-class variance. Returns the entry
    /// count for the label after the append.
    pub fn add_case(&mut self, label: &str, entry: CaseEntry) -> usize {
        match self.position(label) {
            Some(i) => {
                self.categories[i].entries.push(entry);
                self.categories[i].entries.len()
            }
            None => {
                self.categories.push(Category {
                    label: label.to_string(),
                    entries: vec![entry],
                });
                1
            }
        }
    }

    /// Remove one entry (by index) or the whole category (index None).
    /// A category emptied by removal is dropped.
    pub fn remove_case(&mut self, label: &str, index: Option<usize>) -> Result<(), CaseError> {
        let i = self
            .position(label)
            .ok_or_else(|| CaseError::NotFound(label.to_string()))?;

        match index {
            None => {
                self.categories.remove(i);
            }
            Some(idx) => {
                let len = self.categories[i].entries.len();
                if idx >= len {
                    return Err(CaseError::IndexOutOfRange { index: idx, len });
                }
                self.categories[i].entries.remove(idx);
                if self.categories[i].entries.is_empty() {
                    self.categories.remove(i);
                }
            }
        }
        Ok(())
    }

    /// Category labels in insertion order.
    pub fn list_categories(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.label.as_str()).collect()
    }

    /// Entry at the given index, or the first entry when index is None.
    pub fn get_entry(&self, label: &str, index: Option<usize>) -> Option<&CaseEntry> {
        let i = self.position(label)?;
        self.categories[i].entries.get(index.unwrap_or(0))
    }

    /// Number of entries for a label, zero if the label is absent.
    pub fn count(&self, label: &str) -> usize {
        self.position(label)
            .map_or(0, |i| self.categories[i].entries.len())
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total entry count across all categories.
    pub fn total_entries(&self) -> usize {
        self.categories.iter().map(|c| c.entries.len()).sum()
    }

    /// Iterate categories as (label, entries) in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CaseEntry])> {
        self.categories
            .iter()
            .map(|c| (c.label.as_str(), c.entries.as_slice()))
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.label == label)
    }

    /// Load a library document from disk.
    ///
    /// Accepts both document shapes: the current list-per-label form and
    /// the legacy single-object-per-label form, normalized here into the
    /// multi-entry representation. Entries without a vector are skipped
    /// with a warning. A missing file is `CaseError::NotFound`; a
    /// malformed document is fatal for the call.
    pub fn load(path: &Path) -> Result<Self, CaseError> {
        if !path.exists() {
            return Err(CaseError::NotFound(path.display().to_string()));
        }
        let text = fs::read_to_string(path)
            .map_err(|e| CaseError::Io(format!("{}: {e}", path.display())))?;

        let doc: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&text).map_err(|e| CaseError::InvalidFormat(e.to_string()))?;

        let mut lib = Self::new();
        for (label, value) in doc {
            let stored: StoredCategory = serde_json::from_value(value)
                .map_err(|e| CaseError::InvalidFormat(format!("category {label:?}: {e}")))?;
            let entries = match stored {
                StoredCategory::Many(v) => v,
                StoredCategory::Single(e) => vec![e],
            };
            for stored_entry in entries {
                match stored_entry.embedding {
                    Some(vector) if !vector.is_empty() => {
                        lib.add_case(
                            &label,
                            CaseEntry {
                                source: stored_entry.source,
                                vector,
                                description: stored_entry.description,
                            },
                        );
                    }
                    _ => {
                        tracing::warn!(label = %label, source = %stored_entry.source,
                            "case entry has no vector, skipped");
                    }
                }
            }
        }
        Ok(lib)
    }

    /// Like [load], but a missing file yields an empty library.
    ///
    /// [load]: CaseLibrary::load
    pub fn load_or_default(path: &Path) -> Result<Self, CaseError> {
        match Self::load(path) {
            Ok(lib) => Ok(lib),
            Err(CaseError::NotFound(_)) => Ok(Self::new()),
            Err(e) => Err(e),
        }
    }

    /// Persist the whole library as one JSON document.
    ///
    /// The document is written to a temp file next to the target and
    /// renamed into place, so a crash mid-write never leaves a partial
    /// library. Labels are stored sorted; load keeps document order.
    pub fn save(&self, path: &Path) -> Result<(), CaseError> {
        let doc: BTreeMap<&str, &Vec<CaseEntry>> = self
            .categories
            .iter()
            .map(|c| (c.label.as_str(), &c.entries))
            .collect();
        let bytes = serde_json::to_vec_pretty(&doc)
            .map_err(|e| CaseError::InvalidFormat(e.to_string()))?;

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp = PathBuf::from(tmp_name);

        fs::write(&tmp, &bytes).map_err(|e| CaseError::Io(format!("{}: {e}", tmp.display())))?;
        fs::rename(&tmp, path).map_err(|e| CaseError::Io(format!("{}: {e}", path.display())))?;
        Ok(())
    }
}

/// One stored entry as it appears on disk. The vector is optional here
/// so documents with stray vector-less entries degrade to a warning
/// instead of a load failure.
#[derive(Deserialize)]
struct StoredEntry {
    #[serde(rename = "path", default)]
    source: String,

    #[serde(rename = "embedding", default)]
    embedding: Option<Vec<f32>>,

    #[serde(default)]
    description: String,
}

/// A category value is either the current list form or the legacy
/// single-object form.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredCategory {
    Many(Vec<StoredEntry>),
    Single(StoredEntry),
}
