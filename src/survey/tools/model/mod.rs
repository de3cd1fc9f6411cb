use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of a surveyed class. Unique within a merged survey.
pub type ClassName = String;

/// Class name → record mapping. Iteration order is alphabetical.
pub type RecordMap<T> = BTreeMap<ClassName, T>;

/// Keys written by the relationship deriver. Stale copies found in a
/// fragment are dropped so the derived values are not duplicated.
pub const DERIVED_KEYS: [&str; 3] = ["createdBy", "fanOut", "fanIn"];

/// A single class entry as authored in a survey fragment.
///
/// The relationship fields used by the merge are typed; everything else the
/// survey author wrote is kept in [`ClassRecord::extra`] and written back
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRecord {
    /// Classes this one instantiates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creates: Option<Vec<ClassName>>,
    /// Classes this one uses without creating them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<ClassName>>,
    /// Manually curated cross references, expected to be symmetric.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub see_also: Option<Vec<SeeAlsoEntry>>,
    /// Unrecognised fields, passed through verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClassRecord {
    pub fn creates(&self) -> &[ClassName] {
        self.creates.as_deref().unwrap_or_default()
    }

    pub fn references(&self) -> &[ClassName] {
        self.references.as_deref().unwrap_or_default()
    }

    pub fn see_also(&self) -> &[SeeAlsoEntry] {
        self.see_also.as_deref().unwrap_or_default()
    }

    /// Returns true when one of the `seeAlso` entries points at `target`.
    pub fn lists_see_also(&self, target: &str) -> bool {
        self.see_also().iter().any(|entry| entry.class == target)
    }
}

/// A `seeAlso` entry: the associated class plus free-form annotation fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeeAlsoEntry {
    #[serde(default)]
    pub class: ClassName,
    #[serde(flatten)]
    pub annotation: Map<String, Value>,
}

impl SeeAlsoEntry {
    pub fn new(class: impl Into<ClassName>) -> Self {
        Self {
            class: class.into(),
            annotation: Map::new(),
        }
    }
}

/// A class record enriched with the fields derived during the merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedRecord {
    #[serde(flatten)]
    pub record: ClassRecord,
    /// Classes listing this one in their `creates`, sorted and unique.
    pub created_by: Vec<ClassName>,
    /// Normalised outgoing connectivity in `[0, 1]`.
    pub fan_out: f64,
    /// Normalised incoming connectivity in `[0, 1]`.
    pub fan_in: f64,
}

impl DerivedRecord {
    /// Wraps `record`, discarding any stale derived keys from its extra bag.
    pub fn new(mut record: ClassRecord, created_by: Vec<ClassName>, fan_out: f64, fan_in: f64) -> Self {
        for key in DERIVED_KEYS {
            record.extra.remove(key);
        }
        Self {
            record,
            created_by,
            fan_out,
            fan_in,
        }
    }
}
