use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::survey::tools::cluster::Cluster;
use crate::survey::tools::derive::Normalization;
use crate::survey::tools::error::Result;
use crate::survey::tools::model::{DerivedRecord, RecordMap};

/// Metadata block at the top of the consolidated survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub generated_at: String,
    pub class_count: usize,
    pub groups: Vec<String>,
    pub normalization: Normalization,
}

/// The consolidated survey written at the end of a merge run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyDocument {
    pub meta: Meta,
    pub classes: RecordMap<DerivedRecord>,
    pub clusters: BTreeMap<String, Cluster>,
}

/// Serialises the document as pretty JSON and writes it to `path`.
#[instrument(level = "debug", skip(document), fields(output = %path.display()))]
pub fn write_document(path: &Path, document: &SurveyDocument) -> Result<()> {
    let json = serde_json::to_string_pretty(document)?;
    fs::write(path, json)?;
    debug!(class_count = document.meta.class_count, "survey document written");
    Ok(())
}
