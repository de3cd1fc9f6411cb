use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::{debug, info, instrument, warn};

use crate::survey::tools::config::SurveyConfig;
use crate::survey::tools::error::{Result, ToolError};
use crate::survey::tools::model::{ClassName, ClassRecord, RecordMap};

/// Supplies the raw text of survey fragments.
pub trait FragmentSource {
    /// Returns the fragment contents, or `None` when the fragment is absent.
    fn read(&self, file: &str) -> Result<Option<String>>;
}

/// Reads fragments from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FragmentSource for DirectorySource {
    fn read(&self, file: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.root.join(file)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Serves fragments held in memory, keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    fragments: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fragment, replacing any earlier one with the same name.
    pub fn with_fragment(mut self, file: impl Into<String>, text: impl Into<String>) -> Self {
        self.fragments.insert(file.into(), text.into());
        self
    }
}

impl FragmentSource for MemorySource {
    fn read(&self, file: &str) -> Result<Option<String>> {
        Ok(self.fragments.get(file).cloned())
    }
}

/// Non-fatal problems found while merging fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// The fragment could not be found and was skipped.
    MissingFragment { file: String },
    /// A class was defined again by a later fragment, which replaced it.
    DuplicateClass {
        name: ClassName,
        previous: String,
        current: String,
    },
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadWarning::MissingFragment { file } => write!(f, "{file} not found, skipping"),
            LoadWarning::DuplicateClass {
                name,
                previous,
                current,
            } => write!(f, "Duplicate class {name} (in {previous} and {current})"),
        }
    }
}

/// Result of merging every configured fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedSurvey {
    pub records: RecordMap<ClassRecord>,
    /// Class name → group of the fragment that last defined it.
    pub membership: BTreeMap<ClassName, String>,
    pub warnings: Vec<LoadWarning>,
}

/// Loads the configured fragments in order and merges them by class name.
#[instrument(level = "info", skip_all, fields(fragment_count = config.fragments.len()))]
pub fn load_fragments(config: &SurveyConfig, source: &dyn FragmentSource) -> Result<LoadedSurvey> {
    let mut survey = LoadedSurvey::default();

    for spec in &config.fragments {
        let Some(text) = source.read(&spec.file)? else {
            let warning = LoadWarning::MissingFragment {
                file: spec.file.clone(),
            };
            warn!("{warning}");
            survey.warnings.push(warning);
            continue;
        };

        let fragment: RecordMap<ClassRecord> =
            serde_json::from_str(&text).map_err(|source| ToolError::Fragment {
                file: spec.file.clone(),
                source,
            })?;
        debug!(file = %spec.file, class_count = fragment.len(), "parsed fragment");

        for (name, record) in fragment {
            if let Some(previous) = survey.membership.get(&name) {
                let warning = LoadWarning::DuplicateClass {
                    name: name.clone(),
                    previous: previous.clone(),
                    current: spec.group.clone(),
                };
                warn!("{warning}");
                survey.warnings.push(warning);
            }
            survey.membership.insert(name.clone(), spec.group.clone());
            survey.records.insert(name, record);
        }
    }

    info!(
        class_count = survey.records.len(),
        fragment_count = config.fragments.len(),
        "merged survey fragments"
    );
    Ok(survey)
}
