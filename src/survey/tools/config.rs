use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::survey::tools::error::{Result, ToolError};

/// Directory holding the survey fragments when none is supplied.
pub const DEFAULT_FRAGMENTS_DIR: &str = "fragments";
/// Output document written when none is supplied.
pub const DEFAULT_OUTPUT: &str = "class_survey_data.json";

const DEFAULT_FRAGMENTS: [(&str, &str); 6] = [
    ("survey_ui.json", "ui"),
    ("survey_module_tree.json", "module-tree"),
    ("survey_data.json", "data"),
    ("survey_scriptnode.json", "scriptnode"),
    ("survey_event.json", "event"),
    ("survey_services.json", "services"),
];

/// One input fragment and the group its classes belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentSpec {
    pub file: String,
    pub group: String,
}

impl FragmentSpec {
    pub fn new(file: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            group: group.into(),
        }
    }
}

/// Shape of a fragment manifest file.
#[derive(Debug, Deserialize)]
struct Manifest {
    fragments: Vec<FragmentSpec>,
}

/// Everything a merge run needs to know. Fragments are loaded in the order
/// listed; later fragments win on duplicate class names.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyConfig {
    pub fragments_dir: PathBuf,
    pub output: PathBuf,
    pub fragments: Vec<FragmentSpec>,
    /// Date string stamped into the output metadata.
    pub generated_at: String,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            fragments_dir: PathBuf::from(DEFAULT_FRAGMENTS_DIR),
            output: PathBuf::from(DEFAULT_OUTPUT),
            fragments: DEFAULT_FRAGMENTS
                .iter()
                .map(|(file, group)| FragmentSpec::new(*file, *group))
                .collect(),
            generated_at: today(),
        }
    }
}

impl SurveyConfig {
    /// Builds a configuration for an explicit fragment list.
    pub fn with_fragments(fragments: Vec<FragmentSpec>) -> Self {
        Self {
            fragments,
            ..Self::default()
        }
    }

    /// Distinct group labels in configured order.
    pub fn groups(&self) -> Vec<String> {
        let mut groups: Vec<String> = Vec::new();
        for spec in &self.fragments {
            if !groups.contains(&spec.group) {
                groups.push(spec.group.clone());
            }
        }
        groups
    }

    /// Replaces the fragment list with the one declared in a manifest file.
    pub fn load_manifest(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(ToolError::MissingInput(path.to_path_buf()));
        }
        let source = fs::read_to_string(path)?;
        let manifest: Manifest = serde_json::from_str(&source)
            .map_err(|err| ToolError::Manifest(format!("{}: {err}", path.display())))?;
        if manifest.fragments.is_empty() {
            return Err(ToolError::Manifest(format!(
                "{} lists no fragments",
                path.display()
            )));
        }
        self.fragments = manifest.fragments;
        Ok(())
    }
}

/// Today's local date in `YYYY-MM-DD` form.
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
