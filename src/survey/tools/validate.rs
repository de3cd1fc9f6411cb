use tracing::{info, instrument};

use crate::survey::tools::model::{ClassName, ClassRecord, RecordMap};

/// A cross-reference inconsistency found in the merged survey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// A `seeAlso` entry names a class that is not in the survey.
    UnknownSeeAlsoTarget { source: ClassName, target: ClassName },
    /// A `seeAlso` entry is not mirrored by the target.
    NonReciprocal { source: ClassName, target: ClassName },
    /// A `creates` entry names a class that is not in the survey.
    UnknownCreationTarget { source: ClassName, target: ClassName },
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Issue::UnknownSeeAlsoTarget { source, target } => {
                write!(f, "{source} -> {target}: target class not found")
            }
            Issue::NonReciprocal { source, target } => {
                write!(f, "{source} -> {target}: not reciprocal")
            }
            Issue::UnknownCreationTarget { source, target } => {
                write!(f, "{source} creates {target}: not a known class")
            }
        }
    }
}

/// Issues grouped by the check that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub see_also: Vec<Issue>,
    pub creates: Vec<Issue>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.see_also.is_empty() && self.creates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.see_also.len() + self.creates.len()
    }
}

/// Checks `seeAlso` reciprocity and `creates` targets across the survey.
#[instrument(level = "debug", skip_all, fields(class_count = records.len()))]
pub fn validate(records: &RecordMap<ClassRecord>) -> ValidationReport {
    let report = ValidationReport {
        see_also: check_see_also(records),
        creates: check_creates(records),
    };
    info!(
        see_also_issues = report.see_also.len(),
        creates_issues = report.creates.len(),
        "validated cross references"
    );
    report
}

fn check_see_also(records: &RecordMap<ClassRecord>) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (name, record) in records {
        for entry in record.see_also() {
            let issue = match records.get(&entry.class) {
                None => Issue::UnknownSeeAlsoTarget {
                    source: name.clone(),
                    target: entry.class.clone(),
                },
                Some(target) if !target.lists_see_also(name) => Issue::NonReciprocal {
                    source: name.clone(),
                    target: entry.class.clone(),
                },
                Some(_) => continue,
            };
            issues.push(issue);
        }
    }
    issues
}

fn check_creates(records: &RecordMap<ClassRecord>) -> Vec<Issue> {
    records
        .iter()
        .flat_map(|(name, record)| {
            record
                .creates()
                .iter()
                .filter(move |created| !records.contains_key(*created))
                .map(move |created| Issue::UnknownCreationTarget {
                    source: name.clone(),
                    target: created.clone(),
                })
        })
        .collect()
}
