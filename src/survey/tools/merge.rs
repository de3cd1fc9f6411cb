use std::collections::BTreeMap;
use std::io::Write;

use tracing::{info, instrument};

use crate::survey::tools::cluster::build_clusters;
use crate::survey::tools::config::SurveyConfig;
use crate::survey::tools::derive::derive_relationships;
use crate::survey::tools::error::Result;
use crate::survey::tools::io::fragments::{FragmentSource, LoadWarning, load_fragments};
use crate::survey::tools::io::output::{Meta, SurveyDocument, write_document};
use crate::survey::tools::model::ClassName;
use crate::survey::tools::report;
use crate::survey::tools::validate::{ValidationReport, validate};

/// Everything a merge run produced, persisted or not.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub document: SurveyDocument,
    pub membership: BTreeMap<ClassName, String>,
    pub warnings: Vec<LoadWarning>,
    pub issues: ValidationReport,
}

/// Runs every stage of the merge without touching the output path.
#[instrument(level = "info", skip_all, fields(fragment_count = config.fragments.len()))]
pub fn build_survey(config: &SurveyConfig, source: &dyn FragmentSource) -> Result<MergeOutcome> {
    let loaded = load_fragments(config, source)?;
    let derivation = derive_relationships(&loaded.records);
    let issues = validate(&loaded.records);
    let groups = config.groups();
    let clusters = build_clusters(&groups, &loaded.membership);

    let document = SurveyDocument {
        meta: Meta {
            generated_at: config.generated_at.clone(),
            class_count: derivation.records.len(),
            groups,
            normalization: derivation.normalization,
        },
        classes: derivation.records,
        clusters,
    };

    Ok(MergeOutcome {
        document,
        membership: loaded.membership,
        warnings: loaded.warnings,
        issues,
    })
}

/// Builds the survey, writes it to `config.output` and prints the report.
///
/// Validation issues never stop the run; the document is written either way.
#[instrument(level = "info", skip_all, fields(output = %config.output.display()))]
pub fn merge_survey(
    config: &SurveyConfig,
    source: &dyn FragmentSource,
    out: &mut dyn Write,
) -> Result<MergeOutcome> {
    let outcome = build_survey(config, source)?;
    let document = &outcome.document;

    writeln!(
        out,
        "Merged {} classes from {} fragments",
        document.meta.class_count,
        config.fragments.len()
    )?;
    report::write_issues(out, &outcome.issues)?;

    write_document(&config.output, document)?;
    info!(
        class_count = document.meta.class_count,
        cluster_count = document.clusters.len(),
        "survey written"
    );

    report::write_output_summary(out, &config.output, document)?;
    report::write_group_summary(out, document)?;
    report::write_created_by(out, document)?;
    report::write_cross_group_creates(out, document, &outcome.membership)?;
    Ok(outcome)
}
