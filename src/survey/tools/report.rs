use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use crate::survey::tools::error::Result;
use crate::survey::tools::io::output::SurveyDocument;
use crate::survey::tools::model::ClassName;
use crate::survey::tools::validate::{Issue, ValidationReport};

/// Number of issues listed per category before the rest are summarised.
pub const ISSUE_DISPLAY_LIMIT: usize = 30;

/// Prints both issue categories, skipping empty ones.
pub fn write_issues(out: &mut dyn Write, report: &ValidationReport) -> Result<()> {
    write_issue_list(out, "seeAlso reciprocity issues", &report.see_also)?;
    write_issue_list(out, "creates reference issues", &report.creates)
}

fn write_issue_list(out: &mut dyn Write, title: &str, issues: &[Issue]) -> Result<()> {
    if issues.is_empty() {
        return Ok(());
    }
    writeln!(out, "\n{title} ({}):", issues.len())?;
    for issue in issues.iter().take(ISSUE_DISPLAY_LIMIT) {
        writeln!(out, "  {issue}")?;
    }
    if issues.len() > ISSUE_DISPLAY_LIMIT {
        writeln!(out, "  ... and {} more", issues.len() - ISSUE_DISPLAY_LIMIT)?;
    }
    Ok(())
}

/// Confirms where the document went and how much it holds.
pub fn write_output_summary(out: &mut dyn Write, path: &Path, document: &SurveyDocument) -> Result<()> {
    writeln!(out, "\nOutput written to {}", path.display())?;
    writeln!(out, "  {} classes", document.classes.len())?;
    writeln!(out, "  {} clusters", document.clusters.len())?;
    Ok(())
}

/// Member, `creates` and `seeAlso` totals for every cluster.
pub fn write_group_summary(out: &mut dyn Write, document: &SurveyDocument) -> Result<()> {
    writeln!(out, "\n=== Per-group summary ===")?;
    for (group, cluster) in &document.clusters {
        let (creates, see_also) = cluster
            .members
            .iter()
            .filter_map(|member| document.classes.get(member))
            .fold((0, 0), |(creates, see_also), class| {
                (
                    creates + class.record.creates().len(),
                    see_also + class.record.see_also().len(),
                )
            });
        writeln!(
            out,
            "  {group:15}: {:2} classes, {creates:3} creates, {see_also:3} seeAlso",
            cluster.members.len()
        )?;
    }
    Ok(())
}

/// Lists every class that has at least one creator.
pub fn write_created_by(out: &mut dyn Write, document: &SurveyDocument) -> Result<()> {
    writeln!(out, "\n=== createdBy relationships ===")?;
    for (name, class) in &document.classes {
        if !class.created_by.is_empty() {
            writeln!(out, "  {name} <- {}", class.created_by.join(", "))?;
        }
    }
    Ok(())
}

/// Lists `creates` edges whose endpoints sit in different groups.
pub fn write_cross_group_creates(
    out: &mut dyn Write,
    document: &SurveyDocument,
    membership: &BTreeMap<ClassName, String>,
) -> Result<()> {
    writeln!(out, "\n=== Cross-group creates (factory relationships) ===")?;
    for (name, class) in &document.classes {
        let Some(source_group) = membership.get(name) else {
            continue;
        };
        for created in class.record.creates() {
            match membership.get(created) {
                Some(target_group) if target_group != source_group => {
                    writeln!(out, "  {name} ({source_group}) -> {created} ({target_group})")?;
                }
                _ => {}
            }
        }
    }
    Ok(())
}
