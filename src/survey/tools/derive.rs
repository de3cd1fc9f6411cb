use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::survey::tools::model::{ClassName, ClassRecord, DerivedRecord, RecordMap};

/// Divisors used to normalise the raw fan counts. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Normalization {
    pub max_fan_out: usize,
    pub max_fan_in: usize,
}

/// Records enriched with `createdBy`, `fanOut` and `fanIn`.
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    pub records: RecordMap<DerivedRecord>,
    pub normalization: Normalization,
}

/// Derives inverse `creates` edges and normalised connectivity scores.
///
/// The input is left untouched. `createdBy` only lists known creators and
/// may include the record itself; fan counts ignore self edges and names
/// that are not part of the survey.
#[instrument(level = "debug", skip_all, fields(class_count = records.len()))]
pub fn derive_relationships(records: &RecordMap<ClassRecord>) -> Derivation {
    let created_by = inverse_creates(records);

    let outgoing: BTreeMap<&str, BTreeSet<&str>> = records
        .iter()
        .map(|(name, record)| (name.as_str(), outgoing_edges(name, record, records)))
        .collect();

    let mut incoming: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for (source, targets) in &outgoing {
        for target in targets {
            incoming.entry(*target).or_default().insert(*source);
        }
    }

    let fan_out_raw = |name: &str| outgoing.get(name).map_or(0, BTreeSet::len);
    let fan_in_raw = |name: &str| incoming.get(name).map_or(0, BTreeSet::len);

    let normalization = Normalization {
        max_fan_out: divisor(records.keys().map(|name| fan_out_raw(name))),
        max_fan_in: divisor(records.keys().map(|name| fan_in_raw(name))),
    };
    debug!(
        max_fan_out = normalization.max_fan_out,
        max_fan_in = normalization.max_fan_in,
        "computed fan normalisation"
    );

    let derived = records
        .iter()
        .map(|(name, record)| {
            let fan_out = normalise(fan_out_raw(name), normalization.max_fan_out);
            let fan_in = normalise(fan_in_raw(name), normalization.max_fan_in);
            let creators = created_by.get(name.as_str()).cloned().unwrap_or_default();
            (
                name.clone(),
                DerivedRecord::new(record.clone(), creators, fan_out, fan_in),
            )
        })
        .collect();

    Derivation {
        records: derived,
        normalization,
    }
}

/// Maps each known class to the sorted, unique set of classes creating it.
fn inverse_creates(records: &RecordMap<ClassRecord>) -> BTreeMap<&str, Vec<ClassName>> {
    let mut creators: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for (name, record) in records {
        for created in record.creates() {
            if let Some((target, _)) = records.get_key_value(created) {
                creators.entry(target.as_str()).or_default().insert(name);
            }
        }
    }

    creators
        .into_iter()
        .map(|(target, sources)| (target, sources.into_iter().map(str::to_string).collect()))
        .collect()
}

/// Known classes reached through `creates` or `references`, excluding `name`.
fn outgoing_edges<'a>(
    name: &str,
    record: &'a ClassRecord,
    records: &RecordMap<ClassRecord>,
) -> BTreeSet<&'a str> {
    record
        .creates()
        .iter()
        .chain(record.references())
        .filter(|target| target.as_str() != name && records.contains_key(*target))
        .map(String::as_str)
        .collect()
}

fn divisor(values: impl Iterator<Item = usize>) -> usize {
    values.max().filter(|max| *max > 0).unwrap_or(1)
}

/// `raw / max` rounded half away from zero to two decimals.
fn normalise(raw: usize, max: usize) -> f64 {
    round2(raw as f64 / max as f64)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
