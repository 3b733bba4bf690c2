//! Coerce the image field of every database entry into a list.
//!
//! The database export stores `bild` inconsistently: missing, `null`, a
//! comma-separated string, or already a list. After normalization it is
//! always a list.

use crate::error::Result;
use crate::utils::files::{read_json, write_json_pretty};
use serde_json::Value;
use std::path::PathBuf;

pub const DEFAULT_INPUT: &str = "./database.json";
pub const DEFAULT_OUTPUT: &str = "./database_fixed_all.json";
pub const DEFAULT_FIELD: &str = "bild";

const ENTRIES_KEY: &str = "eintraege";
const ENTRY_KEY: &str = "eintrag";

#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub field: String,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            field: DEFAULT_FIELD.to_string(),
        }
    }
}

/// What happened to the entries of one document
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Object entries visited
    pub entries: usize,
    /// String values split into a list
    pub split: usize,
    /// Missing, null or otherwise unusable values replaced by `[]`
    pub defaulted: usize,
    /// Values that were already lists
    pub unchanged: usize,
    /// Entries that are not JSON objects
    pub skipped: usize,
}

/// Replacement for one field value, or `None` when it is already a list
pub fn normalize_field(value: Option<&Value>) -> Option<Value> {
    match value {
        Some(Value::Array(_)) => None,
        Some(Value::String(s)) => Some(Value::Array(
            s.split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| Value::String(part.to_string()))
                .collect(),
        )),
        // missing, null, numbers, objects ...
        _ => Some(Value::Array(Vec::new())),
    }
}

/// Normalize `field` on every entry of `doc["eintraege"]["eintrag"]` in place
pub fn normalize_document(doc: &mut Value, field: &str) -> NormalizeReport {
    let mut report = NormalizeReport::default();

    let Some(entries) = doc
        .get_mut(ENTRIES_KEY)
        .and_then(|e| e.get_mut(ENTRY_KEY))
    else {
        tracing::warn!("document has no {}.{} list", ENTRIES_KEY, ENTRY_KEY);
        return report;
    };

    let Some(entries) = entries.as_array_mut() else {
        tracing::warn!("{}.{} is not a list, leaving it as is", ENTRIES_KEY, ENTRY_KEY);
        return report;
    };

    for (position, entry) in entries.iter_mut().enumerate() {
        let Some(entry) = entry.as_object_mut() else {
            tracing::warn!(position, "entry is not an object, skipping");
            report.skipped += 1;
            continue;
        };
        report.entries += 1;

        let current = entry.get(field);
        let was_string = matches!(current, Some(Value::String(_)));
        match normalize_field(current) {
            None => report.unchanged += 1,
            Some(list) => {
                if was_string {
                    report.split += 1;
                } else {
                    report.defaulted += 1;
                }
                entry.insert(field.to_string(), list);
            }
        }
    }

    report
}

/// Read the database, normalize it and write the result to a new file
pub fn normalize_file(config: &NormalizeConfig) -> Result<NormalizeReport> {
    let mut doc: Value = read_json(&config.input)?;
    let report = normalize_document(&mut doc, &config.field);
    write_json_pretty(&config.output, &doc)?;

    tracing::info!(
        entries = report.entries,
        split = report.split,
        defaulted = report.defaulted,
        unchanged = report.unchanged,
        "normalized database"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_is_split_trimmed_and_filtered() {
        assert_eq!(
            normalize_field(Some(&json!("a, b ,c"))),
            Some(json!(["a", "b", "c"]))
        );
        assert_eq!(
            normalize_field(Some(&json!(" x.jpg,, ,y.jpg, "))),
            Some(json!(["x.jpg", "y.jpg"]))
        );
        assert_eq!(normalize_field(Some(&json!(""))), Some(json!([])));
    }

    #[test]
    fn missing_null_and_odd_types_become_empty() {
        assert_eq!(normalize_field(None), Some(json!([])));
        assert_eq!(normalize_field(Some(&Value::Null)), Some(json!([])));
        assert_eq!(normalize_field(Some(&json!(42))), Some(json!([])));
        assert_eq!(normalize_field(Some(&json!({"src": "a.jpg"}))), Some(json!([])));
    }

    #[test]
    fn lists_are_left_alone() {
        assert_eq!(normalize_field(Some(&json!(["a", " b "]))), None);
    }

    #[test]
    fn document_entries_are_rewritten() {
        let mut doc = json!({
            "eintraege": {
                "eintrag": [
                    {"id": 1, "bild": "a.jpg, b.jpg"},
                    {"id": 2, "bild": null},
                    {"id": 3},
                    {"id": 4, "bild": ["c.jpg"]},
                    "stray"
                ]
            }
        });

        let report = normalize_document(&mut doc, "bild");

        assert_eq!(
            doc["eintraege"]["eintrag"],
            json!([
                {"id": 1, "bild": ["a.jpg", "b.jpg"]},
                {"id": 2, "bild": []},
                {"id": 3, "bild": []},
                {"id": 4, "bild": ["c.jpg"]},
                "stray"
            ])
        );
        assert_eq!(
            report,
            NormalizeReport {
                entries: 4,
                split: 1,
                defaulted: 2,
                unchanged: 1,
                skipped: 1,
            }
        );
    }

    #[test]
    fn second_pass_changes_nothing() {
        let mut doc = json!({"eintraege": {"eintrag": [
            {"bild": "a, b ,c"}, {"bild": null}, {}
        ]}});
        normalize_document(&mut doc, "bild");
        let once = doc.clone();

        let report = normalize_document(&mut doc, "bild");
        assert_eq!(doc, once);
        assert_eq!(report.unchanged, 3);
    }

    #[test]
    fn missing_containers_are_a_no_op() {
        let mut doc = json!({"andere": []});
        let report = normalize_document(&mut doc, "bild");
        assert_eq!(doc, json!({"andere": []}));
        assert_eq!(report, NormalizeReport::default());
    }
}
