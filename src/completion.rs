//! Field completion scoring.
//!
//! A record is any JSON value; schema fields are dotted paths into it.
//! [`has_value`] is the single definition of "populated" and every score,
//! whether for one cell or a whole record, goes through it.

use serde::Serialize;
use serde_json::Value;

/// Whether a resolved value counts as populated.
///
/// Null, trim-empty strings and empty arrays are empty. Everything else,
/// including `0`, `false`, `"0"` and `{}`, is populated.
pub fn has_value(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

/// Resolve a dotted path, or `None` when any step is missing or not indexable.
///
/// Objects are indexed by key, arrays by numeric segment. Null or scalar
/// intermediates stop resolution.
pub fn resolve_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for part in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Cell-level check: does `path` resolve to a populated value?
pub fn is_filled(record: &Value, path: &str) -> bool {
    resolve_path(record, path).is_some_and(has_value)
}

/// Aggregate completion of a record against a set of schema paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub filled: usize,
    pub total: usize,
    pub percentage: u32,
}

impl Completion {
    pub fn from_counts(filled: usize, total: usize) -> Self {
        let percentage = if total > 0 {
            // f64::round rounds half away from zero, i.e. half-up for ratios
            (filled as f64 / total as f64 * 100.0).round() as u32
        } else {
            0
        };
        Self {
            filled,
            total,
            percentage,
        }
    }

    pub fn tier(&self) -> CompletionTier {
        CompletionTier::from_percentage(self.percentage)
    }
}

/// Score `record` against `schema_paths`. Never fails: malformed or
/// missing paths simply count as not filled.
pub fn completion<P: AsRef<str>>(schema_paths: &[P], record: &Value) -> Completion {
    let filled = schema_paths
        .iter()
        .filter(|path| is_filled(record, path.as_ref()))
        .count();
    Completion::from_counts(filled, schema_paths.len())
}

/// Score a typed model by its JSON form.
///
/// A model that fails to serialize scores as an empty record.
pub fn completion_of<T: Serialize, P: AsRef<str>>(schema_paths: &[P], record: &T) -> Completion {
    let value = serde_json::to_value(record).unwrap_or(Value::Null);
    completion(schema_paths, &value)
}

/// Colour bucket for a completion badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionTier {
    Complete,
    Partial,
    Sparse,
}

impl CompletionTier {
    pub fn from_percentage(percentage: u32) -> Self {
        if percentage >= 100 {
            Self::Complete
        } else if percentage >= 50 {
            Self::Partial
        } else {
            Self::Sparse
        }
    }
}

/// Display state of a single schema cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Filled,
    Missing,
    MissingRequired,
}

impl CellState {
    pub fn of(record: &Value, path: &str, required: bool) -> Self {
        if is_filled(record, path) {
            Self::Filled
        } else if required {
            Self::MissingRequired
        } else {
            Self::Missing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{leaf_paths, ASSET_SCHEMA};
    use serde_json::json;

    #[test]
    fn test_has_value_truth_table() {
        assert!(!has_value(&Value::Null));
        assert!(!has_value(&json!("")));
        assert!(!has_value(&json!("  ")));
        assert!(!has_value(&json!([])));

        assert!(has_value(&json!(0)));
        assert!(has_value(&json!(false)));
        assert!(has_value(&json!("0")));
        assert!(has_value(&json!([0])));
        assert!(has_value(&json!({})));
    }

    #[test]
    fn test_missing_key_counts_as_unfilled() {
        let record = json!({"file_name": "x.mp4"});
        assert!(resolve_path(&record, "tech_spec.fps").is_none());
        assert!(!is_filled(&record, "tech_spec.fps"));
    }

    #[test]
    fn test_empty_schema() {
        let c = completion::<&str>(&[], &json!({"anything": 1}));
        assert_eq!(
            c,
            Completion {
                filled: 0,
                total: 0,
                percentage: 0
            }
        );
    }

    #[test]
    fn test_half_filled_is_fifty_percent() {
        let record = json!({
            "file_name": "WSOP_2024.mp4",
            "event_context": {"brand": "WSOP", "venue": "   "},
        });
        let paths = [
            "file_name",
            "event_context.brand",
            "event_context.venue",
            "tech_spec.fps",
        ];
        let c = completion(&paths, &record);
        assert_eq!(c.filled, 2);
        assert_eq!(c.total, 4);
        assert_eq!(c.percentage, 50);
    }

    #[test]
    fn test_scalar_and_null_intermediates_do_not_resolve() {
        let record = json!({"tech_spec": null, "file_name": "a.mp4"});
        assert!(!is_filled(&record, "tech_spec.fps"));
        assert!(!is_filled(&record, "file_name.length"));
        assert!(!is_filled(&record, ""));
        assert!(!is_filled(&json!("string root"), "a"));
    }

    #[test]
    fn test_array_index_segments() {
        let record = json!({"segments": [{"title": "Hero call"}]});
        assert!(is_filled(&record, "segments.0.title"));
        assert!(!is_filled(&record, "segments.1.title"));
        assert!(!is_filled(&record, "segments.first.title"));
    }

    #[test]
    fn test_rounding_is_half_up() {
        // 1/8 = 12.5%
        assert_eq!(Completion::from_counts(1, 8).percentage, 13);
        // 2/3 = 66.67%
        assert_eq!(Completion::from_counts(2, 3).percentage, 67);
        // 1/3 = 33.33%
        assert_eq!(Completion::from_counts(1, 3).percentage, 33);
    }

    #[test]
    fn test_cell_and_aggregate_agree() {
        let record = json!({
            "asset_uuid": "u-1",
            "file_name": "HCL_S12_EP03.mp4",
            "event_context": {"year": 2024, "brand": "HCL", "is_final_table": false},
            "segments": [],
        });
        let paths = leaf_paths(ASSET_SCHEMA);
        let cells = paths.iter().filter(|p| is_filled(&record, p)).count();
        assert_eq!(completion(&paths, &record).filled, cells);
        assert_eq!(cells, 5);
    }

    #[test]
    fn test_typed_model_scoring() {
        #[derive(Serialize)]
        struct Row {
            name: String,
            note: Option<String>,
        }
        let row = Row {
            name: "a".to_string(),
            note: None,
        };
        let c = completion_of(&["name", "note"], &row);
        assert_eq!(c.percentage, 50);
        assert_eq!(c.tier(), CompletionTier::Partial);
    }

    #[test]
    fn test_cell_state() {
        let record = json!({"file_name": "a.mp4"});
        assert_eq!(CellState::of(&record, "file_name", true), CellState::Filled);
        assert_eq!(
            CellState::of(&record, "asset_uuid", true),
            CellState::MissingRequired
        );
        assert_eq!(CellState::of(&record, "venue", false), CellState::Missing);
    }
}
