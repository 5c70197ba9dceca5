//! Normalized records produced by collectors.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DepartmentId, SessionId};
use crate::domain::errors::{KpiError, KpiResult};

/// Opaque mapping from field name to value.
///
/// The schema depends on the collector that produced it; calculators read
/// fields through the typed getters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectedRecord(BTreeMap<String, Value>);

impl CollectedRecord {
    /// Empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from any serializable row whose JSON form is an object.
    pub fn from_row<T: Serialize>(row: &T) -> KpiResult<Self> {
        match serde_json::to_value(row)? {
            Value::Object(map) => Ok(Self(map.into_iter().collect())),
            other => Err(KpiError::Serialization(format!(
                "expected an object row, got {other}"
            ))),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Set `field`, replacing any previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    /// Raw value of `field`.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    // Typed getters return `None` for absent fields and type mismatches alike.

    /// Numeric field as `f64`.
    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.0.get(field).and_then(Value::as_f64)
    }

    /// Integer field.
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.0.get(field).and_then(Value::as_i64)
    }

    /// Boolean field.
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.0.get(field).and_then(Value::as_bool)
    }

    /// String field.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Verdict of a collector's `validate` on one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordCheck {
    /// The record may reach calculators.
    Valid,
    /// The record is skipped, with the reason.
    Invalid(String),
}

impl RecordCheck {
    /// Shorthand for [`RecordCheck::Invalid`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid(reason.into())
    }

    /// Boolean form of the verdict.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Collapse a list of checks into the first failure, if any.
    pub fn all(checks: impl IntoIterator<Item = Self>) -> Self {
        checks
            .into_iter()
            .find(|c| !c.is_valid())
            .unwrap_or(Self::Valid)
    }
}

/// A record that failed validation, kept for observability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    /// Position of the record in the collector's raw output.
    pub index: usize,
    /// Why validation rejected it.
    pub reason: String,
}

/// Output of one validated collection run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    /// Records that passed validation, in collector order.
    pub records: Vec<CollectedRecord>,
    /// Records that did not.
    pub skipped: Vec<SkippedRecord>,
}

impl Collection {
    /// Number of skipped records.
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// True when no record was kept.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of kept records.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Parameters every collector invocation is scoped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionScope {
    /// Department being scored.
    pub department_id: DepartmentId,
    /// Session being scored.
    pub session_id: SessionId,
    /// Upper bound for one `collect` call.
    pub timeout: Duration,
}

impl CollectionScope {
    /// Scope for one department and session.
    pub fn new(department_id: DepartmentId, session_id: SessionId, timeout: Duration) -> Self {
        Self {
            department_id,
            session_id,
            timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        id: i64,
        rating: i64,
        comment: Option<String>,
    }

    #[test]
    fn from_row_flattens_struct_fields() {
        let record = CollectedRecord::from_row(&Row {
            id: 3,
            rating: 5,
            comment: None,
        })
        .unwrap();

        assert_eq!(record.get_i64("id"), Some(3));
        assert_eq!(record.get_f64("rating"), Some(5.0));
        assert_eq!(record.get("comment"), Some(&Value::Null));
        assert_eq!(record.get_str("comment"), None);
    }

    #[test]
    fn from_row_rejects_non_objects() {
        assert!(CollectedRecord::from_row(&5).is_err());
    }

    #[test]
    fn all_returns_first_failure() {
        let check = RecordCheck::all([
            RecordCheck::Valid,
            RecordCheck::invalid("first"),
            RecordCheck::invalid("second"),
        ]);
        assert_eq!(check, RecordCheck::invalid("first"));
        assert!(RecordCheck::all([]).is_valid());
    }
}
