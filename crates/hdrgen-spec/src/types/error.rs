use serde::{Deserialize, Serialize};

use super::common::Severity;

// ── Error code constants ──

pub const E_MISSING_FIELD: &str = "E_MISSING_FIELD";
pub const E_INVALID_IDENTIFIER: &str = "E_INVALID_IDENTIFIER";
pub const E_BASE_STYLE: &str = "E_BASE_STYLE";
pub const E_OVERRIDE_WITHOUT_BASE: &str = "E_OVERRIDE_WITHOUT_BASE";
pub const E_DUPLICATE_SYMBOL: &str = "E_DUPLICATE_SYMBOL";
pub const E_KIND_MISMATCH: &str = "E_KIND_MISMATCH";
pub const E_INVALID_ARRAY: &str = "E_INVALID_ARRAY";
pub const E_PARSE_ERROR: &str = "E_PARSE_ERROR";
pub const E_SCHEMA_VIOLATION: &str = "E_SCHEMA_VIOLATION";
pub const E_VERSION_MISMATCH: &str = "E_VERSION_MISMATCH";

/// A single validation/parsing error entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Machine-readable stable error code
    pub code: String,
    pub severity: Severity,
    /// Human-readable error message
    pub message: String,
    /// Relative file path where the error occurred
    pub file: String,
    /// JSONPath to the offending field
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Aggregated validation report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether the class is valid (no errors, warnings are ok)
    pub ok: bool,
    pub errors: Vec<ErrorEntry>,
}

impl ValidationReport {
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
        }
    }

    pub fn from_errors(errors: Vec<ErrorEntry>) -> Self {
        let ok = !errors.iter().any(|e| e.severity == Severity::Error);
        Self { ok, errors }
    }

    /// Add an entry and update the ok flag
    pub fn push(&mut self, entry: ErrorEntry) {
        if entry.severity == Severity::Error {
            self.ok = false;
        }
        self.errors.push(entry);
    }

    pub fn merge(&mut self, other: ValidationReport) {
        for entry in other.errors {
            self.push(entry);
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.errors.iter().filter(|e| e.severity == severity).count()
    }

    pub fn has_errors(&self) -> bool {
        !self.ok
    }

    /// Attribute every entry without a file to `file`.
    pub fn in_file(mut self, file: &str) -> Self {
        for entry in &mut self.errors {
            if entry.file.is_empty() {
                entry.file = file.to_string();
            }
        }
        self
    }
}

impl ErrorEntry {
    pub fn error(code: &str, message: impl Into<String>, file: &str, path: &str) -> Self {
        Self {
            code: code.to_string(),
            severity: Severity::Error,
            message: message.into(),
            file: file.to_string(),
            path: path.to_string(),
            suggestion: None,
        }
    }

    pub fn warning(code: &str, message: impl Into<String>, file: &str, path: &str) -> Self {
        Self {
            code: code.to_string(),
            severity: Severity::Warning,
            message: message.into(),
            file: file.to_string(),
            path: path.to_string(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// A class spec that cannot be emitted.
///
/// Holds every error-severity entry found during validation; never empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid class spec at `{}`: {}{}", .entries[0].path, .entries[0].message, more_suffix(.entries))]
pub struct InvalidSpecError {
    entries: Vec<ErrorEntry>,
}

impl InvalidSpecError {
    /// Collect the error entries of a report, or `None` when it has none.
    pub fn from_report(report: &ValidationReport) -> Option<Self> {
        let entries: Vec<ErrorEntry> = report
            .errors
            .iter()
            .filter(|e| e.severity == Severity::Error)
            .cloned()
            .collect();
        if entries.is_empty() {
            None
        } else {
            Some(Self { entries })
        }
    }

    /// JSONPath of the first violated field (e.g. `$.name`).
    pub fn field(&self) -> &str {
        &self.entries[0].path
    }

    /// Message of the first violation.
    pub fn message(&self) -> &str {
        &self.entries[0].message
    }

    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }
}

fn more_suffix(entries: &[ErrorEntry]) -> String {
    match entries.len() {
        0 | 1 => String::new(),
        n => format!(" (and {} more)", n - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_entry_json_format() {
        let entry = ErrorEntry::error(
            E_INVALID_IDENTIFIER,
            "Namespace segment 'ui-kit' is not a valid identifier",
            "widgets/button.class.yaml",
            "$.namespaces[0]",
        )
        .with_suggestion("Use letters, digits and underscores only");

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["code"], "E_INVALID_IDENTIFIER");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["file"], "widgets/button.class.yaml");
        assert_eq!(json["path"], "$.namespaces[0]");
        assert_eq!(
            json["suggestion"],
            "Use letters, digits and underscores only"
        );
    }

    #[test]
    fn test_entry_without_suggestion_skips_in_json() {
        let entry = ErrorEntry::error(E_MISSING_FIELD, "missing", "a.class.yaml", "$.name");
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("suggestion").is_none());
    }

    #[test]
    fn test_warnings_keep_report_ok() {
        let report = ValidationReport::from_errors(vec![ErrorEntry::warning(
            E_DUPLICATE_SYMBOL,
            "dup",
            "",
            "$.members[1]",
        )]);
        assert!(report.ok);
        assert!(InvalidSpecError::from_report(&report).is_none());
    }

    #[test]
    fn test_merge_and_count() {
        let mut report = ValidationReport::success();
        let mut other = ValidationReport::success();
        other.push(ErrorEntry::error(E_MISSING_FIELD, "missing", "", "$.name"));
        other.push(ErrorEntry::warning(E_DUPLICATE_SYMBOL, "dup", "", "$.members[1]"));
        report.merge(other);

        assert!(report.has_errors());
        assert_eq!(report.count(Severity::Error), 1);
        assert_eq!(report.count(Severity::Warning), 1);
    }

    #[test]
    fn test_in_file_fills_missing_file_only() {
        let report = ValidationReport::from_errors(vec![
            ErrorEntry::error(E_MISSING_FIELD, "missing", "", "$.name"),
            ErrorEntry::error(E_MISSING_FIELD, "missing", "other.class.json", "$.name"),
        ])
        .in_file("a.class.yaml");

        assert_eq!(report.errors[0].file, "a.class.yaml");
        assert_eq!(report.errors[1].file, "other.class.json");
    }

    #[test]
    fn test_invalid_spec_error_names_first_field() {
        let report = ValidationReport::from_errors(vec![
            ErrorEntry::warning(E_DUPLICATE_SYMBOL, "dup", "", "$.members[1]"),
            ErrorEntry::error(E_MISSING_FIELD, "Class name is required", "", "$.name"),
            ErrorEntry::error(E_INVALID_IDENTIFIER, "bad", "", "$.namespaces[0]"),
        ]);

        let err = InvalidSpecError::from_report(&report).unwrap();
        assert_eq!(err.field(), "$.name");
        assert_eq!(err.entries().len(), 2);
        assert_eq!(
            err.to_string(),
            "invalid class spec at `$.name`: Class name is required (and 1 more)"
        );
    }

    #[test]
    fn test_invalid_spec_error_is_std_error() {
        let report = ValidationReport::from_errors(vec![ErrorEntry::error(
            E_MISSING_FIELD,
            "Class name is required",
            "",
            "$.name",
        )]);
        let err = InvalidSpecError::from_report(&report).unwrap();
        assert_eq!(err.message(), "Class name is required");
        assert_eq!(err.to_string(), "invalid class spec at `$.name`: Class name is required");

        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }
}
