use std::collections::HashMap;

use hdrgen_spec::loader::LoadedProject;
use hdrgen_spec::types::class::ClassSpec;
use hdrgen_spec::types::error::{ErrorEntry, ValidationReport, E_DUPLICATE_SYMBOL};

use crate::rules;

/// Validate a single class description.
/// Entries carry JSONPaths relative to the class but no file.
pub fn validate_class(class: &ClassSpec) -> ValidationReport {
    let mut report = ValidationReport::success();

    rules::required_fields::check(class, &mut report);
    rules::identifiers::check(class, &mut report);
    rules::kind_check::check(class, &mut report);
    rules::arrays::check(class, &mut report);
    rules::base_style::check(class, &mut report);
    rules::override_check::check(class, &mut report);
    rules::duplicates::check(class, &mut report);

    report
}

/// Validate a loaded project: config, every class, and cross-class collisions.
pub fn validate_project(project: &LoadedProject) -> ValidationReport {
    let mut report = ValidationReport::success();

    rules::version_check::check(&project.config, &mut report);

    for (file, class) in &project.classes {
        report.merge(validate_class(class).in_file(file));
    }

    // Two classes with the same qualified name would write the same header
    let mut seen: HashMap<String, &str> = HashMap::new();
    for (file, class) in &project.classes {
        let qualified = class.qualified_name();
        if let Some(first) = seen.get(&qualified) {
            report.push(
                ErrorEntry::error(
                    E_DUPLICATE_SYMBOL,
                    format!("Class '{qualified}' is already defined in '{first}'"),
                    file,
                    "$.name",
                )
                .with_suggestion("Rename the class or move it to another namespace"),
            );
        } else {
            seen.insert(qualified, file);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use hdrgen_spec::types::config::HdrgenConfig;
    use pretty_assertions::assert_eq;

    fn class(json: serde_json::Value) -> ClassSpec {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_valid_class() {
        let report = validate_class(&class(serde_json::json!({
            "name": "Module1",
            "namespaces": ["project"],
            "bases": [{ "name": "base::BaseModule" }],
            "methods": [{ "name": "SetName", "qualifiers": { "override": true } }]
        })));
        assert!(report.ok, "{:?}", report.errors);
    }

    #[test]
    fn test_empty_name_reports_name_field() {
        let report = validate_class(&ClassSpec::named(""));
        assert!(!report.ok);
        assert_eq!(report.errors[0].path, "$.name");
    }

    #[test]
    fn test_collects_all_problems() {
        let report = validate_class(&class(serde_json::json!({
            "name": "Widget",
            "namespaces": ["ui kit"],
            "methods": [{ "name": "Draw", "qualifiers": { "override": true } }]
        })));
        let paths: Vec<_> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["$.namespaces[0]", "$.methods[0].qualifiers.override"]
        );
    }

    #[test]
    fn test_project_duplicate_classes() {
        let project = LoadedProject {
            root: PathBuf::from("/tmp/test"),
            config: HdrgenConfig::standalone("test"),
            classes: vec![
                ("a.class.yaml".to_string(), class(serde_json::json!({ "name": "Widget", "namespaces": ["ui"] }))),
                ("b.class.yaml".to_string(), class(serde_json::json!({ "name": "Widget", "namespaces": ["ui"] }))),
                ("c.class.yaml".to_string(), class(serde_json::json!({ "name": "Widget" }))),
            ],
        };

        let report = validate_project(&project);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].file, "b.class.yaml");
        assert_eq!(report.errors[0].code, E_DUPLICATE_SYMBOL);
        assert!(report.errors[0].message.contains("a.class.yaml"));
    }

    #[test]
    fn test_project_entries_carry_file() {
        let project = LoadedProject {
            root: PathBuf::from("/tmp/test"),
            config: HdrgenConfig::standalone("test"),
            classes: vec![("w.class.json".to_string(), ClassSpec::named("1Widget"))],
        };

        let report = validate_project(&project);
        assert!(!report.ok);
        assert_eq!(report.errors[0].file, "w.class.json");
        assert_eq!(report.errors[0].path, "$.name");
    }
}
