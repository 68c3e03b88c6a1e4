use hdrgen_spec::types::class::{ClassSpec, ParamSpec};
use hdrgen_spec::types::common::TypeSpec;
use hdrgen_spec::types::error::{ErrorEntry, ValidationReport, E_INVALID_ARRAY};

/// Check uses of the `array` stereotype.
///
/// Functions cannot return arrays, members need a length, and an
/// `extent` without `array` is ignored.
pub fn check(class: &ClassSpec, report: &mut ValidationReport) {
    for (i, member) in class.members.iter().enumerate() {
        let path = format!("$.members[{i}].type");
        check_extent(&member.ty, &path, report);
        if member.ty.is_array() && member.ty.extent().is_none() {
            report.push(
                ErrorEntry::error(
                    E_INVALID_ARRAY,
                    format!("Array member '{}' needs an extent", member.name),
                    "",
                    &path,
                )
                .with_suggestion("Add 'extent: N' to the type"),
            );
        }
    }

    for (i, ctor) in class.constructors.iter().enumerate() {
        check_params(&ctor.params, &format!("$.constructors[{i}]"), report);
    }

    for (i, method) in class.methods.iter().enumerate() {
        let path = format!("$.methods[{i}].returns");
        check_extent(&method.returns, &path, report);
        if method.returns.is_array() {
            report.push(
                ErrorEntry::error(
                    E_INVALID_ARRAY,
                    format!("Method '{}' cannot return an array", method.name),
                    "",
                    &path,
                )
                .with_suggestion("Return std::array or a pointer instead"),
            );
        }
        check_params(&method.params, &format!("$.methods[{i}]"), report);
    }
}

fn check_params(params: &[ParamSpec], owner: &str, report: &mut ValidationReport) {
    for (j, param) in params.iter().enumerate() {
        check_extent(&param.ty, &format!("{owner}.params[{j}].type"), report);
    }
}

fn check_extent(ty: &TypeSpec, path: &str, report: &mut ValidationReport) {
    match ty.extent() {
        Some(0) if ty.is_array() => report.push(ErrorEntry::error(
            E_INVALID_ARRAY,
            "Array extent must be at least 1",
            "",
            path,
        )),
        Some(_) if !ty.is_array() => report.push(ErrorEntry::warning(
            E_INVALID_ARRAY,
            format!("'{}' has an extent but no 'array' stereotype", ty.name()),
            "",
            path,
        )),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdrgen_spec::types::common::Severity;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_array_rules() {
        let class: ClassSpec = serde_json::from_value(serde_json::json!({
            "name": "Frame",
            "members": [
                { "name": "pixels", "type": { "name": "int", "stereotypes": ["array"], "extent": 4 } },
                { "name": "open", "type": { "name": "int", "stereotypes": ["array"] } },
                { "name": "stray", "type": { "name": "int", "extent": 2 } }
            ],
            "methods": [
                { "name": "Rows", "returns": { "name": "int", "stereotypes": ["array"], "extent": 2 } },
                {
                    "name": "Fill",
                    "params": [
                        { "name": "values", "type": { "name": "int", "stereotypes": ["const", "array"] } },
                        { "name": "none", "type": { "name": "int", "stereotypes": ["array"], "extent": 0 } }
                    ]
                }
            ]
        }))
        .unwrap();

        let mut report = ValidationReport::success();
        check(&class, &mut report);

        let found: Vec<_> = report
            .errors
            .iter()
            .map(|e| (e.path.as_str(), e.severity))
            .collect();
        assert_eq!(
            found,
            vec![
                ("$.members[1].type", Severity::Error),
                ("$.members[2].type", Severity::Warning),
                ("$.methods[0].returns", Severity::Error),
                ("$.methods[1].params[1].type", Severity::Error),
            ]
        );
    }
}
