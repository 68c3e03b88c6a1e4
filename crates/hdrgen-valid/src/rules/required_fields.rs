use hdrgen_spec::types::class::{ClassSpec, ParamSpec};
use hdrgen_spec::types::error::{ErrorEntry, ValidationReport, E_MISSING_FIELD};

/// Check that every named element of a class actually has a name.
pub fn check(class: &ClassSpec, report: &mut ValidationReport) {
    if class.name.trim().is_empty() {
        report.push(
            ErrorEntry::error(E_MISSING_FIELD, "Class name is required", "", "$.name")
                .with_suggestion("Add a 'name' field to the class description"),
        );
    }

    for (i, base) in class.bases.iter().enumerate() {
        if base.name.trim().is_empty() {
            report.push(ErrorEntry::error(
                E_MISSING_FIELD,
                "Base class name is required",
                "",
                &format!("$.bases[{i}].name"),
            ));
        }
    }

    for (i, ctor) in class.constructors.iter().enumerate() {
        check_params(&ctor.params, &format!("$.constructors[{i}]"), report);
    }

    for (i, member) in class.members.iter().enumerate() {
        if member.name.trim().is_empty() {
            report.push(ErrorEntry::error(
                E_MISSING_FIELD,
                "Member name is required",
                "",
                &format!("$.members[{i}].name"),
            ));
        }
        if member.ty.name().trim().is_empty() {
            report.push(
                ErrorEntry::error(
                    E_MISSING_FIELD,
                    format!("Member '{}' has an empty type", member.name),
                    "",
                    &format!("$.members[{i}].type"),
                )
                .with_suggestion("Set 'type' (e.g., 'int' or 'std::string')"),
            );
        }
    }

    for (i, method) in class.methods.iter().enumerate() {
        if method.name.trim().is_empty() {
            report.push(ErrorEntry::error(
                E_MISSING_FIELD,
                "Method name is required",
                "",
                &format!("$.methods[{i}].name"),
            ));
        }
        check_params(&method.params, &format!("$.methods[{i}]"), report);
    }

    if class.abstract_base && class.destructor.is_none() {
        report.push(
            ErrorEntry::warning(
                E_MISSING_FIELD,
                format!(
                    "Class '{}' is marked abstract but declares no destructor",
                    class.name
                ),
                "",
                "$.destructor",
            )
            .with_suggestion("Add a 'destructor' entry to emit a pure virtual destructor"),
        );
    }
}

fn check_params(params: &[ParamSpec], owner: &str, report: &mut ValidationReport) {
    for (j, param) in params.iter().enumerate() {
        if param.name.trim().is_empty() {
            report.push(ErrorEntry::error(
                E_MISSING_FIELD,
                "Parameter name is required",
                "",
                &format!("{owner}.params[{j}].name"),
            ));
        }
        if param.ty.name().trim().is_empty() {
            report.push(ErrorEntry::error(
                E_MISSING_FIELD,
                format!("Parameter '{}' has an empty type", param.name),
                "",
                &format!("{owner}.params[{j}].type"),
            ));
        }
    }
}
