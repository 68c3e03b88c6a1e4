use hdrgen_spec::types::class::ClassSpec;
use hdrgen_spec::types::error::{ErrorEntry, ValidationReport, E_OVERRIDE_WITHOUT_BASE};

/// A method marked `override` needs at least one base to override from.
///
/// Base declarations are not available here, so only the presence of a
/// base list is checked.
pub fn check(class: &ClassSpec, report: &mut ValidationReport) {
    if !class.bases.is_empty() {
        return;
    }

    for (i, method) in class.methods.iter().enumerate() {
        if method.qualifiers.is_override {
            report.push(
                ErrorEntry::error(
                    E_OVERRIDE_WITHOUT_BASE,
                    format!(
                        "Method '{}' is marked override but '{}' has no base classes",
                        method.name, class.name
                    ),
                    "",
                    &format!("$.methods[{i}].qualifiers.override"),
                )
                .with_suggestion("Add the base that declares it to 'bases' or drop 'override'"),
            );
        }
    }
}
