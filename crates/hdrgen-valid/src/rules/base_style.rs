use hdrgen_spec::types::class::{BaseListStyle, ClassSpec};
use hdrgen_spec::types::error::{ErrorEntry, ValidationReport, E_BASE_STYLE};

/// Virtual inheritance is only rendered in the trailing base-list style,
/// so an explicit leading style cannot carry virtual bases.
pub fn check(class: &ClassSpec, report: &mut ValidationReport) {
    if class.base_style != Some(BaseListStyle::Leading) {
        return;
    }

    for (i, base) in class.bases.iter().enumerate() {
        if base.is_virtual {
            report.push(
                ErrorEntry::error(
                    E_BASE_STYLE,
                    format!(
                        "Base '{}' is virtual but the base list style is 'leading'",
                        base.name
                    ),
                    "",
                    &format!("$.bases[{i}].virtual"),
                )
                .with_suggestion("Set 'baseStyle' to 'trailing' or drop it to let it be derived"),
            );
        }
    }
}
