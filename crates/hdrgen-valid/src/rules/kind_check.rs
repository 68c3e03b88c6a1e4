use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use hdrgen_spec::types::class::{ClassSpec, DeclKind, EnumConstant};
use hdrgen_spec::types::common::Access;
use hdrgen_spec::types::error::{
    ErrorEntry, ValidationReport, E_DUPLICATE_SYMBOL, E_INVALID_IDENTIFIER, E_KIND_MISMATCH, E_MISSING_FIELD,
};

use super::identifiers::{is_identifier, is_type_expression};

fn constant_expr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_:+\-*/%<>()|&^~ ]+$").expect("valid constant expression regex"))
}

/// Reject parts a declaration kind cannot hold, and check enumerators.
pub fn check(class: &ClassSpec, report: &mut ValidationReport) {
    match class.kind {
        DeclKind::Class => {
            if class.enumeration.is_some() {
                report.push(
                    mismatch(class, "enumerators", "$.evalues")
                        .with_suggestion("Set 'kind: enum' or remove 'evalues'"),
                );
            }
        }
        DeclKind::Interface => check_interface(class, report),
        DeclKind::Enum => check_enum(class, report),
    }
}

fn mismatch(class: &ClassSpec, what: &str, path: &str) -> ErrorEntry {
    ErrorEntry::error(
        E_KIND_MISMATCH,
        format!("{} '{}' cannot declare {what}", class.kind.as_str(), class.name),
        "",
        path,
    )
}

fn check_interface(class: &ClassSpec, report: &mut ValidationReport) {
    if !class.members.is_empty() {
        report.push(
            mismatch(class, "data members", "$.members")
                .with_suggestion("Use 'kind: class' for types with state"),
        );
    }
    if !class.constructors.is_empty() {
        report.push(mismatch(class, "constructors", "$.constructors"));
    }
    if class.enumeration.is_some() {
        report.push(mismatch(class, "enumerators", "$.evalues"));
    }
    for (i, method) in class.methods.iter().enumerate() {
        if method.access != Access::Public {
            report.push(
                ErrorEntry::error(
                    E_KIND_MISMATCH,
                    format!(
                        "Interface method '{}' must be public, not {}",
                        method.name, method.access
                    ),
                    "",
                    &format!("$.methods[{i}].access"),
                )
                .with_suggestion("Drop 'access'; interface methods are public"),
            );
        }
    }
}

fn check_enum(class: &ClassSpec, report: &mut ValidationReport) {
    let parts = [
        (!class.bases.is_empty(), "base classes", "$.bases"),
        (!class.constructors.is_empty(), "constructors", "$.constructors"),
        (class.destructor.is_some(), "a destructor", "$.destructor"),
        (!class.members.is_empty(), "data members", "$.members"),
        (!class.methods.is_empty(), "methods", "$.methods"),
        (class.abstract_base, "an abstract destructor", "$.abstractBase"),
    ];
    for (present, what, path) in parts {
        if present {
            report.push(mismatch(class, what, path));
        }
    }

    let Some(spec) = &class.enumeration else {
        report.push(ErrorEntry::warning(
            E_MISSING_FIELD,
            format!("Enum '{}' has no enumerators", class.name),
            "",
            "$.evalues",
        ));
        return;
    };

    if let Some(underlying) = &spec.underlying {
        if !is_type_expression(underlying) {
            report.push(
                ErrorEntry::error(
                    E_INVALID_IDENTIFIER,
                    format!("Underlying type '{}' is not a valid C++ type", underlying.escape_debug()),
                    "",
                    "$.evalues.underlying",
                )
                .with_suggestion("Use an integer type such as 'int' or 'std::uint8_t'"),
            );
        }
    }

    if spec.values.is_empty() {
        report.push(ErrorEntry::warning(
            E_MISSING_FIELD,
            format!("Enum '{}' has no enumerators", class.name),
            "",
            "$.evalues.values",
        ));
    }

    let mut seen = HashSet::new();
    for (i, value) in spec.values.iter().enumerate() {
        let path = format!("$.evalues.values[{i}]");
        if value.name.trim().is_empty() {
            report.push(ErrorEntry::error(
                E_MISSING_FIELD,
                "Enumerator name is required",
                "",
                &format!("{path}.name"),
            ));
        } else if !is_identifier(&value.name) {
            report.push(ErrorEntry::error(
                E_INVALID_IDENTIFIER,
                format!("Enumerator '{}' is not a valid C++ identifier", value.name),
                "",
                &format!("{path}.name"),
            ));
        } else if !seen.insert(value.name.as_str()) {
            report.push(ErrorEntry::error(
                E_DUPLICATE_SYMBOL,
                format!("Enumerator '{}' is declared more than once", value.name),
                "",
                &format!("{path}.name"),
            ));
        }

        if let Some(EnumConstant::Expr(expr)) = &value.value {
            if !constant_expr_re().is_match(expr.trim()) {
                report.push(
                    ErrorEntry::error(
                        E_INVALID_IDENTIFIER,
                        format!("Enumerator value '{}' is not a constant expression", expr.escape_debug()),
                        "",
                        &format!("{path}.value"),
                    )
                    .with_suggestion("Use an integer or an expression over earlier enumerators"),
                );
            }
        }
    }
}
