use std::collections::HashSet;

use hdrgen_spec::types::class::ClassSpec;
use hdrgen_spec::types::error::{ErrorEntry, ValidationReport, E_DUPLICATE_SYMBOL};

/// Warn about members declared twice and methods whose signatures collide.
/// Overloads with different parameter types are fine.
pub fn check(class: &ClassSpec, report: &mut ValidationReport) {
    let mut members = HashSet::new();
    for (i, member) in class.members.iter().enumerate() {
        if !members.insert(member.name.as_str()) {
            report.push(ErrorEntry::warning(
                E_DUPLICATE_SYMBOL,
                format!("Member '{}' is declared more than once", member.name),
                "",
                &format!("$.members[{i}]"),
            ));
        }
    }

    let mut signatures = HashSet::new();
    for (i, method) in class.methods.iter().enumerate() {
        let params: Vec<String> = method.params.iter().map(|p| p.ty.render()).collect();
        let key = (method.name.as_str(), params, method.qualifiers.is_const);
        if !signatures.insert(key) {
            report.push(ErrorEntry::warning(
                E_DUPLICATE_SYMBOL,
                format!("Method '{}' is declared more than once with the same signature", method.name),
                "",
                &format!("$.methods[{i}]"),
            ));
        }
    }

    let mut ctors = HashSet::new();
    for (i, ctor) in class.constructors.iter().enumerate() {
        let params: Vec<String> = ctor.params.iter().map(|p| p.ty.render()).collect();
        if !ctors.insert(params) {
            report.push(ErrorEntry::warning(
                E_DUPLICATE_SYMBOL,
                "Constructor is declared more than once with the same parameters",
                "",
                &format!("$.constructors[{i}]"),
            ));
        }
    }
}
