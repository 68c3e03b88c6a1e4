use std::sync::OnceLock;

use regex::Regex;

use hdrgen_spec::types::class::{ClassSpec, ParamSpec};
use hdrgen_spec::types::common::TypeSpec;
use hdrgen_spec::types::error::{ErrorEntry, ValidationReport, E_INVALID_IDENTIFIER};

const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "auto", "bool", "break", "case", "catch", "char", "class", "const",
    "constexpr", "continue", "default", "delete", "do", "double", "else", "enum", "explicit",
    "extern", "false", "float", "for", "friend", "goto", "if", "inline", "int", "long",
    "mutable", "namespace", "new", "noexcept", "nullptr", "operator", "private", "protected",
    "public", "return", "short", "signed", "sizeof", "static", "struct", "switch", "template",
    "this", "throw", "true", "try", "typedef", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "while",
];

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"))
}

fn qualified_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(::)?[A-Za-z_][A-Za-z0-9_]*(::[A-Za-z_][A-Za-z0-9_]*)*(<.*>)?$")
            .expect("valid qualified name regex")
    })
}

fn type_chars_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_:<>,*&\[\] ]+$").expect("valid type regex"))
}

/// Whether `name` can be used verbatim as a C++ identifier.
pub fn is_identifier(name: &str) -> bool {
    identifier_re().is_match(name) && !CPP_KEYWORDS.contains(&name)
}

/// Whether `name` is a (possibly namespace-qualified, possibly templated) type name.
pub fn is_qualified_name(name: &str) -> bool {
    qualified_re().is_match(name)
}

/// Whether `ty` is a type expression that can be pasted into a declaration:
/// qualified names, multi-word fundamentals (`unsigned long`), balanced
/// template arguments, `*`, `&` and array extents. Anything else (`;`, `#`,
/// parentheses, line breaks) is rejected.
pub fn is_type_expression(ty: &str) -> bool {
    let ty = ty.trim();
    if ty.is_empty() || !type_chars_re().is_match(ty) {
        return false;
    }

    let mut depth = 0i32;
    for c in ty.chars() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return false;
    }

    ty.split(|c: char| matches!(c, '<' | '>' | ',' | '*' | '&' | '[' | ']' | ' '))
        .filter(|tok| !tok.is_empty())
        .all(|tok| tok.chars().all(|c| c.is_ascii_digit()) || is_qualified_name(tok))
}

/// Check class, namespace, member, method and parameter names.
/// Empty names are left to `required_fields`.
pub fn check(class: &ClassSpec, report: &mut ValidationReport) {
    check_ident(&class.name, "Class name", "$.name", report);

    for (i, segment) in class.namespaces.iter().enumerate() {
        if segment.is_empty() || !is_identifier(segment) {
            report.push(
                ErrorEntry::error(
                    E_INVALID_IDENTIFIER,
                    format!("Namespace segment '{segment}' is not a valid identifier"),
                    "",
                    &format!("$.namespaces[{i}]"),
                )
                .with_suggestion("Use one plain identifier per segment (e.g., ['interfaces', 'module'])"),
            );
        }
    }

    for (i, base) in class.bases.iter().enumerate() {
        if !base.name.is_empty() && !is_qualified_name(&base.name) {
            report.push(ErrorEntry::error(
                E_INVALID_IDENTIFIER,
                format!("Base '{}' is not a valid type name", base.name),
                "",
                &format!("$.bases[{i}].name"),
            ));
        }
    }

    for (i, ctor) in class.constructors.iter().enumerate() {
        check_params(&ctor.params, &format!("$.constructors[{i}]"), report);
    }

    for (i, member) in class.members.iter().enumerate() {
        check_ident(&member.name, "Member name", &format!("$.members[{i}].name"), report);
        check_type(&member.ty, &format!("$.members[{i}].type"), report);
    }

    for (i, method) in class.methods.iter().enumerate() {
        check_ident(&method.name, "Method name", &format!("$.methods[{i}].name"), report);
        check_type(&method.returns, &format!("$.methods[{i}].returns"), report);
        check_params(&method.params, &format!("$.methods[{i}]"), report);
    }
}

fn check_type(ty: &TypeSpec, path: &str, report: &mut ValidationReport) {
    let name = ty.name();
    if name.trim().is_empty() || is_type_expression(name) {
        return;
    }
    report.push(
        ErrorEntry::error(
            E_INVALID_IDENTIFIER,
            format!("Type '{}' is not a valid C++ type expression", name.escape_debug()),
            "",
            path,
        )
        .with_suggestion("Use a type name such as 'int', 'unsigned long' or 'std::vector<std::string>'"),
    );
}

fn check_params(params: &[ParamSpec], owner: &str, report: &mut ValidationReport) {
    for (j, param) in params.iter().enumerate() {
        check_ident(
            &param.name,
            "Parameter name",
            &format!("{owner}.params[{j}].name"),
            report,
        );
        check_type(&param.ty, &format!("{owner}.params[{j}].type"), report);
    }
}

fn check_ident(name: &str, what: &str, path: &str, report: &mut ValidationReport) {
    if name.is_empty() || is_identifier(name) {
        return;
    }
    report.push(
        ErrorEntry::error(
            E_INVALID_IDENTIFIER,
            format!("{what} '{name}' is not a valid C++ identifier"),
            "",
            path,
        )
        .with_suggestion("Use letters, digits and underscores, not starting with a digit or a keyword"),
    );
}
