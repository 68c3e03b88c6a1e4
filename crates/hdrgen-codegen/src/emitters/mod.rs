pub mod header;
pub mod source;

pub use header::{header_guard, HeaderEmitter};
pub use source::SourceEmitter;

use hdrgen_spec::types::class::{ClassSpec, ParamSpec};

use crate::context::EmitContext;

/// Description text, or `placeholder` when none was given.
pub(crate) fn brief<'a>(description: Option<&'a str>, placeholder: &'a str) -> &'a str {
    match description {
        Some(text) if !text.trim().is_empty() => text.trim(),
        _ => placeholder,
    }
}

/// `/// @brief` block followed by one `/// @param` line per parameter.
pub(crate) fn doc_block(
    ctx: &EmitContext,
    description: Option<&str>,
    placeholder: &str,
    params: &[ParamSpec],
) -> Vec<String> {
    let mut lines = Vec::new();
    push_tagged(ctx, &mut lines, "@brief", brief(description, placeholder));
    for param in params {
        let tag = format!("@param {}", param.name);
        push_tagged(ctx, &mut lines, &tag, brief(param.description.as_deref(), "Param description"));
    }
    lines
}

/// `/// <tag> <first line>`, then one `///` line per remaining line of `text`.
fn push_tagged(ctx: &EmitContext, lines: &mut Vec<String>, tag: &str, text: &str) {
    let mut rest = text.lines();
    lines.push(ctx.line(format!("/// {tag} {}", rest.next().unwrap_or_default().trim_end())));
    for line in rest {
        lines.push(ctx.line(format!("/// {}", line.trim_end()).trim_end()));
    }
}

/// `const std::string& new_name, int flag`
pub(crate) fn param_list(params: &[ParamSpec]) -> String {
    params
        .iter()
        .map(|p| p.ty.declare(&p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn open_namespaces(class: &ClassSpec) -> Vec<String> {
    class
        .namespaces
        .iter()
        .map(|ns| format!("namespace {ns} {{"))
        .collect()
}

pub(crate) fn close_namespaces(class: &ClassSpec) -> Vec<String> {
    class
        .namespaces
        .iter()
        .rev()
        .map(|ns| format!("}} // namespace {ns}"))
        .collect()
}
