use indexmap::IndexMap;

use hdrgen_spec::types::class::ClassSpec;
use hdrgen_spec::types::config::IncludeMapConfig;

use crate::context::EmitContext;

/// Words that can appear in a type but never name one.
const TYPE_KEYWORDS: &[&str] = &["const", "volatile", "unsigned", "signed", "long", "short"];

/// Maps type names used by a class to the headers that declare them.
#[derive(Debug, Clone, Default)]
pub struct IncludeResolver {
    system: IndexMap<String, String>,
    project: IndexMap<String, String>,
}

impl IncludeResolver {
    pub fn new(system: IndexMap<String, String>, project: IndexMap<String, String>) -> Self {
        Self { system, project }
    }

    /// Built-in standard mappings plus the configured ones.
    pub fn from_config(config: &IncludeMapConfig) -> Self {
        Self::new(config.effective_system(), config.project.clone())
    }

    /// Record the class's explicit includes, then every header its types need.
    ///
    /// Bases come first, then members, constructor parameters, and method
    /// signatures, each in declaration order.
    pub fn collect(&self, class: &ClassSpec, ctx: &mut EmitContext) {
        for header in &class.includes.system {
            ctx.add_system_include(header.as_str());
        }
        for header in &class.includes.project {
            ctx.add_project_include(header.as_str());
        }

        for base in &class.bases {
            self.resolve_type(&base.name, ctx);
        }
        if let Some(underlying) = class.enumeration.as_ref().and_then(|e| e.underlying.as_deref()) {
            self.resolve_type(underlying, ctx);
        }
        for member in &class.members {
            self.resolve_type(member.ty.name(), ctx);
        }
        for ctor in &class.constructors {
            for param in &ctor.params {
                self.resolve_type(param.ty.name(), ctx);
            }
        }
        for method in &class.methods {
            self.resolve_type(method.returns.name(), ctx);
            for param in &method.params {
                self.resolve_type(param.ty.name(), ctx);
            }
        }
    }

    fn resolve_type(&self, ty: &str, ctx: &mut EmitContext) {
        for name in type_names(ty) {
            if let Some(header) = self.system.get(name) {
                ctx.add_system_include(header.as_str());
            } else if let Some(header) = self.project.get(name) {
                ctx.add_project_include(header.as_str());
            }
        }
    }
}

/// Split a type expression into the names it mentions, template arguments included.
/// `const std::map<std::string, Foo*>&` yields `std::map`, `std::string`, `Foo`.
pub fn type_names(ty: &str) -> Vec<&str> {
    ty.split(|c: char| matches!(c, '<' | '>' | ',' | '*' | '&' | '(' | ')' | '[' | ']') || c.is_whitespace())
        .filter(|tok| !tok.is_empty() && !TYPE_KEYWORDS.contains(tok))
        .filter(|tok| !tok.chars().all(|c| c.is_ascii_digit()))
        .collect()
}
