use hdrgen_spec::types::class::{ClassSpec, DeclKind, MethodSpec};
use hdrgen_spec::types::common::TypeSpec;

use super::{close_namespaces, open_namespaces, param_list};
use crate::context::EmitContext;
use crate::traits::{ArtifactEmitter, ArtifactKind};

/// Emits the companion source file with empty definitions.
///
/// Pure virtual methods get no definition; a pure virtual destructor still
/// does, since derived destructors call it.
#[derive(Debug, Clone)]
pub struct SourceEmitter {
    extension: String,
    header_extension: String,
}

impl Default for SourceEmitter {
    fn default() -> Self {
        Self::new("cpp", "h")
    }
}

impl SourceEmitter {
    pub fn new(extension: impl Into<String>, header_extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            header_extension: header_extension.into(),
        }
    }

    fn body(&self, signature: String, statements: &[String], ctx: &mut EmitContext) -> Vec<String> {
        let mut lines = vec![signature, "{".to_string()];
        ctx.push_indent();
        lines.extend(statements.iter().map(|stmt| ctx.line(stmt)));
        ctx.pop_indent();
        lines.push("}".to_string());
        lines
    }

    fn method(&self, class: &ClassSpec, method: &MethodSpec, ctx: &mut EmitContext) -> Vec<String> {
        let q = &method.qualifiers;
        let mut sig = format!(
            "{} {}::{}({})",
            method.returns.render(),
            class.name,
            method.name,
            param_list(&method.params)
        );
        if q.is_const {
            sig.push_str(" const");
        }
        if q.noexcept {
            sig.push_str(" noexcept");
        }

        self.body(sig, &return_statements(&method.returns), ctx)
    }
}

/// Statements that make a stub body return a value of type `ty`.
///
/// Reference returns bind to a function-local static so the stub never
/// returns a dangling reference.
pub(crate) fn return_statements(ty: &TypeSpec) -> Vec<String> {
    let rendered = ty.render();
    let rendered = rendered.trim_end();

    let unqualified: Vec<&str> = rendered
        .split_whitespace()
        .filter(|tok| !matches!(*tok, "const" | "volatile"))
        .collect();
    if unqualified == ["void"] {
        return Vec::new();
    }

    if let Some(referent) = rendered.strip_suffix("&&") {
        let referent = referent.trim_end();
        vec![
            format!("static {referent} value{{}};"),
            format!("return static_cast<{referent}&&>(value);"),
        ]
    } else if let Some(referent) = rendered.strip_suffix('&') {
        vec![
            format!("static {} value{{}};", referent.trim_end()),
            "return value;".to_string(),
        ]
    } else {
        vec!["return {};".to_string()]
    }
}

impl ArtifactEmitter for SourceEmitter {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Source
    }

    fn file_extension(&self) -> &str {
        &self.extension
    }

    fn applies_to(&self, class: &ClassSpec) -> bool {
        class.kind == DeclKind::Class
    }

    fn emit(&self, class: &ClassSpec, ctx: &mut EmitContext) -> String {
        let mut out = vec![
            format!("#include \"{}.{}\"", class.name, self.header_extension),
            String::new(),
            String::new(),
        ];

        if !class.namespaces.is_empty() {
            out.extend(open_namespaces(class));
            out.push(String::new());
            out.push(String::new());
        }

        let mut definitions: Vec<Vec<String>> = Vec::new();

        for ctor in &class.constructors {
            let noexcept = if ctor.noexcept { " noexcept" } else { "" };
            let sig = format!(
                "{0}::{0}({1}){noexcept}",
                class.name,
                param_list(&ctor.params)
            );
            definitions.push(self.body(sig, &[], ctx));
        }

        if let Some(dtor) = &class.destructor {
            let noexcept = if dtor.noexcept { " noexcept" } else { "" };
            let sig = format!("{0}::~{0}(){noexcept}", class.name);
            definitions.push(self.body(sig, &[], ctx));
        }

        for method in &class.methods {
            if method.qualifiers.pure_virtual {
                continue;
            }
            definitions.push(self.method(class, method, ctx));
        }

        for def in definitions {
            out.extend(def);
            out.push(String::new());
        }
        while out.last().is_some_and(|l| l.is_empty()) {
            out.pop();
        }

        if !class.namespaces.is_empty() {
            out.push(String::new());
            out.push(String::new());
            out.extend(close_namespaces(class));
        }

        let mut text = out.join("\n");
        text.push('\n');
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::IndentStyle;
    use pretty_assertions::assert_eq;

    fn render(class: &ClassSpec) -> String {
        let mut ctx = EmitContext::new(IndentStyle::Spaces(4));
        SourceEmitter::default().emit(class, &mut ctx)
    }

    #[test]
    fn test_source_definitions() {
        let class: ClassSpec = serde_json::from_value(serde_json::json!({
            "name": "Module1",
            "namespaces": ["project"],
            "abstractBase": true,
            "bases": [{ "name": "base::BaseModule" }],
            "constructors": [{}, { "explicit": true, "noexcept": true, "params": [{ "name": "flag", "type": "int" }] }],
            "destructor": { "noexcept": true },
            "methods": [
                { "name": "Start" },
                { "name": "Count", "returns": "int", "qualifiers": { "const": true, "override": true } },
                { "name": "Stop", "qualifiers": { "pureVirtual": true } }
            ]
        }))
        .unwrap();

        let expected = "\
#include \"Module1.h\"


namespace project {


Module1::Module1()
{
}

Module1::Module1(int flag) noexcept
{
}

Module1::~Module1() noexcept
{
}

void Module1::Start()
{
}

int Module1::Count() const
{
    return {};
}


} // namespace project
";
        assert_eq!(render(&class), expected);
    }

    #[test]
    fn test_reference_return_binds_static() {
        let class: ClassSpec = serde_json::from_value(serde_json::json!({
            "name": "Registry",
            "methods": [
                { "name": "Get", "returns": { "name": "Entry", "stereotypes": ["lval_reference"] } },
                { "name": "Name", "returns": "const std::string&" },
                { "name": "Take", "returns": { "name": "Entry", "stereotypes": ["rval_reference"] } }
            ]
        }))
        .unwrap();

        let text = render(&class);
        assert!(text.contains(
            "Entry& Registry::Get()\n{\n    static Entry value{};\n    return value;\n}\n"
        ));
        assert!(text.contains(
            "const std::string& Registry::Name()\n{\n    static const std::string value{};\n    return value;\n}\n"
        ));
        assert!(text.contains(
            "Entry&& Registry::Take()\n{\n    static Entry value{};\n    return static_cast<Entry&&>(value);\n}\n"
        ));
        assert!(!text.contains("namespace"));
    }

    #[test]
    fn test_only_classes_get_sources() {
        let emitter = SourceEmitter::default();
        assert!(emitter.applies_to(&ClassSpec::named("Widget")));
        assert!(!emitter.applies_to(&ClassSpec::enumeration("Color")));

        let mut iface = ClassSpec::named("IRuntime");
        iface.kind = DeclKind::Interface;
        assert!(!emitter.applies_to(&iface));
    }

    #[test]
    fn test_void_pointer_return_gets_value() {
        let class: ClassSpec = serde_json::from_value(serde_json::json!({
            "name": "Buf",
            "methods": [
                { "name": "Data", "returns": { "name": "void", "stereotypes": ["pointer"] } },
                { "name": "Raw", "returns": "void *" },
                { "name": "Reset", "returns": { "name": "void", "stereotypes": ["const"] } }
            ]
        }))
        .unwrap();

        let text = render(&class);
        assert!(text.contains("void* Buf::Data()\n{\n    return {};\n}\n"));
        assert!(text.contains("void * Buf::Raw()\n{\n    return {};\n}\n"));
        assert!(text.contains("const void Buf::Reset()\n{\n}\n"));
    }
}
