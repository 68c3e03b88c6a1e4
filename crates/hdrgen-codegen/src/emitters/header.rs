use hdrgen_spec::types::class::{
    BaseListStyle, ClassSpec, ConstructorSpec, DeclKind, DestructorSpec, EnumSpec, MemberSpec, MethodSpec,
};
use hdrgen_spec::types::common::Access;

use super::{close_namespaces, doc_block, open_namespaces, param_list};
use crate::context::EmitContext;
use crate::includes::IncludeResolver;
use crate::traits::{ArtifactEmitter, ArtifactKind};

/// Include guard token: namespaces, class name and `H`, upper-cased and joined by `_`.
pub fn header_guard(class: &ClassSpec) -> String {
    class
        .namespaces
        .iter()
        .map(String::as_str)
        .chain([class.name.as_str(), "H"])
        .map(str::to_uppercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Emits the class declaration header.
#[derive(Debug, Clone)]
pub struct HeaderEmitter {
    extension: String,
    resolver: IncludeResolver,
}

impl Default for HeaderEmitter {
    fn default() -> Self {
        Self::new("h", IncludeResolver::from_config(&Default::default()))
    }
}

impl HeaderEmitter {
    pub fn new(extension: impl Into<String>, resolver: IncludeResolver) -> Self {
        Self {
            extension: extension.into(),
            resolver,
        }
    }

    fn class_head(&self, class: &ClassSpec, ctx: &mut EmitContext) -> Vec<String> {
        if class.bases.is_empty() {
            return vec![format!("class {}", class.name)];
        }

        ctx.push_indent();
        let lines = match class.resolved_base_style() {
            BaseListStyle::Leading => {
                let mut lines = vec![format!("class {}", class.name)];
                for (i, base) in class.bases.iter().enumerate() {
                    let lead = if i == 0 { ':' } else { ',' };
                    lines.push(ctx.line(format!("{lead} {} {}", base.access, base.name)));
                }
                lines
            }
            BaseListStyle::Trailing => {
                let all_virtual = class.has_virtual_bases();
                let mut lines = vec![format!("class {} :", class.name)];
                let last = class.bases.len() - 1;
                for (i, base) in class.bases.iter().enumerate() {
                    let virt = if all_virtual { "virtual " } else { "" };
                    let comma = if i == last { "" } else { "," };
                    lines.push(ctx.line(format!("{virt}{} {}{comma}", base.access, base.name)));
                }
                lines
            }
        };
        ctx.pop_indent();
        lines
    }

    fn constructor(&self, class: &ClassSpec, ctor: &ConstructorSpec, ctx: &EmitContext) -> Vec<String> {
        let placeholder = if ctor.params.is_empty() {
            "Default constructor description"
        } else {
            "Constructor description"
        };
        let mut lines = doc_block(ctx, ctor.description.as_deref(), placeholder, &ctor.params);

        let explicit = if ctor.explicit { "explicit " } else { "" };
        let noexcept = if ctor.noexcept { " noexcept" } else { "" };
        lines.push(ctx.line(format!(
            "{explicit}{}({}){noexcept};",
            class.name,
            param_list(&ctor.params)
        )));
        lines
    }

    fn destructor(&self, class: &ClassSpec, dtor: &DestructorSpec, ctx: &EmitContext) -> Vec<String> {
        let mut lines = doc_block(ctx, dtor.description.as_deref(), "Destructor description", &[]);

        let virt = if dtor.is_virtual || class.abstract_base { "virtual " } else { "" };
        let noexcept = if dtor.noexcept { " noexcept" } else { "" };
        let pure = if class.abstract_base { " = 0" } else { "" };
        lines.push(ctx.line(format!("{virt}~{}(){noexcept}{pure};", class.name)));
        lines
    }

    fn member(&self, member: &MemberSpec, ctx: &EmitContext) -> Vec<String> {
        let mut lines = doc_block(ctx, member.description.as_deref(), "Member description", &[]);
        lines.push(ctx.line(format!("{};", member.ty.declare(&member.name))));
        lines
    }

    fn method(&self, method: &MethodSpec, ctx: &EmitContext) -> Vec<String> {
        self.method_decl(method, method.qualifiers.pure_virtual, ctx)
    }

    fn method_decl(&self, method: &MethodSpec, pure: bool, ctx: &EmitContext) -> Vec<String> {
        let mut lines = doc_block(ctx, method.description.as_deref(), "Method description", &method.params);

        let q = &method.qualifiers;
        let mut sig = String::new();
        if pure || q.declares_virtual() {
            sig.push_str("virtual ");
        }
        sig.push_str(&format!(
            "{} {}({})",
            method.returns.render(),
            method.name,
            param_list(&method.params)
        ));
        if q.is_const {
            sig.push_str(" const");
        }
        if q.noexcept {
            sig.push_str(" noexcept");
        }
        if q.is_override {
            sig.push_str(" override");
        }
        if pure {
            sig.push_str(" = 0");
        }
        sig.push(';');
        lines.push(ctx.line(sig));
        lines
    }

    fn class_body(&self, class: &ClassSpec, ctx: &mut EmitContext) -> Vec<String> {
        let mut out = doc_block(ctx, class.description.as_deref(), "Class description", &[]);
        out.extend(self.class_head(class, ctx));
        out.push("{".to_string());

        ctx.push_indent();

        out.push("// -- Constructors & Destructor --".to_string());
        out.push("public:".to_string());
        out.push(String::new());
        for ctor in &class.constructors {
            out.extend(self.constructor(class, ctor, ctx));
            out.push(String::new());
        }
        if let Some(dtor) = &class.destructor {
            out.extend(self.destructor(class, dtor, ctx));
            out.push(String::new());
        }

        out.push("// -- Members --".to_string());
        for access in Access::ALL {
            out.push(format!("{access}:"));
            out.push(String::new());
            for member in class.members_in(access) {
                out.extend(self.member(member, ctx));
                out.push(String::new());
            }
        }

        out.push("// -- Methods --".to_string());
        for access in Access::ALL {
            out.push(format!("{access}:"));
            out.push(String::new());
            for method in class.methods_in(access) {
                out.extend(self.method(method, ctx));
                out.push(String::new());
            }
        }

        ctx.pop_indent();

        out.push(format!("}}; // class {}", class.name));
        out
    }

    /// Public virtual destructor, then every method as a public pure virtual.
    fn interface_body(&self, class: &ClassSpec, ctx: &mut EmitContext) -> Vec<String> {
        let mut out = doc_block(ctx, class.description.as_deref(), "Interface description", &[]);
        out.extend(self.class_head(class, ctx));
        out.push("{".to_string());

        ctx.push_indent();

        out.push("// -- Destructor --".to_string());
        out.push("public:".to_string());
        out.push(String::new());
        let dtor = class.destructor.clone().unwrap_or_default();
        out.extend(doc_block(ctx, dtor.description.as_deref(), "Destructor description", &[]));
        let noexcept = if dtor.noexcept { " noexcept" } else { "" };
        out.push(ctx.line(format!("virtual ~{}(){noexcept} = default;", class.name)));
        out.push(String::new());

        out.push("// -- Methods --".to_string());
        out.push("public:".to_string());
        out.push(String::new());
        for method in &class.methods {
            out.extend(self.method_decl(method, true, ctx));
            out.push(String::new());
        }

        ctx.pop_indent();

        out.push(format!("}}; // class {}", class.name));
        out
    }

    fn enum_body(&self, class: &ClassSpec, ctx: &mut EmitContext) -> Vec<String> {
        let empty = EnumSpec::default();
        let spec = class.enumeration.as_ref().unwrap_or(&empty);

        let mut out = doc_block(ctx, class.description.as_deref(), "Enum description", &[]);
        match &spec.underlying {
            Some(underlying) => out.push(format!("enum class {} : {underlying}", class.name)),
            None => out.push(format!("enum class {}", class.name)),
        }
        out.push("{".to_string());

        ctx.push_indent();
        for value in &spec.values {
            out.extend(doc_block(ctx, value.description.as_deref(), "Value description", &[]));
            match &value.value {
                Some(init) => out.push(ctx.line(format!("{} = {init},", value.name))),
                None => out.push(ctx.line(format!("{},", value.name))),
            }
        }
        ctx.pop_indent();

        out.push(format!("}}; // enum class {}", class.name));
        out
    }
}

impl ArtifactEmitter for HeaderEmitter {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Header
    }

    fn file_extension(&self) -> &str {
        &self.extension
    }

    fn emit(&self, class: &ClassSpec, ctx: &mut EmitContext) -> String {
        let guard = header_guard(class);
        self.resolver.collect(class, ctx);

        let mut out = vec![
            format!("#ifndef {guard}"),
            format!("#define {guard}"),
            String::new(),
            String::new(),
            "// System includes".to_string(),
        ];
        out.extend(ctx.system_includes().iter().map(|h| format!("#include <{h}>")));
        out.push(String::new());
        out.push("// Project includes".to_string());
        out.extend(ctx.project_includes().iter().map(|h| format!("#include \"{h}\"")));
        out.push(String::new());
        out.push(String::new());

        if !class.namespaces.is_empty() {
            out.extend(open_namespaces(class));
            out.push(String::new());
            out.push(String::new());
        }

        match class.kind {
            DeclKind::Class => out.extend(self.class_body(class, ctx)),
            DeclKind::Interface => out.extend(self.interface_body(class, ctx)),
            DeclKind::Enum => out.extend(self.enum_body(class, ctx)),
        }
        out.push(String::new());
        out.push(String::new());

        if !class.namespaces.is_empty() {
            out.extend(close_namespaces(class));
            out.push(String::new());
            out.push(String::new());
        }

        out.push(format!("#endif // {guard}"));

        let mut text = out.join("\n");
        text.push('\n');
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::IndentStyle;
    use hdrgen_spec::types::class::BaseSpec;
    use pretty_assertions::assert_eq;

    fn render(class: &ClassSpec) -> String {
        let mut ctx = EmitContext::new(IndentStyle::Spaces(4));
        HeaderEmitter::default().emit(class, &mut ctx)
    }

    fn base(name: &str, is_virtual: bool) -> BaseSpec {
        BaseSpec {
            name: name.to_string(),
            access: Access::Public,
            is_virtual,
        }
    }

    #[test]
    fn test_header_guard() {
        let mut class = ClassSpec::named("Module1");
        assert_eq!(header_guard(&class), "MODULE1_H");
        class.namespaces = vec!["interfaces".to_string(), "module".to_string()];
        assert_eq!(header_guard(&class), "INTERFACES_MODULE_MODULE1_H");
    }

    #[test]
    fn test_leading_base_list() {
        let mut class = ClassSpec::named("Module1");
        class.bases = vec![base("base::BaseModule", false), base("interfaces::IRuntime", false)];
        let text = render(&class);
        assert!(text.contains(
            "class Module1\n    : public base::BaseModule\n    , public interfaces::IRuntime\n{\n"
        ));
    }

    #[test]
    fn test_trailing_base_list_marks_all_virtual() {
        let mut class = ClassSpec::named("Module1");
        class.bases = vec![base("base::BaseModule", false), base("interfaces::IRuntime", true)];
        let text = render(&class);
        assert!(text.contains(
            "class Module1 :\n    virtual public base::BaseModule,\n    virtual public interfaces::IRuntime\n{\n"
        ));
    }

    #[test]
    fn test_trailing_without_virtual_bases() {
        let mut class = ClassSpec::named("Module1");
        class.base_style = Some(BaseListStyle::Trailing);
        class.bases = vec![base("A", false), base("B", false)];
        let text = render(&class);
        assert!(text.contains("class Module1 :\n    public A,\n    public B\n{\n"));
    }

    #[test]
    fn test_no_bases_no_clause() {
        let text = render(&ClassSpec::named("Widget"));
        assert!(text.contains("class Widget\n{\n"));
        assert!(!text.contains(" : "));
    }

    #[test]
    fn test_destructor_forms() {
        let mut class = ClassSpec::named("Module1");
        class.destructor = Some(DestructorSpec {
            is_virtual: false,
            noexcept: true,
            description: None,
        });
        assert!(render(&class).contains("    ~Module1() noexcept;\n"));

        class.abstract_base = true;
        assert!(render(&class).contains("    virtual ~Module1() noexcept = 0;\n"));
    }

    #[test]
    fn test_method_signature_qualifiers() {
        let class: ClassSpec = serde_json::from_value(serde_json::json!({
            "name": "Module1",
            "bases": [{ "name": "interfaces::IModuleType1" }],
            "methods": [{
                "name": "SetName",
                "access": "protected",
                "params": [
                    { "name": "new_name", "type": { "name": "std::string", "stereotypes": ["const", "lval_reference"] } },
                    { "name": "flag", "type": "int" }
                ],
                "qualifiers": { "pureVirtual": true, "const": true, "noexcept": true, "override": true }
            }]
        }))
        .unwrap();

        let text = render(&class);
        assert!(text.contains(
            "    virtual void SetName(const std::string& new_name, int flag) const noexcept override = 0;\n"
        ));
        assert!(text.contains("#include <string>\n"));
    }

    #[test]
    fn test_multiline_docs_never_leak_bare_text() {
        let class: ClassSpec = serde_json::from_value(serde_json::json!({
            "name": "Canvas",
            "description": "Drawing surface\nbacked by a bitmap",
            "methods": [{
                "name": "Resize",
                "params": [{ "name": "w", "type": "int", "description": "New width\nin pixels" }]
            }]
        }))
        .unwrap();

        let text = render(&class);
        assert!(text.contains("    /// @param w New width\n    /// in pixels\n"));
        assert!(text.contains("/// @brief Drawing surface\n/// backed by a bitmap\n"));
        let leaked: Vec<_> = text.lines().filter(|l| l.trim() == "in pixels").collect();
        assert!(leaked.is_empty());
    }

    #[test]
    fn test_interface_declares_pure_virtuals() {
        let class: ClassSpec = serde_json::from_value(serde_json::json!({
            "name": "IRuntime",
            "kind": "interface",
            "namespaces": ["interfaces"],
            "destructor": { "noexcept": true },
            "methods": [
                { "name": "Start", "qualifiers": { "noexcept": true } },
                { "name": "Name", "returns": "std::string", "qualifiers": { "const": true } }
            ]
        }))
        .unwrap();

        let text = render(&class);
        assert!(text.contains("/// @brief Interface description\nclass IRuntime\n{\n"));
        assert!(text.contains("// -- Destructor --\npublic:\n"));
        assert!(text.contains("    virtual ~IRuntime() noexcept = default;\n"));
        assert!(text.contains("    virtual void Start() noexcept = 0;\n"));
        assert!(text.contains("    virtual std::string Name() const = 0;\n"));
        assert!(!text.contains("// -- Members --"));
        assert!(text.contains("}; // class IRuntime\n"));
        assert!(text.contains("#include <string>\n"));
    }

    #[test]
    fn test_enum_class_body() {
        let class: ClassSpec = serde_json::from_value(serde_json::json!({
            "name": "State",
            "kind": "enum",
            "namespaces": ["core"],
            "description": "Lifecycle state",
            "evalues": {
                "underlying": "std::uint8_t",
                "values": [
                    { "name": "Idle", "description": "Not started" },
                    { "name": "Running", "value": 4 },
                    { "name": "Stopped", "value": "Running << 1" }
                ]
            }
        }))
        .unwrap();

        let expected = "\
#ifndef CORE_STATE_H
#define CORE_STATE_H


// System includes
#include <cstdint>

// Project includes


namespace core {


/// @brief Lifecycle state
enum class State : std::uint8_t
{
    /// @brief Not started
    Idle,
    /// @brief Value description
    Running = 4,
    /// @brief Value description
    Stopped = Running << 1,
}; // enum class State


} // namespace core


#endif // CORE_STATE_H
";
        assert_eq!(render(&class), expected);
    }

    #[test]
    fn test_array_member_declarator() {
        let class: ClassSpec = serde_json::from_value(serde_json::json!({
            "name": "Frame",
            "members": [
                { "name": "pixels", "type": { "name": "uint32_t", "stereotypes": ["array"], "extent": 16 } }
            ]
        }))
        .unwrap();
        assert!(render(&class).contains("    uint32_t pixels[16];\n"));
    }

    #[test]
    fn test_tab_indentation() {
        let class: ClassSpec = serde_json::from_value(serde_json::json!({
            "name": "Widget",
            "members": [{ "name": "id", "type": "int" }]
        }))
        .unwrap();
        let mut ctx = EmitContext::new(IndentStyle::Tabs);
        let text = HeaderEmitter::default().emit(&class, &mut ctx);
        assert!(text.contains("\t/// @brief Member description\n\tint id;\n"));
    }

    #[test]
    fn test_relative_path() {
        let mut class = ClassSpec::named("Module1");
        class.namespaces = vec!["interfaces".to_string(), "module".to_string()];
        assert_eq!(
            HeaderEmitter::default().relative_path(&class),
            "interfaces/module/Module1.h"
        );
    }
}
