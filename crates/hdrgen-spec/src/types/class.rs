use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::{Access, TypeSpec};

/// Structured description of one C++ class, interface or enum
/// (*.class.yaml / *.class.json / *.puml)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassSpec {
    /// Class name
    pub name: String,

    /// What kind of declaration the header holds
    #[serde(default, skip_serializing_if = "DeclKind::is_class")]
    pub kind: DeclKind,

    /// Enclosing namespaces, outermost first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<String>,

    /// Class description for the `@brief` line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Base classes in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bases: Vec<BaseSpec>,

    /// Layout of the base list; derived from the bases when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_style: Option<BaseListStyle>,

    /// Abstract base classes get a pure virtual destructor
    #[serde(default, alias = "isAbstractBase")]
    pub abstract_base: bool,

    /// Explicit includes, emitted before the resolved ones
    #[serde(default)]
    pub includes: IncludeSpec,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constructors: Vec<ConstructorSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destructor: Option<DestructorSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<MemberSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodSpec>,

    /// Enumerators; only for `kind: enum`
    #[serde(default, rename = "evalues", alias = "enumeration", skip_serializing_if = "Option::is_none")]
    pub enumeration: Option<EnumSpec>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    #[default]
    Class,
    /// Pure-virtual methods and a virtual destructor only
    Interface,
    /// `enum class`
    Enum,
}

impl DeclKind {
    pub fn is_class(&self) -> bool {
        *self == DeclKind::Class
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::Class => "class",
            DeclKind::Interface => "interface",
            DeclKind::Enum => "enum",
        }
    }
}

/// Body of an `enum class`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnumSpec {
    /// Underlying integer type (`enum class Color : uint8_t`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying: Option<String>,

    #[serde(default)]
    pub values: Vec<EnumValueSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EnumValueSpec {
    pub name: String,

    /// Explicit initializer; an integer or a constant expression
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<EnumConstant>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum EnumConstant {
    Int(i64),
    Expr(String),
}

impl std::fmt::Display for EnumConstant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnumConstant::Int(n) => write!(f, "{n}"),
            EnumConstant::Expr(e) => f.write_str(e.trim()),
        }
    }
}

/// One entry of the base list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BaseSpec {
    /// Qualified base name (e.g., "base::BaseModule")
    pub name: String,

    #[serde(default = "Access::public")]
    pub access: Access,

    #[serde(default, rename = "virtual")]
    pub is_virtual: bool,
}

/// How the base list is laid out after the class name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BaseListStyle {
    /// `: public A` / `, public B` continuation lines
    Leading,
    /// `class X :` followed by `public A,` lines
    Trailing,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IncludeSpec {
    /// Headers included with angle brackets
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub system: Vec<String>,

    /// Headers included with quotes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub project: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ParamSpec {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: TypeSpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConstructorSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamSpec>,

    #[serde(default)]
    pub noexcept: bool,

    #[serde(default)]
    pub explicit: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DestructorSpec {
    #[serde(default, rename = "virtual")]
    pub is_virtual: bool,

    #[serde(default)]
    pub noexcept: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Data member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MemberSpec {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: TypeSpec,

    #[serde(default = "Access::private")]
    pub access: Access,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Member function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MethodSpec {
    pub name: String,

    /// Return type, `void` when omitted
    #[serde(default = "TypeSpec::void", alias = "type")]
    pub returns: TypeSpec,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamSpec>,

    #[serde(default)]
    pub qualifiers: MethodQualifiers,

    #[serde(default = "Access::public")]
    pub access: Access,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MethodQualifiers {
    #[serde(default, rename = "virtual")]
    pub is_virtual: bool,

    /// `= 0`; implies `virtual`
    #[serde(default)]
    pub pure_virtual: bool,

    #[serde(default, rename = "const")]
    pub is_const: bool,

    #[serde(default)]
    pub noexcept: bool,

    #[serde(default, rename = "override")]
    pub is_override: bool,
}

impl ClassSpec {
    /// A class with just a name; everything else empty.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DeclKind::Class,
            namespaces: Vec::new(),
            description: None,
            bases: Vec::new(),
            base_style: None,
            abstract_base: false,
            includes: IncludeSpec::default(),
            constructors: Vec::new(),
            destructor: None,
            members: Vec::new(),
            methods: Vec::new(),
            enumeration: None,
        }
    }

    /// An empty `kind: enum` declaration.
    pub fn enumeration(name: impl Into<String>) -> Self {
        Self {
            kind: DeclKind::Enum,
            enumeration: Some(EnumSpec::default()),
            ..Self::named(name)
        }
    }

    /// Enumerators, empty for classes and interfaces.
    pub fn enum_values(&self) -> &[EnumValueSpec] {
        self.enumeration.as_ref().map(|e| e.values.as_slice()).unwrap_or(&[])
    }

    /// `interfaces::module::Module1`
    pub fn qualified_name(&self) -> String {
        let mut parts: Vec<&str> = self.namespaces.iter().map(String::as_str).collect();
        parts.push(&self.name);
        parts.join("::")
    }

    pub fn has_virtual_bases(&self) -> bool {
        self.bases.iter().any(|b| b.is_virtual)
    }

    /// Explicit style, or trailing when any base is virtual.
    pub fn resolved_base_style(&self) -> BaseListStyle {
        match self.base_style {
            Some(style) => style,
            None if self.has_virtual_bases() => BaseListStyle::Trailing,
            None => BaseListStyle::Leading,
        }
    }

    pub fn members_in(&self, access: Access) -> impl Iterator<Item = &MemberSpec> {
        self.members.iter().filter(move |m| m.access == access)
    }

    pub fn methods_in(&self, access: Access) -> impl Iterator<Item = &MethodSpec> {
        self.methods.iter().filter(move |m| m.access == access)
    }
}

impl MethodQualifiers {
    /// Whether the declaration carries the `virtual` keyword.
    pub fn declares_virtual(&self) -> bool {
        self.is_virtual || self.pure_virtual
    }
}
