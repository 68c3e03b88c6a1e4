use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// C++ access specifier, used both for class sections and inheritance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    Protected,
    Private,
}

impl Access {
    /// Sections in emission order.
    pub const ALL: [Access; 3] = [Access::Public, Access::Protected, Access::Private];

    pub fn public() -> Self {
        Access::Public
    }

    pub fn private() -> Self {
        Access::Private
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Access::Public => "public",
            Access::Protected => "protected",
            Access::Private => "private",
        }
    }
}

impl std::fmt::Display for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type modifiers applied around a type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TypeStereotype {
    Const,
    Volatile,
    /// `[]` (or `[extent]`) after the declared name
    Array,
    Pointer,
    LvalReference,
    RvalReference,
}

/// A C++ type as written in a class file.
///
/// Either a plain string (`"int"`, `"const std::string&"`) or a name with
/// stereotypes that are rendered around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum TypeSpec {
    Simple(String),
    Qualified {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        stereotypes: Vec<TypeStereotype>,
        /// Array length; only meaningful with the `array` stereotype
        #[serde(default, skip_serializing_if = "Option::is_none")]
        extent: Option<u32>,
    },
}

impl TypeSpec {
    pub fn void() -> Self {
        TypeSpec::Simple("void".to_string())
    }

    /// The bare type name, without stereotypes.
    pub fn name(&self) -> &str {
        match self {
            TypeSpec::Simple(name) => name,
            TypeSpec::Qualified { name, .. } => name,
        }
    }

    pub fn has(&self, stereotype: TypeStereotype) -> bool {
        match self {
            TypeSpec::Simple(_) => false,
            TypeSpec::Qualified { stereotypes, .. } => stereotypes.contains(&stereotype),
        }
    }

    pub fn is_array(&self) -> bool {
        self.has(TypeStereotype::Array)
    }

    pub fn extent(&self) -> Option<u32> {
        match self {
            TypeSpec::Simple(_) => None,
            TypeSpec::Qualified { extent, .. } => *extent,
        }
    }

    /// `int values[4]`, `const std::string& name`: the type with a declarator name.
    pub fn declare(&self, name: &str) -> String {
        let mut out = format!("{} {name}", self.render());
        if self.is_array() {
            match self.extent() {
                Some(n) => out.push_str(&format!("[{n}]")),
                None => out.push_str("[]"),
            }
        }
        out
    }

    /// Render the type as it appears before a declarator; array
    /// bounds are added by [`TypeSpec::declare`].
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.has(TypeStereotype::Const) {
            out.push_str("const ");
        }
        if self.has(TypeStereotype::Volatile) {
            out.push_str("volatile ");
        }
        out.push_str(self.name());
        if self.has(TypeStereotype::Pointer) {
            out.push('*');
        }
        if self.has(TypeStereotype::LvalReference) {
            out.push('&');
        } else if self.has(TypeStereotype::RvalReference) {
            out.push_str("&&");
        }
        out
    }
}

impl From<&str> for TypeSpec {
    fn from(name: &str) -> Self {
        TypeSpec::Simple(name.to_string())
    }
}

/// Error/warning severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}
