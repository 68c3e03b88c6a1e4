use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Standard library types and the system header that declares them.
pub const DEFAULT_SYSTEM_INCLUDES: &[(&str, &str)] = &[
    ("std::string", "string"),
    ("std::vector", "vector"),
    ("std::map", "map"),
    ("std::unordered_map", "unordered_map"),
    ("std::set", "set"),
    ("std::array", "array"),
    ("std::optional", "optional"),
    ("std::shared_ptr", "memory"),
    ("std::unique_ptr", "memory"),
    ("std::weak_ptr", "memory"),
    ("std::function", "functional"),
    ("std::size_t", "cstddef"),
    ("std::int32_t", "cstdint"),
    ("std::int64_t", "cstdint"),
    ("std::uint8_t", "cstdint"),
    ("std::uint32_t", "cstdint"),
    ("std::uint64_t", "cstdint"),
];

/// Top-level project configuration (hdrgen.config.json)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HdrgenConfig {
    /// JSON Schema reference
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Spec format version (e.g., "1.0.0")
    pub version: String,

    /// Project name
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub includes: IncludeMapConfig,

    /// Spaces per indentation level inside the class body
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Indent with tabs instead of spaces
    #[serde(default)]
    pub use_tabs: bool,
}

/// Where and what to generate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    /// Output directory, relative to the project root
    #[serde(default = "default_out_dir")]
    pub dir: String,

    #[serde(default = "default_header_extension")]
    pub header_extension: String,

    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    /// Also emit a source file with empty definitions
    #[serde(default = "default_true")]
    pub emit_sources: bool,
}

/// Type-name to header mappings used for include resolution.
/// System entries extend [`DEFAULT_SYSTEM_INCLUDES`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IncludeMapConfig {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub system: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub project: IndexMap<String, String>,
}

fn default_indent() -> usize {
    4
}

fn default_out_dir() -> String {
    "generated".to_string()
}

fn default_header_extension() -> String {
    "h".to_string()
}

fn default_source_extension() -> String {
    "cpp".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_out_dir(),
            header_extension: default_header_extension(),
            source_extension: default_source_extension(),
            emit_sources: true,
        }
    }
}

impl HdrgenConfig {
    /// Configuration used when a single class file is generated without a project.
    pub fn standalone(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            version: "1.0.0".to_string(),
            name: name.into(),
            description: None,
            output: OutputConfig::default(),
            includes: IncludeMapConfig::default(),
            indent: default_indent(),
            use_tabs: false,
        }
    }
}

impl IncludeMapConfig {
    /// Built-in system mappings overlaid with the configured ones.
    pub fn effective_system(&self) -> IndexMap<String, String> {
        let mut map: IndexMap<String, String> = DEFAULT_SYSTEM_INCLUDES
            .iter()
            .map(|(ty, header)| (ty.to_string(), header.to_string()))
            .collect();
        for (ty, header) in &self.system {
            map.insert(ty.clone(), header.clone());
        }
        map
    }
}
