use std::path::Path;

use crate::types::class::ClassSpec;
use crate::types::config::HdrgenConfig;
use crate::types::error::{ErrorEntry, E_PARSE_ERROR};

pub const CONFIG_FILE_NAME: &str = "hdrgen.config.json";

/// Spec file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFileType {
    Config,
    Class(SpecFormat),
    /// PlantUML class diagram; may declare several classes
    Uml,
}

/// Serialization format of a class file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Yaml,
    Json,
}

/// Detect spec file type from file name
pub fn detect_spec_type(file_path: &Path) -> Option<SpecFileType> {
    let name = file_path.file_name()?.to_str()?;
    if name == CONFIG_FILE_NAME {
        Some(SpecFileType::Config)
    } else if name.ends_with(".class.yaml") || name.ends_with(".class.yml") {
        Some(SpecFileType::Class(SpecFormat::Yaml))
    } else if name.ends_with(".class.json") {
        Some(SpecFileType::Class(SpecFormat::Json))
    } else if name.ends_with(".puml") || name.ends_with(".plantuml") {
        Some(SpecFileType::Uml)
    } else {
        None
    }
}

/// Parse a hdrgen.config.json file
#[allow(clippy::result_large_err)]
pub fn parse_config(content: &str, file_path: &str) -> Result<HdrgenConfig, ErrorEntry> {
    serde_json::from_str(content).map_err(|e| json_error_to_entry(e, file_path))
}

/// Parse a class file into an untyped value, ready for schema checks.
#[allow(clippy::result_large_err)]
pub fn parse_class_value(
    content: &str,
    file_path: &str,
    format: SpecFormat,
) -> Result<serde_json::Value, ErrorEntry> {
    match format {
        SpecFormat::Json => {
            serde_json::from_str(content).map_err(|e| json_error_to_entry(e, file_path))
        }
        SpecFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| yaml_error_to_entry(e, file_path))
        }
    }
}

/// Convert an already parsed value into a class spec.
#[allow(clippy::result_large_err)]
pub fn class_from_value(value: serde_json::Value, file_path: &str) -> Result<ClassSpec, ErrorEntry> {
    serde_json::from_value(value).map_err(|e| {
        ErrorEntry::error(
            E_PARSE_ERROR,
            format!("Invalid class description: {e}"),
            file_path,
            "$",
        )
        .with_suggestion("Check field names and types against `hdrgen schema`")
    })
}

/// Parse a *.class.yaml / *.class.json file
#[allow(clippy::result_large_err)]
pub fn parse_class(content: &str, file_path: &str, format: SpecFormat) -> Result<ClassSpec, ErrorEntry> {
    let value = parse_class_value(content, file_path, format)?;
    class_from_value(value, file_path)
}

fn json_error_to_entry(err: serde_json::Error, file_path: &str) -> ErrorEntry {
    let path = format!("$.line:{}:col:{}", err.line(), err.column());

    ErrorEntry::error(
        E_PARSE_ERROR,
        format!("JSON parse error: {err}"),
        file_path,
        &path,
    )
    .with_suggestion("Check JSON syntax and field types")
}

fn yaml_error_to_entry(err: serde_yaml::Error, file_path: &str) -> ErrorEntry {
    let path = match err.location() {
        Some(loc) => format!("$.line:{}:col:{}", loc.line(), loc.column()),
        None => "$".to_string(),
    };

    ErrorEntry::error(
        E_PARSE_ERROR,
        format!("YAML parse error: {err}"),
        file_path,
        &path,
    )
    .with_suggestion("Check YAML indentation and field types")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::common::{Access, TypeStereotype};
    use pretty_assertions::assert_eq;

    const MODULE1_YAML: &str = r#"
name: Module1
namespaces: [interfaces, module]
abstractBase: true
bases:
  - name: base::BaseModule
  - name: interfaces::IRuntime
constructors:
  - {}
  - noexcept: true
    params:
      - name: new_name
        type: { name: "std::string", stereotypes: [const, lval_reference] }
      - name: flag
        type: int
destructor:
  virtual: true
  noexcept: true
members:
  - { name: name, type: "std::string", access: public }
  - { name: id, type: int }
methods:
  - name: Start
  - name: SetName
    access: protected
    qualifiers: { const: true, noexcept: true, override: true, pureVirtual: true }
"#;

    #[test]
    fn test_parse_yaml_class() {
        let class = parse_class(MODULE1_YAML, "module1.class.yaml", SpecFormat::Yaml).unwrap();
        assert_eq!(class.name, "Module1");
        assert_eq!(class.namespaces, vec!["interfaces", "module"]);
        assert!(class.abstract_base);
        assert_eq!(class.bases.len(), 2);
        assert_eq!(class.constructors.len(), 2);
        assert!(class.constructors[1].noexcept);
        assert!(class.constructors[1].params[0]
            .ty
            .has(TypeStereotype::Const));
        assert_eq!(class.members[0].access, Access::Public);
        assert_eq!(class.members[1].access, Access::Private);
        assert!(class.methods[1].qualifiers.pure_virtual);
    }

    #[test]
    fn test_parse_json_class() {
        let json = r#"{ "name": "Widget", "namespaces": ["ui"] }"#;
        let class = parse_class(json, "widget.class.json", SpecFormat::Json).unwrap();
        assert_eq!(class.name, "Widget");
        assert_eq!(class.namespaces, vec!["ui"]);
        assert!(class.members.is_empty());
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let err = parse_class("name: [unclosed", "bad.class.yaml", SpecFormat::Yaml).unwrap_err();
        assert_eq!(err.code, E_PARSE_ERROR);
        assert_eq!(err.file, "bad.class.yaml");
        assert!(err.message.contains("YAML parse error"));
    }

    #[test]
    fn test_missing_name_is_parse_error() {
        let err = parse_class(r#"{ "namespaces": [] }"#, "a.class.json", SpecFormat::Json).unwrap_err();
        assert_eq!(err.code, E_PARSE_ERROR);
        assert!(err.message.contains("name"));
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{ "version": "1.0.0", "name": "modules" }"#;
        let config = parse_config(json, CONFIG_FILE_NAME).unwrap();
        assert_eq!(config.name, "modules");
    }

    #[test]
    fn test_config_error_includes_location() {
        let json = r#"{
            "version": 123
        }"#;
        let err = parse_config(json, CONFIG_FILE_NAME).unwrap_err();
        assert!(err.path.contains("line:"));
        assert!(err.path.contains("col:"));
    }

    #[test]
    fn test_detect_spec_type() {
        assert_eq!(
            detect_spec_type(Path::new("hdrgen.config.json")),
            Some(SpecFileType::Config)
        );
        assert_eq!(
            detect_spec_type(Path::new("module1.class.yaml")),
            Some(SpecFileType::Class(SpecFormat::Yaml))
        );
        assert_eq!(
            detect_spec_type(Path::new("module1.class.yml")),
            Some(SpecFileType::Class(SpecFormat::Yaml))
        );
        assert_eq!(
            detect_spec_type(Path::new("module1.class.json")),
            Some(SpecFileType::Class(SpecFormat::Json))
        );
        assert_eq!(
            detect_spec_type(Path::new("modules.puml")),
            Some(SpecFileType::Uml)
        );
        assert_eq!(detect_spec_type(Path::new("Module1.h")), None);
    }
}
