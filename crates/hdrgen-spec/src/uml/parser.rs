use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::types::class::{
    BaseSpec, ClassSpec, ConstructorSpec, DeclKind, DestructorSpec, EnumConstant, EnumSpec, EnumValueSpec,
    MemberSpec, MethodQualifiers, MethodSpec, ParamSpec,
};
use crate::types::common::{Access, TypeSpec, TypeStereotype};

use super::{UmlError, UmlImport};

fn namespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:namespace|package)\s+([A-Za-z_][\w.:]*)\s*(?:<<[^>]*>>\s*)?\{\s*$")
            .expect("valid namespace regex")
    })
}

fn decl_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(abstract\s+class|abstract|class|interface|enum)\s+([A-Za-z_][\w.:]*)\s*(?:<<[^>]*>>\s*)?(?:\s+extends\s+([\w.:,\s]+?))?(?:\s+implements\s+([\w.:,\s]+?))?\s*(\{\s*\}|\{)?\s*$",
        )
        .expect("valid declaration regex")
    })
}

fn relation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^([A-Za-z_][\w.:]*)\s*((?:<\||<|\*|o)?[-.]+(?:up|down|left|right|u|d|l|r)?[-.]*(?:\|>|>|\*|o)?)\s*([A-Za-z_][\w.:]*)\s*(?::.*)?$",
        )
        .expect("valid relation regex")
    })
}

fn stereotype_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<<\s*(\w+)\s*>>").expect("valid stereotype regex"))
}

fn enum_value_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z_]\w*)\s*(?:=\s*(.+?))?\s*,?$").expect("valid enumerator regex"))
}

fn uml_field_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z_]\w*(?:\[\d*\])?)\s*:([^:].*)$").expect("valid field regex"))
}

fn array_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.*?)\s*\[(\d*)\]$").expect("valid array regex"))
}

/// Parse a PlantUML class diagram.
///
/// Understands `namespace`/`package` blocks, `class`, `abstract class`,
/// `interface` and `enum` declarations with `extends`/`implements`,
/// member and method lines in both UML (`name : Type`) and C++
/// (`Type name`) order, `<<virtual>>`-style method stereotypes and
/// inheritance arrows. Everything else is skipped with a warning or,
/// for layout directives, silently.
pub fn parse_uml(source: &str, file: &str) -> Result<UmlImport, UmlError> {
    let mut parser = UmlParser::new(file);
    let mut in_note = false;
    let mut in_comment = false;

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if in_comment {
            in_comment = !line.contains("'/");
            continue;
        }
        if in_note {
            in_note = !(line.eq_ignore_ascii_case("end note") || line.eq_ignore_ascii_case("endnote"));
            continue;
        }
        if line.starts_with("/'") {
            in_comment = !line[2..].contains("'/");
            continue;
        }
        if line.is_empty() || line.starts_with('\'') || line.starts_with('@') {
            continue;
        }
        if line == "note" || line.starts_with("note ") {
            // `note left of A : text` and `note "text" as N` fit on one line
            in_note = !(line.contains(':') || line.contains('"'));
            continue;
        }

        parser.line(line, line_no)?;
    }

    parser.finish()
}

enum Block {
    /// Number of namespace segments the block opened
    Namespace(usize),
    Class(usize),
}

struct Relation {
    derived: String,
    base: String,
    scope: Vec<String>,
    line: usize,
}

struct UmlParser<'a> {
    file: &'a str,
    classes: Vec<ClassSpec>,
    namespaces: Vec<String>,
    stack: Vec<(Block, String, usize)>,
    relations: Vec<Relation>,
    warnings: Vec<String>,
}

impl<'a> UmlParser<'a> {
    fn new(file: &'a str) -> Self {
        Self {
            file,
            classes: Vec::new(),
            namespaces: Vec::new(),
            stack: Vec::new(),
            relations: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, line: usize, message: impl std::fmt::Display) {
        self.warnings.push(format!("line {line}: {message}"));
    }

    fn current_class(&self) -> Option<usize> {
        match self.stack.last() {
            Some((Block::Class(idx), _, _)) => Some(*idx),
            _ => None,
        }
    }

    fn line(&mut self, line: &str, no: usize) -> Result<(), UmlError> {
        if line.starts_with('}') {
            return self.close(no);
        }

        if let Some(idx) = self.current_class() {
            self.class_line(idx, line, no);
            return Ok(());
        }

        if let Some(caps) = namespace_re().captures(line) {
            let segments = split_path(&caps[1]);
            let count = segments.len();
            self.namespaces.extend(segments);
            self.stack.push((Block::Namespace(count), caps[1].to_string(), no));
        } else if let Some(caps) = decl_re().captures(line) {
            self.declare(&caps, no);
        } else if let Some(caps) = relation_re().captures(line) {
            self.relation(&caps, no);
        } else {
            tracing::debug!(file = self.file, line = no, text = line, "ignored diagram line");
        }
        Ok(())
    }

    fn close(&mut self, no: usize) -> Result<(), UmlError> {
        match self.stack.pop() {
            Some((Block::Namespace(count), _, _)) => {
                let keep = self.namespaces.len().saturating_sub(count);
                self.namespaces.truncate(keep);
                Ok(())
            }
            Some((Block::Class(_), _, _)) => Ok(()),
            None => Err(UmlError::UnexpectedClose { line: no }),
        }
    }

    fn declare(&mut self, caps: &Captures, no: usize) {
        let keyword = &caps[1];
        let mut namespaces = self.namespaces.clone();
        let mut path = split_path(&caps[2]);
        let name = path.pop().unwrap_or_default();
        namespaces.extend(path);

        let kind = match keyword {
            "interface" => DeclKind::Interface,
            "enum" => DeclKind::Enum,
            _ => DeclKind::Class,
        };
        let idx = self.ensure_class(name, namespaces, kind);
        if keyword.starts_with("abstract") {
            self.classes[idx].abstract_base = true;
        }

        let derived = self.classes[idx].qualified_name();
        for group in [caps.get(3), caps.get(4)].into_iter().flatten() {
            for base in group.as_str().split(',').map(str::trim).filter(|b| !b.is_empty()) {
                self.relations.push(Relation {
                    derived: derived.clone(),
                    base: base.replace('.', "::"),
                    scope: self.namespaces.clone(),
                    line: no,
                });
            }
        }

        if caps.get(5).is_some_and(|m| m.as_str() == "{") {
            self.stack.push((Block::Class(idx), caps[2].to_string(), no));
        }
    }

    fn ensure_class(&mut self, name: String, namespaces: Vec<String>, kind: DeclKind) -> usize {
        if let Some(idx) = self
            .classes
            .iter()
            .position(|c| c.name == name && c.namespaces == namespaces)
        {
            return idx;
        }

        let mut class = ClassSpec::named(name);
        class.namespaces = namespaces;
        class.kind = kind;
        if kind == DeclKind::Enum {
            class.enumeration = Some(EnumSpec::default());
        }
        self.classes.push(class);
        self.classes.len() - 1
    }

    fn relation(&mut self, caps: &Captures, no: usize) {
        let arrow = &caps[2];
        let (derived, base) = if arrow.starts_with("<|") {
            (&caps[3], &caps[1])
        } else if arrow.ends_with("|>") {
            (&caps[1], &caps[3])
        } else {
            tracing::debug!(file = self.file, line = no, arrow, "skipped non-inheritance relation");
            return;
        };

        self.relations.push(Relation {
            derived: derived.replace('.', "::"),
            base: base.replace('.', "::"),
            scope: self.namespaces.clone(),
            line: no,
        });
    }

    fn class_line(&mut self, idx: usize, line: &str, no: usize) {
        if is_separator(line) {
            return;
        }
        if self.classes[idx].kind == DeclKind::Enum {
            self.enum_value(idx, line, no);
            return;
        }

        let class_name = self.classes[idx].name.clone();
        let (access, body) = match line.chars().next() {
            Some('+') => (Some(Access::Public), &line[1..]),
            Some('-') => (Some(Access::Private), &line[1..]),
            Some('#') => (Some(Access::Protected), &line[1..]),
            Some('~') if !line[1..].starts_with(&class_name) => {
                self.warn(no, "package visibility `~` treated as public");
                (Some(Access::Public), &line[1..])
            }
            _ => (None, line),
        };

        let mut body = body.trim().to_string();
        let stereotypes: Vec<String> = stereotype_re()
            .captures_iter(&body)
            .map(|c| c[1].to_string())
            .collect();
        body = stereotype_re().replace_all(&body, "").trim().to_string();

        let mut pure = false;
        if body.contains("{abstract}") {
            pure = true;
            body = body.replace("{abstract}", "").trim().to_string();
        }
        if body.contains("{static}") {
            self.warn(no, "`{static}` is not supported and was dropped");
            body = body.replace("{static}", "").trim().to_string();
        }

        if body.contains('(') {
            self.method_line(idx, access, &body, &stereotypes, pure, no);
        } else {
            if !stereotypes.is_empty() {
                self.warn(no, format!("stereotypes on member `{body}` ignored"));
            }
            self.member_line(idx, access, &body, no);
        }
    }

    fn member_line(&mut self, idx: usize, access: Option<Access>, body: &str, no: usize) {
        match split_declaration(body) {
            Some((name, ty)) => self.classes[idx].members.push(MemberSpec {
                name,
                ty,
                access: access.unwrap_or(Access::Private),
                description: None,
            }),
            None => self.warn(no, format!("cannot read member `{body}`")),
        }
    }

    fn method_line(
        &mut self,
        idx: usize,
        access: Option<Access>,
        body: &str,
        stereotypes: &[String],
        pure: bool,
        no: usize,
    ) {
        let (Some(open), Some(close)) = (body.find('('), body.rfind(')')) else {
            self.warn(no, format!("unbalanced parentheses in `{body}`"));
            return;
        };
        if close < open {
            self.warn(no, format!("unbalanced parentheses in `{body}`"));
            return;
        }

        let head: Vec<&str> = body[..open].split_whitespace().collect();
        let Some((&name, ret_words)) = head.split_last() else {
            self.warn(no, format!("method without a name: `{body}`"));
            return;
        };
        let mut returns = ret_words.join(" ");
        let mut qualifiers = MethodQualifiers {
            pure_virtual: pure,
            ..Default::default()
        };

        let mut tail = body[close + 1..].trim();
        if let Some(rest) = tail.strip_prefix(':') {
            returns = rest.trim().to_string();
            tail = "";
        }
        for word in tail.split_whitespace() {
            match word {
                "const" => qualifiers.is_const = true,
                "noexcept" => qualifiers.noexcept = true,
                "override" => qualifiers.is_override = true,
                "=" | "0" | "=0" => qualifiers.pure_virtual = true,
                other => self.warn(no, format!("unknown qualifier `{other}` on `{name}`")),
            }
        }
        if let Some(rest) = returns.strip_prefix("virtual ") {
            returns = rest.trim().to_string();
            qualifiers.is_virtual = true;
        }

        for stereo in stereotypes {
            match stereo.as_str() {
                "virtual" => qualifiers.is_virtual = true,
                "virtual_0" | "abstract" | "pure" => qualifiers.pure_virtual = true,
                "const" => qualifiers.is_const = true,
                "noexcept" => qualifiers.noexcept = true,
                "override" => qualifiers.is_override = true,
                other => self.warn(no, format!("unknown stereotype `<<{other}>>` on `{name}`")),
            }
        }

        let params = self.params(&body[open + 1..close], no);
        let class = &mut self.classes[idx];

        if let Some(dtor) = name.strip_prefix('~') {
            if dtor != class.name {
                self.warn(no, format!("destructor `{name}` does not match the class"));
                return;
            }
            class.destructor = Some(DestructorSpec {
                is_virtual: qualifiers.declares_virtual(),
                noexcept: qualifiers.noexcept,
                description: None,
            });
            if qualifiers.pure_virtual {
                class.abstract_base = true;
            }
            return;
        }

        if name == class.name && returns.is_empty() {
            class.constructors.push(ConstructorSpec {
                params,
                noexcept: qualifiers.noexcept,
                explicit: false,
                description: None,
            });
            return;
        }

        class.methods.push(MethodSpec {
            name: name.to_string(),
            returns: if returns.is_empty() {
                TypeSpec::void()
            } else {
                TypeSpec::Simple(returns)
            },
            params,
            qualifiers,
            access: access.unwrap_or(Access::Public),
            description: None,
        });
    }

    fn params(&mut self, source: &str, no: usize) -> Vec<ParamSpec> {
        let mut params = Vec::new();
        for (j, raw) in split_top_level(source).into_iter().enumerate() {
            let raw = raw.trim();
            if raw.is_empty() || raw == "void" {
                continue;
            }
            match split_declaration(raw) {
                Some((name, ty)) => params.push(ParamSpec {
                    name,
                    ty,
                    description: None,
                }),
                None => {
                    let name = format!("arg{j}");
                    self.warn(no, format!("parameter `{raw}` has no name, using `{name}`"));
                    params.push(ParamSpec {
                        name,
                        ty: TypeSpec::Simple(raw.to_string()),
                        description: None,
                    });
                }
            }
        }
        params
    }

    fn enum_value(&mut self, idx: usize, line: &str, no: usize) {
        let Some(caps) = enum_value_re().captures(line) else {
            self.warn(no, format!("cannot read enumerator `{line}`"));
            return;
        };
        let value = caps.get(2).map(|m| {
            let text = m.as_str().trim();
            match text.parse::<i64>() {
                Ok(n) => EnumConstant::Int(n),
                Err(_) => EnumConstant::Expr(text.to_string()),
            }
        });
        self.classes[idx]
            .enumeration
            .get_or_insert_with(EnumSpec::default)
            .values
            .push(EnumValueSpec {
                name: caps[1].to_string(),
                value,
                description: None,
            });
    }

    fn finish(mut self) -> Result<UmlImport, UmlError> {
        if let Some((_, name, line)) = self.stack.pop() {
            return Err(UmlError::Unclosed { name, line });
        }

        for relation in std::mem::take(&mut self.relations) {
            let Some(idx) = self.resolve(&relation.derived, &relation.scope) else {
                self.warn(
                    relation.line,
                    format!("`{}` is not declared in this diagram", relation.derived),
                );
                continue;
            };
            if self.classes[idx].kind == DeclKind::Enum {
                self.warn(relation.line, format!("enum `{}` cannot have bases", relation.derived));
                continue;
            }
            let base = match self.resolve(&relation.base, &relation.scope) {
                Some(b) => self.classes[b].qualified_name(),
                None => relation.base.clone(),
            };
            let class = &mut self.classes[idx];
            if !class.bases.iter().any(|b| b.name == base) {
                class.bases.push(BaseSpec {
                    name: base,
                    access: Access::Public,
                    is_virtual: false,
                });
            }
        }

        for class in self.classes.iter_mut().filter(|c| c.kind == DeclKind::Class) {
            if class.constructors.is_empty() {
                class.constructors.push(ConstructorSpec::default());
            }
            if class.destructor.is_none() {
                let is_virtual =
                    class.abstract_base || class.methods.iter().any(|m| m.qualifiers.declares_virtual());
                class.destructor = Some(DestructorSpec {
                    is_virtual,
                    ..Default::default()
                });
            }
        }

        Ok(UmlImport {
            classes: self.classes,
            warnings: self.warnings,
        })
    }

    /// Find a declared class by a name written at `scope`: scoped first,
    /// then fully qualified, then by unique simple name.
    fn resolve(&self, name: &str, scope: &[String]) -> Option<usize> {
        if !scope.is_empty() {
            let scoped = format!("{}::{name}", scope.join("::"));
            if let Some(idx) = self.classes.iter().position(|c| c.qualified_name() == scoped) {
                return Some(idx);
            }
        }
        if let Some(idx) = self.classes.iter().position(|c| c.qualified_name() == name) {
            return Some(idx);
        }
        let mut matches = self
            .classes
            .iter()
            .enumerate()
            .filter(|(_, c)| c.name == name);
        match (matches.next(), matches.next()) {
            (Some((idx, _)), None) => Some(idx),
            _ => None,
        }
    }
}

/// `a.b::C` -> `["a", "b", "C"]`
fn split_path(path: &str) -> Vec<String> {
    path.replace("::", ".")
        .split('.')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_separator(line: &str) -> bool {
    ["--", "==", "..", "__"].iter().any(|sep| line.starts_with(sep))
}

/// Split on commas that are not inside template arguments.
fn split_top_level(source: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in source.char_indices() {
        match c {
            '<' | '(' => depth += 1,
            '>' | ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&source[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&source[start..]);
    parts
}

/// Read `name : Type` or `Type name`, with an optional `[N]` on either side.
fn split_declaration(text: &str) -> Option<(String, TypeSpec)> {
    let text = text.trim().trim_end_matches(';').trim();

    let (mut name, mut ty) = if let Some(caps) = uml_field_re().captures(text) {
        (caps[1].to_string(), caps[2].trim().to_string())
    } else {
        let split = text.rfind(|c: char| c.is_whitespace() || c == '*' || c == '&')?;
        let (ty, name) = text.split_at(split + 1);
        (name.trim().to_string(), ty.trim().to_string())
    };
    if name.is_empty() || ty.is_empty() {
        return None;
    }

    let mut extent = None;
    let mut is_array = false;
    for part in [&mut name, &mut ty] {
        let bounds = array_re()
            .captures(part)
            .map(|caps| (caps[1].to_string(), caps[2].parse::<u32>().ok()));
        if let Some((bare, n)) = bounds {
            is_array = true;
            extent = n.or(extent);
            *part = bare;
        }
    }

    let ty = if is_array {
        TypeSpec::Qualified {
            name: ty,
            stereotypes: vec![TypeStereotype::Array],
            extent,
        }
    } else {
        TypeSpec::Simple(ty)
    };
    Some((name, ty))
}
