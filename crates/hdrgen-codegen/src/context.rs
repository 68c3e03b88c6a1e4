use indexmap::IndexSet;

/// Tracks state during emission of one file: indentation and collected includes.
#[derive(Debug, Clone)]
pub struct EmitContext {
    indent_level: usize,
    indent_width: usize,
    use_tabs: bool,
    /// `<...>` headers (deduped, insertion-ordered)
    system_includes: IndexSet<String>,
    /// `"..."` headers (deduped, insertion-ordered)
    project_includes: IndexSet<String>,
}

/// Indentation style configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentStyle {
    Spaces(usize),
    Tabs,
}

impl Default for IndentStyle {
    fn default() -> Self {
        IndentStyle::Spaces(4)
    }
}

impl EmitContext {
    pub fn new(style: IndentStyle) -> Self {
        let (use_tabs, indent_width) = match style {
            IndentStyle::Spaces(n) => (false, n),
            IndentStyle::Tabs => (true, 1),
        };
        Self {
            indent_level: 0,
            indent_width,
            use_tabs,
            system_includes: IndexSet::new(),
            project_includes: IndexSet::new(),
        }
    }

    /// Get the current indentation string.
    pub fn indent(&self) -> String {
        let unit = if self.use_tabs { "\t" } else { " " };
        unit.repeat(self.indent_level * self.indent_width)
    }

    pub fn push_indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn pop_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    /// Prefix `text` with the current indentation; blank lines stay empty.
    pub fn line(&self, text: impl AsRef<str>) -> String {
        let text = text.as_ref();
        if text.is_empty() {
            String::new()
        } else {
            format!("{}{}", self.indent(), text)
        }
    }

    pub fn add_system_include(&mut self, header: impl Into<String>) {
        self.system_includes.insert(header.into());
    }

    pub fn add_project_include(&mut self, header: impl Into<String>) {
        self.project_includes.insert(header.into());
    }

    pub fn system_includes(&self) -> &IndexSet<String> {
        &self.system_includes
    }

    pub fn project_includes(&self) -> &IndexSet<String> {
        &self.project_includes
    }
}
