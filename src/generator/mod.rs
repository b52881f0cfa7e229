//! Schema generation engine.
//!
//! One generation pass walks the entities of a [`crate::model::DataModel`]
//! in declaration order and assembles a single TypeScript document of Zod
//! schema definitions. The submodules split the pass into its concerns:
//! per-field expression building, unique-key combination, relation
//! resolution, and final assembly.

mod assembler;
mod expression;
mod relations;
mod uniques;

pub use assembler::ZodGenerator;

use std::collections::HashSet;

use convert_case::{Case, Casing};

/// Generator configuration.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Whether to emit the Zod import statement.
    pub include_import: bool,

    /// Indentation style for emitted object bodies.
    pub indent: IndentStyle,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            include_import: true,
            indent: IndentStyle::default(),
        }
    }
}

impl GeneratorConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to emit the import statement.
    pub fn with_import(mut self, include: bool) -> Self {
        self.include_import = include;
        self
    }

    /// Set the indentation style.
    pub fn with_indent(mut self, indent: IndentStyle) -> Self {
        self.indent = indent;
        self
    }
}

/// Indentation style for generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndentStyle {
    /// Two spaces (default).
    #[default]
    Spaces2,

    /// Four spaces.
    Spaces4,

    /// Tabs.
    Tabs,
}

impl IndentStyle {
    /// Get the indentation string.
    pub fn as_str(&self) -> &'static str {
        match self {
            IndentStyle::Spaces2 => "  ",
            IndentStyle::Spaces4 => "    ",
            IndentStyle::Tabs => "\t",
        }
    }
}

/// Mutable state for one generation pass.
///
/// Created empty when a pass starts, filled by side effect while entities
/// are processed, and discarded once the document is assembled. Nothing
/// survives between passes.
#[derive(Debug, Default)]
pub(crate) struct PassState {
    /// Accumulated per-entity output lines.
    lines: Vec<String>,

    /// Enum names referenced by at least one emitted field, first-use order.
    used_enums: Vec<String>,
    used_enum_set: HashSet<String>,

    /// Entities whose block has been fully emitted.
    emitted: HashSet<String>,
}

impl PassState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an output line.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Append a blank separator line.
    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Record an enum as referenced; duplicates collapse to the first use.
    pub fn record_enum(&mut self, name: &str) {
        if self.used_enum_set.insert(name.to_string()) {
            self.used_enums.push(name.to_string());
        }
    }

    /// Enum names in first-use order.
    pub fn used_enums(&self) -> &[String] {
        &self.used_enums
    }

    /// Mark an entity block as fully emitted.
    pub fn mark_emitted(&mut self, name: &str) {
        self.emitted.insert(name.to_string());
    }

    /// Whether an entity block has been fully emitted in this pass.
    pub fn is_emitted(&self, name: &str) -> bool {
        self.emitted.contains(name)
    }

    /// Consume the state, yielding the accumulated entity lines.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Pascal-case a model name for use in a schema identifier.
pub(crate) fn pascal(name: &str) -> String {
    name.to_case(Case::Pascal)
}

/// Derive an exported schema identifier, e.g. `schema_ident("user",
/// "FindManyArgs")` → `UserFindManyArgsSchema`.
pub(crate) fn schema_ident(name: &str, suffix: &str) -> String {
    format!("{}{}Schema", pascal(name), suffix)
}

/// Derive the non-exported filter-predicate body identifier.
pub(crate) fn where_body_ident(name: &str) -> String {
    format!("{}WhereInput", pascal(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_idents() {
        assert_eq!(schema_ident("User", ""), "UserSchema");
        assert_eq!(schema_ident("user", "WhereInput"), "UserWhereInputSchema");
        assert_eq!(
            schema_ident("user_profile", "FindManyArgs"),
            "UserProfileFindManyArgsSchema"
        );
        assert_eq!(where_body_ident("User"), "UserWhereInput");
    }

    #[test]
    fn test_pass_state_enum_dedup() {
        let mut state = PassState::new();
        state.record_enum("Role");
        state.record_enum("Status");
        state.record_enum("Role");
        assert_eq!(state.used_enums(), ["Role".to_string(), "Status".to_string()]);
    }

    #[test]
    fn test_pass_state_emitted() {
        let mut state = PassState::new();
        assert!(!state.is_emitted("User"));
        state.mark_emitted("User");
        assert!(state.is_emitted("User"));
    }

    #[test]
    fn test_indent_style() {
        assert_eq!(IndentStyle::Spaces2.as_str(), "  ");
        assert_eq!(IndentStyle::Spaces4.as_str(), "    ");
        assert_eq!(IndentStyle::Tabs.as_str(), "\t");
    }
}
