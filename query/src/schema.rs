//! Field classification and column-expression rendering.
//!
//! Every logical field name routes to exactly one physical location: a
//! reserved meta column, the per-language document column, an attribute
//! inside that document, or the relations column. Classification is a pure
//! function of the name; it never touches the database.

use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Reserved per-row columns, present once regardless of language.
pub const META_COLUMNS: [&str; 6] = ["id", "created_at", "updated_at", "owner_id", "status", "type"];

/// Logical name of the whole per-language document column.
pub const DOCUMENT_FIELD: &str = "data";

/// Logical (and physical) name of the relations column.
pub const RELATIONS_FIELD: &str = "relations";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// A reserved column: identifier, timestamps, owner, status, type.
    Meta,
    /// The whole per-language document column.
    Document,
    /// A key inside the document column's JSON value.
    InnerDocument,
    /// The whole relations column.
    Relations,
}

impl FieldKind {
    /// Classify a bare field name. Total: every name yields exactly one kind,
    /// and anything unrecognized degrades to an inner-document attribute.
    pub fn classify(name: &str) -> FieldKind {
        if META_COLUMNS.contains(&name) {
            FieldKind::Meta
        } else if name == DOCUMENT_FIELD {
            FieldKind::Document
        } else if name == RELATIONS_FIELD {
            FieldKind::Relations
        } else {
            FieldKind::InnerDocument
        }
    }
}

/// Escape any existing quotes by doubling them, and double-quote.
pub(crate) fn quote_ident(name: &str) -> String { format!(r#""{}""#, name.replace('"', "\"\"")) }

/// Escape a name for embedding in a single-quoted SQL literal.
pub(crate) fn quote_literal(name: &str) -> String { name.replace('\'', "''") }

/// Column expression for a field in a scalar comparison context.
///
/// Inner-document attributes extract as text (`->>`) so they compare against
/// plain parameter values.
pub fn scalar_expr(name: &str, language: Language) -> String {
    match FieldKind::classify(name) {
        FieldKind::Meta => quote_ident(name),
        FieldKind::Document => quote_ident(&language.document_column()),
        FieldKind::Relations => quote_ident(RELATIONS_FIELD),
        FieldKind::InnerDocument => format!("{}->>'{}'", quote_ident(&language.document_column()), quote_literal(name)),
    }
}

/// Column expression for a field in a projection context.
///
/// Inner-document attributes extract with `->` to preserve JSON typing
/// through aggregation.
pub fn projection_expr(name: &str, language: Language) -> String {
    match FieldKind::classify(name) {
        FieldKind::InnerDocument => format!("{}->'{}'", quote_ident(&language.document_column()), quote_literal(name)),
        _ => scalar_expr(name, language),
    }
}

/// Table configuration handed to every statement builder. Explicit so that
/// multiple tables or default languages can coexist in one process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    table: String,
    default_language: Language,
}

impl Schema {
    pub fn new(table: impl Into<String>) -> Self { Self { table: table.into(), default_language: Language::default() } }

    pub fn with_default_language(mut self, language: Language) -> Self {
        self.default_language = language;
        self
    }

    pub fn table(&self) -> &str { &self.table }

    pub fn default_language(&self) -> Language { self.default_language }

    pub(crate) fn table_ident(&self) -> String { quote_ident(&self.table) }
}
