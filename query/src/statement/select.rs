use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::condition::{compile_sequence, Condition};
use crate::error::CompileError;
use crate::language::Language;
use crate::schema::{projection_expr, quote_ident, quote_literal, scalar_expr, FieldKind, Schema, META_COLUMNS, RELATIONS_FIELD};
use crate::sql::{renumber, SqlWriter};
use crate::value::Value;

/// A SELECT statement under construction.
///
/// With no explicit fields the projection is the full meta set plus the
/// language document column. Explicit fields split into bare meta columns
/// and document attributes, the latter re-aggregated into a single JSON
/// object under the logical `data` name — except for inner statements,
/// whose result must be a flat column list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Select {
    schema: Schema,
    language: Language,
    fields: Vec<String>,
    conditions: Vec<Condition>,
    limit: u64,
    offset: u64,
    inner: bool,
}

impl Select {
    pub fn new(schema: &Schema) -> Self {
        Self {
            schema: schema.clone(),
            language: schema.default_language(),
            fields: Vec::new(),
            conditions: Vec::new(),
            limit: 0,
            offset: 0,
            inner: false,
        }
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Mark this statement as a correlated-subquery projection: flat column
    /// list, markers left generic for the outer statement's single
    /// renumbering pass.
    pub fn inner(mut self) -> Self {
        self.inner = true;
        self
    }

    pub fn compile(&self) -> Result<(String, Vec<Value>), CompileError> {
        let (sql, values) = self.compile_parts()?;
        if self.inner {
            return Ok((sql, values));
        }
        let sql = renumber(&sql, values.len())?;
        debug!("compiled select: {}", sql);
        Ok((sql, values))
    }

    /// Compile on behalf of a Subquery condition. The inner statement must
    /// project exactly one field so the outer `IN` has a single column to
    /// test against.
    pub(crate) fn compile_subquery(&self) -> Result<(String, Vec<Value>), CompileError> {
        if self.fields.len() != 1 {
            return Err(CompileError::SubqueryProjection { found: self.fields.len() });
        }
        self.compile_parts()
    }

    fn compile_parts(&self) -> Result<(String, Vec<Value>), CompileError> {
        let mut w = SqlWriter::new();
        w.push_sql("SELECT ");
        w.push_sql(&self.projection());
        w.push_sql(" FROM ");
        w.push_sql(&self.schema.table_ident());

        let mut wheres = SqlWriter::new();
        compile_sequence(&self.conditions, self.language, &mut wheres, false)?;
        if !wheres.is_empty() {
            w.push_sql(" WHERE ");
            let (sql, values) = wheres.finish();
            w.splice(&sql, values);
        }

        if self.limit > 0 {
            w.push_sql(" LIMIT ");
            w.push_value(Value::BigInt(self.limit as i64));
        }
        if self.offset > 0 {
            w.push_sql(" OFFSET ");
            w.push_value(Value::BigInt(self.offset as i64));
        }

        Ok(w.finish())
    }

    fn projection(&self) -> String {
        let document_column = self.language.document_column();

        if self.fields.is_empty() {
            let mut columns: Vec<String> = META_COLUMNS.iter().map(|column| quote_ident(column)).collect();
            columns.push(format!(r#"{} "data""#, quote_ident(&document_column)));
            return columns.join(", ");
        }

        let mut columns = Vec::new();
        let mut attributes = Vec::new();
        for field in &self.fields {
            match FieldKind::classify(field) {
                FieldKind::Meta => columns.push(quote_ident(field)),
                FieldKind::Document => columns.push(format!(r#"{} "data""#, quote_ident(&document_column))),
                FieldKind::Relations => columns.push(quote_ident(RELATIONS_FIELD)),
                FieldKind::InnerDocument => attributes.push(field.as_str()),
            }
        }

        if !attributes.is_empty() {
            if self.inner {
                // A subquery result must be a flat column list.
                for attribute in &attributes {
                    columns.push(format!("{} {}", scalar_expr(attribute, self.language), quote_ident(attribute)));
                }
            } else {
                let pairs = attributes
                    .iter()
                    .map(|attribute| format!("'{}', {}", quote_literal(attribute), projection_expr(attribute, self.language)))
                    .collect::<Vec<_>>()
                    .join(", ");
                columns.push(format!(r#"json_build_object({}) "data""#, pairs));
            }
        }

        columns.join(", ")
    }
}
