use tracing::debug;

use crate::error::CompileError;
use crate::fields::FieldValues;
use crate::language::Language;
use crate::schema::{quote_ident, FieldKind, Schema, RELATIONS_FIELD};
use crate::sql::{renumber, SqlWriter};
use crate::value::Value;

/// An INSERT statement under construction.
///
/// Logical fields collapse into physical columns: meta fields bind directly,
/// document attributes fold into one JSON object bound as the language
/// document column, relation id lists fold into one relations-column object.
/// One column/marker pair per physical column touched, in first-touch order.
#[derive(Debug, Clone)]
pub struct Insert {
    schema: Schema,
    language: Language,
    values: FieldValues,
}

impl Insert {
    pub fn new(schema: &Schema) -> Self {
        Self { schema: schema.clone(), language: schema.default_language(), values: FieldValues::new() }
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn values(mut self, values: FieldValues) -> Self {
        self.values = values;
        self
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.set(field, value);
        self
    }

    pub fn set_relation(mut self, name: impl Into<String>, ids: Vec<String>) -> Self {
        self.values.set_relation(name, ids);
        self
    }

    pub fn compile(&self) -> Result<(String, Vec<Value>), CompileError> {
        let columns = physical_columns(&self.values, self.language)?;

        let mut w = SqlWriter::new();
        w.push_sql("INSERT INTO ");
        w.push_sql(&self.schema.table_ident());
        w.push_sql(" (");
        w.push_sql(&columns.iter().map(|(name, _)| quote_ident(name)).collect::<Vec<_>>().join(", "));
        w.push_sql(") VALUES (");
        for (at, (_, value)) in columns.into_iter().enumerate() {
            if at > 0 {
                w.push_sql(", ");
            }
            w.push_value(value);
        }
        w.push_sql(")");

        let (sql, values) = w.finish();
        let sql = renumber(&sql, values.len())?;
        debug!("compiled insert: {}", sql);
        Ok((sql, values))
    }
}

/// Collapse the logical field-value set into ordered physical columns.
fn physical_columns(fields: &FieldValues, language: Language) -> Result<Vec<(String, Value)>, CompileError> {
    if fields.is_empty() {
        return Err(CompileError::EmptyFieldValues);
    }

    let mut columns: Vec<(String, Option<Value>)> = Vec::new();
    let mut document = serde_json::Value::Object(Default::default());
    let mut document_at: Option<usize> = None;
    let mut relations = serde_json::Value::Object(Default::default());
    let mut relations_at: Option<usize> = None;

    for (field, value) in fields.pairs() {
        match FieldKind::classify(field) {
            FieldKind::Meta => columns.push((field.clone(), Some(value.clone()))),
            FieldKind::Document => {
                // A whole-document write replaces anything accumulated so far.
                if document_at.is_none() {
                    document_at = Some(columns.len());
                    columns.push((language.document_column(), None));
                }
                document = value.to_json();
            }
            FieldKind::InnerDocument => {
                if document_at.is_none() {
                    document_at = Some(columns.len());
                    columns.push((language.document_column(), None));
                }
                super::insert_attribute(&mut document, field, value.to_json());
            }
            FieldKind::Relations => {
                if relations_at.is_none() {
                    relations_at = Some(columns.len());
                    columns.push((RELATIONS_FIELD.to_owned(), None));
                }
                relations = value.to_json();
            }
        }
    }

    for (name, ids) in fields.relations() {
        if relations_at.is_none() {
            relations_at = Some(columns.len());
            columns.push((RELATIONS_FIELD.to_owned(), None));
        }
        super::insert_attribute(&mut relations, name, serde_json::Value::from(ids.clone()));
    }

    if let Some(at) = document_at {
        columns[at].1 = Some(Value::Json(document));
    }
    if let Some(at) = relations_at {
        columns[at].1 = Some(Value::Json(relations));
    }

    Ok(columns.into_iter().filter_map(|(name, value)| value.map(|value| (name, value))).collect())
}
