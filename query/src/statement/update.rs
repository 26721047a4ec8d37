use tracing::debug;

use crate::condition::{compile_sequence, Condition};
use crate::error::CompileError;
use crate::fields::FieldValues;
use crate::language::Language;
use crate::schema::{quote_ident, quote_literal, FieldKind, Schema, RELATIONS_FIELD};
use crate::sql::{renumber, SqlWriter};
use crate::value::Value;

/// An UPDATE statement under construction.
///
/// Meta fields render as plain assignments. Document attributes render as a
/// JSON merge so stored attributes absent from this update are preserved;
/// relation id lists merge the same way at relation-name granularity (a
/// named relation is replaced wholesale, unnamed relations are untouched).
/// A whole-column write (`data` / `relations`) replaces instead of merging.
#[derive(Debug, Clone)]
pub struct Update {
    schema: Schema,
    language: Language,
    values: FieldValues,
    conditions: Vec<Condition>,
}

enum SetClause {
    Meta(String, Value),
    Document,
    Relations,
}

impl Update {
    pub fn new(schema: &Schema) -> Self {
        Self { schema: schema.clone(), language: schema.default_language(), values: FieldValues::new(), conditions: Vec::new() }
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

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn compile(&self) -> Result<(String, Vec<Value>), CompileError> {
        if self.values.is_empty() {
            return Err(CompileError::EmptyFieldValues);
        }

        // Split logical fields into set clauses in first-touch order; the
        // document and relations columns each appear once no matter how many
        // logical fields land in them.
        let mut clauses: Vec<SetClause> = Vec::new();
        let mut document_attrs: Vec<(&str, &Value)> = Vec::new();
        let mut document_whole: Option<&Value> = None;
        let mut relation_items: Vec<(String, Value)> = Vec::new();
        let mut relations_whole: Option<&Value> = None;
        let mut document_seen = false;
        let mut relations_seen = false;

        for (field, value) in self.values.pairs() {
            match FieldKind::classify(field) {
                FieldKind::Meta => clauses.push(SetClause::Meta(field.clone(), value.clone())),
                FieldKind::Document => {
                    if !document_seen {
                        document_seen = true;
                        clauses.push(SetClause::Document);
                    }
                    document_whole = Some(value);
                }
                FieldKind::InnerDocument => {
                    if !document_seen {
                        document_seen = true;
                        clauses.push(SetClause::Document);
                    }
                    document_attrs.push((field.as_str(), value));
                }
                FieldKind::Relations => {
                    if !relations_seen {
                        relations_seen = true;
                        clauses.push(SetClause::Relations);
                    }
                    relations_whole = Some(value);
                }
            }
        }
        for (name, ids) in self.values.relations() {
            if !relations_seen {
                relations_seen = true;
                clauses.push(SetClause::Relations);
            }
            relation_items.push((name.clone(), Value::Json(serde_json::Value::from(ids.clone()))));
        }

        let document_column = quote_ident(&self.language.document_column());
        let mut w = SqlWriter::new();
        w.push_sql("UPDATE ");
        w.push_sql(&self.schema.table_ident());
        w.push_sql(" SET ");

        for (at, clause) in clauses.iter().enumerate() {
            if at > 0 {
                w.push_sql(", ");
            }
            match clause {
                SetClause::Meta(field, value) => {
                    w.push_sql(&quote_ident(field));
                    w.push_sql(" = ");
                    w.push_value(value.clone());
                }
                SetClause::Document => match document_whole {
                    Some(whole) => {
                        // Whole-document replacement; later attribute writes
                        // fold into the bound object client-side.
                        let mut replacement = whole.to_json();
                        for (name, value) in &document_attrs {
                            super::insert_attribute(&mut replacement, name, value.to_json());
                        }
                        w.push_sql(&document_column);
                        w.push_sql(" = ");
                        w.push_value(Value::Json(replacement));
                    }
                    None => {
                        w.push_sql(&document_column);
                        w.push_sql(" = ");
                        w.push_sql(&document_column);
                        w.push_sql(" || jsonb_build_object(");
                        for (i, (name, value)) in document_attrs.iter().enumerate() {
                            if i > 0 {
                                w.push_sql(", ");
                            }
                            w.push_sql(&format!("'{}', ", quote_literal(name)));
                            w.push_value((*value).clone());
                        }
                        w.push_sql(")");
                    }
                },
                SetClause::Relations => match relations_whole {
                    Some(whole) => {
                        let mut replacement = whole.to_json();
                        for (name, value) in &relation_items {
                            super::insert_attribute(&mut replacement, name, value.to_json());
                        }
                        w.push_sql(&quote_ident(RELATIONS_FIELD));
                        w.push_sql(" = ");
                        w.push_value(Value::Json(replacement));
                    }
                    None => {
                        w.push_sql(&quote_ident(RELATIONS_FIELD));
                        w.push_sql(" = ");
                        w.push_sql(&quote_ident(RELATIONS_FIELD));
                        w.push_sql(" || jsonb_build_object(");
                        for (i, (name, value)) in relation_items.iter().enumerate() {
                            if i > 0 {
                                w.push_sql(", ");
                            }
                            w.push_sql(&format!("'{}', ", quote_literal(name)));
                            w.push_value(value.clone());
                        }
                        w.push_sql(")");
                    }
                },
            }
        }

        let mut wheres = SqlWriter::new();
        compile_sequence(&self.conditions, self.language, &mut wheres, false)?;
        if !wheres.is_empty() {
            w.push_sql(" WHERE ");
            let (sql, values) = wheres.finish();
            w.splice(&sql, values);
        }

        let (sql, values) = w.finish();
        let sql = renumber(&sql, values.len())?;
        debug!("compiled update: {}", sql);
        Ok((sql, values))
    }
}
