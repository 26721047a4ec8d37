use tracing::debug;

use crate::condition::{compile_sequence, Condition};
use crate::error::CompileError;
use crate::language::Language;
use crate::schema::Schema;
use crate::sql::{renumber, SqlWriter};
use crate::value::Value;

/// A DELETE statement under construction: WHERE plus LIMIT/OFFSET, sharing
/// the Select condition path.
#[derive(Debug, Clone)]
pub struct Delete {
    schema: Schema,
    language: Language,
    conditions: Vec<Condition>,
    limit: u64,
    offset: u64,
}

impl Delete {
    pub fn new(schema: &Schema) -> Self {
        Self { schema: schema.clone(), language: schema.default_language(), conditions: Vec::new(), limit: 0, offset: 0 }
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
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

    pub fn compile(&self) -> Result<(String, Vec<Value>), CompileError> {
        let mut w = SqlWriter::new();
        w.push_sql("DELETE FROM ");
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

        let (sql, values) = w.finish();
        let sql = renumber(&sql, values.len())?;
        debug!("compiled delete: {}", sql);
        Ok((sql, values))
    }
}
