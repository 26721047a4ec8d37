//! Mapping from compiler values to Postgres parameters.

use bytes::BytesMut;
use polyglot_query::Value;
use tokio_postgres::types::{to_sql_checked, IsNull, ToSql, Type};

/// Adapter binding one compiler [`Value`] as a Postgres parameter, delegating
/// to the driver's own encoding per variant.
#[derive(Debug)]
pub struct PgParam<'a>(pub &'a Value);

impl ToSql for PgParam<'_> {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self.0 {
            Value::Text(v) => v.to_sql(ty, out),
            Value::BigInt(v) => v.to_sql(ty, out),
            Value::Double(v) => v.to_sql(ty, out),
            Value::Bool(v) => v.to_sql(ty, out),
            Value::Json(v) => v.to_sql(ty, out),
            Value::Null => Ok(IsNull::Yes),
        }
    }

    // The compiler does not know column types; parameter types are whatever
    // the server infers for each marker position.
    fn accepts(_ty: &Type) -> bool { true }

    to_sql_checked!();
}

/// Borrow a compiled value list as a driver parameter slice.
pub fn params(values: &[Value]) -> Vec<PgParam<'_>> { values.iter().map(PgParam).collect() }
