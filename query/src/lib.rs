//! polyglot-query compiles condition trees and field-value sets into
//! parameterized Postgres SQL for a single multilingual content table: fixed
//! meta columns, one JSON document column per supported language, and a JSON
//! relations column.
//!
//! Compilation is pure and synchronous. Every `compile` yields `(sql,
//! values)` where the SQL carries sequential positional parameters (`$1`..)
//! and `values.len()` matches the parameter count in order; handing the pair
//! to a driver is the job of a storage crate.
//!
//! ```
//! use polyglot_query::{Compare, Condition, Schema, Select};
//!
//! let schema = Schema::new("content");
//! let (sql, values) = Select::new(&schema)
//!     .filter(Condition::and("status", Compare::Eq, "published"))
//!     .filter(Condition::or("type", Compare::Eq, "article"))
//!     .compile()
//!     .unwrap();
//!
//! assert!(sql.ends_with(r#"WHERE "status" = $1 OR "type" = $2"#));
//! assert_eq!(values.len(), 2);
//! ```

pub mod condition;
pub mod error;
pub mod fields;
pub mod language;
pub mod schema;
mod sql;
pub mod statement;
pub mod value;

pub use condition::{Compare, Condition, Connector, MembershipTarget, SetOp};
pub use error::CompileError;
pub use fields::FieldValues;
pub use language::Language;
pub use schema::{FieldKind, Schema, META_COLUMNS};
pub use statement::{Delete, Insert, Select, Update};
pub use value::Value;
