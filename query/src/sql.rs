//! SQL fragment assembly and placeholder renumbering.
//!
//! Compilation emits a generic `?` marker for every bound value. Once the
//! full statement text is concatenated, a single left-to-right pass rewrites
//! each marker into the dialect's sequential positional parameter (`$1`,
//! `$2`, ...). Statements marked inner skip the pass so the outer statement
//! renumbers the fully nested text exactly once.

use crate::error::CompileError;
use crate::value::Value;

/// The generic positional marker emitted during compilation.
pub(crate) const MARKER: char = '?';

/// Accumulates SQL text with generic markers plus the values bound to them,
/// in emission order. The core invariant lives here: every marker is pushed
/// together with its value, so the marker count always matches the value
/// count for anything this writer produced.
#[derive(Debug, Default)]
pub(crate) struct SqlWriter {
    sql: String,
    values: Vec<Value>,
}

impl SqlWriter {
    pub fn new() -> Self { Self::default() }

    pub fn push_sql(&mut self, s: &str) { self.sql.push_str(s); }

    /// Emit one marker and bind one value to it.
    pub fn push_value(&mut self, value: Value) {
        self.sql.push(MARKER);
        self.values.push(value);
    }

    /// Append an already-compiled fragment, keeping its values in order.
    /// Used to splice an inner statement's text (markers still generic)
    /// into its parent.
    pub fn splice(&mut self, sql: &str, values: Vec<Value>) {
        self.sql.push_str(sql);
        self.values.extend(values);
    }

    pub fn is_empty(&self) -> bool { self.sql.is_empty() }

    pub fn finish(self) -> (String, Vec<Value>) { (self.sql, self.values) }
}

/// Replace each generic marker with a sequential positional parameter,
/// strictly in textual left-to-right order.
///
/// Fails when the marker count does not equal the value count: that is a
/// compiler bug, and mis-bound SQL must never reach the driver.
pub(crate) fn renumber(sql: &str, expected: usize) -> Result<String, CompileError> {
    let mut out = String::with_capacity(sql.len() + expected);
    let mut found = 0usize;

    for ch in sql.chars() {
        if ch == MARKER {
            found += 1;
            out.push('$');
            out.push_str(&found.to_string());
        } else {
            out.push(ch);
        }
    }

    if found != expected {
        return Err(CompileError::PlaceholderCountMismatch { expected, found });
    }

    Ok(out)
}
