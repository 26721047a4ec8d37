//! The condition model: a closed set of node kinds, each compilable to a SQL
//! fragment plus the values bound to its markers.
//!
//! Conditions form ordered sequences. Each node carries the connector that
//! joins it to its *preceding sibling*; the first element's connector only
//! matters once the sequence is nested inside a group. One compiler serves
//! every statement kind.

use serde::{Deserialize, Serialize};

use crate::error::CompileError;
use crate::language::Language;
use crate::schema::{quote_ident, scalar_expr, FieldKind, RELATIONS_FIELD};
use crate::sql::SqlWriter;
use crate::statement::Select;
use crate::value::Value;

/// How a condition joins the sibling before it in an ordered sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub(crate) fn as_sql(&self) -> &'static str {
        match self {
            Connector::And => " AND ",
            Connector::Or => " OR ",
        }
    }
}

/// Comparison operator of a leaf clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compare {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
}

impl Compare {
    pub(crate) fn as_sql(&self) -> &'static str {
        match self {
            Compare::Eq => "=",
            Compare::Ne => "<>",
            Compare::Gt => ">",
            Compare::Ge => ">=",
            Compare::Lt => "<",
            Compare::Le => "<=",
            Compare::Like => "LIKE",
        }
    }
}

/// Set-membership operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetOp {
    In,
    NotIn,
}

/// Which JSON column a membership test routes to when the field is an
/// inner-document attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipTarget {
    Document,
    Relations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    /// `lhs OP rhs` with one bound value. Optional transforms wrap the column
    /// expression and the marker in a SQL function call.
    Clause {
        connector: Connector,
        field: String,
        field_fn: Option<String>,
        op: Compare,
        value_fn: Option<String>,
        value: Value,
    },
    /// A parenthesized, connector-joined sequence. Empty groups compile to
    /// empty output, parentheses included.
    Group { connector: Connector, children: Vec<Condition> },
    /// Set membership. Meta and document columns use native `IN`; attribute
    /// and relation membership is a JSON array containment test, since those
    /// values live inside an array-valued JSON field.
    Membership {
        connector: Connector,
        field: String,
        field_fn: Option<String>,
        op: SetOp,
        values: Vec<Value>,
        language: Option<Language>,
        target: MembershipTarget,
    },
    /// `lhs IN (SELECT ...)` against an inner statement. The inner text keeps
    /// generic markers; the outer statement renumbers the nested text once.
    Subquery {
        connector: Connector,
        field: String,
        op: SetOp,
        language: Option<Language>,
        select: Box<Select>,
    },
}

impl Condition {
    /// Parameterized clause constructor; `and`/`or` are thin call-sites.
    pub fn clause(connector: Connector, field: impl Into<String>, op: Compare, value: impl Into<Value>) -> Self {
        Condition::Clause { connector, field: field.into(), field_fn: None, op, value_fn: None, value: value.into() }
    }

    pub fn and(field: impl Into<String>, op: Compare, value: impl Into<Value>) -> Self {
        Self::clause(Connector::And, field, op, value)
    }

    pub fn or(field: impl Into<String>, op: Compare, value: impl Into<Value>) -> Self {
        Self::clause(Connector::Or, field, op, value)
    }

    pub fn group(connector: Connector, children: Vec<Condition>) -> Self { Condition::Group { connector, children } }

    pub fn and_group(children: Vec<Condition>) -> Self { Self::group(Connector::And, children) }

    pub fn or_group(children: Vec<Condition>) -> Self { Self::group(Connector::Or, children) }

    /// Parameterized membership constructor; the `*_in`/`*_not_in` names are
    /// thin call-sites over it. A single value is a one-element sequence.
    pub fn membership<I, V>(connector: Connector, field: impl Into<String>, op: SetOp, values: I, target: MembershipTarget) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Condition::Membership {
            connector,
            field: field.into(),
            field_fn: None,
            op,
            values: values.into_iter().map(Into::into).collect(),
            language: None,
            target,
        }
    }

    pub fn and_in<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::membership(Connector::And, field, SetOp::In, values, MembershipTarget::Document)
    }

    pub fn or_in<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::membership(Connector::Or, field, SetOp::In, values, MembershipTarget::Document)
    }

    pub fn and_not_in<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::membership(Connector::And, field, SetOp::NotIn, values, MembershipTarget::Document)
    }

    pub fn or_not_in<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::membership(Connector::Or, field, SetOp::NotIn, values, MembershipTarget::Document)
    }

    /// Correlated subquery membership. The select is forced into inner mode:
    /// flat projection, markers left generic for the outer renumbering pass.
    pub fn subquery(connector: Connector, field: impl Into<String>, op: SetOp, select: Select) -> Self {
        Condition::Subquery { connector, field: field.into(), op, language: None, select: Box::new(select.inner()) }
    }

    /// Wrap the column expression in a SQL function, e.g. `LOWER`.
    pub fn field_fn(mut self, func: impl Into<String>) -> Self {
        match &mut self {
            Condition::Clause { field_fn, .. } | Condition::Membership { field_fn, .. } => *field_fn = Some(func.into()),
            _ => {}
        }
        self
    }

    /// Wrap the bound value's marker in a SQL function, e.g. `LOWER(?)`.
    pub fn value_fn(mut self, func: impl Into<String>) -> Self {
        if let Condition::Clause { value_fn, .. } = &mut self {
            *value_fn = Some(func.into());
        }
        self
    }

    /// Route an inner-document membership test to the relations column.
    pub fn in_relations(mut self) -> Self {
        if let Condition::Membership { target, .. } = &mut self {
            *target = MembershipTarget::Relations;
        }
        self
    }

    /// Override the statement language for this node's column resolution.
    pub fn language(mut self, lang: Language) -> Self {
        match &mut self {
            Condition::Membership { language, .. } | Condition::Subquery { language, .. } => *language = Some(lang),
            _ => {}
        }
        self
    }

    pub fn connector(&self) -> Connector {
        match self {
            Condition::Clause { connector, .. }
            | Condition::Group { connector, .. }
            | Condition::Membership { connector, .. }
            | Condition::Subquery { connector, .. } => *connector,
        }
    }

    /// True when the node compiles to no output at all: an empty group (or a
    /// group of empty groups), or a membership test with nothing to test.
    pub(crate) fn is_empty(&self) -> bool {
        match self {
            Condition::Group { children, .. } => children.iter().all(Condition::is_empty),
            Condition::Membership { values, .. } => values.is_empty(),
            _ => false,
        }
    }

    /// Append this condition's fragment and values to the writer. `language`
    /// is the surrounding statement's classification context.
    pub(crate) fn compile(&self, language: Language, w: &mut SqlWriter) -> Result<(), CompileError> {
        match self {
            Condition::Clause { field, field_fn, op, value_fn, value, .. } => {
                push_lhs(w, &scalar_expr(field, language), field_fn);
                w.push_sql(" ");
                w.push_sql(op.as_sql());
                w.push_sql(" ");
                match value_fn {
                    Some(func) => {
                        w.push_sql(func);
                        w.push_sql("(");
                        w.push_value(value.clone());
                        w.push_sql(")");
                    }
                    None => w.push_value(value.clone()),
                }
            }

            Condition::Group { children, .. } => {
                compile_sequence(children, language, w, true)?;
            }

            Condition::Membership { field, field_fn, op, values, language: override_lang, target, .. } => {
                let language = override_lang.unwrap_or(language);
                match FieldKind::classify(field) {
                    FieldKind::Meta | FieldKind::Document => {
                        push_lhs(w, &scalar_expr(field, language), field_fn);
                        w.push_sql(match op {
                            SetOp::In => " IN (",
                            SetOp::NotIn => " NOT IN (",
                        });
                        for (at, value) in values.iter().enumerate() {
                            if at > 0 {
                                w.push_sql(", ");
                            }
                            w.push_value(value.clone());
                        }
                        w.push_sql(")");
                    }
                    FieldKind::InnerDocument | FieldKind::Relations => {
                        let column = match target {
                            MembershipTarget::Relations => quote_ident(RELATIONS_FIELD),
                            MembershipTarget::Document => quote_ident(&language.document_column()),
                        };
                        if *op == SetOp::NotIn {
                            w.push_sql("NOT ");
                        }
                        w.push_sql("(");
                        for (at, value) in values.iter().enumerate() {
                            if at > 0 {
                                w.push_sql(" OR ");
                            }
                            w.push_sql(&column);
                            w.push_sql(" @> ");
                            w.push_value(containment(field, value));
                        }
                        w.push_sql(")");
                    }
                }
            }

            Condition::Subquery { field, op, language: override_lang, select, .. } => {
                let language = override_lang.unwrap_or(language);
                w.push_sql(&scalar_expr(field, language));
                w.push_sql(match op {
                    SetOp::In => " IN (",
                    SetOp::NotIn => " NOT IN (",
                });
                let (sql, values) = select.compile_subquery()?;
                w.splice(&sql, values);
                w.push_sql(")");
            }
        }
        Ok(())
    }
}

fn push_lhs(w: &mut SqlWriter, expr: &str, field_fn: &Option<String>) {
    match field_fn {
        Some(func) => {
            w.push_sql(func);
            w.push_sql("(");
            w.push_sql(expr);
            w.push_sql(")");
        }
        None => w.push_sql(expr),
    }
}

/// The containment document `{"<field>": [<value>]}` bound as one jsonb
/// parameter. Binding the document itself keeps markers out of string
/// literals, where renumbering could not reach them.
fn containment(field: &str, value: &Value) -> Value {
    let mut doc = serde_json::Map::new();
    doc.insert(field.to_owned(), serde_json::Value::Array(vec![value.to_json()]));
    Value::Json(serde_json::Value::Object(doc))
}

/// Compile an ordered condition sequence: element *i* joins element *i-1*
/// with its own connector; element 0's connector is ignored. Empty nodes are
/// skipped entirely so they contribute neither output nor a dangling join.
pub(crate) fn compile_sequence(conditions: &[Condition], language: Language, w: &mut SqlWriter, parenthesize: bool) -> Result<(), CompileError> {
    let effective: Vec<&Condition> = conditions.iter().filter(|c| !c.is_empty()).collect();
    if effective.is_empty() {
        return Ok(());
    }

    if parenthesize {
        w.push_sql("(");
    }
    for (at, condition) in effective.iter().enumerate() {
        if at > 0 {
            w.push_sql(condition.connector().as_sql());
        }
        condition.compile(language, w)?;
    }
    if parenthesize {
        w.push_sql(")");
    }
    Ok(())
}
