//! End-to-end compilation tests: full statements in, final SQL text and
//! ordered values out.

use anyhow::Result;
use polyglot_query::{Compare, CompileError, Condition, Connector, FieldValues, Insert, Language, Schema, Select, SetOp, Update, Value};

fn schema() -> Schema {
    Schema::new("content")
}

#[test]
fn select_default_projection() -> Result<()> {
    let (sql, values) = Select::new(&schema()).compile()?;

    assert_eq!(
        sql,
        r#"SELECT "id", "created_at", "updated_at", "owner_id", "status", "type", "data_en" "data" FROM "content""#
    );
    assert!(values.is_empty());
    Ok(())
}

#[test]
fn select_default_projection_follows_language() -> Result<()> {
    let (sql, _) = Select::new(&schema()).language(Language::De).compile()?;
    assert!(sql.contains(r#""data_de" "data""#));
    Ok(())
}

#[test]
fn select_where_connectors() -> Result<()> {
    let (sql, values) = Select::new(&schema())
        .filter(Condition::and("status", Compare::Eq, "published"))
        .filter(Condition::or("type", Compare::Eq, "article"))
        .compile()?;

    assert!(sql.ends_with(r#"WHERE "status" = $1 OR "type" = $2"#));
    assert_eq!(values, vec![Value::Text("published".into()), Value::Text("article".into())]);
    Ok(())
}

#[test]
fn select_projection_round_trip() -> Result<()> {
    let (sql_en, _) = Select::new(&schema()).fields(["id", "type", "body"]).compile()?;
    assert_eq!(
        sql_en,
        r#"SELECT "id", "type", json_build_object('body', "data_en"->'body') "data" FROM "content""#
    );

    // Switching language changes only the source column, not the exposed names.
    let (sql_fr, _) = Select::new(&schema()).language(Language::Fr).fields(["id", "type", "body"]).compile()?;
    assert_eq!(sql_fr, sql_en.replace("data_en", "data_fr"));
    Ok(())
}

#[test]
fn select_whole_document_and_relations_projection() -> Result<()> {
    let (sql, _) = Select::new(&schema()).fields(["id", "data", "relations"]).compile()?;
    assert_eq!(sql, r#"SELECT "id", "data_en" "data", "relations" FROM "content""#);
    Ok(())
}

#[test]
fn select_membership_scenario() -> Result<()> {
    let (sql, values) = Select::new(&schema()).filter(Condition::and_in("id", ["A", "B", "C"])).compile()?;

    assert!(sql.ends_with(r#"WHERE "id" IN ($1, $2, $3)"#));
    assert_eq!(values, vec![Value::Text("A".into()), Value::Text("B".into()), Value::Text("C".into())]);
    Ok(())
}

#[test]
fn select_limit_offset_bound_when_positive() -> Result<()> {
    let (sql, values) = Select::new(&schema())
        .filter(Condition::and("status", Compare::Eq, "published"))
        .limit(10)
        .offset(20)
        .compile()?;

    assert!(sql.ends_with(r#"WHERE "status" = $1 LIMIT $2 OFFSET $3"#));
    assert_eq!(values, vec![Value::Text("published".into()), Value::BigInt(10), Value::BigInt(20)]);

    let (sql, values) = Select::new(&schema()).compile()?;
    assert!(!sql.contains("LIMIT"));
    assert!(!sql.contains("OFFSET"));
    assert!(values.is_empty());
    Ok(())
}

#[test]
fn select_renumbers_across_nested_groups() -> Result<()> {
    let (sql, values) = Select::new(&schema())
        .filter(Condition::and("status", Compare::Eq, "published"))
        .filter(Condition::and_group(vec![
            Condition::and("type", Compare::Eq, "article"),
            Condition::or_group(vec![
                Condition::and("title", Compare::Like, "%a%"),
                Condition::or("title", Compare::Like, "%b%"),
            ]),
        ]))
        .limit(5)
        .compile()?;

    assert!(sql.ends_with(
        r#"WHERE "status" = $1 AND ("type" = $2 OR ("data_en"->>'title' LIKE $3 OR "data_en"->>'title' LIKE $4)) LIMIT $5"#
    ));
    assert_eq!(values.len(), 5);
    Ok(())
}

#[test]
fn inner_select_keeps_generic_markers_and_flat_projection() -> Result<()> {
    let (sql, values) = Select::new(&schema())
        .inner()
        .field("body")
        .filter(Condition::and("status", Compare::Eq, "published"))
        .compile()?;

    assert_eq!(sql, r#"SELECT "data_en"->>'body' "body" FROM "content" WHERE "status" = ?"#);
    assert_eq!(values.len(), 1);
    Ok(())
}

#[test]
fn subquery_splices_inner_text_and_renumbers_once() -> Result<()> {
    let inner = Select::new(&schema()).field("id").filter(Condition::and("type", Compare::Eq, "author"));
    let (sql, values) = Select::new(&schema())
        .filter(Condition::and("status", Compare::Eq, "published"))
        .filter(Condition::subquery(Connector::And, "id", SetOp::In, inner))
        .compile()?;

    assert!(sql.ends_with(r#"WHERE "status" = $1 AND "id" IN (SELECT "id" FROM "content" WHERE "type" = $2)"#));
    assert_eq!(values, vec![Value::Text("published".into()), Value::Text("author".into())]);
    Ok(())
}

#[test]
fn subquery_not_in() -> Result<()> {
    let inner = Select::new(&schema()).field("id").filter(Condition::and("status", Compare::Eq, "retired"));
    let (sql, _) = Select::new(&schema()).filter(Condition::subquery(Connector::And, "owner_id", SetOp::NotIn, inner)).compile()?;

    assert!(sql.contains(r#""owner_id" NOT IN (SELECT"#));
    Ok(())
}

#[test]
fn subquery_must_project_exactly_one_field() {
    let none = Select::new(&schema());
    let outer = Select::new(&schema()).filter(Condition::subquery(Connector::And, "id", SetOp::In, none));
    assert_eq!(outer.compile().unwrap_err(), CompileError::SubqueryProjection { found: 0 });

    let two = Select::new(&schema()).fields(["id", "type"]);
    let outer = Select::new(&schema()).filter(Condition::subquery(Connector::And, "id", SetOp::In, two));
    assert_eq!(outer.compile().unwrap_err(), CompileError::SubqueryProjection { found: 2 });
}

#[test]
fn insert_collapses_logical_fields_into_physical_columns() -> Result<()> {
    let (sql, values) = Insert::new(&schema())
        .set("id", "c1")
        .set("title", "Hello")
        .set("body", "World")
        .set("status", "draft")
        .set_relation("author", vec!["a1".into(), "a2".into()])
        .compile()?;

    assert_eq!(sql, r#"INSERT INTO "content" ("id", "data_en", "status", "relations") VALUES ($1, $2, $3, $4)"#);
    assert_eq!(values.len(), 4);
    assert_eq!(values[1], Value::Json(serde_json::json!({"title": "Hello", "body": "World"})));
    assert_eq!(values[3], Value::Json(serde_json::json!({"author": ["a1", "a2"]})));
    Ok(())
}

#[test]
fn insert_language_selects_document_column() -> Result<()> {
    let (sql, _) = Insert::new(&schema()).language(Language::Ja).set("title", "こんにちは").compile()?;
    assert_eq!(sql, r#"INSERT INTO "content" ("data_ja") VALUES ($1)"#);
    Ok(())
}

#[test]
fn insert_with_no_fields_is_an_error() {
    assert_eq!(Insert::new(&schema()).compile().unwrap_err(), CompileError::EmptyFieldValues);
}

#[test]
fn update_merges_document_attributes() -> Result<()> {
    let (sql, values) = Update::new(&schema())
        .set("title", "X")
        .filter(Condition::and("id", Compare::Eq, "c1"))
        .compile()?;

    assert_eq!(sql, r#"UPDATE "content" SET "data_en" = "data_en" || jsonb_build_object('title', $1) WHERE "id" = $2"#);
    assert_eq!(values, vec![Value::Text("X".into()), Value::Text("c1".into())]);
    Ok(())
}

#[test]
fn update_mixes_meta_and_document_fields() -> Result<()> {
    let (sql, values) = Update::new(&schema())
        .set("status", "published")
        .set("title", "X")
        .set("body", "Y")
        .filter(Condition::and("id", Compare::Eq, "c1"))
        .compile()?;

    assert_eq!(
        sql,
        r#"UPDATE "content" SET "status" = $1, "data_en" = "data_en" || jsonb_build_object('title', $2, 'body', $3) WHERE "id" = $4"#
    );
    assert_eq!(values.len(), 4);
    Ok(())
}

#[test]
fn update_replaces_named_relations_and_preserves_the_rest() -> Result<()> {
    let (sql, values) = Update::new(&schema())
        .set_relation("author", vec!["a9".into()])
        .filter(Condition::and("id", Compare::Eq, "c1"))
        .compile()?;

    assert_eq!(sql, r#"UPDATE "content" SET "relations" = "relations" || jsonb_build_object('author', $1) WHERE "id" = $2"#);
    assert_eq!(values[0], Value::Json(serde_json::json!(["a9"])));
    Ok(())
}

#[test]
fn update_whole_document_replaces_instead_of_merging() -> Result<()> {
    let (sql, values) = Update::new(&schema())
        .set("data", serde_json::json!({"title": "fresh"}))
        .filter(Condition::and("id", Compare::Eq, "c1"))
        .compile()?;

    assert_eq!(sql, r#"UPDATE "content" SET "data_en" = $1 WHERE "id" = $2"#);
    assert_eq!(values[0], Value::Json(serde_json::json!({"title": "fresh"})));
    Ok(())
}

#[test]
fn update_through_field_values_set() -> Result<()> {
    let mut fields = FieldValues::new();
    fields.set("status", "published");
    fields.set("status", "retired");

    let (sql, values) = Update::new(&schema()).values(fields).filter(Condition::and("id", Compare::Eq, "c1")).compile()?;
    assert_eq!(sql, r#"UPDATE "content" SET "status" = $1 WHERE "id" = $2"#);
    assert_eq!(values[0], Value::Text("retired".into()));
    Ok(())
}

#[test]
fn delete_shares_the_condition_path() -> Result<()> {
    let (sql, values) = polyglot_query::Delete::new(&schema())
        .filter(Condition::and("status", Compare::Eq, "retired"))
        .filter(Condition::or_in("id", ["A", "B"]))
        .limit(100)
        .compile()?;

    assert_eq!(sql, r#"DELETE FROM "content" WHERE "status" = $1 OR "id" IN ($2, $3) LIMIT $4"#);
    assert_eq!(values.len(), 4);
    Ok(())
}

#[test]
fn containment_membership_inside_a_statement() -> Result<()> {
    let (sql, values) = Select::new(&schema())
        .filter(Condition::and("status", Compare::Eq, "published"))
        .filter(Condition::and_in("tags", ["rust"]).in_relations())
        .compile()?;

    assert!(sql.ends_with(r#"WHERE "status" = $1 AND ("relations" @> $2)"#));
    assert_eq!(values[1], Value::Json(serde_json::json!({"tags": ["rust"]})));
    Ok(())
}
