//! The field-value set consumed by Insert and Update.

use std::collections::HashMap;

use crate::value::Value;

/// An order-preserving map from logical field name to value, with
/// last-write-wins update semantics: the first write of a name fixes its
/// position, later writes replace the value in place. Relation id lists are
/// kept separately, keyed by relation name.
#[derive(Debug, Clone, Default)]
pub struct FieldValues {
    pairs: Vec<(String, Value)>,
    index: HashMap<String, usize>,
    relations: Vec<(String, Vec<String>)>,
}

impl FieldValues {
    pub fn new() -> Self { Self::default() }

    /// Set a field value. Rewrites keep the original position.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let field = field.into();
        let value = value.into();
        match self.index.get(&field) {
            Some(&at) => self.pairs[at].1 = value,
            None => {
                self.index.insert(field.clone(), self.pairs.len());
                self.pairs.push((field, value));
            }
        }
        self
    }

    /// Set the referenced ids for a named relation, replacing any previous
    /// list for that name.
    pub fn set_relation(&mut self, name: impl Into<String>, ids: Vec<String>) -> &mut Self {
        let name = name.into();
        match self.relations.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, list)) => *list = ids,
            None => self.relations.push((name, ids)),
        }
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> { self.index.get(field).map(|&at| &self.pairs[at].1) }

    pub fn pairs(&self) -> impl Iterator<Item = &(String, Value)> { self.pairs.iter() }

    pub fn relations(&self) -> impl Iterator<Item = &(String, Vec<String>)> { self.relations.iter() }

    pub fn len(&self) -> usize { self.pairs.len() }

    pub fn is_empty(&self) -> bool { self.pairs.is_empty() && self.relations.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_preserved() {
        let mut fields = FieldValues::new();
        fields.set("title", "A").set("body", "B").set("status", "draft");

        let names: Vec<&str> = fields.pairs().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["title", "body", "status"]);
    }

    #[test]
    fn rewrite_replaces_in_place() {
        let mut fields = FieldValues::new();
        fields.set("title", "first").set("body", "B").set("title", "second");

        let names: Vec<&str> = fields.pairs().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["title", "body"]);
        assert_eq!(fields.get("title"), Some(&Value::Text("second".into())));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn relations_replace_by_name() {
        let mut fields = FieldValues::new();
        fields.set_relation("author", vec!["a1".into()]);
        fields.set_relation("tags", vec!["t1".into(), "t2".into()]);
        fields.set_relation("author", vec!["a2".into()]);

        let rels: Vec<(&str, usize)> = fields.relations().map(|(name, ids)| (name.as_str(), ids.len())).collect();
        assert_eq!(rels, vec![("author", 1), ("tags", 2)]);
        assert_eq!(fields.relations().next().unwrap().1, vec!["a2".to_string()]);
    }
}
