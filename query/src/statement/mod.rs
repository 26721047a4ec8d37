//! Statement builders: Select, Insert, Update, Delete.
//!
//! All four funnel through the same condition-sequence compiler and the same
//! renumbering pass — one condition compiler serves every statement kind.

mod delete;
mod insert;
mod select;
mod update;

pub use delete::Delete;
pub use insert::Insert;
pub use select::Select;
pub use update::Update;

/// Insert an attribute into a JSON object value. A non-object target is
/// replaced with a fresh object.
pub(crate) fn insert_attribute(target: &mut serde_json::Value, name: &str, value: serde_json::Value) {
    if !target.is_object() {
        *target = serde_json::Value::Object(Default::default());
    }
    if let serde_json::Value::Object(map) = target {
        map.insert(name.to_owned(), value);
    }
}
