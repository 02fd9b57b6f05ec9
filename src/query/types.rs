use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use super::fields::FieldRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn is_descending(&self) -> bool {
        matches!(self, SortDirection::Desc)
    }
}

/// One validated sort instruction. `field` is always the canonical registry name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    pub field: &'static str,
    pub sort: SortDirection,
}

impl SortField {
    pub fn asc(field: &'static str) -> Self {
        Self { field, sort: SortDirection::Asc }
    }

    pub fn desc(field: &'static str) -> Self {
        Self { field, sort: SortDirection::Desc }
    }
}

/// Ordered list of sort instructions consumed directly by the store query builders.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortSpec {
    fields: Vec<SortField>,
}

impl SortSpec {
    pub fn new(fields: Vec<SortField>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[SortField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }

    /// Appends `field` ascending unless it already takes part in the ordering.
    /// Used with a unique key so that equal sort keys still produce a total order.
    pub fn with_tiebreak(mut self, field: &'static str) -> Self {
        if !self.contains(field) {
            self.fields.push(SortField::asc(field));
        }
        self
    }

    /// Renders `ORDER BY` with the registry's columns. Text columns compare
    /// lower-cased first, then byte-wise, matching the in-memory ordering.
    pub fn to_sql<T>(&self, registry: &FieldRegistry<T>) -> String {
        if self.fields.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|f| {
                let dir = f.sort.to_sql();
                match registry.lookup(f.field) {
                    Some(field) if field.text => format!(
                        "LOWER(\"{col}\") COLLATE \"C\" {dir}, \"{col}\" COLLATE \"C\" {dir}",
                        col = field.column,
                        dir = dir
                    ),
                    Some(field) => format!("\"{}\" {}", field.column, dir),
                    None => format!("\"{}\" {}", f.field, dir),
                }
            })
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }
}

/// A sparse projection of one entity. Keys keep insertion order when serialized.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapedRecord {
    entries: Vec<(&'static str, Value)>,
}

impl ShapedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field; a name that is already present is left untouched.
    pub fn insert(&mut self, name: &'static str, value: Value) -> bool {
        if self.contains_key(name) {
            return false;
        }
        self.entries.push((name, value));
        true
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| *k == name).map(|(_, v)| v)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| *k == name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ShapedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Row {
        age: u32,
        owner: u32,
        name: String,
    }

    fn rows() -> FieldRegistry<Row> {
        FieldRegistry::builder("row")
            .field("age", |r: &Row| json!(r.age))
            .field("ownerId", |r: &Row| json!(r.owner))
            .column("owner_id")
            .text_field("name", |r: &Row| json!(r.name))
            .build()
            .unwrap()
    }

    #[test]
    fn order_clause_keeps_field_order() {
        let spec = SortSpec::new(vec![SortField::desc("age"), SortField::asc("ownerId")]);
        assert_eq!(spec.to_sql(&rows()), "ORDER BY \"age\" DESC, \"owner_id\" ASC");
        assert_eq!(SortSpec::default().to_sql(&rows()), "");
    }

    #[test]
    fn text_columns_sort_case_insensitively_then_ordinally() {
        let spec = SortSpec::new(vec![SortField::desc("name")]);
        assert_eq!(
            spec.to_sql(&rows()),
            "ORDER BY LOWER(\"name\") COLLATE \"C\" DESC, \"name\" COLLATE \"C\" DESC"
        );
    }

    #[test]
    fn tiebreak_is_appended_once() {
        let spec = SortSpec::new(vec![SortField::asc("name")]).with_tiebreak("id");
        assert_eq!(spec.fields().last(), Some(&SortField::asc("id")));

        let spec = SortSpec::new(vec![SortField::desc("id")]).with_tiebreak("id");
        assert_eq!(spec.fields(), &[SortField::desc("id")]);
    }

    #[test]
    fn shaped_record_serializes_in_insertion_order() {
        let mut record = ShapedRecord::new();
        record.insert("name", json!("Sam Raiden"));
        record.insert("age", json!(26));
        assert!(!record.insert("name", json!("ignored")));

        let text = serde_json::to_string(&record).unwrap();
        assert_eq!(text, r#"{"name":"Sam Raiden","age":26}"#);
        assert_eq!(record.get("name"), Some(&json!("Sam Raiden")));
    }
}
