use std::marker::PhantomData;

use super::error::QueryError;
use super::fields::{Field, FieldRegistry, Registered};
use super::types::ShapedRecord;

/// Projects entities onto the comma-separated field list a client asked for.
pub struct DataShaper<T: Registered> {
    registry: &'static FieldRegistry<T>,
    _phantom: PhantomData<T>,
}

impl<T: Registered> DataShaper<T> {
    pub fn new() -> Result<Self, QueryError> {
        Ok(Self { registry: T::field_registry()?, _phantom: PhantomData })
    }

    pub fn shape(&self, entities: &[T], fields: Option<&str>) -> Vec<ShapedRecord> {
        let required = self.required_fields(fields);
        entities.iter().map(|e| Self::fetch(e, &required)).collect()
    }

    pub fn shape_one(&self, entity: &T, fields: Option<&str>) -> ShapedRecord {
        let required = self.required_fields(fields);
        Self::fetch(entity, &required)
    }

    fn required_fields(&self, fields: Option<&str>) -> Vec<&'static Field<T>> {
        let registry = self.registry;
        match fields.map(str::trim).filter(|s| !s.is_empty()) {
            None => registry.fields().iter().collect(),
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .filter_map(|name| registry.lookup(name))
                .collect(),
        }
    }

    fn fetch(entity: &T, required: &[&'static Field<T>]) -> ShapedRecord {
        let mut record = ShapedRecord::new();
        for field in required {
            record.insert(field.name, field.value(entity));
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Staff {
        id: u32,
        name: String,
        age: u32,
        position: String,
    }

    crate::register_fields!(Staff, "staff", |b| b
        .field("id", |s| json!(s.id))
        .field("name", |s| json!(s.name))
        .field("age", |s| json!(s.age))
        .field("position", |s| json!(s.position))
        .default_sort("name"));

    fn staff() -> Vec<Staff> {
        vec![
            Staff { id: 1, name: "Sam Raiden".into(), age: 26, position: "Software developer".into() },
            Staff { id: 2, name: "Jana McLeaf".into(), age: 30, position: "Software developer".into() },
        ]
    }

    fn keys(record: &ShapedRecord) -> Vec<&'static str> {
        record.keys().collect()
    }

    #[test]
    fn blank_field_list_returns_every_field_in_registry_order() {
        let shaper = DataShaper::<Staff>::new().unwrap();
        for fields in [None, Some(""), Some("  ")] {
            let shaped = shaper.shape(&staff(), fields);
            assert_eq!(shaped.len(), 2);
            assert_eq!(keys(&shaped[0]), vec!["id", "name", "age", "position"]);
        }
    }

    #[test]
    fn requested_fields_keep_client_order() {
        let shaper = DataShaper::<Staff>::new().unwrap();
        let shaped = shaper.shape(&staff(), Some("name,age"));
        for record in &shaped {
            assert_eq!(keys(record), vec!["name", "age"]);
        }
        assert_eq!(shaped[1].get("age"), Some(&json!(30)));

        let shaped = shaper.shape(&staff(), Some(" AGE , Name"));
        assert_eq!(keys(&shaped[0]), vec!["age", "name"]);
    }

    #[test]
    fn unknown_fields_are_dropped_but_records_are_kept() {
        let shaper = DataShaper::<Staff>::new().unwrap();
        let shaped = shaper.shape(&staff(), Some("salary,,bonus"));
        assert_eq!(shaped.len(), 2);
        assert!(shaped.iter().all(|r| r.is_empty()));
    }

    #[test]
    fn repeated_fields_appear_once() {
        let shaper = DataShaper::<Staff>::new().unwrap();
        let record = shaper.shape_one(&staff()[0], Some("name,id,NAME"));
        assert_eq!(keys(&record), vec!["name", "id"]);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({ "name": "Sam Raiden", "id": 1 })
        );
    }
}
