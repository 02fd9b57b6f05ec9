use serde_json::Value;

use super::error::QueryError;

/// A named output field and the accessor that reads it from an entity.
pub struct Field<T> {
    pub name: &'static str,
    /// Storage column. Same as `name` unless mapped with [`FieldRegistryBuilder::column`].
    pub column: &'static str,
    /// Text fields order case-insensitively, ties broken by ordinal comparison.
    pub text: bool,
    pub accessor: fn(&T) -> Value,
}

impl<T> Field<T> {
    pub fn value(&self, entity: &T) -> Value {
        (self.accessor)(entity)
    }
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        Self { name: self.name, column: self.column, text: self.text, accessor: self.accessor }
    }
}

impl<T> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("column", &self.column)
            .field("text", &self.text)
            .finish()
    }
}

/// Explicit, ordered field list of one entity shape.
///
/// Lookups are case-insensitive; iteration follows registration order, which is
/// also the order of a fully shaped record.
pub struct FieldRegistry<T> {
    fields: Vec<Field<T>>,
    default_sort: &'static str,
}

impl<T> std::fmt::Debug for FieldRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("fields", &self.fields)
            .field("default_sort", &self.default_sort)
            .finish()
    }
}

impl<T> FieldRegistry<T> {
    pub fn builder(entity: &'static str) -> FieldRegistryBuilder<T> {
        FieldRegistryBuilder { entity, fields: vec![], default_sort: None }
    }

    pub fn lookup(&self, name: &str) -> Option<&Field<T>> {
        self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    pub fn fields(&self) -> &[Field<T>] {
        &self.fields
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Field used when a client supplies no usable ordering.
    pub fn default_sort(&self) -> &'static str {
        self.default_sort
    }
}

pub struct FieldRegistryBuilder<T> {
    entity: &'static str,
    fields: Vec<Field<T>>,
    default_sort: Option<&'static str>,
}

impl<T> FieldRegistryBuilder<T> {
    pub fn field(mut self, name: &'static str, accessor: fn(&T) -> Value) -> Self {
        self.fields.push(Field { name, column: name, text: false, accessor });
        self
    }

    pub fn text_field(mut self, name: &'static str, accessor: fn(&T) -> Value) -> Self {
        self.fields.push(Field { name, column: name, text: true, accessor });
        self
    }

    /// Stores the most recently added field under `column`.
    pub fn column(mut self, column: &'static str) -> Self {
        if let Some(last) = self.fields.last_mut() {
            last.column = column;
        }
        self
    }

    pub fn default_sort(mut self, name: &'static str) -> Self {
        self.default_sort = Some(name);
        self
    }

    pub fn build(self) -> Result<FieldRegistry<T>, QueryError> {
        if self.fields.is_empty() {
            return Err(QueryError::Configuration(format!(
                "no fields registered for '{}'",
                self.entity
            )));
        }

        for (i, field) in self.fields.iter().enumerate() {
            if field.name.is_empty() || field.column.is_empty() {
                return Err(QueryError::Configuration(format!(
                    "empty field name or column registered for '{}'",
                    self.entity
                )));
            }
            if self.fields[..i].iter().any(|f| f.name.eq_ignore_ascii_case(field.name)) {
                return Err(QueryError::Configuration(format!(
                    "field '{}' registered twice for '{}'",
                    field.name, self.entity
                )));
            }
        }

        let requested = self.default_sort.unwrap_or("name");
        let default_sort = self
            .fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(requested))
            .map(|f| f.name)
            .ok_or_else(|| {
                QueryError::Configuration(format!(
                    "default sort field '{}' is not registered for '{}'",
                    requested, self.entity
                ))
            })?;

        Ok(FieldRegistry { fields: self.fields, default_sort })
    }
}

/// Implemented by every type that can be sorted or shaped.
pub trait Registered: Sized + 'static {
    fn field_registry() -> Result<&'static FieldRegistry<Self>, QueryError>;
}

/// Implements [`Registered`] from a registry built once per process.
///
/// ```ignore
/// register_fields!(EmployeeDto, "employee", |b| b
///     .field("id", |e| json!(e.id))
///     .field("name", |e| json!(e.name))
///     .default_sort("name"));
/// ```
#[macro_export]
macro_rules! register_fields {
    ($ty:ty, $name:expr, |$b:ident| $body:expr) => {
        impl $crate::query::Registered for $ty {
            fn field_registry(
            ) -> Result<&'static $crate::query::FieldRegistry<Self>, $crate::query::QueryError> {
                static REGISTRY: once_cell::sync::Lazy<
                    Result<$crate::query::FieldRegistry<$ty>, $crate::query::QueryError>,
                > = once_cell::sync::Lazy::new(|| {
                    let $b = $crate::query::FieldRegistry::<$ty>::builder($name);
                    $body.build()
                });
                REGISTRY.as_ref().map_err(|e| e.clone())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Widget {
        id: u32,
        label: String,
    }

    fn widget_registry() -> Result<FieldRegistry<Widget>, QueryError> {
        FieldRegistry::builder("widget")
            .field("id", |w: &Widget| json!(w.id))
            .text_field("label", |w: &Widget| json!(w.label))
            .field("binId", |w: &Widget| json!(w.id))
            .column("bin_id")
            .default_sort("label")
            .build()
    }

    #[test]
    fn lookup_ignores_case() {
        let registry = widget_registry().unwrap();
        let widget = Widget { id: 7, label: "bolt".into() };

        let field = registry.lookup("LaBeL").expect("label is registered");
        assert_eq!(field.name, "label");
        assert_eq!(field.value(&widget), json!("bolt"));
        assert!(registry.lookup("colour").is_none());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["id", "label", "binId"]);
    }

    #[test]
    fn columns_and_text_flags_follow_registration() {
        let registry = widget_registry().unwrap();
        let bin = registry.lookup("BINID").unwrap();
        assert_eq!((bin.name, bin.column, bin.text), ("binId", "bin_id", false));
        let label = registry.lookup("label").unwrap();
        assert_eq!((label.column, label.text), ("label", true));
    }

    #[test]
    fn registry_debug_lists_field_names() {
        // Widget itself is not Debug
        let text = format!("{:?}", widget_registry().unwrap());
        assert!(text.contains("\"label\""));
        assert!(text.contains("default_sort"));
    }

    #[test]
    fn missing_default_sort_is_a_configuration_error() {
        let err = FieldRegistry::builder("widget")
            .field("id", |w: &Widget| json!(w.id))
            .build()
            .unwrap_err();
        assert!(matches!(err, QueryError::Configuration(msg) if msg.contains("'name'")));
    }

    #[test]
    fn duplicate_fields_are_rejected() {
        let err = FieldRegistry::builder("widget")
            .field("label", |w: &Widget| json!(w.label))
            .field("LABEL", |w: &Widget| json!(w.label))
            .default_sort("label")
            .build()
            .unwrap_err();
        assert!(matches!(err, QueryError::Configuration(_)));
    }

    #[test]
    fn empty_registry_is_rejected() {
        let err = FieldRegistry::<Widget>::builder("widget").build().unwrap_err();
        assert!(matches!(err, QueryError::Configuration(_)));
    }
}
