use super::fields::FieldRegistry;
use super::types::{SortDirection, SortField, SortSpec};

/// Turns a client `orderBy` string into a [`SortSpec`] validated against a registry.
pub struct SortSpecBuilder;

impl SortSpecBuilder {
    /// `"name desc, age"` becomes `[(name, desc), (age, asc)]`.
    ///
    /// Unknown fields are dropped without error. When nothing survives, or the
    /// input is blank, the registry's default field is used ascending.
    pub fn build<T>(order_by: Option<&str>, registry: &FieldRegistry<T>) -> SortSpec {
        let fields = order_by
            .map(|s| Self::parse_order_string(s, registry))
            .unwrap_or_default();

        if fields.is_empty() {
            return Self::default_for(registry);
        }
        SortSpec::new(fields)
    }

    pub fn default_for<T>(registry: &FieldRegistry<T>) -> SortSpec {
        SortSpec::new(vec![SortField::asc(registry.default_sort())])
    }

    fn parse_order_string<T>(s: &str, registry: &FieldRegistry<T>) -> Vec<SortField> {
        let mut out = Vec::new();
        for part in s.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }
            let mut it = trimmed.split_whitespace();
            let Some(column) = it.next() else { continue };
            let Some(field) = registry.lookup(column) else {
                tracing::debug!("Dropping unknown sort field '{}'", column);
                continue;
            };
            // Only the exact token "desc" flips the direction.
            let sort = match it.next() {
                Some("desc") => SortDirection::Desc,
                _ => SortDirection::Asc,
            };
            out.push(SortField { field: field.name, sort });
        }
        out
    }
}
