use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;
use uuid::Uuid;

/// Persisted employee row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub age: i32,
    pub position: String,
}

impl Employee {
    pub fn new(company_id: Uuid, input: &EmployeeForManipulation) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_id,
            name: input.name.clone().unwrap_or_default(),
            age: input.age.unwrap_or_default(),
            position: input.position.clone().unwrap_or_default(),
        }
    }

    pub fn apply(&mut self, input: &EmployeeForManipulation) {
        if let Some(name) = &input.name {
            self.name = name.clone();
        }
        if let Some(age) = input.age {
            self.age = age;
        }
        if let Some(position) = &input.position {
            self.position = position.clone();
        }
    }
}

// Sortable fields under their client names.
crate::register_fields!(Employee, "employee", |b| b
    .field("id", |e| json!(e.id))
    .text_field("name", |e| json!(e.name))
    .field("age", |e| json!(e.age))
    .text_field("position", |e| json!(e.position))
    .field("companyId", |e| json!(e.company_id))
    .column("company_id")
    .default_sort("name"));

/// Employee as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDto {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub position: String,
}

impl From<&Employee> for EmployeeDto {
    fn from(e: &Employee) -> Self {
        Self {
            id: e.id,
            name: e.name.clone(),
            age: e.age,
            position: e.position.clone(),
        }
    }
}

crate::register_fields!(EmployeeDto, "employee_dto", |b| b
    .field("id", |e| json!(e.id))
    .text_field("name", |e| json!(e.name))
    .field("age", |e| json!(e.age))
    .text_field("position", |e| json!(e.position))
    .default_sort("name"));

/// Body of employee create and full update requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeForManipulation {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub position: Option<String>,
}

impl From<&Employee> for EmployeeForManipulation {
    fn from(e: &Employee) -> Self {
        Self {
            name: Some(e.name.clone()),
            age: Some(e.age),
            position: Some(e.position.clone()),
        }
    }
}

impl EmployeeForManipulation {
    pub const NAME_MAX: usize = 30;
    pub const POSITION_MAX: usize = 20;
    pub const MIN_AGE: i32 = 18;

    /// Returns per-field messages for every rule the body breaks.
    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        let mut errors = HashMap::new();

        match self.name.as_deref().map(str::trim) {
            None | Some("") => {
                errors.insert("name".to_string(), "Employee 'name' is a required field.".to_string());
            }
            Some(name) if name.chars().count() > Self::NAME_MAX => {
                errors.insert(
                    "name".to_string(),
                    format!("Maximum length for 'name' is {} characters.", Self::NAME_MAX),
                );
            }
            _ => {}
        }

        if self.age.map_or(true, |age| age < Self::MIN_AGE) {
            errors.insert(
                "age".to_string(),
                format!("'age' is required and it can't be lower than {}.", Self::MIN_AGE),
            );
        }

        match self.position.as_deref().map(str::trim) {
            None | Some("") => {
                errors.insert("position".to_string(), "'position' is a required field.".to_string());
            }
            Some(position) if position.chars().count() > Self::POSITION_MAX => {
                errors.insert(
                    "position".to_string(),
                    format!("Maximum length for 'position' is {} characters.", Self::POSITION_MAX),
                );
            }
            _ => {}
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
