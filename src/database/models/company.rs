use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::employee::{Employee, EmployeeForManipulation};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub country: Option<String>,
}

impl Company {
    pub fn full_address(&self) -> String {
        match self.country.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(country) => format!("{} {}", self.address, country),
            None => self.address.clone(),
        }
    }
}

/// A company together with the employees created in the same unit of work.
#[derive(Debug, Clone)]
pub struct NewCompany {
    pub company: Company,
    pub employees: Vec<Employee>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDto {
    pub id: Uuid,
    pub name: String,
    pub full_address: String,
}

impl From<&Company> for CompanyDto {
    fn from(c: &Company) -> Self {
        Self { id: c.id, name: c.name.clone(), full_address: c.full_address() }
    }
}

/// Body of company create and update requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyForManipulation {
    pub name: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub employees: Option<Vec<EmployeeForManipulation>>,
}

impl CompanyForManipulation {
    pub const NAME_MAX: usize = 60;
    pub const ADDRESS_MAX: usize = 60;

    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        let mut errors = HashMap::new();
        required_with_max(&mut errors, "name", self.name.as_deref(), Self::NAME_MAX);
        required_with_max(&mut errors, "address", self.address.as_deref(), Self::ADDRESS_MAX);

        for (i, employee) in self.employees.iter().flatten().enumerate() {
            if let Err(inner) = employee.validate() {
                for (field, message) in inner {
                    errors.insert(format!("employees[{}].{}", i, field), message);
                }
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    pub fn into_new_company(self) -> NewCompany {
        let company = Company {
            id: Uuid::new_v4(),
            name: self.name.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            country: self.country,
        };
        let employees = self
            .employees
            .unwrap_or_default()
            .iter()
            .map(|e| Employee::new(company.id, e))
            .collect();
        NewCompany { company, employees }
    }
}

fn required_with_max(
    errors: &mut HashMap<String, String>,
    field: &str,
    value: Option<&str>,
    max: usize,
) {
    match value.map(str::trim) {
        None | Some("") => {
            errors.insert(field.to_string(), format!("'{}' is a required field.", field));
        }
        Some(v) if v.chars().count() > max => {
            errors.insert(
                field.to_string(),
                format!("Maximum length for '{}' is {} characters.", field, max),
            );
        }
        _ => {}
    }
}
