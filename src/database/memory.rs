use std::cmp::Ordering;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::employee_query::EmployeeQuery;
use super::manager::DatabaseError;
use super::models::user::normalize;
use super::models::{Company, Employee, NewCompany, User};
use super::seed::seed_data;
use super::store::Store;
use super::user_store::UserStore;
use crate::query::{window, Registered, SortDirection, SortSpec};

#[derive(Debug, Default)]
struct State {
    companies: Vec<Company>,
    employees: Vec<Employee>,
    users: Vec<User>,
}

/// Process-local store. Each operation holds the lock for its whole duration,
/// so every call observes one consistent state.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded() -> Self {
        let mut state = State::default();
        for new in seed_data() {
            state.companies.push(new.company);
            state.employees.extend(new.employees);
        }
        Self { state: RwLock::new(state) }
    }
}

fn matching_sorted(state: &State, query: &EmployeeQuery, sort: &SortSpec) -> Result<Vec<Employee>, DatabaseError> {
    let registry = Employee::field_registry().map_err(|e| DatabaseError::QueryError(e.to_string()))?;
    let keys = sort
        .fields()
        .iter()
        .map(|f| {
            registry
                .lookup(f.field)
                .map(|field| (field.clone(), f.sort))
                .ok_or_else(|| DatabaseError::QueryError(format!("unknown sort column {}", f.field)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows: Vec<Employee> = state.employees.iter().filter(|e| query.matches(e)).cloned().collect();
    rows.sort_by(|a, b| {
        for (field, direction) in &keys {
            let ord = compare_values(&field.value(a), &field.value(b));
            let ord = match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
    Ok(rows)
}

/// Case-insensitive ordering with ordinal tie-break.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

fn compare_companies(a: &Company, b: &Company) -> Ordering {
    compare_text(&a.name, &b.name).then(a.id.cmp(&b.id))
}

/// Total order over JSON scalars. Nulls sort first, numbers numerically,
/// strings through [`compare_text`].
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x
                .as_f64()
                .unwrap_or(0.0)
                .partial_cmp(&y.as_f64().unwrap_or(0.0))
                .unwrap_or(Ordering::Equal),
        },
        (Value::String(x), Value::String(y)) => compare_text(x, y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn find_company(&self, id: Uuid) -> Result<Option<Company>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.companies.iter().find(|c| c.id == id).cloned())
    }

    async fn list_companies(&self) -> Result<Vec<Company>, DatabaseError> {
        let state = self.state.read().await;
        let mut companies = state.companies.clone();
        companies.sort_by(compare_companies);
        Ok(companies)
    }

    async fn companies_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Company>, DatabaseError> {
        let state = self.state.read().await;
        let mut companies: Vec<Company> = state.companies.iter().filter(|c| ids.contains(&c.id)).cloned().collect();
        companies.sort_by(compare_companies);
        Ok(companies)
    }

    async fn create_companies(&self, companies: &[NewCompany]) -> Result<(), DatabaseError> {
        let mut state = self.state.write().await;
        for new in companies {
            if state.companies.iter().any(|c| c.id == new.company.id) {
                return Err(DatabaseError::QueryError(format!("duplicate company id {}", new.company.id)));
            }
        }
        for new in companies {
            state.companies.push(new.company.clone());
            state.employees.extend(new.employees.iter().cloned());
        }
        Ok(())
    }

    async fn update_company(&self, company: &Company) -> Result<bool, DatabaseError> {
        let mut state = self.state.write().await;
        match state.companies.iter_mut().find(|c| c.id == company.id) {
            Some(existing) => {
                *existing = company.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_company(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut state = self.state.write().await;
        let before = state.companies.len();
        state.companies.retain(|c| c.id != id);
        if state.companies.len() == before {
            return Ok(false);
        }
        state.employees.retain(|e| e.company_id != id);
        Ok(true)
    }

    async fn find_employee(&self, company_id: Uuid, id: Uuid) -> Result<Option<Employee>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state
            .employees
            .iter()
            .find(|e| e.company_id == company_id && e.id == id)
            .cloned())
    }

    async fn create_employee(&self, employee: &Employee) -> Result<(), DatabaseError> {
        let mut state = self.state.write().await;
        if !state.companies.iter().any(|c| c.id == employee.company_id) {
            return Err(DatabaseError::NotFound(format!("company {}", employee.company_id)));
        }
        state.employees.push(employee.clone());
        Ok(())
    }

    async fn update_employee(&self, employee: &Employee) -> Result<bool, DatabaseError> {
        let mut state = self.state.write().await;
        match state
            .employees
            .iter_mut()
            .find(|e| e.company_id == employee.company_id && e.id == employee.id)
        {
            Some(existing) => {
                *existing = employee.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_employee(&self, company_id: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let mut state = self.state.write().await;
        let before = state.employees.len();
        state.employees.retain(|e| !(e.company_id == company_id && e.id == id));
        Ok(state.employees.len() != before)
    }

    async fn count_employees(&self, query: &EmployeeQuery) -> Result<u64, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.employees.iter().filter(|e| query.matches(e)).count() as u64)
    }

    async fn fetch_employee_page(
        &self,
        query: &EmployeeQuery,
        sort: &SortSpec,
        skip: u64,
        take: u64,
    ) -> Result<Vec<Employee>, DatabaseError> {
        let state = self.state.read().await;
        let rows = matching_sorted(&state, query, sort)?;
        Ok(window(rows, skip, take).0)
    }

    async fn employee_page(
        &self,
        query: &EmployeeQuery,
        sort: &SortSpec,
        skip: u64,
        take: u64,
    ) -> Result<(Vec<Employee>, u64), DatabaseError> {
        let state = self.state.read().await;
        let rows = matching_sorted(&state, query, sort)?;
        Ok(window(rows, skip, take))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_name(&self, user_name: &str) -> Result<Option<User>, DatabaseError> {
        let key = normalize(user_name);
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.normalized_user_name == key).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let key = normalize(email);
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.normalized_email == key).cloned())
    }

    async fn create_user(&self, user: &User) -> Result<(), DatabaseError> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| {
            u.id == user.id
                || u.normalized_user_name == user.normalized_user_name
                || u.normalized_email == user.normalized_email
        }) {
            return Err(DatabaseError::Conflict(format!("user '{}' already exists", user.user_name)));
        }
        state.users.push(user.clone());
        Ok(())
    }

    async fn update_user_tokens(&self, user: &User) -> Result<bool, DatabaseError> {
        let mut state = self.state.write().await;
        match state.users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => {
                existing.refresh_token = user.refresh_token.clone();
                existing.refresh_token_expiry_time = user.refresh_token_expiry_time;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
