use uuid::Uuid;

use super::models::Employee;
use super::query_builder::{QueryBuilder, SqlParam};

pub const EMPLOYEES_TABLE: &str = "employees";

/// The queryable set of one company's employees: a conjunction of owner,
/// inclusive age range and an optional case-insensitive name search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeQuery {
    company_id: Uuid,
    min_age: u32,
    max_age: u32,
    search_term: Option<String>,
}

impl EmployeeQuery {
    pub fn new(company_id: Uuid, min_age: u32, max_age: u32, search_term: Option<&str>) -> Self {
        let search_term = search_term
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);
        Self { company_id, min_age, max_age, search_term }
    }

    pub fn company_id(&self) -> Uuid {
        self.company_id
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        let age = i64::from(employee.age);
        employee.company_id == self.company_id
            && age >= i64::from(self.min_age)
            && age <= i64::from(self.max_age)
            && self
                .search_term
                .as_deref()
                .map_or(true, |term| employee.name.to_lowercase().contains(term))
    }

    /// Renders the predicate over the employees table. Ordering and window are left to the caller.
    pub fn to_query_builder(&self) -> QueryBuilder {
        let builder = QueryBuilder::new(EMPLOYEES_TABLE)
            .where_eq("company_id", SqlParam::Uuid(self.company_id))
            .where_gte("age", SqlParam::Int(i64::from(self.min_age)))
            .where_lte("age", SqlParam::Int(i64::from(self.max_age)));
        match &self.search_term {
            Some(term) => builder.where_contains_lower("name", term.clone()),
            None => builder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(company_id: Uuid, name: &str, age: i32) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            company_id,
            name: name.into(),
            age,
            position: "Developer".into(),
        }
    }

    #[test]
    fn search_term_is_trimmed_and_lowercased() {
        let q = EmployeeQuery::new(Uuid::nil(), 0, 100, Some("  JaNa "));
        assert_eq!(q.search_term(), Some("jana"));
        assert_eq!(EmployeeQuery::new(Uuid::nil(), 0, 100, Some("   ")).search_term(), None);
    }

    #[test]
    fn predicate_is_conjunctive_and_inclusive() {
        let company = Uuid::new_v4();
        let q = EmployeeQuery::new(company, 26, 30, Some("a"));

        assert!(q.matches(&employee(company, "Sam Raiden", 26)));
        assert!(q.matches(&employee(company, "Jana McLeaf", 30)));
        assert!(!q.matches(&employee(company, "Kane Miller", 35)));
        assert!(!q.matches(&employee(company, "Bob", 27)));
        assert!(!q.matches(&employee(Uuid::new_v4(), "Sam Raiden", 26)));
    }

    #[test]
    fn renders_search_only_when_present() {
        let company = Uuid::nil();
        let without = EmployeeQuery::new(company, 0, u32::MAX, None).to_query_builder().to_count_sql();
        assert_eq!(without.params.len(), 3);
        assert!(!without.query.contains("POSITION"));

        let with = EmployeeQuery::new(company, 0, u32::MAX, Some("Sam")).to_query_builder().to_count_sql();
        assert_eq!(with.params.last(), Some(&SqlParam::Text("sam".into())));
        assert_eq!(with.params[2], SqlParam::Int(i64::from(u32::MAX)));
    }
}
