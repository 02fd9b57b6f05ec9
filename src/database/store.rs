use async_trait::async_trait;
use uuid::Uuid;

use super::employee_query::EmployeeQuery;
use super::manager::DatabaseError;
use super::models::{Company, Employee, NewCompany};
use crate::query::SortSpec;

/// Persistence seam used by the services. Every call is a unit of work of its own.
#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> Result<(), DatabaseError>;

    async fn find_company(&self, id: Uuid) -> Result<Option<Company>, DatabaseError>;

    /// All companies ordered by name.
    async fn list_companies(&self) -> Result<Vec<Company>, DatabaseError>;

    async fn companies_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Company>, DatabaseError>;

    /// Inserts every company with its employees, or nothing.
    async fn create_companies(&self, companies: &[NewCompany]) -> Result<(), DatabaseError>;

    async fn update_company(&self, company: &Company) -> Result<bool, DatabaseError>;

    /// Removes the company and its employees.
    async fn delete_company(&self, id: Uuid) -> Result<bool, DatabaseError>;

    async fn find_employee(&self, company_id: Uuid, id: Uuid) -> Result<Option<Employee>, DatabaseError>;

    async fn create_employee(&self, employee: &Employee) -> Result<(), DatabaseError>;

    async fn update_employee(&self, employee: &Employee) -> Result<bool, DatabaseError>;

    async fn delete_employee(&self, company_id: Uuid, id: Uuid) -> Result<bool, DatabaseError>;

    async fn count_employees(&self, query: &EmployeeQuery) -> Result<u64, DatabaseError>;

    async fn fetch_employee_page(
        &self,
        query: &EmployeeQuery,
        sort: &SortSpec,
        skip: u64,
        take: u64,
    ) -> Result<Vec<Employee>, DatabaseError>;

    /// One page of the set plus the size of the whole set. Stores that can read both
    /// from a single snapshot override this.
    async fn employee_page(
        &self,
        query: &EmployeeQuery,
        sort: &SortSpec,
        skip: u64,
        take: u64,
    ) -> Result<(Vec<Employee>, u64), DatabaseError> {
        let total = self.count_employees(query).await?;
        let items = self.fetch_employee_page(query, sort, skip, take).await?;
        Ok((items, total))
    }
}
