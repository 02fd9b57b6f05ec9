use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::ServiceError;
use crate::database::models::{
    Company, Employee, EmployeeDto, EmployeeForManipulation, EmployeeParameters, JsonPatch,
};
use crate::database::{EmployeeQuery, Store};
use crate::query::{DataShaper, MetaData, PageRequest, PagedResult, Registered, ShapedRecord, SortSpecBuilder};

pub struct EmployeeService {
    store: Arc<dyn Store>,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Filtered, searched, sorted, paged and shaped employees of one company.
    ///
    /// Argument checks happen before the store is touched. The page and its
    /// count come from a single `Store::employee_page` call.
    pub async fn get_employees_page(
        &self,
        company_id: Uuid,
        params: &EmployeeParameters,
    ) -> Result<(Vec<ShapedRecord>, MetaData), ServiceError> {
        if !params.valid_age_range() {
            return Err(ServiceError::MaxAgeRange);
        }
        let page = PageRequest::new(params.page_number(), params.page_size())?;
        let entity_fields = Employee::field_registry()?;
        let shaper = DataShaper::<EmployeeDto>::new()?;

        self.require_company(company_id).await?;

        let query = EmployeeQuery::new(company_id, params.min_age(), params.max_age(), params.search_term());
        let sort = SortSpecBuilder::build(params.order_by(), entity_fields).with_tiebreak("id");
        debug!("Employee page {:?} of company {} ordered {:?}", page, company_id, sort.fields());

        let (items, total) = self
            .store
            .employee_page(&query, &sort, page.skip(), page.take())
            .await?;

        let paged = PagedResult::new(items, total, &page).map(|e| EmployeeDto::from(&e));
        let shaped = shaper.shape(&paged.items, params.fields());
        Ok((shaped, paged.meta_data))
    }

    pub async fn get_employee(&self, company_id: Uuid, id: Uuid) -> Result<EmployeeDto, ServiceError> {
        let employee = self.require_employee(company_id, id).await?;
        Ok(EmployeeDto::from(&employee))
    }

    pub async fn get_employee_shaped(
        &self,
        company_id: Uuid,
        id: Uuid,
        fields: Option<&str>,
    ) -> Result<ShapedRecord, ServiceError> {
        let shaper = DataShaper::<EmployeeDto>::new()?;
        let dto = self.get_employee(company_id, id).await?;
        Ok(shaper.shape_one(&dto, fields))
    }

    pub async fn create_employee(
        &self,
        company_id: Uuid,
        input: EmployeeForManipulation,
    ) -> Result<EmployeeDto, ServiceError> {
        input.validate().map_err(ServiceError::Invalid)?;
        self.require_company(company_id).await?;

        let employee = Employee::new(company_id, &input);
        self.store.create_employee(&employee).await?;
        info!("Created employee {} for company {}", employee.id, company_id);
        Ok(EmployeeDto::from(&employee))
    }

    pub async fn update_employee(
        &self,
        company_id: Uuid,
        id: Uuid,
        input: EmployeeForManipulation,
    ) -> Result<(), ServiceError> {
        input.validate().map_err(ServiceError::Invalid)?;
        let mut employee = self.require_employee(company_id, id).await?;
        employee.apply(&input);
        if !self.store.update_employee(&employee).await? {
            return Err(ServiceError::EmployeeNotFound(id));
        }
        Ok(())
    }

    /// Applies a JSON Patch to the employee's current values, then runs the
    /// same validation as a full update.
    pub async fn patch_employee(
        &self,
        company_id: Uuid,
        id: Uuid,
        patch: Option<JsonPatch>,
    ) -> Result<(), ServiceError> {
        let patch = patch.ok_or(ServiceError::PatchDocumentMissing)?;
        let mut employee = self.require_employee(company_id, id).await?;

        let patched = patch
            .apply_to(&EmployeeForManipulation::from(&employee))
            .map_err(ServiceError::Invalid)?;
        patched.validate().map_err(ServiceError::Invalid)?;

        employee.apply(&patched);
        if !self.store.update_employee(&employee).await? {
            return Err(ServiceError::EmployeeNotFound(id));
        }
        debug!("Patched employee {} with {} operation(s)", id, patch.0.len());
        Ok(())
    }

    pub async fn delete_employee(&self, company_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        self.require_company(company_id).await?;
        if !self.store.delete_employee(company_id, id).await? {
            warn!("Employee {} not found for delete", id);
            return Err(ServiceError::EmployeeNotFound(id));
        }
        info!("Deleted employee {} of company {}", id, company_id);
        Ok(())
    }

    async fn require_company(&self, id: Uuid) -> Result<Company, ServiceError> {
        self.store.find_company(id).await?.ok_or_else(|| {
            warn!("Company {} doesn't exist in the database", id);
            ServiceError::CompanyNotFound(id)
        })
    }

    async fn require_employee(&self, company_id: Uuid, id: Uuid) -> Result<Employee, ServiceError> {
        self.require_company(company_id).await?;
        self.store
            .find_employee(company_id, id)
            .await?
            .ok_or(ServiceError::EmployeeNotFound(id))
    }
}
