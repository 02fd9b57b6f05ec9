use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use super::error::ServiceError;
use crate::database::models::{Company, CompanyDto, CompanyForManipulation};
use crate::database::Store;

pub struct CompanyService {
    store: Arc<dyn Store>,
}

impl CompanyService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn get_all_companies(&self) -> Result<Vec<CompanyDto>, ServiceError> {
        let companies = self.store.list_companies().await?;
        Ok(companies.iter().map(CompanyDto::from).collect())
    }

    pub async fn get_company(&self, id: Uuid) -> Result<CompanyDto, ServiceError> {
        let company = self.require_company(id).await?;
        Ok(CompanyDto::from(&company))
    }

    /// Every id must resolve; duplicates count as unresolved.
    pub async fn get_by_ids(&self, ids: &[Uuid]) -> Result<Vec<CompanyDto>, ServiceError> {
        if ids.is_empty() {
            return Err(ServiceError::IdParametersMissing);
        }
        let companies = self.store.companies_by_ids(ids).await?;
        if companies.len() != ids.len() {
            return Err(ServiceError::CollectionMismatch);
        }
        Ok(companies.iter().map(CompanyDto::from).collect())
    }

    pub async fn create_company(&self, input: CompanyForManipulation) -> Result<CompanyDto, ServiceError> {
        input.validate().map_err(ServiceError::Invalid)?;
        let new = input.into_new_company();
        self.store.create_companies(std::slice::from_ref(&new)).await?;
        info!("Created company {} with {} employees", new.company.id, new.employees.len());
        Ok(CompanyDto::from(&new.company))
    }

    /// Creates all companies in one unit of work. Returns them with their comma-joined ids.
    pub async fn create_company_collection(
        &self,
        input: Option<Vec<CompanyForManipulation>>,
    ) -> Result<(Vec<CompanyDto>, String), ServiceError> {
        let input = match input {
            Some(list) if !list.is_empty() => list,
            _ => return Err(ServiceError::CompanyCollectionMissing),
        };

        let mut errors = std::collections::HashMap::new();
        for (i, company) in input.iter().enumerate() {
            if let Err(inner) = company.validate() {
                errors.extend(inner.into_iter().map(|(field, msg)| (format!("[{}].{}", i, field), msg)));
            }
        }
        if !errors.is_empty() {
            return Err(ServiceError::Invalid(errors));
        }

        let new: Vec<_> = input.into_iter().map(CompanyForManipulation::into_new_company).collect();
        self.store.create_companies(&new).await?;

        let dtos: Vec<CompanyDto> = new.iter().map(|n| CompanyDto::from(&n.company)).collect();
        let ids = dtos.iter().map(|c| c.id.to_string()).collect::<Vec<_>>().join(",");
        info!("Created {} companies", dtos.len());
        Ok((dtos, ids))
    }

    /// Replaces name, address and country. Nested employees in the body are ignored.
    pub async fn update_company(&self, id: Uuid, input: CompanyForManipulation) -> Result<(), ServiceError> {
        input.validate().map_err(ServiceError::Invalid)?;
        let existing = self.require_company(id).await?;
        let updated = Company {
            id: existing.id,
            name: input.name.unwrap_or(existing.name),
            address: input.address.unwrap_or(existing.address),
            country: input.country,
        };
        if !self.store.update_company(&updated).await? {
            return Err(ServiceError::CompanyNotFound(id));
        }
        Ok(())
    }

    pub async fn delete_company(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.store.delete_company(id).await? {
            warn!("Company {} not found for delete", id);
            return Err(ServiceError::CompanyNotFound(id));
        }
        info!("Deleted company {}", id);
        Ok(())
    }

    async fn require_company(&self, id: Uuid) -> Result<Company, ServiceError> {
        self.store.find_company(id).await?.ok_or_else(|| {
            warn!("Company {} doesn't exist in the database", id);
            ServiceError::CompanyNotFound(id)
        })
    }
}

/// Parses `(id1,id2)` or `id1,id2`. Anything unparseable yields no ids at all.
pub fn parse_ids(raw: &str) -> Vec<Uuid> {
    let inner = raw.trim().trim_start_matches('(').trim_end_matches(')');
    let parsed: Result<Vec<Uuid>, _> = inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Uuid::parse_str)
        .collect();
    parsed.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::seed::{ADMIN_SOLUTIONS_ID, IT_SOLUTIONS_ID};
    use crate::database::MemoryStore;

    fn service() -> CompanyService {
        CompanyService::new(Arc::new(MemoryStore::seeded()))
    }

    fn body(name: &str) -> CompanyForManipulation {
        CompanyForManipulation {
            name: Some(name.into()),
            address: Some("1 Main St".into()),
            country: Some("UK".into()),
            employees: None,
        }
    }

    #[test]
    fn parses_id_lists() {
        let raw = format!("({},{})", IT_SOLUTIONS_ID, ADMIN_SOLUTIONS_ID);
        assert_eq!(parse_ids(&raw), vec![IT_SOLUTIONS_ID, ADMIN_SOLUTIONS_ID]);
        assert_eq!(parse_ids(&IT_SOLUTIONS_ID.to_string()), vec![IT_SOLUTIONS_ID]);
        assert!(parse_ids("(not-a-guid)").is_empty());
        assert!(parse_ids("()").is_empty());
    }

    #[tokio::test]
    async fn get_by_ids_requires_every_id() {
        let svc = service();
        assert!(matches!(svc.get_by_ids(&[]).await, Err(ServiceError::IdParametersMissing)));
        assert!(matches!(
            svc.get_by_ids(&[IT_SOLUTIONS_ID, Uuid::new_v4()]).await,
            Err(ServiceError::CollectionMismatch)
        ));
        assert_eq!(svc.get_by_ids(&[IT_SOLUTIONS_ID, ADMIN_SOLUTIONS_ID]).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn collection_create_reports_ids_in_order() {
        let svc = service();
        assert!(matches!(
            svc.create_company_collection(Some(vec![])).await,
            Err(ServiceError::CompanyCollectionMissing)
        ));

        let (created, ids) = svc
            .create_company_collection(Some(vec![body("First"), body("Second")]))
            .await
            .unwrap();
        assert_eq!(created.len(), 2);
        assert_eq!(ids, format!("{},{}", created[0].id, created[1].id));
        assert_eq!(svc.get_all_companies().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn invalid_collection_item_writes_nothing() {
        let svc = service();
        let mut bad = body("Broken");
        bad.address = None;
        match svc.create_company_collection(Some(vec![body("Fine"), bad])).await {
            Err(ServiceError::Invalid(errors)) => assert!(errors.contains_key("[1].address")),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(svc.get_all_companies().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_and_delete_unknown_company() {
        let svc = service();
        let missing = Uuid::new_v4();
        assert!(matches!(svc.update_company(missing, body("X")).await, Err(ServiceError::CompanyNotFound(id)) if id == missing));
        assert!(matches!(svc.delete_company(missing).await, Err(ServiceError::CompanyNotFound(_))));

        svc.update_company(IT_SOLUTIONS_ID, body("Renamed")).await.unwrap();
        let dto = svc.get_company(IT_SOLUTIONS_ID).await.unwrap();
        assert_eq!(dto.name, "Renamed");
        assert_eq!(dto.full_address, "1 Main St UK");
    }
}
