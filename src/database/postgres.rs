use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::employee_query::EmployeeQuery;
use super::manager::{DatabaseError, DatabaseManager};
use super::models::user::normalize;
use super::models::{Company, Employee, NewCompany, User};
use super::query_builder::SqlResult;
use super::store::Store;
use super::user_store::UserStore;
use crate::query::{FieldRegistry, Registered, SortSpec};

const COMPANY_ORDER: &str =
    "ORDER BY LOWER(\"name\") COLLATE \"C\" ASC, \"name\" COLLATE \"C\" ASC, \"id\" ASC";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn employee_fields() -> Result<&'static FieldRegistry<Employee>, DatabaseError> {
    Employee::field_registry().map_err(|e| DatabaseError::QueryError(e.to_string()))
}

fn count_from(row: &sqlx::postgres::PgRow) -> Result<u64, DatabaseError> {
    let count: i64 = row.try_get("count")?;
    u64::try_from(count).map_err(|_| DatabaseError::QueryError(format!("negative count {}", count)))
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn find_company(&self, id: Uuid) -> Result<Option<Company>, DatabaseError> {
        let company = sqlx::query_as::<_, Company>("SELECT * FROM \"companies\" WHERE \"id\" = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(company)
    }

    async fn list_companies(&self) -> Result<Vec<Company>, DatabaseError> {
        let sql = format!("SELECT * FROM \"companies\" {}", COMPANY_ORDER);
        let companies = sqlx::query_as::<_, Company>(&sql).fetch_all(&self.pool).await?;
        Ok(companies)
    }

    async fn companies_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Company>, DatabaseError> {
        let sql = format!("SELECT * FROM \"companies\" WHERE \"id\" = ANY($1) {}", COMPANY_ORDER);
        let companies = sqlx::query_as::<_, Company>(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        Ok(companies)
    }

    async fn create_companies(&self, companies: &[NewCompany]) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        for new in companies {
            let c = &new.company;
            sqlx::query("INSERT INTO \"companies\" (\"id\", \"name\", \"address\", \"country\") VALUES ($1, $2, $3, $4)")
                .bind(c.id)
                .bind(&c.name)
                .bind(&c.address)
                .bind(&c.country)
                .execute(&mut *tx)
                .await?;
            for e in &new.employees {
                insert_employee(&mut tx, e).await?;
            }
        }
        tx.commit().await?;
        Ok(())
    }

    async fn update_company(&self, company: &Company) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE \"companies\" SET \"name\" = $2, \"address\" = $3, \"country\" = $4 WHERE \"id\" = $1",
        )
        .bind(company.id)
        .bind(&company.name)
        .bind(&company.address)
        .bind(&company.country)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_company(&self, id: Uuid) -> Result<bool, DatabaseError> {
        // employees go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM \"companies\" WHERE \"id\" = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_employee(&self, company_id: Uuid, id: Uuid) -> Result<Option<Employee>, DatabaseError> {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT * FROM \"employees\" WHERE \"company_id\" = $1 AND \"id\" = $2",
        )
        .bind(company_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(employee)
    }

    async fn create_employee(&self, employee: &Employee) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        insert_employee(&mut tx, employee).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_employee(&self, employee: &Employee) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE \"employees\" SET \"name\" = $3, \"age\" = $4, \"position\" = $5 \
             WHERE \"company_id\" = $1 AND \"id\" = $2",
        )
        .bind(employee.company_id)
        .bind(employee.id)
        .bind(&employee.name)
        .bind(employee.age)
        .bind(&employee.position)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_employee(&self, company_id: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM \"employees\" WHERE \"company_id\" = $1 AND \"id\" = $2")
            .bind(company_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_employees(&self, query: &EmployeeQuery) -> Result<u64, DatabaseError> {
        let sql: SqlResult = query.to_query_builder().to_count_sql();
        let row = sql.query().fetch_one(&self.pool).await?;
        count_from(&row)
    }

    async fn fetch_employee_page(
        &self,
        query: &EmployeeQuery,
        sort: &SortSpec,
        skip: u64,
        take: u64,
    ) -> Result<Vec<Employee>, DatabaseError> {
        let sql = query
            .to_query_builder()
            .order_by(sort, employee_fields()?)
            .window(skip, take)
            .to_sql();
        let rows = sql.query_as::<Employee>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn employee_page(
        &self,
        query: &EmployeeQuery,
        sort: &SortSpec,
        skip: u64,
        take: u64,
    ) -> Result<(Vec<Employee>, u64), DatabaseError> {
        let builder = query.to_query_builder();
        let count_sql = builder.to_count_sql();
        let page_sql = builder.order_by(sort, employee_fields()?).window(skip, take).to_sql();

        // count and page must observe the same snapshot
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;
        let row = count_sql.query().fetch_one(&mut *tx).await?;
        let total = count_from(&row)?;
        let items = page_sql.query_as::<Employee>().fetch_all(&mut *tx).await?;
        tx.commit().await?;

        Ok((items, total))
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user_by_name(&self, user_name: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM \"users\" WHERE \"normalized_user_name\" = $1")
            .bind(normalize(user_name))
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM \"users\" WHERE \"normalized_email\" = $1")
            .bind(normalize(email))
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_user(&self, user: &User) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO \"users\" (\"id\", \"user_name\", \"normalized_user_name\", \"email\", \"normalized_email\", \
             \"first_name\", \"last_name\", \"phone_number\", \"password_hash\", \"roles\", \
             \"refresh_token\", \"refresh_token_expiry_time\") \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(user.id)
        .bind(&user.user_name)
        .bind(&user.normalized_user_name)
        .bind(&user.email)
        .bind(&user.normalized_email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone_number)
        .bind(&user.password_hash)
        .bind(&user.roles)
        .bind(&user.refresh_token)
        .bind(user.refresh_token_expiry_time)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(DatabaseError::Conflict(format!(
                "user '{}' already exists",
                user.user_name
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_user_tokens(&self, user: &User) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE \"users\" SET \"refresh_token\" = $2, \"refresh_token_expiry_time\" = $3 WHERE \"id\" = $1",
        )
        .bind(user.id)
        .bind(&user.refresh_token)
        .bind(user.refresh_token_expiry_time)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

async fn insert_employee(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    e: &Employee,
) -> Result<(), DatabaseError> {
    sqlx::query(
        "INSERT INTO \"employees\" (\"id\", \"company_id\", \"name\", \"age\", \"position\") \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(e.id)
    .bind(e.company_id)
    .bind(&e.name)
    .bind(e.age)
    .bind(&e.position)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
