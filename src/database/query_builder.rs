use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{FromRow, Postgres};
use uuid::Uuid;

use crate::query::{FieldRegistry, SortSpec};

/// A bind parameter, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Uuid(Uuid),
    Int(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}

impl SqlResult {
    pub fn query(&self) -> sqlx::query::Query<'_, Postgres, PgArguments> {
        let mut q = sqlx::query(&self.query);
        for p in &self.params {
            q = bind_param_query(q, p);
        }
        q
    }

    pub fn query_as<T>(&self) -> sqlx::query::QueryAs<'_, Postgres, T, PgArguments>
    where
        T: for<'r> FromRow<'r, PgRow>,
    {
        let mut q = sqlx::query_as::<_, T>(&self.query);
        for p in &self.params {
            q = bind_param_query_as(q, p);
        }
        q
    }
}

/// SELECT/COUNT builder over a single table. Column names are `'static` and come
/// from field registries. Values always travel as `$n` parameters.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table_name: &'static str,
    conditions: Vec<String>,
    params: Vec<SqlParam>,
    order: String,
    window: Option<(u64, u64)>,
}

impl QueryBuilder {
    pub fn new(table_name: &'static str) -> Self {
        Self {
            table_name,
            conditions: Vec::new(),
            params: Vec::new(),
            order: String::new(),
            window: None,
        }
    }

    pub fn where_eq(mut self, column: &'static str, value: SqlParam) -> Self {
        let n = self.push_param(value);
        self.conditions.push(format!("\"{}\" = ${}", column, n));
        self
    }

    pub fn where_gte(mut self, column: &'static str, value: SqlParam) -> Self {
        let n = self.push_param(value);
        self.conditions.push(format!("\"{}\" >= ${}", column, n));
        self
    }

    pub fn where_lte(mut self, column: &'static str, value: SqlParam) -> Self {
        let n = self.push_param(value);
        self.conditions.push(format!("\"{}\" <= ${}", column, n));
        self
    }

    /// Substring test against the lower-cased column. `needle` must already be lower case.
    pub fn where_contains_lower(mut self, column: &'static str, needle: String) -> Self {
        let n = self.push_param(SqlParam::Text(needle));
        self.conditions
            .push(format!("POSITION(${} IN LOWER(\"{}\")) > 0", n, column));
        self
    }

    pub fn order_by<T>(mut self, sort: &SortSpec, registry: &FieldRegistry<T>) -> Self {
        self.order = sort.to_sql(registry);
        self
    }

    pub fn window(mut self, skip: u64, take: u64) -> Self {
        self.window = Some((skip, take));
        self
    }

    pub fn to_sql(&self) -> SqlResult {
        let mut query = format!("SELECT * FROM \"{}\"", self.table_name);
        query.push_str(&self.where_clause());
        if !self.order.is_empty() {
            query.push(' ');
            query.push_str(&self.order);
        }
        if let Some((skip, take)) = self.window {
            query.push_str(&format!(" LIMIT {} OFFSET {}", take, skip));
        }
        SqlResult { query, params: self.params.clone() }
    }

    /// Same predicate as `to_sql`, without ordering or window.
    pub fn to_count_sql(&self) -> SqlResult {
        let query = format!(
            "SELECT COUNT(*) as count FROM \"{}\"{}",
            self.table_name,
            self.where_clause()
        );
        SqlResult { query, params: self.params.clone() }
    }

    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    fn push_param(&mut self, value: SqlParam) -> usize {
        self.params.push(value);
        self.params.len()
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, Postgres, PgArguments>,
    v: &'q SqlParam,
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    match v {
        SqlParam::Uuid(u) => q.bind(*u),
        SqlParam::Int(i) => q.bind(*i),
        SqlParam::Text(s) => q.bind(s.as_str()),
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    v: &'q SqlParam,
) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        SqlParam::Uuid(u) => q.bind(*u),
        SqlParam::Int(i) => q.bind(*i),
        SqlParam::Text(s) => q.bind(s.as_str()),
    }
}
