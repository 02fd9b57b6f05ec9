pub mod employee_query;
pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod query_builder;
pub mod seed;
pub mod store;
pub mod user_store;

pub use employee_query::EmployeeQuery;
pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::Store;
pub use user_store::UserStore;
