pub mod authentication_service;
pub mod company_service;
pub mod employee_service;
pub mod error;

pub use authentication_service::AuthenticationService;
pub use company_service::{parse_ids, CompanyService};
pub use employee_service::EmployeeService;
pub use error::ServiceError;
