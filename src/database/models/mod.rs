pub mod company;
pub mod employee;
pub mod parameters;
pub mod patch;
pub mod user;

pub use company::{Company, CompanyDto, CompanyForManipulation, NewCompany};
pub use employee::{Employee, EmployeeDto, EmployeeForManipulation};
pub use parameters::{EmployeeParameters, EmployeeQueryParams};
pub use patch::{JsonPatch, PatchOp, PatchOperation};
pub use user::{TokenDto, User, UserForAuthentication, UserForRegistration};
