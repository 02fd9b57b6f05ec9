pub mod types;
pub mod fields;
pub mod query_order;
pub mod query_shape;
pub mod query_page;
pub mod error;

pub use types::*;
pub use error::QueryError;
pub use fields::{Field, FieldRegistry, Registered};
pub use query_order::SortSpecBuilder;
pub use query_shape::DataShaper;
pub use query_page::{paginate, paginate_with, window, MetaData, PageRequest, PagedResult};
