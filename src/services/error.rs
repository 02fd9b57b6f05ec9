use std::collections::HashMap;

use thiserror::Error;
use uuid::Uuid;

use crate::auth::JwtError;
use crate::database::DatabaseError;
use crate::query::QueryError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Max age can't be less than min age.")]
    MaxAgeRange,

    #[error("The company with id: '{0}' doesn't exist in the database.")]
    CompanyNotFound(Uuid),

    #[error("Employee with id: '{0}' doesn't exist in the database.")]
    EmployeeNotFound(Uuid),

    #[error("Parameter 'ids' is null.")]
    IdParametersMissing,

    #[error("Collection count mismatch compared to ids given.")]
    CollectionMismatch,

    #[error("Company collection sent from a client is null.")]
    CompanyCollectionMissing,

    #[error("patchDoc object sent from client is null.")]
    PatchDocumentMissing,

    #[error("Request body failed validation")]
    Invalid(HashMap<String, String>),

    #[error("User registration failed")]
    Registration(HashMap<String, String>),

    #[error("Authentication failed. Wrong user name or password.")]
    InvalidCredentials,

    #[error("Invalid client request. 'tokenDto' has some invalid values.")]
    RefreshTokenBadRequest,

    #[error(transparent)]
    Token(#[from] JwtError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}
