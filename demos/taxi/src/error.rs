use thiserror::Error;
use weave::InjectError;

#[derive(Debug, Error)]
pub enum TaxiError {
    #[error("No {entity} with id {id}")]
    NotFound { entity: &'static str, id: u64 },
    #[error("The {entity} has not been stored yet")]
    Unsaved { entity: &'static str },
    #[error("Login or password was incorrect")]
    Authentication,
    #[error(transparent)]
    Inject(#[from] InjectError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
