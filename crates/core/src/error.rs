use crate::customer::MatchResult;
use crate::store::StoreError;
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The candidate collides with an existing customer. Carries the match
    /// report so callers can show which fields collided and with whom.
    #[error("Duplicate customer: {}", .0.summary())]
    DuplicateCustomer(Box<MatchResult>),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CoreError {
    /// The match report, if this is a duplicate rejection.
    pub fn match_result(&self) -> Option<&MatchResult> {
        match self {
            CoreError::DuplicateCustomer(result) => Some(result),
            _ => None,
        }
    }
}
