//! Customer record store abstraction.
//!
//! The registration service only ever lists, finds, and appends records.
//! Back ends implement [`CustomerStore`]; the in-memory store lives in
//! [`memory`], the PostgreSQL store in the `tgcrm-db` crate.

pub mod memory;

use async_trait::async_trait;

use crate::customer::{check_duplicate, Customer, MatchResult, NewCustomer};
use crate::types::{AddedDate, DbId};

pub use memory::MemoryCustomerStore;

/// Failure reported by a store back end.
///
/// Keeps the back end's own error as `source()` so callers can inspect it
/// (e.g. downcast to `sqlx::Error`).
#[derive(Debug, thiserror::Error)]
#[error("Customer store error: {source}")]
pub struct StoreError {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl StoreError {
    pub fn new(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self { source: err.into() }
    }

    /// The underlying back-end error, if it is of type `T`.
    pub fn downcast_ref<T: std::error::Error + 'static>(&self) -> Option<&T> {
        self.source.downcast_ref::<T>()
    }
}

/// Result of [`CustomerStore::insert_unique`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// No record collided; the candidate was appended.
    Inserted(Customer),
    /// The candidate collided; nothing was written.
    Duplicate(MatchResult),
}

/// Storage for customer records, kept in insertion (store) order.
///
/// Records are append-only from the service's perspective. Ids are assigned
/// by the store on insert and never reused.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// All records in store order.
    async fn list(&self) -> Result<Vec<Customer>, StoreError>;

    /// Look up a record by id.
    async fn find(&self, id: DbId) -> Result<Option<Customer>, StoreError>;

    /// Append a candidate, assigning a fresh id.
    async fn insert(
        &self,
        candidate: NewCustomer,
        added_at: AddedDate,
    ) -> Result<Customer, StoreError>;

    /// First record in store order sharing any identifying field with
    /// `candidate`.
    ///
    /// The default scans [`list`](Self::list). Overrides may use indexed
    /// lookups but must report the same record and details.
    async fn find_first_match(&self, candidate: &NewCustomer) -> Result<MatchResult, StoreError> {
        let customers = self.list().await?;
        Ok(check_duplicate(candidate, &customers))
    }

    /// Append `candidate` only if no stored record shares an identifying
    /// value with it.
    ///
    /// The default runs [`find_first_match`](Self::find_first_match) then
    /// [`insert`](Self::insert) and relies on the caller to serialise
    /// writers. Back ends that can make the pair atomic on their own (a held
    /// write lock, a database lock) override it.
    async fn insert_unique(
        &self,
        candidate: NewCustomer,
        added_at: AddedDate,
    ) -> Result<InsertOutcome, StoreError> {
        let result = self.find_first_match(&candidate).await?;
        if result.is_match {
            return Ok(InsertOutcome::Duplicate(result));
        }
        Ok(InsertOutcome::Inserted(self.insert(candidate, added_at).await?))
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.list().await?.len())
    }

    /// Whether the back end is reachable.
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
