use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CustomerStore, InsertOutcome, StoreError};
use crate::customer::{check_duplicate, Customer, MatchResult, NewCustomer};
use crate::types::{AddedDate, DbId};

/// First id handed out by an empty store.
pub const FIRST_CUSTOMER_ID: DbId = 1001;

struct Records {
    customers: Vec<Customer>,
    next_id: DbId,
}

impl Records {
    fn append(&mut self, candidate: NewCustomer, added_at: AddedDate) -> Customer {
        let id = self.next_id;
        self.next_id += 1;

        let customer = candidate.into_customer(id, added_at);
        self.customers.push(customer.clone());
        customer
    }
}

/// In-process customer store.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application. Ids come from a monotonic counter.
pub struct MemoryCustomerStore {
    records: RwLock<Records>,
}

impl MemoryCustomerStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Records {
                customers: Vec::new(),
                next_id: FIRST_CUSTOMER_ID,
            }),
        }
    }
}

impl Default for MemoryCustomerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CustomerStore for MemoryCustomerStore {
    async fn list(&self) -> Result<Vec<Customer>, StoreError> {
        Ok(self.records.read().await.customers.clone())
    }

    async fn find(&self, id: DbId) -> Result<Option<Customer>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .customers
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn insert(
        &self,
        candidate: NewCustomer,
        added_at: AddedDate,
    ) -> Result<Customer, StoreError> {
        Ok(self.records.write().await.append(candidate, added_at))
    }

    async fn insert_unique(
        &self,
        candidate: NewCustomer,
        added_at: AddedDate,
    ) -> Result<InsertOutcome, StoreError> {
        let mut records = self.records.write().await;
        let result = check_duplicate(&candidate, &records.customers);
        if result.is_match {
            return Ok(InsertOutcome::Duplicate(result));
        }
        Ok(InsertOutcome::Inserted(records.append(candidate, added_at)))
    }

    async fn find_first_match(&self, candidate: &NewCustomer) -> Result<MatchResult, StoreError> {
        let records = self.records.read().await;
        Ok(check_duplicate(candidate, &records.customers))
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.records.read().await.customers.len())
    }
}
