//! [`CustomerStore`] backed by PostgreSQL.

use async_trait::async_trait;
use tgcrm_core::customer::{match_against, Customer, MatchResult, NewCustomer};
use tgcrm_core::store::{CustomerStore, InsertOutcome, StoreError};
use tgcrm_core::types::{AddedDate, DbId};

use crate::models::customer::CustomerRow;
use crate::repositories::{CreateOutcome, CustomerRepo};
use crate::DbPool;

/// Customer store over the `customers` table.
///
/// Overrides the first-match lookup with a single indexed query instead of
/// scanning every row. `insert_unique` runs the check and the insert in one
/// transaction under a PostgreSQL advisory lock, so API processes sharing
/// the database cannot both register the same customer.
#[derive(Clone)]
pub struct PgCustomerStore {
    pool: DbPool,
}

impl PgCustomerStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_customer(row: CustomerRow) -> Result<Customer, StoreError> {
    Customer::try_from(row).map_err(StoreError::new)
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn list(&self) -> Result<Vec<Customer>, StoreError> {
        CustomerRepo::list(&self.pool)
            .await
            .map_err(StoreError::new)?
            .into_iter()
            .map(to_customer)
            .collect()
    }

    async fn find(&self, id: DbId) -> Result<Option<Customer>, StoreError> {
        CustomerRepo::find_by_id(&self.pool, id)
            .await
            .map_err(StoreError::new)?
            .map(to_customer)
            .transpose()
    }

    async fn insert(
        &self,
        candidate: NewCustomer,
        added_at: AddedDate,
    ) -> Result<Customer, StoreError> {
        let row = CustomerRepo::create(&self.pool, &candidate, added_at)
            .await
            .map_err(StoreError::new)?;
        tracing::debug!(customer_id = row.id, "Inserted customer row");
        to_customer(row)
    }

    async fn insert_unique(
        &self,
        candidate: NewCustomer,
        added_at: AddedDate,
    ) -> Result<InsertOutcome, StoreError> {
        let outcome = CustomerRepo::create_unless_duplicate(&self.pool, &candidate, added_at)
            .await
            .map_err(StoreError::new)?;

        match outcome {
            CreateOutcome::Created(row) => {
                tracing::debug!(customer_id = row.id, "Inserted customer row");
                Ok(InsertOutcome::Inserted(to_customer(row)?))
            }
            CreateOutcome::Existing(row) => {
                let existing = to_customer(row)?;
                let details = match_against(&candidate, &existing);
                Ok(InsertOutcome::Duplicate(MatchResult::found(existing, details)))
            }
        }
    }

    async fn find_first_match(&self, candidate: &NewCustomer) -> Result<MatchResult, StoreError> {
        let row = CustomerRepo::find_first_match(&self.pool, candidate)
            .await
            .map_err(StoreError::new)?;

        match row {
            Some(row) => {
                let existing = to_customer(row)?;
                let details = match_against(candidate, &existing);
                Ok(MatchResult::found(existing, details))
            }
            None => Ok(MatchResult::no_match()),
        }
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let count = CustomerRepo::count(&self.pool)
            .await
            .map_err(StoreError::new)?;
        usize::try_from(count).map_err(StoreError::new)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(StoreError::new)
    }
}
