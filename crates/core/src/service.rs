//! Duplicate detection and registration service.
//!
//! Checks a candidate against the store with the "any identifying field
//! matches" rule and appends it only when nothing collides.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::customer::seed::demo_customers;
use crate::customer::{validate_new_customer, Customer, CustomerFilter, MatchResult, NewCustomer};
use crate::error::CoreError;
use crate::store::{CustomerStore, InsertOutcome};
use crate::types::{today, DbId};

/// Registers customers against a [`CustomerStore`].
///
/// Check-then-insert runs under `write_lock`, so two concurrent submissions
/// of the same customer cannot both pass the duplicate check in this
/// process. Stores that share state across processes make the pair atomic
/// themselves in [`CustomerStore::insert_unique`]. Reads do not take the lock.
pub struct CustomerService {
    store: Arc<dyn CustomerStore>,
    write_lock: Mutex<()>,
}

impl CustomerService {
    pub fn new(store: Arc<dyn CustomerStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn CustomerStore> {
        &self.store
    }

    /// Report whether `candidate` duplicates a stored customer. Never inserts.
    pub async fn check_duplicate(&self, candidate: &NewCustomer) -> Result<MatchResult, CoreError> {
        Ok(self.store.find_first_match(candidate).await?)
    }

    /// Validate, check, and append `candidate`.
    ///
    /// Fails with [`CoreError::DuplicateCustomer`] (and inserts nothing) if
    /// any identifying field matches an existing customer.
    pub async fn add_customer(&self, candidate: NewCustomer) -> Result<Customer, CoreError> {
        validate_new_customer(&candidate)?;

        let _guard = self.write_lock.lock().await;

        match self.store.insert_unique(candidate, today()).await? {
            InsertOutcome::Inserted(customer) => {
                tracing::info!(customer_id = customer.id, "Customer registered");
                Ok(customer)
            }
            InsertOutcome::Duplicate(result) => {
                let matched_id = result.existing_customer.as_ref().map(|c| c.id);
                let fields: Vec<&str> = result
                    .match_details
                    .matched_fields()
                    .into_iter()
                    .map(|f| f.key())
                    .collect();
                tracing::info!(?matched_id, ?fields, "Rejected duplicate customer");
                Err(CoreError::DuplicateCustomer(Box::new(result)))
            }
        }
    }

    /// Snapshot of all customers in store order.
    pub async fn get_customers(&self) -> Result<Vec<Customer>, CoreError> {
        Ok(self.store.list().await?)
    }

    /// Customers passing `filter`, in store order.
    pub async fn search_customers(
        &self,
        filter: &CustomerFilter,
    ) -> Result<Vec<Customer>, CoreError> {
        let mut customers = self.store.list().await?;
        customers.retain(|c| filter.matches(c));
        Ok(customers)
    }

    /// A single customer by id.
    pub async fn get_customer(&self, id: DbId) -> Result<Customer, CoreError> {
        self.store
            .find(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Customer",
                id,
            })
    }

    /// Insert the demo customers, skipping any that already collide.
    ///
    /// Returns the number of customers inserted.
    pub async fn seed_demo_customers(&self) -> Result<usize, CoreError> {
        let _guard = self.write_lock.lock().await;

        let mut inserted = 0;
        for (candidate, added_at) in demo_customers() {
            let name = candidate.name.clone();
            match self.store.insert_unique(candidate, added_at).await? {
                InsertOutcome::Inserted(_) => inserted += 1,
                InsertOutcome::Duplicate(_) => {
                    tracing::debug!(%name, "Demo customer already present");
                }
            }
        }

        tracing::info!(inserted, "Seeded demo customers");
        Ok(inserted)
    }
}
