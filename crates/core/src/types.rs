/// Customer primary keys are PostgreSQL BIGSERIAL (starting at 1001).
pub type DbId = i64;

/// Calendar date a customer was added (UTC).
pub type AddedDate = chrono::NaiveDate;

/// Today's date in UTC, used as `added_at` for new customers.
pub fn today() -> AddedDate {
    chrono::Utc::now().date_naive()
}
