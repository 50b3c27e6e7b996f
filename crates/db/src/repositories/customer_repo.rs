//! Repository for the `customers` table.

use sqlx::{PgConnection, PgPool};
use tgcrm_core::customer::{HasIdentifiers, IdentifyingField, NewCustomer};
use tgcrm_core::types::{AddedDate, DbId};

use crate::models::customer::CustomerRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, name, phone, wechat_id, qq_id, telegram_id, whatsapp_id, email, \
    company, position, source, notes, status, tags, added_by, added_at";

/// Column backing each identifying field.
fn column(field: IdentifyingField) -> &'static str {
    match field {
        IdentifyingField::Name => "name",
        IdentifyingField::Phone => "phone",
        IdentifyingField::WechatId => "wechat_id",
        IdentifyingField::QqId => "qq_id",
        IdentifyingField::TelegramId => "telegram_id",
        IdentifyingField::WhatsappId => "whatsapp_id",
        IdentifyingField::Email => "email",
    }
}

/// Transaction-scoped advisory lock key serialising registrations across
/// every process sharing the database.
const REGISTRATION_LOCK_KEY: i64 = 0x7467_6372_6d5f_0001;

/// `SELECT` for the lowest-id row sharing any identifying value, with one
/// positional parameter per [`IdentifyingField::ALL`] entry.
fn first_match_query() -> String {
    let predicates: Vec<String> = IdentifyingField::ALL
        .iter()
        .enumerate()
        .map(|(i, field)| format!("{} = ${}", column(*field), i + 1))
        .collect();
    format!(
        "SELECT {COLUMNS} FROM customers
         WHERE {}
         ORDER BY id ASC
         LIMIT 1",
        predicates.join(" OR ")
    )
}

/// Result of [`CustomerRepo::create_unless_duplicate`].
#[derive(Debug)]
pub enum CreateOutcome {
    Created(CustomerRow),
    /// The first existing row that collided; nothing was inserted.
    Existing(CustomerRow),
}

/// Provides insert and lookup operations for customers.
///
/// Rows are append-only here; store order is ascending `id`.
pub struct CustomerRepo;

impl CustomerRepo {
    /// Insert a new customer, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &NewCustomer,
        added_at: AddedDate,
    ) -> Result<CustomerRow, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::insert_row(&mut *conn, input, added_at).await
    }

    /// Check for a colliding row and insert only if there is none, in one
    /// transaction holding [`REGISTRATION_LOCK_KEY`].
    pub async fn create_unless_duplicate(
        pool: &PgPool,
        input: &NewCustomer,
        added_at: AddedDate,
    ) -> Result<CreateOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(REGISTRATION_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let query = first_match_query();
        let mut q = sqlx::query_as::<_, CustomerRow>(&query);
        for field in IdentifyingField::ALL {
            q = q.bind(input.identifier(field));
        }
        if let Some(existing) = q.fetch_optional(&mut *tx).await? {
            tx.rollback().await?;
            return Ok(CreateOutcome::Existing(existing));
        }

        let row = Self::insert_row(&mut *tx, input, added_at).await?;
        tx.commit().await?;
        Ok(CreateOutcome::Created(row))
    }

    async fn insert_row(
        conn: &mut PgConnection,
        input: &NewCustomer,
        added_at: AddedDate,
    ) -> Result<CustomerRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO customers
                (name, phone, wechat_id, qq_id, telegram_id, whatsapp_id, email,
                 company, position, source, notes, status, tags, added_by, added_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CustomerRow>(&query)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.wechat_id)
            .bind(&input.qq_id)
            .bind(&input.telegram_id)
            .bind(&input.whatsapp_id)
            .bind(&input.email)
            .bind(&input.company)
            .bind(&input.position)
            .bind(&input.source)
            .bind(&input.notes)
            .bind(input.status.as_str())
            .bind(&input.tags)
            .bind(&input.added_by)
            .bind(added_at)
            .fetch_one(conn)
            .await
    }

    /// Find a customer by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CustomerRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers WHERE id = $1");
        sqlx::query_as::<_, CustomerRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all customers in store order.
    pub async fn list(pool: &PgPool) -> Result<Vec<CustomerRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers ORDER BY id ASC");
        sqlx::query_as::<_, CustomerRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Count all customers.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(pool)
            .await
    }

    /// Find the lowest-id customer sharing any identifying value with
    /// `candidate`.
    ///
    /// Absent or empty candidate values bind as NULL, which never compares
    /// equal, so they cannot match.
    pub async fn find_first_match(
        pool: &PgPool,
        candidate: &NewCustomer,
    ) -> Result<Option<CustomerRow>, sqlx::Error> {
        let query = first_match_query();
        let mut q = sqlx::query_as::<_, CustomerRow>(&query);
        for field in IdentifyingField::ALL {
            q = q.bind(candidate.identifier(field));
        }
        q.fetch_optional(pool).await
    }
}
