//! Customer row model.
//!
//! Maps to the `customers` table.

use sqlx::FromRow;
use tgcrm_core::customer::{Customer, CustomerStatus};
use tgcrm_core::error::CoreError;
use tgcrm_core::types::{AddedDate, DbId};

/// A row from the `customers` table.
#[derive(Debug, Clone, FromRow)]
pub struct CustomerRow {
    pub id: DbId,
    pub name: String,
    pub phone: Option<String>,
    pub wechat_id: Option<String>,
    pub qq_id: Option<String>,
    pub telegram_id: Option<String>,
    pub whatsapp_id: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub tags: Vec<String>,
    pub added_by: Option<String>,
    pub added_at: AddedDate,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = CoreError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        Ok(Customer {
            id: row.id,
            name: row.name,
            phone: row.phone,
            wechat_id: row.wechat_id,
            qq_id: row.qq_id,
            telegram_id: row.telegram_id,
            whatsapp_id: row.whatsapp_id,
            email: row.email,
            company: row.company,
            position: row.position,
            source: row.source,
            notes: row.notes,
            status: CustomerStatus::from_name(&row.status)?,
            tags: row.tags,
            added_by: row.added_by,
            added_at: row.added_at,
        })
    }
}
