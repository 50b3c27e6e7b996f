//! Customer records, identifying fields, and the duplicate match report.
//!
//! The wire shape of [`Customer`] and [`MatchResult`] is camelCase JSON
//! (`wechatId`, `isMatch`, `existingCustomer`, ...), which is what the
//! WebApp front end consumes.

pub mod filter;
pub mod matching;
pub mod seed;
pub mod validation;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::types::{AddedDate, DbId};

pub use filter::CustomerFilter;
pub use matching::{check_duplicate, match_against};
pub use validation::validate_new_customer;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Sales pipeline status of a customer. Never part of duplicate matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    #[default]
    Potential,
    Active,
    Signed,
    Inactive,
}

impl CustomerStatus {
    /// Name as stored in the `customers.status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Potential => "potential",
            Self::Active => "active",
            Self::Signed => "signed",
            Self::Inactive => "inactive",
        }
    }

    /// Parse from the stored column value.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "potential" => Ok(Self::Potential),
            "active" => Ok(Self::Active),
            "signed" => Ok(Self::Signed),
            "inactive" => Ok(Self::Inactive),
            other => Err(CoreError::Validation(format!(
                "Unknown customer status '{other}'. Must be one of: potential, active, signed, inactive"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// `id` travels as a JSON string (`"1001"`); numbers are accepted on input.
mod wire_id {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::types::DbId;

    pub fn serialize<S: Serializer>(id: &DbId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DbId, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(DbId),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(id) => Ok(id),
            Repr::Text(text) => text.parse().map_err(de::Error::custom),
        }
    }
}

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A stored customer. `id` and `added_at` are assigned once, at insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(with = "wire_id")]
    pub id: DbId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wechat_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qq_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: CustomerStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,
    pub added_at: AddedDate,
}

/// A candidate customer built from user input, not yet assigned an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    /// Defaults to empty so a missing or `null` name surfaces as a
    /// validation error rather than a deserialization failure.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub wechat_id: Option<String>,
    #[serde(default)]
    pub qq_id: Option<String>,
    #[serde(default)]
    pub telegram_id: Option<String>,
    #[serde(default)]
    pub whatsapp_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: CustomerStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub added_by: Option<String>,
}

impl NewCustomer {
    /// Candidate with only a name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Turn the candidate into a stored record with the given id and date.
    pub fn into_customer(self, id: DbId, added_at: AddedDate) -> Customer {
        Customer {
            id,
            name: self.name,
            phone: self.phone,
            wechat_id: self.wechat_id,
            qq_id: self.qq_id,
            telegram_id: self.telegram_id,
            whatsapp_id: self.whatsapp_id,
            email: self.email,
            company: self.company,
            position: self.position,
            source: self.source,
            notes: self.notes,
            status: self.status,
            tags: self.tags,
            added_by: self.added_by,
            added_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Identifying fields
// ---------------------------------------------------------------------------

/// The fields that take part in duplicate comparison.
///
/// New identifier types are added here and in [`HasIdentifiers`]; every
/// comparison iterates [`IdentifyingField::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IdentifyingField {
    Name,
    Phone,
    WechatId,
    QqId,
    TelegramId,
    WhatsappId,
    Email,
}

impl IdentifyingField {
    pub const ALL: [IdentifyingField; 7] = [
        Self::Name,
        Self::Phone,
        Self::WechatId,
        Self::QqId,
        Self::TelegramId,
        Self::WhatsappId,
        Self::Email,
    ];

    /// camelCase JSON key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::WechatId => "wechatId",
            Self::QqId => "qqId",
            Self::TelegramId => "telegramId",
            Self::WhatsappId => "whatsappId",
            Self::Email => "email",
        }
    }

    /// Display label shown to sales staff.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "客户名称",
            Self::Phone => "手机号码",
            Self::WechatId => "微信号",
            Self::QqId => "QQ号",
            Self::TelegramId => "Telegram ID",
            Self::WhatsappId => "WhatsApp ID",
            Self::Email => "电子邮箱",
        }
    }
}

/// Read access to a record's identifying values.
///
/// Returns `None` for absent fields. Empty strings count as absent.
pub trait HasIdentifiers {
    fn identifier(&self, field: IdentifyingField) -> Option<&str>;
}

fn present(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

macro_rules! impl_has_identifiers {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl HasIdentifiers for $ty {
                fn identifier(&self, field: IdentifyingField) -> Option<&str> {
                    match field {
                        IdentifyingField::Name => present(&self.name),
                        IdentifyingField::Phone => self.phone.as_deref().and_then(present),
                        IdentifyingField::WechatId => self.wechat_id.as_deref().and_then(present),
                        IdentifyingField::QqId => self.qq_id.as_deref().and_then(present),
                        IdentifyingField::TelegramId => {
                            self.telegram_id.as_deref().and_then(present)
                        }
                        IdentifyingField::WhatsappId => {
                            self.whatsapp_id.as_deref().and_then(present)
                        }
                        IdentifyingField::Email => self.email.as_deref().and_then(present),
                    }
                }
            }
        )+
    };
}

impl_has_identifiers!(Customer, NewCustomer);

// ---------------------------------------------------------------------------
// Match report
// ---------------------------------------------------------------------------

/// Which identifying fields matched the reported record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetails {
    pub name: bool,
    pub phone: bool,
    pub wechat_id: bool,
    pub qq_id: bool,
    pub telegram_id: bool,
    pub whatsapp_id: bool,
    pub email: bool,
}

impl MatchDetails {
    pub fn get(&self, field: IdentifyingField) -> bool {
        match field {
            IdentifyingField::Name => self.name,
            IdentifyingField::Phone => self.phone,
            IdentifyingField::WechatId => self.wechat_id,
            IdentifyingField::QqId => self.qq_id,
            IdentifyingField::TelegramId => self.telegram_id,
            IdentifyingField::WhatsappId => self.whatsapp_id,
            IdentifyingField::Email => self.email,
        }
    }

    pub fn set(&mut self, field: IdentifyingField) {
        let flag = match field {
            IdentifyingField::Name => &mut self.name,
            IdentifyingField::Phone => &mut self.phone,
            IdentifyingField::WechatId => &mut self.wechat_id,
            IdentifyingField::QqId => &mut self.qq_id,
            IdentifyingField::TelegramId => &mut self.telegram_id,
            IdentifyingField::WhatsappId => &mut self.whatsapp_id,
            IdentifyingField::Email => &mut self.email,
        };
        *flag = true;
    }

    /// True if any field matched.
    pub fn any(&self) -> bool {
        IdentifyingField::ALL.iter().any(|f| self.get(*f))
    }

    /// Matched fields in canonical order.
    pub fn matched_fields(&self) -> Vec<IdentifyingField> {
        IdentifyingField::ALL
            .into_iter()
            .filter(|f| self.get(*f))
            .collect()
    }
}

/// Outcome of a duplicate check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub is_match: bool,
    pub match_details: MatchDetails,
    /// The first stored record (in store order) that matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_customer: Option<Customer>,
}

impl MatchResult {
    pub fn no_match() -> Self {
        Self {
            is_match: false,
            match_details: MatchDetails::default(),
            existing_customer: None,
        }
    }

    pub fn found(existing: Customer, details: MatchDetails) -> Self {
        Self {
            is_match: true,
            match_details: details,
            existing_customer: Some(existing),
        }
    }

    /// Human-readable explanation, e.g. `与已有客户「李先生」重复：手机号码`.
    pub fn summary(&self) -> String {
        match &self.existing_customer {
            Some(existing) if self.is_match => {
                let labels: Vec<&str> = self
                    .match_details
                    .matched_fields()
                    .into_iter()
                    .map(IdentifyingField::label)
                    .collect();
                format!("与已有客户「{}」重复：{}", existing.name, labels.join("、"))
            }
            _ => "未发现重复客户".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
