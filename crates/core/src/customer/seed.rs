//! Demo customers loaded when `SEED_DEMO_CUSTOMERS` is enabled.

use super::{CustomerStatus, NewCustomer};
use crate::types::AddedDate;

struct DemoCustomer {
    name: &'static str,
    phone: &'static str,
    wechat_id: &'static str,
    qq_id: &'static str,
    email: &'static str,
    company: &'static str,
    position: &'static str,
    added_by: &'static str,
    added_at: (i32, u32, u32),
    tags: &'static [&'static str],
}

const DEMO_CUSTOMERS: &[DemoCustomer] = &[
    DemoCustomer {
        name: "李先生",
        phone: "13812345678",
        wechat_id: "li123",
        qq_id: "12345678",
        email: "li@example.com",
        company: "集团A",
        position: "经理",
        added_by: "张经理",
        added_at: (2023, 6, 14),
        tags: &["集团A", "项目B", "小组C"],
    },
    DemoCustomer {
        name: "王女士",
        phone: "13987654321",
        wechat_id: "wang456",
        qq_id: "87654321",
        email: "wang@example.com",
        company: "集团B",
        position: "总监",
        added_by: "李经理",
        added_at: (2023, 5, 20),
        tags: &["集团B", "项目A"],
    },
    DemoCustomer {
        name: "张先生",
        phone: "13765432198",
        wechat_id: "zhang789",
        qq_id: "56781234",
        email: "zhang@example.com",
        company: "集团C",
        position: "董事",
        added_by: "王总监",
        added_at: (2023, 4, 15),
        tags: &["集团C", "项目C"],
    },
];

/// The demo dataset in insertion order, each with its fixed `added_at`.
pub fn demo_customers() -> Vec<(NewCustomer, AddedDate)> {
    DEMO_CUSTOMERS
        .iter()
        .filter_map(|demo| {
            let (y, m, d) = demo.added_at;
            let added_at = AddedDate::from_ymd_opt(y, m, d)?;
            let candidate = NewCustomer {
                name: demo.name.to_string(),
                phone: Some(demo.phone.to_string()),
                wechat_id: Some(demo.wechat_id.to_string()),
                qq_id: Some(demo.qq_id.to_string()),
                telegram_id: None,
                whatsapp_id: None,
                email: Some(demo.email.to_string()),
                company: Some(demo.company.to_string()),
                position: Some(demo.position.to_string()),
                source: None,
                notes: None,
                status: CustomerStatus::Active,
                tags: demo.tags.iter().map(|t| t.to_string()).collect(),
                added_by: Some(demo.added_by.to_string()),
            };
            Some((candidate, added_at))
        })
        .collect()
}
