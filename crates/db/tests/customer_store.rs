//! Integration tests for the PostgreSQL customer store.
//!
//! These need a PostgreSQL server reachable through `DATABASE_URL`; run them
//! with `cargo test -p tgcrm-db -- --ignored`.

use assert_matches::assert_matches;
use sqlx::PgPool;
use tgcrm_core::customer::{check_duplicate, CustomerStatus, IdentifyingField, NewCustomer};
use tgcrm_core::store::{CustomerStore, InsertOutcome};
use tgcrm_core::types::AddedDate;
use tgcrm_db::repositories::CustomerRepo;
use tgcrm_db::PgCustomerStore;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date() -> AddedDate {
    AddedDate::from_ymd_opt(2023, 6, 14).unwrap()
}

fn new_customer(name: &str, phone: Option<&str>, email: Option<&str>) -> NewCustomer {
    NewCustomer {
        phone: phone.map(str::to_string),
        email: email.map(str::to_string),
        ..NewCustomer::named(name)
    }
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn create_assigns_ids_from_1001(pool: PgPool) {
    let mut input = new_customer("李先生", Some("13812345678"), None);
    input.status = CustomerStatus::Active;
    input.tags = vec!["集团A".into(), "项目B".into()];

    let first = CustomerRepo::create(&pool, &input, date()).await.unwrap();
    let second = CustomerRepo::create(&pool, &new_customer("王女士", None, None), date())
        .await
        .unwrap();

    assert_eq!(first.id, 1001);
    assert_eq!(second.id, 1002);
    assert_eq!(first.status, "active");
    assert_eq!(first.tags, vec!["集团A".to_string(), "项目B".to_string()]);
    assert_eq!(first.added_at, date());
    assert_eq!(CustomerRepo::count(&pool).await.unwrap(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn find_first_match_ignores_absent_fields(pool: PgPool) {
    CustomerRepo::create(&pool, &new_customer("李先生", None, None), date())
        .await
        .unwrap();

    let candidate = new_customer("张三", None, None);
    let found = CustomerRepo::find_first_match(&pool, &candidate).await.unwrap();
    assert!(found.is_none());
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn store_reports_first_match_in_id_order(pool: PgPool) {
    let store = PgCustomerStore::new(pool);
    store
        .insert(new_customer("李先生", Some("13812345678"), None), date())
        .await
        .unwrap();
    store
        .insert(new_customer("王女士", Some("13987654321"), Some("wang@example.com")), date())
        .await
        .unwrap();

    // Matches 王女士 by email and 李先生 by phone; 李先生 was stored first.
    let candidate = new_customer("张三", Some("13812345678"), Some("wang@example.com"));
    let result = store.find_first_match(&candidate).await.unwrap();

    assert!(result.is_match);
    assert_eq!(result.existing_customer.as_ref().unwrap().name, "李先生");
    assert_eq!(
        result.match_details.matched_fields(),
        vec![IdentifyingField::Phone]
    );

    // Same answer as the reference scan over `list()`.
    let scanned = check_duplicate(&candidate, &store.list().await.unwrap());
    assert_eq!(result, scanned);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn store_matching_is_case_sensitive(pool: PgPool) {
    let store = PgCustomerStore::new(pool);
    store.insert(NewCustomer::named("li"), date()).await.unwrap();

    let result = store.find_first_match(&NewCustomer::named("Li")).await.unwrap();
    assert!(!result.is_match);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn store_find_and_count(pool: PgPool) {
    let store = PgCustomerStore::new(pool);
    let inserted = store
        .insert(new_customer("新客户", Some("10000000000"), None), date())
        .await
        .unwrap();

    assert_eq!(store.find(inserted.id).await.unwrap(), Some(inserted));
    assert_eq!(store.find(999_999).await.unwrap(), None);
    assert_eq!(store.count().await.unwrap(), 1);
    assert!(store.health_check().await.is_ok());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn insert_unique_reports_collision_without_inserting(pool: PgPool) {
    let store = PgCustomerStore::new(pool);
    let first = store
        .insert_unique(new_customer("李先生", Some("13812345678"), None), date())
        .await
        .unwrap();
    assert_matches!(first, InsertOutcome::Inserted(ref c) if c.id == 1001);

    let second = store
        .insert_unique(new_customer("张三", Some("13812345678"), None), date())
        .await
        .unwrap();
    match second {
        InsertOutcome::Duplicate(result) => {
            assert_eq!(result.existing_customer.unwrap().id, 1001);
            assert_eq!(
                result.match_details.matched_fields(),
                vec![IdentifyingField::Phone]
            );
        }
        other => panic!("expected a duplicate, got {other:?}"),
    }
    assert_eq!(store.count().await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn separate_stores_on_one_database_insert_exactly_once(pool: PgPool) {
    // One store per task, as separate API processes would hold.
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = PgCustomerStore::new(pool.clone());
            tokio::spawn(async move {
                store
                    .insert_unique(new_customer("并发客户", Some("13500000000"), None), date())
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut inserted = 0;
    for handle in handles {
        if let InsertOutcome::Inserted(_) = handle.await.unwrap() {
            inserted += 1;
        }
    }

    assert_eq!(inserted, 1);
    assert_eq!(CustomerRepo::count(&pool).await.unwrap(), 1);
}
