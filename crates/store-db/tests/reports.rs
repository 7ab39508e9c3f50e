//! Report queries and repository CRUD against a real PostgreSQL.
//!
//! Run with `DATABASE_URL=... cargo test -p store-db -- --ignored`.

use chrono::{Datelike, TimeZone, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use store_core::{Category, CategoryInput, CustomerInput, Money, Page, Product, ProductInput};
use store_db::{Database, DbError};

async fn category(db: &Database, name: &str, parent: Option<&Category>) -> Category {
    db.categories()
        .create(&CategoryInput {
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            parent_id: parent.map(|c| c.id),
            level: parent.map(|c| c.level + 1).unwrap_or(0),
            is_active: true,
            sort_order: 0,
        })
        .await
        .unwrap()
}

async fn product(db: &Database, name: &str, cents: i64, stock: i32) -> Product {
    db.products()
        .create(&ProductInput {
            name: name.to_string(),
            price: Money::from_cents(cents),
            quantity: stock,
        })
        .await
        .unwrap()
}

fn customer_input(name: &str) -> CustomerInput {
    CustomerInput {
        name: name.to_string(),
        email: String::new(),
        phone: String::new(),
        address: String::new(),
    }
}

// =============================================================================
// Reports
// =============================================================================

#[sqlx::test(migrator = "store_db::migrations::MIGRATOR")]
#[ignore = "requires DATABASE_URL"]
async fn test_customer_totals_include_customers_without_orders(pool: PgPool) {
    let db = Database::from_pool(pool);

    let alice = db.customers().create(&customer_input("Alice")).await.unwrap();
    db.customers().create(&customer_input("Bob")).await.unwrap();

    let p = product(&db, "Tea", 250, 50).await;
    let o1 = db.orders().create(alice.id, "new").await.unwrap();
    let o2 = db.orders().create(alice.id, "new").await.unwrap();
    db.orders().add_product(o1.id, p.id, 2).await.unwrap();
    db.orders().add_product(o2.id, p.id, 1).await.unwrap();

    let totals = db.reports().customer_totals().await.unwrap();
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0].customer_name, "Alice");
    assert_eq!(totals[0].total_amount, Money::from_cents(750));
    assert_eq!(totals[1].customer_name, "Bob");
    assert!(totals[1].total_amount.is_zero());
}

#[sqlx::test(migrator = "store_db::migrations::MIGRATOR")]
#[ignore = "requires DATABASE_URL"]
async fn test_customer_totals_keep_namesakes_apart(pool: PgPool) {
    let db = Database::from_pool(pool);

    let first = db.customers().create(&customer_input("Sam")).await.unwrap();
    let second = db.customers().create(&customer_input("Sam")).await.unwrap();

    let p = product(&db, "Tea", 100, 50).await;
    let o1 = db.orders().create(first.id, "new").await.unwrap();
    let o2 = db.orders().create(second.id, "new").await.unwrap();
    db.orders().add_product(o1.id, p.id, 2).await.unwrap();
    db.orders().add_product(o2.id, p.id, 5).await.unwrap();

    let totals = db.reports().customer_totals().await.unwrap();
    assert_eq!(totals.len(), 2);

    let mut amounts: Vec<Money> = totals.iter().map(|t| t.total_amount).collect();
    amounts.sort();
    assert_eq!(amounts, vec![Money::from_cents(200), Money::from_cents(500)]);
}

#[sqlx::test(migrator = "store_db::migrations::MIGRATOR")]
#[ignore = "requires DATABASE_URL"]
async fn test_category_children_counts_direct_children_only(pool: PgPool) {
    let db = Database::from_pool(pool);

    let drinks = category(&db, "Drinks", None).await;
    let hot = category(&db, "Hot", Some(&drinks)).await;
    category(&db, "Cold", Some(&drinks)).await;
    category(&db, "Tea", Some(&hot)).await;

    let rows = db.reports().category_children().await.unwrap();
    let count = |name: &str| {
        rows.iter()
            .find(|r| r.name == name)
            .map(|r| r.children_count)
            .unwrap()
    };

    assert_eq!(rows.len(), 4);
    assert_eq!(count("Drinks"), 2);
    assert_eq!(count("Hot"), 1);
    assert_eq!(count("Cold"), 0);
    assert_eq!(count("Tea"), 0);
}

#[sqlx::test(migrator = "store_db::migrations::MIGRATOR")]
#[ignore = "requires DATABASE_URL"]
async fn test_top_products_previous_month_by_root_category(pool: PgPool) {
    let db = Database::from_pool(pool);

    let drinks = category(&db, "Drinks", None).await;
    let hot = category(&db, "Hot", Some(&drinks)).await;
    let snacks = category(&db, "Snacks", None).await;

    let tea = product(&db, "Tea", 100, 100).await;
    let chips = product(&db, "Chips", 100, 100).await;
    let loose = product(&db, "Loose", 100, 100).await;
    db.products().attach_category(tea.id, hot.id).await.unwrap();
    db.products().attach_category(chips.id, snacks.id).await.unwrap();

    let c = db.customers().create(&customer_input("Alice")).await.unwrap();

    let last_month = db.orders().create(c.id, "new").await.unwrap();
    db.orders().add_product(last_month.id, tea.id, 7).await.unwrap();
    db.orders().add_product(last_month.id, chips.id, 3).await.unwrap();
    db.orders().add_product(last_month.id, loose.id, 5).await.unwrap();

    // Same products this month must not count
    let this_month = db.orders().create(c.id, "new").await.unwrap();
    db.orders().add_product(this_month.id, chips.id, 50).await.unwrap();

    let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
    let in_february = Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap();
    assert_eq!(in_february.month(), 2);

    sqlx::query("UPDATE orders SET created_at = $2 WHERE id = $1")
        .bind(last_month.id)
        .bind(in_february)
        .execute(db.pool())
        .await
        .unwrap();
    sqlx::query("UPDATE orders SET created_at = $2 WHERE id = $1")
        .bind(this_month.id)
        .bind(now)
        .execute(db.pool())
        .await
        .unwrap();

    let top = db.reports().top_products_month_before(now).await.unwrap();

    assert_eq!(top.len(), 3);
    assert_eq!(top[0].product_name, "Tea");
    assert_eq!(top[0].category_level_1.as_deref(), Some("Drinks"));
    assert_eq!(top[0].total_quantity, 7);
    assert_eq!(top[1].product_name, "Loose");
    assert_eq!(top[1].category_level_1, None);
    assert_eq!(top[2].product_name, "Chips");
    assert_eq!(top[2].category_level_1.as_deref(), Some("Snacks"));
    assert_eq!(top[2].total_quantity, 3);
}

#[sqlx::test(migrator = "store_db::migrations::MIGRATOR")]
#[ignore = "requires DATABASE_URL"]
async fn test_top_products_limited_to_five(pool: PgPool) {
    let db = Database::from_pool(pool);
    let c = db.customers().create(&customer_input("Alice")).await.unwrap();
    let o = db.orders().create(c.id, "new").await.unwrap();

    for i in 1..=7 {
        let p = product(&db, &format!("P{i}"), 100, 100).await;
        db.orders().add_product(o.id, p.id, i).await.unwrap();
    }

    let now = Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap();
    let december = Utc.with_ymd_and_hms(2023, 12, 31, 23, 0, 0).unwrap();
    sqlx::query("UPDATE orders SET created_at = $2 WHERE id = $1")
        .bind(o.id)
        .bind(december)
        .execute(db.pool())
        .await
        .unwrap();

    let top = db.reports().top_products_month_before(now).await.unwrap();
    let names: Vec<_> = top.iter().map(|t| t.product_name.as_str()).collect();
    assert_eq!(names, ["P7", "P6", "P5", "P4", "P3"]);
}

// =============================================================================
// CRUD
// =============================================================================

#[sqlx::test(migrator = "store_db::migrations::MIGRATOR")]
#[ignore = "requires DATABASE_URL"]
async fn test_missing_rows_are_not_found(pool: PgPool) {
    let db = Database::from_pool(pool);
    let id = Uuid::new_v4();

    assert!(db.products().get_by_id(id).await.unwrap().is_none());
    assert!(db.orders().get_by_id(id).await.unwrap().is_none());
    assert!(matches!(db.products().delete(id).await, Err(DbError::NotFound { .. })));
    assert!(matches!(db.customers().delete(id).await, Err(DbError::NotFound { .. })));
    assert!(matches!(
        db.orders().update_status(id, "paid").await,
        Err(DbError::NotFound { .. })
    ));
}

#[sqlx::test(migrator = "store_db::migrations::MIGRATOR")]
#[ignore = "requires DATABASE_URL"]
async fn test_constraint_errors_are_classified(pool: PgPool) {
    let db = Database::from_pool(pool);

    category(&db, "Drinks", None).await;
    let dup = db
        .categories()
        .create(&CategoryInput {
            name: "Other".to_string(),
            slug: "drinks".to_string(),
            parent_id: None,
            level: 0,
            is_active: true,
            sort_order: 0,
        })
        .await;
    assert!(matches!(dup, Err(DbError::UniqueViolation { .. })));

    let orphan = db.orders().create(Uuid::new_v4(), "new").await;
    assert!(matches!(orphan, Err(DbError::ForeignKeyViolation { .. })));

    let c = db.customers().create(&customer_input("Alice")).await.unwrap();
    db.orders().create(c.id, "new").await.unwrap();
    let in_use = db.customers().delete(c.id).await;
    assert!(matches!(in_use, Err(DbError::StillReferenced { .. })));
}

#[sqlx::test(migrator = "store_db::migrations::MIGRATOR")]
#[ignore = "requires DATABASE_URL"]
async fn test_product_links_are_written_with_the_product(pool: PgPool) {
    let db = Database::from_pool(pool.clone());
    let drinks = category(&db, "Drinks", None).await;

    let input = ProductInput {
        name: "Orphan".to_string(),
        price: Money::from_cents(100),
        quantity: 1,
    };

    let created = db
        .products()
        .create_with_categories(&input, &[Uuid::new_v4()])
        .await;
    assert!(matches!(created, Err(DbError::ForeignKeyViolation { .. })));
    assert_eq!(db.products().count().await.unwrap(), 0);

    let tea = db
        .products()
        .create_with_categories(
            &ProductInput {
                name: "Tea".to_string(),
                ..input.clone()
            },
            &[drinks.id],
        )
        .await
        .unwrap();

    let renamed = ProductInput {
        name: "Green Tea".to_string(),
        price: Money::from_cents(300),
        quantity: 9,
    };
    let updated = db
        .products()
        .update_with_categories(tea.id, &renamed, &[drinks.id, Uuid::new_v4()])
        .await;
    assert!(matches!(updated, Err(DbError::ForeignKeyViolation { .. })));

    let stored = db.products().get_by_id(tea.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Tea");
    assert_eq!(stored.price, Money::from_cents(100));

    let links: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM product_categories WHERE product_id = $1")
            .bind(tea.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(links, 1);
}

#[sqlx::test(migrator = "store_db::migrations::MIGRATOR")]
#[ignore = "requires DATABASE_URL"]
async fn test_order_status_and_listing(pool: PgPool) {
    let db = Database::from_pool(pool);
    let c = db.customers().create(&customer_input("Alice")).await.unwrap();
    let p = product(&db, "Tea", 100, 10).await;

    let o = db.orders().create(c.id, "new").await.unwrap();
    db.orders().add_product(o.id, p.id, 2).await.unwrap();

    let paid = db.orders().update_status(o.id, "paid").await.unwrap();
    assert_eq!(paid.status, "paid");
    assert_eq!(paid.items.len(), 1);

    let listed = db.orders().list(Page::default()).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].items.len(), 1);
    assert_eq!(listed[0].total_price, Money::from_cents(200));

    db.orders().delete(o.id).await.unwrap();
    assert!(db.orders().items(o.id).await.unwrap().is_empty());
    assert_eq!(db.products().get_by_id(p.id).await.unwrap().unwrap().quantity, 8);
}
