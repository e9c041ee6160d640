//! Tests for transform module

use super::*;
use crate::record::{Customer, Order, Payment, Record};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use test_case::test_case;

fn order(id: Option<&str>, quantity: Option<i64>, price: f64, amount: Option<f64>) -> Order {
    Order {
        customer_id: Some("c-1".into()),
        order_id: id.map(String::from),
        order_date: Some("2025-03-04 10:11:12".into()),
        product: Some("xkcdQwerty".into()),
        quantity,
        price: Some(price),
        discount_pct: None,
        order_amount: amount,
        ..Order::default()
    }
}

fn payment(order_id: &str, status: Option<&str>) -> Record {
    Record::Payment(Payment {
        order_id: Some(order_id.into()),
        status: status.map(String::from),
        ..Payment::default()
    })
}

// ============================================================================
// Hashing Tests
// ============================================================================

#[test]
fn test_stable_hash_contract() {
    // XXH64, seed 42, interpreted as signed
    assert_eq!(stable_hash(""), -7_444_071_767_201_028_348);
    assert_eq!(stable_hash("c-1"), 299_693_717_635_251_366);
    assert_eq!(stable_hash("ORD-123456"), -5_835_783_579_868_938_787);
}

#[test_case("c-1", "CUST-251366")]
#[test_case("3f2b8a4e-1c2d-4e5f-9a8b-7c6d5e4f3a2b", "CUST-147108")]
#[test_case("ORD-100001", "CUST-074603" ; "zero padded")]
fn test_short_customer_id(input: &str, expected: &str) {
    assert_eq!(short_customer_id(input), expected);
}

#[test_case("ORD-100001", "MacBook Pro")]
#[test_case("ORD-123456", "Canon EOS R5")]
#[test_case("ORD-1", "ThinkPad X1 Carbon")]
fn test_assign_product(order_id: &str, expected: &str) {
    assert_eq!(assign_product(order_id), expected);
}

proptest! {
    #[test]
    fn prop_short_customer_id_format(id in ".*") {
        let short = short_customer_id(&id);
        prop_assert_eq!(short.len(), 11);
        prop_assert!(short.starts_with(CUSTOMER_ID_PREFIX));
        prop_assert!(short[5..].chars().all(|c| c.is_ascii_digit()));
        prop_assert_eq!(short_customer_id(&id), short);
    }

    #[test]
    fn prop_assign_product_is_catalog_entry(id in "ORD-[0-9]{6}") {
        let product = assign_product(&id);
        prop_assert!(PRODUCT_CATALOG.contains(&product));
        prop_assert_eq!(assign_product(&id), product);
    }

    #[test]
    fn prop_stable_bucket_in_range(key in ".*", buckets in 1u64..10_000) {
        prop_assert!(stable_bucket(&key, buckets) < buckets);
    }
}

// ============================================================================
// Projection Tests
// ============================================================================

#[test_case(180.004, 180.0)]
#[test_case(180.005, 180.01)]
#[test_case(-2.345, -2.35 ; "negative rounds away from zero")]
#[test_case(7.0, 7.0)]
#[test_case(1.005, 1.01 ; "decimal midpoint below binary")]
#[test_case(2.675, 2.68 ; "decimal midpoint two")]
#[test_case(-1.005, -1.01 ; "negative decimal midpoint")]
#[test_case(0.125, 0.13)]
#[test_case(1e-7, 0.0 ; "tiny value")]
#[test_case(12_345.6, 12_345.6)]
fn test_round2(input: f64, expected: f64) {
    assert_eq!(round2(input), expected);
}

#[test_case(None, Some(100.0), Some(2), Some(10.0), Some(180.0) ; "null amount recomputed")]
#[test_case(Some(0.0), Some(19.99), Some(3), None, Some(59.97) ; "zero amount recomputed without discount")]
#[test_case(Some(-5.0), Some(10.0), Some(1), Some(50.0), Some(5.0) ; "negative amount recomputed")]
#[test_case(Some(42.456), Some(1.0), Some(1), None, Some(42.46) ; "positive amount kept and rounded")]
#[test_case(None, None, Some(2), None, None ; "no price no amount")]
#[test_case(None, Some(1.005), Some(1), None, Some(1.01) ; "recomputed amount rounds half up")]
#[test_case(Some(2.675), Some(1.0), Some(1), None, Some(2.68) ; "kept amount rounds half up")]
fn test_backfill_amount(
    amount: Option<f64>,
    price: Option<f64>,
    quantity: Option<i64>,
    discount: Option<f64>,
    expected: Option<f64>,
) {
    assert_eq!(backfill_amount(amount, price, quantity, discount), expected);
}

#[test]
fn test_project_order_trims_id() {
    let projected = project_order(&order(Some("  ORD-7 "), Some(1), 5.0, Some(5.0))).unwrap();
    assert_eq!(projected.order_id, "ORD-7");
    assert_eq!(projected.quantity, 1);
    assert_eq!(projected.order_amount, 5.0);
}

#[test_case(order(None, Some(2), 10.0, None) ; "missing id")]
#[test_case(order(Some("   "), Some(2), 10.0, None) ; "blank id")]
#[test_case(order(Some("ORD-1"), Some(0), 10.0, None) ; "quantity zero")]
#[test_case(order(Some("ORD-1"), None, 10.0, None) ; "quantity missing")]
#[test_case(order(Some("ORD-1"), Some(3), -1.0, Some(-1.0)) ; "negative final amount")]
fn test_project_order_drops_corrupt(input: Order) {
    assert!(project_order(&input).is_none());
}

#[test]
fn test_project_order_keeps_zero_amount() {
    let projected = project_order(&order(Some("ORD-1"), Some(2), 0.0, Some(0.0))).unwrap();
    assert_eq!(projected.order_amount, 0.0);
}

#[test]
fn test_project_order_rounded_negative_zero_is_positive() {
    let projected = project_order(&order(Some("ORD-1"), Some(1), -0.001, None)).unwrap();
    assert_eq!(projected.order_amount, 0.0);
    assert!(projected.order_amount.is_sign_positive());
}

#[test]
fn test_project_orders_counts() {
    let records = vec![
        Record::Order(order(Some("ORD-1"), Some(1), 10.0, None)),
        Record::Order(order(Some("ORD-2"), Some(0), 10.0, None)),
        Record::Customer(Customer::default()),
        payment("ORD-1", Some("success")),
    ];
    let view = project_orders(&records);
    assert_eq!(view.seen, 2);
    assert_eq!(view.dropped, 1);
    assert_eq!(view.orders.len(), 1);

    let payments = project_payments(&records);
    assert_eq!(
        payments,
        vec![PaymentView {
            order_id: Some("ORD-1".into()),
            status: Some("success".into()),
        }]
    );
}

// ============================================================================
// Join Tests
// ============================================================================

#[test_case(Some("Success"), "success")]
#[test_case(Some("PENDING"), "pending")]
#[test_case(None, "unknown")]
fn test_normalize_status(input: Option<&str>, expected: &str) {
    assert_eq!(normalize_status(input), expected);
}

#[test]
fn test_payment_index_first_wins() {
    let payments = vec![
        PaymentView {
            order_id: Some("ORD-1".into()),
            status: Some("failed".into()),
        },
        PaymentView {
            order_id: Some("ORD-1".into()),
            status: Some("success".into()),
        },
        PaymentView {
            order_id: None,
            status: Some("success".into()),
        },
        PaymentView {
            order_id: Some("ORD-2".into()),
            status: None,
        },
    ];
    let index = PaymentIndex::build(&payments);
    assert_eq!(index.len(), 2);
    assert_eq!(index.duplicates(), 1);
    assert_eq!(index.lookup("ORD-1"), Some(Some("failed")));
    assert_eq!(index.lookup("ORD-2"), Some(None));
    assert_eq!(index.lookup("ORD-3"), None);
}

#[test]
fn test_join_payments_left_outer() {
    let orders = vec![
        project_order(&order(Some("ORD-1"), Some(1), 10.0, None)).unwrap(),
        project_order(&order(Some("ORD-2"), Some(1), 10.0, None)).unwrap(),
        project_order(&order(Some("ORD-3"), Some(1), 10.0, None)).unwrap(),
    ];
    let index = PaymentIndex::build(&[
        PaymentView {
            order_id: Some("ORD-1".into()),
            status: Some("Success".into()),
        },
        PaymentView {
            order_id: Some("ORD-3".into()),
            status: None,
        },
    ]);

    let joined = join_payments(orders, &index);
    let statuses: Vec<_> = joined
        .iter()
        .map(|j| (j.order.order_id.as_str(), j.payment_status.as_str(), j.matched))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("ORD-1", "success", true),
            ("ORD-2", "unknown", false),
            ("ORD-3", "unknown", true),
        ]
    );
}

// ============================================================================
// Pipeline Tests
// ============================================================================

#[test_case(Some("2025-03-04 10:11:12"), Some((2025, 3, 4)))]
#[test_case(Some("2025-03-04T23:59:59Z"), Some((2025, 3, 4)) ; "rfc3339")]
#[test_case(Some("2025-03-04"), Some((2025, 3, 4)) ; "bare date")]
#[test_case(Some("04/03/2025"), None ; "unsupported format")]
#[test_case(None, None)]
fn test_normalize_order_date(raw: Option<&str>, expected: Option<(i32, u32, u32)>) {
    let expected = expected.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap());
    assert_eq!(normalize_order_date(raw), expected);
}

#[test]
fn test_transform_end_to_end_example() {
    let records = vec![
        Record::Order(order(None, Some(1), 50.0, None)),
        Record::Order(order(Some("ORD-2"), Some(0), 50.0, None)),
        Record::Order(Order {
            customer_id: Some("c-1".into()),
            order_id: Some("ORD-123456".into()),
            order_date: Some("2025-03-04 10:11:12".into()),
            product: Some("random text".into()),
            quantity: Some(2),
            price: Some(100.0),
            discount_pct: Some(10.0),
            order_amount: None,
            ..Order::default()
        }),
        payment("ORD-123456", Some("Pending")),
    ];

    let (rows, stats) = transform(&records);
    assert_eq!(
        rows,
        vec![CleanRecord {
            order_id: "ORD-123456".into(),
            customer_id: Some("CUST-251366".into()),
            order_date: NaiveDate::from_ymd_opt(2025, 3, 4),
            product: "Canon EOS R5".into(),
            quantity: 2,
            order_amount: 180.0,
            payment_status: "pending".into(),
        }]
    );
    assert_eq!(
        stats,
        TransformStats {
            orders_seen: 3,
            orders_dropped: 2,
            payments_seen: 1,
            duplicate_payments: 0,
            unmatched_orders: 0,
            rows_out: 1,
        }
    );
}

#[test]
fn test_transform_is_deterministic() {
    let records: Vec<Record> = (0..50)
        .map(|i| Record::Order(order(Some(&format!("ORD-{i:06}")), Some(1), 1.0, None)))
        .collect();

    let (first, _) = transform(&records);
    let (second, _) = transform(&records);
    assert_eq!(first, second);
    assert!(first.iter().all(|row| row.payment_status == UNKNOWN_STATUS));
}

#[test]
fn test_transform_null_customer_stays_null() {
    let mut input = order(Some("ORD-9"), Some(1), 3.0, None);
    input.customer_id = None;
    let (rows, _) = transform(&[Record::Order(input)]);
    assert_eq!(rows[0].customer_id, None);
}
