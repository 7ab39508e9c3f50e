//! # Line-Item Planning
//!
//! The arithmetic half of AddProductToOrder. Given the locked product
//! state and the existing line (if any), decide what the new line, the
//! order-total delta and the remaining stock will be. store-db applies the
//! plan inside the transaction that holds the row locks.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AddProductToOrder(order, product, delta)                               │
//! │                                                                         │
//! │  store-db                        store-core (THIS MODULE)               │
//! │  ────────                        ────────────────────────               │
//! │  BEGIN                                                                  │
//! │  lock order row                                                         │
//! │  lock product row ──────────┐                                           │
//! │  lock existing line ────────┼──► plan_addition(product,                 │
//! │                             │                  existing, delta)         │
//! │                             │        │                                  │
//! │                             │        ├── stock < delta → Insufficient   │
//! │                             │        └── LinePlan { quantity,           │
//! │                             │                       sub_total,          │
//! │  upsert line  ◄─────────────┴─────────────────────  total_delta,        │
//! │  total_price += total_delta                         stock_after }       │
//! │  quantity    -= delta                                                   │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::validate_quantity;

/// Product state read under `FOR UPDATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockedProduct {
    pub id: Uuid,
    pub price: Money,
    pub stock: i32,
}

/// The current state of the line for (order, product), read under lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExistingLine {
    pub quantity: i32,
    pub sub_total: Money,
}

/// What the transaction must write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePlan {
    /// Final line quantity
    pub quantity: i32,
    /// Final line subtotal: unit price × `quantity`
    pub sub_total: Money,
    /// Amount to add to the order total (new − old subtotal)
    pub total_delta: Money,
    /// Product stock after the decrement
    pub stock_after: i32,
}

/// Plans adding `delta` units of a product to an order.
///
/// The whole line is repriced at the current price, so `total_delta` is
/// `price × (old + delta) − old_sub_total`. At a constant price this
/// reduces to `price × delta`.
///
/// ## Errors
/// - `Validation` if `delta <= 0`, the line quantity overflows, or the
///   subtotal passes [`Money::column_max`]
/// - `InsufficientStock` if `stock < delta`
///
/// ## Example
/// ```rust
/// use store_core::{plan_addition, ExistingLine, LockedProduct, Money};
/// use uuid::Uuid;
///
/// let product = LockedProduct { id: Uuid::new_v4(), price: Money::from_cents(200), stock: 7 };
/// let existing = ExistingLine { quantity: 3, sub_total: Money::from_cents(600) };
///
/// let plan = plan_addition(product, Some(existing), 4).unwrap();
/// assert_eq!(plan.quantity, 7);
/// assert_eq!(plan.sub_total, Money::from_cents(1400));
/// assert_eq!(plan.total_delta, Money::from_cents(800));
/// assert_eq!(plan.stock_after, 3);
/// ```
pub fn plan_addition(
    product: LockedProduct,
    existing: Option<ExistingLine>,
    delta: i32,
) -> CoreResult<LinePlan> {
    validate_quantity(i64::from(delta))?;

    if product.stock < delta {
        return Err(CoreError::InsufficientStock {
            product_id: product.id.to_string(),
            available: i64::from(product.stock),
            requested: i64::from(delta),
        });
    }

    let (old_quantity, old_sub_total) = existing
        .map(|line| (line.quantity, line.sub_total))
        .unwrap_or((0, Money::zero()));

    let quantity = old_quantity
        .checked_add(delta)
        .ok_or_else(|| ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(i32::MAX),
        })?;

    let sub_total = product
        .price
        .multiply_quantity(quantity)
        .filter(Money::fits_column)
        .ok_or_else(|| amount_too_large("sub_total"))?;

    let total_delta = sub_total
        .checked_sub(old_sub_total)
        .ok_or_else(|| amount_too_large("total_price"))?;

    Ok(LinePlan {
        quantity,
        sub_total,
        total_delta,
        stock_after: product.stock - delta,
    })
}

/// Applies a plan's `total_delta` to the locked order total.
///
/// Fails with `Validation` when the new total would not fit the
/// `total_price` column.
///
/// ```rust
/// use store_core::{next_order_total, Money};
///
/// let total = next_order_total(Money::from_cents(600), Money::from_cents(800)).unwrap();
/// assert_eq!(total, Money::from_cents(1400));
/// assert!(next_order_total(Money::column_max(), Money::from_cents(1)).is_err());
/// ```
pub fn next_order_total(current: Money, total_delta: Money) -> CoreResult<Money> {
    current
        .checked_add(total_delta)
        .filter(Money::fits_column)
        .ok_or_else(|| amount_too_large("total_price").into())
}

fn amount_too_large(field: &str) -> ValidationError {
    ValidationError::AmountTooLarge {
        field: field.to_string(),
        max: Money::column_max().to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
