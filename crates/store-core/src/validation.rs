//! # Validation Module
//!
//! Input validation for request bodies, path ids and pagination.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: axum extractors                                              │
//! │  └── JSON shape and types (deserialization)                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── ids, names, slugs, status                                         │
//! │  ├── price scale and sign, stock sign                                  │
//! │  └── quantity > 0 before AddProductToOrder                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: PostgreSQL                                                   │
//! │  ├── CHECK (quantity >= 0), CHECK (quantity > 0)                        │
//! │  ├── UNIQUE (slug), UNIQUE (order_id, product_id)                      │
//! │  └── Foreign keys                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::{Money, MONEY_SCALE};
use crate::types::Page;
use crate::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required, length-bounded text field and returns it trimmed.
///
/// ## Example
/// ```rust
/// use store_core::validation::validate_name;
///
/// assert_eq!(validate_name("name", "  Tea ", 200).unwrap(), "Tea");
/// assert!(validate_name("name", "   ", 200).is_err());
/// ```
pub fn validate_name(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Validates a category slug.
///
/// ## Rules
/// - 1 to 100 characters
/// - lowercase ASCII letters, digits and hyphens
/// - no leading or trailing hyphen
pub fn validate_slug(slug: &str) -> ValidationResult<String> {
    let slug = validate_name("slug", slug, 100)?;

    let allowed = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if !allowed || slug.starts_with('-') || slug.ends_with('-') {
        return Err(ValidationError::InvalidFormat {
            field: "slug".to_string(),
            reason: "must contain only lowercase letters, digits and inner hyphens".to_string(),
        });
    }

    Ok(slug)
}

/// Validates an order status. Any non-empty label up to 50 characters.
pub fn validate_status(status: &str) -> ValidationResult<String> {
    validate_name("status", status, 50)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the quantity passed to AddProductToOrder.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must fit the INTEGER column
///
/// ## User Workflow
/// ```text
/// POST /orders/{id}/items { "quantity": 0 }
///       │
///       ▼
/// validate_quantity(0) ← THIS FUNCTION
///       │
///       ├── qty <= 0? → 400 "quantity must be positive"
///       │
///       └── OK → AddProductToOrder
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<i32> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    i32::try_from(qty).map_err(|_| ValidationError::OutOfRange {
        field: "quantity".to_string(),
        min: 1,
        max: i32::MAX as i64,
    })
}

/// Validates stock on hand for a product create/update.
pub fn validate_stock(stock: i32) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i32::MAX as i64,
        });
    }

    Ok(())
}

/// Validates a product price and returns it at the standard scale.
///
/// ## Rules
/// - Must be non-negative (zero is allowed)
/// - At most two fractional digits
/// - At most [`Money::column_max`]
///
/// ## Example
/// ```rust
/// use store_core::money::Money;
/// use store_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(1099)).is_ok());
/// assert!(validate_price(Money::from_cents(-100)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<Money> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    let mut amount = price.amount().normalize();
    if amount.scale() > MONEY_SCALE {
        return Err(ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: format!("at most {MONEY_SCALE} decimal places allowed"),
        });
    }
    amount.rescale(MONEY_SCALE);

    let price = Money::from_decimal(amount);
    if !price.fits_column() {
        return Err(ValidationError::AmountTooLarge {
            field: "price".to_string(),
            max: Money::column_max().to_string(),
        });
    }

    Ok(price)
}

/// Validates a category level.
pub fn validate_level(level: i32) -> ValidationResult<()> {
    if level < 0 {
        return Err(ValidationError::OutOfRange {
            field: "level".to_string(),
            min: 0,
            max: i32::MAX as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Pagination
// =============================================================================

/// Builds a page from raw `limit` / `offset` query values.
///
/// Unparseable or out-of-range values fall back to the defaults
/// (`limit=50`, `offset=0`) instead of failing the request.
/// `limit` is capped at [`MAX_PAGE_LIMIT`].
///
/// ## Example
/// ```rust
/// use store_core::validation::parse_page;
///
/// let page = parse_page(Some("abc"), Some("-3"));
/// assert_eq!((page.limit, page.offset), (50, 0));
///
/// let page = parse_page(Some("10"), Some("20"));
/// assert_eq!((page.limit, page.offset), (10, 20));
/// ```
pub fn parse_page(limit: Option<&str>, offset: Option<&str>) -> Page {
    let limit = limit
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .filter(|l| *l > 0)
        .map(|l| l.min(MAX_PAGE_LIMIT))
        .unwrap_or(DEFAULT_PAGE_LIMIT);

    let offset = offset
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .filter(|o| *o >= 0)
        .unwrap_or(0);

    Page { limit, offset }
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Parses a UUID path or body value.
///
/// ## Example
/// ```rust
/// use store_core::validation::parse_uuid;
///
/// assert!(parse_uuid("order id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(parse_uuid("order id", "not-a-uuid").is_err());
/// ```
pub fn parse_uuid(field: &str, id: &str) -> ValidationResult<Uuid> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Uuid::parse_str(id.trim()).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
