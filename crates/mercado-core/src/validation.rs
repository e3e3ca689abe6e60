//! # Validation Module
//!
//! Input validation for checkout and stock adjustment requests.
//!
//! ## Validation Strategy
//! ```text
//! Layer 1: Frontend            advisory only, immediate feedback
//! Layer 2: THIS MODULE         authoritative input rules, before any I/O
//! Layer 3: Database            NOT NULL / CHECK / FK constraints
//! ```
//! A request that fails here never opens a transaction, so rejected input
//! leaves zero rows behind.

use crate::error::{ValidationError, ValidationResult};
use crate::types::OrderItem;
use crate::{MAX_LINE_QUANTITY, MAX_ORDER_ITEMS};

// =============================================================================
// Checkout
// =============================================================================

/// Validates the items and payment method of an incoming order.
///
/// ## Rules
/// - at least one item, at most [`MAX_ORDER_ITEMS`]
/// - every quantity in `1..=MAX_LINE_QUANTITY`
/// - every product id non-empty
/// - payment method id non-empty
pub fn validate_order(items: &[OrderItem], payment_method_id: &str) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if items.len() > MAX_ORDER_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_ORDER_ITEMS as i64,
        });
    }

    for item in items {
        if item.product_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "product_id".to_string(),
            });
        }
        validate_quantity(item.quantity)?;
    }

    if payment_method_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "payment_method_id".to_string(),
        });
    }

    Ok(())
}

/// Validates a movement or order-line quantity.
///
/// ## Rules
/// - must be positive (> 0)
/// - must not exceed [`MAX_LINE_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Manual Adjustments
// =============================================================================

/// Validates the reference document of a manual stock adjustment.
///
/// Every manual movement must cite a document (purchase order, damage
/// report, count sheet) so the audit log stays reconstructible.
pub fn validate_document_ref(document_ref: &str) -> ValidationResult<()> {
    let doc = document_ref.trim();

    if doc.is_empty() {
        return Err(ValidationError::Required {
            field: "document_ref".to_string(),
        });
    }

    if doc.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "document_ref".to_string(),
            max: 50,
        });
    }

    Ok(())
}

// =============================================================================
// Catalog
// =============================================================================

/// Validates a product name.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (free items).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Users
// =============================================================================

/// Shallow email shape check: one `@`, non-empty local and domain parts.
///
/// Deliverability is proven by the verification code flow, not by parsing.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain.tld".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: &str, quantity: i64) -> OrderItem {
        OrderItem {
            product_id: product_id.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_validate_order_rejects_empty_cart() {
        assert!(validate_order(&[], "cash").is_err());
    }

    #[test]
    fn test_validate_order_rejects_bad_quantity() {
        assert!(validate_order(&[item("p1", 0)], "cash").is_err());
        assert!(validate_order(&[item("p1", -2)], "cash").is_err());
        assert!(validate_order(&[item("p1", MAX_LINE_QUANTITY + 1)], "cash").is_err());
    }

    #[test]
    fn test_validate_order_rejects_missing_payment_method() {
        assert!(validate_order(&[item("p1", 1)], "").is_err());
        assert!(validate_order(&[item("p1", 1)], "   ").is_err());
    }

    #[test]
    fn test_validate_order_accepts_valid_input() {
        let items = vec![item("p1", 2), item("p2", 1)];
        assert!(validate_order(&items, "card").is_ok());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_LINE_QUANTITY).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_document_ref() {
        assert!(validate_document_ref("PO-55").is_ok());
        assert!(validate_document_ref("").is_err());
        assert!(validate_document_ref("   ").is_err());
        assert!(validate_document_ref(&"X".repeat(60)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Café molido 500g").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("a@b").is_err());
    }
}
