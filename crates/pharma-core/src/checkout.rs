//! # Checkout Math
//!
//! Pure arithmetic for the sale commit path: line totals, the sale total
//! and the change amount. No I/O, no persistence; the numbers computed
//! here are what pharma-db stores verbatim.
//!
//! ## Trust boundary
//! Unit prices are supplied by the caller and are NOT re-validated against
//! the product catalog. That pass-through mirrors the reference system's
//! contract; tightening it would change observable behavior.

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// One proposed line of a sale, as received from the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: i64,
    pub quantity: i64,
    /// Caller-supplied unit price snapshot.
    pub unit_price_cents: i64,
}

impl CartLine {
    /// quantity × unit price.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price_cents).multiply_quantity(self.quantity)
    }
}

/// Authoritative sale total: the sum of line totals.
///
/// The same product appearing on two lines contributes twice; lines are
/// not merged here, and each decrements stock independently at commit.
pub fn compute_total(lines: &[CartLine]) -> Money {
    lines.iter().map(CartLine::line_total).sum()
}

/// Change owed to the customer: `tendered - total`.
///
/// Returns None when no amount was tendered (card/mobile or deferred
/// payment). A negative result means underpayment; the commit path stores
/// it rather than rejecting, unless the underpayment policy is enabled.
pub fn compute_change(total: Money, amount_tendered_cents: Option<i64>) -> Option<i64> {
    amount_tendered_cents.map(|tendered| (Money::from_cents(tendered) - total).cents())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: i64, quantity: i64, unit_price_cents: i64) -> CartLine {
        CartLine {
            product_id,
            quantity,
            unit_price_cents,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line(7, 2, 500).line_total().cents(), 1000);
    }

    #[test]
    fn test_compute_total() {
        let lines = [line(1, 3, 500), line(2, 1, 1500)];
        assert_eq!(compute_total(&lines).cents(), 3000);
    }

    #[test]
    fn test_total_empty_cart_is_zero() {
        assert_eq!(compute_total(&[]).cents(), 0);
    }

    #[test]
    fn test_duplicate_product_lines_both_count() {
        // Two cart entries for the same product: both contribute.
        let lines = [line(7, 2, 500), line(7, 1, 500)];
        assert_eq!(compute_total(&lines).cents(), 1500);
    }

    #[test]
    fn test_change_exact_payment() {
        let total = compute_total(&[line(7, 2, 500)]);
        assert_eq!(compute_change(total, Some(1000)), Some(0));
    }

    #[test]
    fn test_change_overpayment() {
        assert_eq!(compute_change(Money::from_cents(1500), Some(2000)), Some(500));
    }

    #[test]
    fn test_change_underpayment_is_negative() {
        // Documented reference behavior: underpayment is stored, not blocked.
        assert_eq!(compute_change(Money::from_cents(1500), Some(1000)), Some(-500));
    }

    #[test]
    fn test_change_absent_when_nothing_tendered() {
        assert_eq!(compute_change(Money::from_cents(1500), None), None);
    }
}
