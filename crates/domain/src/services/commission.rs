//! Commission calculation.
//!
//! A sale's commission is computed from the affiliate's tier rate when one
//! is assigned, otherwise from the product's base rate. The applied rate is
//! snapshotted on the sale row so later tier changes do not rewrite history.

/// Resolves the effective commission rate for a sale.
pub fn effective_rate(product_rate: f64, tier_rate: Option<f64>) -> f64 {
    tier_rate.unwrap_or(product_rate)
}

/// Computes the commission in cents for a sale amount, rounding half up.
pub fn commission_cents(amount_cents: i64, rate_percent: f64) -> i64 {
    ((amount_cents as f64) * rate_percent / 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_rate_overrides_product_rate() {
        assert_eq!(effective_rate(10.0, Some(15.0)), 15.0);
        assert_eq!(effective_rate(10.0, None), 10.0);
    }

    #[test]
    fn test_commission_cents() {
        // 10% of $49.99
        assert_eq!(commission_cents(4999, 10.0), 500);
        // 15% of $100.00
        assert_eq!(commission_cents(10_000, 15.0), 1500);
        // fractional cents round half up
        assert_eq!(commission_cents(333, 10.0), 33);
        assert_eq!(commission_cents(335, 10.0), 34);
    }

    #[test]
    fn test_commission_on_zero_rate() {
        assert_eq!(commission_cents(10_000, 0.0), 0);
    }
}
