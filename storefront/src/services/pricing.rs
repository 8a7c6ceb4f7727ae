// storefront/src/services/pricing.rs

//! Order totals. Pure functions of the cart subtotal and the shipping policy.

use crate::cart::Cart;
use crate::config::AppConfig;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingPolicy {
  /// Shipping is free only when the subtotal is strictly above this.
  pub free_shipping_threshold: Decimal,
  pub shipping_fee: Decimal,
}

impl Default for ShippingPolicy {
  fn default() -> Self {
    Self {
      free_shipping_threshold: Decimal::from(500),
      shipping_fee: Decimal::from(50),
    }
  }
}

impl From<&AppConfig> for ShippingPolicy {
  fn from(config: &AppConfig) -> Self {
    Self {
      free_shipping_threshold: config.free_shipping_threshold,
      shipping_fee: config.shipping_fee,
    }
  }
}

impl ShippingPolicy {
  pub fn shipping_for(&self, subtotal: Decimal) -> Decimal {
    if subtotal > self.free_shipping_threshold {
      Decimal::ZERO
    } else {
      self.shipping_fee
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
  pub subtotal: Decimal,
  pub shipping_fee: Decimal,
  pub total: Decimal,
}

impl Totals {
  pub fn compute(subtotal: Decimal, policy: &ShippingPolicy) -> Self {
    let shipping_fee = policy.shipping_for(subtotal);
    Self {
      subtotal,
      shipping_fee,
      total: subtotal + shipping_fee,
    }
  }

  pub fn for_cart(cart: &Cart, policy: &ShippingPolicy) -> Self {
    Self::compute(cart.total(), policy)
  }

  /// Copy rounded to two decimals for display. Stored values are never rounded.
  pub fn rounded(&self) -> Self {
    Self {
      subtotal: self.subtotal.round_dp(2),
      shipping_fee: self.shipping_fee.round_dp(2),
      total: self.total.round_dp(2),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn threshold_is_strictly_greater() {
    let policy = ShippingPolicy::default();

    let at = Totals::compute(Decimal::from(500), &policy);
    assert_eq!(at.shipping_fee, Decimal::from(50));
    assert_eq!(at.total, Decimal::from(550));

    let above = Totals::compute(Decimal::new(50001, 2), &policy);
    assert_eq!(above.shipping_fee, Decimal::ZERO);
    assert_eq!(above.total, Decimal::new(50001, 2));

    let one_unit_above = Totals::compute(Decimal::from(501), &policy);
    assert_eq!(one_unit_above.shipping_fee, Decimal::ZERO);
  }

  #[test]
  fn small_order_pays_flat_fee() {
    let totals = Totals::compute(Decimal::from(200), &ShippingPolicy::default());
    assert_eq!(totals.subtotal, Decimal::from(200));
    assert_eq!(totals.shipping_fee, Decimal::from(50));
    assert_eq!(totals.total, Decimal::from(250));
  }

  #[test]
  fn empty_cart_still_quotes_a_fee() {
    let totals = Totals::for_cart(&Cart::new(), &ShippingPolicy::default());
    assert_eq!(totals.subtotal, Decimal::ZERO);
    assert_eq!(totals.total, Decimal::from(50));
  }

  #[test]
  fn rounding_is_presentation_only() {
    let totals = Totals::compute(Decimal::new(12345, 3), &ShippingPolicy::default());
    assert_eq!(totals.rounded().subtotal, Decimal::new(1234, 2));
    assert_eq!(totals.subtotal, Decimal::new(12345, 3));
  }
}
