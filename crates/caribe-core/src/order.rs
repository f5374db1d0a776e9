//! # Order Builder
//!
//! The order being rung up at the counter, before checkout.
//!
//! ## Order Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Builder Operations                             │
//! │                                                                         │
//! │  Renderer Action         Command                 Builder Change         │
//! │  ───────────────         ───────                 ──────────────         │
//! │                                                                         │
//! │  Tap product ──────────► add_to_order() ───────► push line / qty += 1  │
//! │                                                                         │
//! │  Edit quantity ────────► update_order_item() ──► qty = n (n < 1 drops) │
//! │                                                                         │
//! │  Tap remove ───────────► remove_from_order() ──► drop line             │
//! │                                                                         │
//! │  Tap clear ────────────► clear_order() ────────► no lines              │
//! │                                                                         │
//! │  Checkout succeeded ───► checkout() ───────────► no lines              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by `product_id` (adding the same product bumps quantity)
//! - Every line has quantity ≥ 1
//! - At most 100 lines, at most 999 per line
//! - A stocked product never has more units on the order than on the shelf
//!   at the time it was added

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{OrderLine, Product};
use crate::validation::validate_order_size;
use crate::{MAX_LINE_QUANTITY, MAX_ORDER_LINES};

/// In-memory order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBuilder {
    lines: Vec<OrderLine>,
}

impl OrderBuilder {
    pub fn new() -> Self {
        OrderBuilder::default()
    }

    /// Adds one unit of a product.
    ///
    /// ## Behavior
    /// - Stocked product with no stock: `ProductUnavailable`
    /// - Already on the order: quantity + 1
    /// - Otherwise: new line at quantity 1 with the current price frozen
    /// - Stocked product whose new quantity exceeds stock: `InsufficientStock`
    ///
    /// Returns the affected line.
    pub fn add_product(&mut self, product: &Product) -> CoreResult<&OrderLine> {
        if !product.is_active || product.is_out_of_stock() {
            return Err(CoreError::ProductUnavailable {
                product: product.name.clone(),
            });
        }

        let index = match self.position(&product.id) {
            Some(index) => {
                let requested = self.lines[index].quantity + 1;
                Self::check_line_quantity(product, requested)?;
                self.check_amount(&self.lines[index], requested)?;
                self.lines[index].quantity = requested;
                index
            }
            None => {
                validate_order_size(self.lines.len()).map_err(|_| CoreError::OrderTooLarge {
                    max: MAX_ORDER_LINES,
                })?;
                Self::check_line_quantity(product, 1)?;
                let line = OrderLine::from_product(product);
                self.check_amount(&line, 1)?;
                self.lines.push(line);
                self.lines.len() - 1
            }
        };

        Ok(&self.lines[index])
    }

    /// Sets the quantity of a line.
    ///
    /// A quantity below 1 removes the line. The stock check is the caller's
    /// job since only the caller holds a fresh [`Product`]; see
    /// [`OrderBuilder::update_quantity_checked`].
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        let index = self
            .position(product_id)
            .ok_or_else(|| CoreError::NotInOrder(product_id.to_string()))?;

        if quantity < 1 {
            self.lines.remove(index);
            return Ok(());
        }

        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        self.check_amount(&self.lines[index], quantity)?;
        self.lines[index].quantity = quantity;
        Ok(())
    }

    /// Like [`update_quantity`](Self::update_quantity), but also refuses more
    /// units than a stocked product has on hand.
    pub fn update_quantity_checked(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        if quantity >= 1 && self.position(&product.id).is_some() {
            Self::check_line_quantity(product, quantity)?;
        }
        self.update_quantity(&product.id, quantity)
    }

    /// Removes a line.
    pub fn remove(&mut self, product_id: &str) -> CoreResult<()> {
        let index = self
            .position(product_id)
            .ok_or_else(|| CoreError::NotInOrder(product_id.to_string()))?;
        self.lines.remove(index);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Σ unit price × quantity.
    pub fn total(&self) -> Money {
        self.lines.iter().map(OrderLine::line_total).sum()
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Checks the order can go to checkout.
    pub fn ensure_ready_for_checkout(&self) -> CoreResult<()> {
        if self.is_empty() {
            return Err(CoreError::EmptyOrder);
        }
        Ok(())
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.lines.iter().position(|l| l.product_id == product_id)
    }

    /// `line` at `requested` units, plus every other line, must fit in `Money`.
    fn check_amount(&self, line: &OrderLine, requested: i64) -> CoreResult<()> {
        let too_large = || CoreError::AmountTooLarge {
            product: line.product_name.clone(),
        };

        let line_total = line
            .unit_price()
            .checked_multiply_quantity(requested)
            .ok_or_else(too_large)?;

        self.lines
            .iter()
            .filter(|other| other.product_id != line.product_id)
            .try_fold(line_total, |total, other| {
                other
                    .checked_line_total()
                    .and_then(|t| total.checked_add(t))
            })
            .map(|_| ())
            .ok_or_else(too_large)
    }

    fn check_line_quantity(product: &Product, requested: i64) -> CoreResult<()> {
        if requested > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested,
                max: MAX_LINE_QUANTITY,
            });
        }
        if !product.can_sell(requested) {
            return Err(CoreError::InsufficientStock {
                product: product.name.clone(),
                available: product.current_stock,
                requested,
            });
        }
        Ok(())
    }
}

/// Order view for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderSnapshot {
    pub items: Vec<OrderLine>,
    pub item_count: usize,
    pub total_quantity: i64,
    pub total_cents: i64,
}

impl From<&OrderBuilder> for OrderSnapshot {
    fn from(order: &OrderBuilder) -> Self {
        OrderSnapshot {
            items: order.lines().to_vec(),
            item_count: order.item_count(),
            total_quantity: order.total_quantity(),
            total_cents: order.total().cents(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: &str, price_cents: i64, stock: i64, recipe: bool) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            description: None,
            price_cents,
            category_id: None,
            recipe_id: recipe.then(|| "r1".to_string()),
            current_stock: stock,
            min_stock: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_add_same_product_increments() {
        let mut order = OrderBuilder::new();
        let p = product("1", 500, 10, false);

        order.add_product(&p).unwrap();
        let line = order.add_product(&p).unwrap();

        assert_eq!(line.quantity, 2);
        assert_eq!(order.item_count(), 1);
        assert_eq!(order.total().cents(), 1000);
    }

    #[test]
    fn test_total_of_mixed_lines() {
        let mut order = OrderBuilder::new();
        let a = product("a", 5, 10, false);
        let b = product("b", 3, 10, false);

        order.add_product(&a).unwrap();
        order.add_product(&a).unwrap();
        order.add_product(&b).unwrap();

        assert_eq!(order.total().cents(), 13);
        assert_eq!(order.total_quantity(), 3);
    }

    #[test]
    fn test_out_of_stock_product_rejected() {
        let mut order = OrderBuilder::new();
        let err = order.add_product(&product("1", 500, 0, false)).unwrap_err();

        assert!(matches!(err, CoreError::ProductUnavailable { .. }));
        assert!(err.to_string().contains("stock unavailable"));
        assert!(order.is_empty());
    }

    #[test]
    fn test_recipe_product_ignores_stock() {
        let mut order = OrderBuilder::new();
        let p = product("1", 900, 0, true);

        order.add_product(&p).unwrap();
        order.add_product(&p).unwrap();
        assert_eq!(order.total_quantity(), 2);
    }

    #[test]
    fn test_overflowing_amount_rejected_without_panic() {
        let mut order = OrderBuilder::new();
        let p = product("1", i64::MAX / 2 + 1, 10, false);

        order.add_product(&p).unwrap();
        let err = order.add_product(&p).unwrap_err();
        assert!(matches!(err, CoreError::AmountTooLarge { .. }));
        assert_eq!(order.total_quantity(), 1);

        let err = order.update_quantity("1", 3).unwrap_err();
        assert!(matches!(err, CoreError::AmountTooLarge { .. }));

        let q = product("2", i64::MAX / 2 + 1, 10, false);
        let err = order.add_product(&q).unwrap_err();
        assert!(matches!(err, CoreError::AmountTooLarge { .. }));
        assert_eq!(order.item_count(), 1);
    }

    #[test]
    fn test_cannot_exceed_stock() {
        let mut order = OrderBuilder::new();
        let p = product("1", 250, 1, false);

        order.add_product(&p).unwrap();
        let err = order.add_product(&p).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 1,
                requested: 2,
                ..
            }
        ));
        assert_eq!(order.total_quantity(), 1);
    }

    #[test]
    fn test_frozen_price() {
        let mut order = OrderBuilder::new();
        let mut p = product("1", 500, 10, false);
        order.add_product(&p).unwrap();

        p.price_cents = 900;
        order.add_product(&p).unwrap();

        assert_eq!(order.lines()[0].unit_price_cents, 500);
        assert_eq!(order.total().cents(), 1000);
    }

    #[test]
    fn test_update_quantity() {
        let mut order = OrderBuilder::new();
        let p = product("1", 500, 10, false);
        order.add_product(&p).unwrap();

        order.update_quantity("1", 4).unwrap();
        assert_eq!(order.total_quantity(), 4);

        assert!(matches!(
            order.update_quantity("1", 1000),
            Err(CoreError::QuantityTooLarge { .. })
        ));
        assert!(matches!(
            order.update_quantity("missing", 2),
            Err(CoreError::NotInOrder(_))
        ));

        order.update_quantity("1", 0).unwrap();
        assert!(order.is_empty());
    }

    #[test]
    fn test_update_quantity_checked_respects_stock() {
        let mut order = OrderBuilder::new();
        let p = product("1", 500, 3, false);
        order.add_product(&p).unwrap();

        assert!(order.update_quantity_checked(&p, 3).is_ok());
        assert!(matches!(
            order.update_quantity_checked(&p, 4),
            Err(CoreError::InsufficientStock { .. })
        ));
        assert!(order.update_quantity_checked(&p, 0).is_ok());
        assert!(order.is_empty());
    }

    #[test]
    fn test_order_line_limit() {
        let mut order = OrderBuilder::new();
        for i in 0..MAX_ORDER_LINES {
            order.add_product(&product(&i.to_string(), 100, 5, false)).unwrap();
        }
        let err = order.add_product(&product("extra", 100, 5, false)).unwrap_err();
        assert!(matches!(err, CoreError::OrderTooLarge { .. }));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut order = OrderBuilder::new();
        order.add_product(&product("1", 100, 5, false)).unwrap();
        order.add_product(&product("2", 100, 5, false)).unwrap();

        order.remove("1").unwrap();
        assert!(order.remove("1").is_err());
        assert_eq!(order.item_count(), 1);

        order.clear();
        assert!(order.is_empty());
        assert!(matches!(
            order.ensure_ready_for_checkout(),
            Err(CoreError::EmptyOrder)
        ));
    }

    #[test]
    fn test_snapshot() {
        let mut order = OrderBuilder::new();
        order.add_product(&product("1", 350, 5, false)).unwrap();
        order.update_quantity("1", 2).unwrap();

        let snap = OrderSnapshot::from(&order);
        assert_eq!(snap.item_count, 1);
        assert_eq!(snap.total_quantity, 2);
        assert_eq!(snap.total_cents, 700);
    }
}
