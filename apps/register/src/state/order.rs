//! # Order State
//!
//! Holds the order being built at the register.
//!
//! ## Order Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order State Operations                               │
//! │                                                                         │
//! │  Renderer Action          Command                 Order Change          │
//! │  ───────────────          ───────                 ────────────          │
//! │                                                                         │
//! │  Tap Product ────────────► add_to_order() ──────► line += 1 or push     │
//! │                                                                         │
//! │  Change Quantity ────────► update_order_item() ─► qty = n (<1 removes)  │
//! │                                                                         │
//! │  Click Remove ───────────► remove_from_order() ─► lines.remove(i)       │
//! │                                                                         │
//! │  Click Clear ────────────► clear_order() ───────► lines.clear()         │
//! │                                                                         │
//! │  Checkout ───────────────► checkout() ──────────► cleared on success    │
//! │                                                                         │
//! │  NOTE: Checkout holds the lock across the database transaction so the   │
//! │        order cannot change between persisting and clearing it.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use caribe_core::order::{OrderBuilder, OrderSnapshot};
use tokio::sync::{Mutex, MutexGuard};

/// Shared in-memory order.
///
/// A `tokio::sync::Mutex` because checkout keeps the guard across `.await`.
#[derive(Debug, Clone, Default)]
pub struct OrderState {
    order: Arc<Mutex<OrderBuilder>>,
}

impl OrderState {
    /// Creates a new empty order state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the order for a read-modify-write sequence.
    pub async fn lock(&self) -> MutexGuard<'_, OrderBuilder> {
        self.order.lock().await
    }

    /// Current order as the renderer sees it.
    pub async fn snapshot(&self) -> OrderSnapshot {
        OrderSnapshot::from(&*self.order.lock().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caribe_core::Product;
    use chrono::Utc;

    fn product(id: &str, price_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            description: None,
            price_cents,
            category_id: None,
            recipe_id: None,
            current_stock: 50,
            min_stock: 10,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_clones_share_one_order() {
        let state = OrderState::new();
        let other = state.clone();

        state.lock().await.add_product(&product("1", 999)).unwrap();
        other.lock().await.add_product(&product("1", 999)).unwrap();

        let snapshot = state.snapshot().await;
        assert_eq!(snapshot.item_count, 1);
        assert_eq!(snapshot.total_quantity, 2);
        assert_eq!(snapshot.total_cents, 1_998);
    }
}
