//! Inventory dashboard figures and manual adjustments.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::quantity::Quantity;
use crate::types::Ingredient;

/// Header cards of the inventory screen.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryDashboard {
    pub total_ingredients: i64,
    /// Ingredients with current ≤ minimum.
    pub low_stock_count: i64,
    /// Σ current quantity × cost per unit, each line rounded to the cent.
    pub inventory_value_cents: i64,
}

impl InventoryDashboard {
    pub fn from_ingredients(ingredients: &[Ingredient]) -> Self {
        let value: Money = ingredients.iter().map(Ingredient::stock_value).sum();
        InventoryDashboard {
            total_ingredients: ingredients.len() as i64,
            low_stock_count: ingredients.iter().filter(|i| i.is_low_stock()).count() as i64,
            inventory_value_cents: value.cents(),
        }
    }
}

/// Signed change logged when an ingredient's quantity is edited directly.
pub fn adjustment_delta(before: Quantity, after: Quantity) -> Quantity {
    after - before
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn ingredient(current_milli: i64, min_milli: i64, cost_cents: i64) -> Ingredient {
        let now = Utc::now();
        Ingredient {
            id: "i".to_string(),
            name: "Ingredient".to_string(),
            description: None,
            unit: "kg".to_string(),
            current_quantity_milli: current_milli,
            min_quantity_milli: min_milli,
            cost_per_unit_cents: cost_cents,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_dashboard() {
        let dashboard = InventoryDashboard::from_ingredients(&[
            ingredient(2_500, 1_000, 400), // $10.00
            ingredient(500, 1_000, 300),   // $1.50, low
            ingredient(1_000, 1_000, 0),   // low (equal)
        ]);
        assert_eq!(dashboard.total_ingredients, 3);
        assert_eq!(dashboard.low_stock_count, 2);
        assert_eq!(dashboard.inventory_value_cents, 1_150);
    }

    #[test]
    fn test_empty_dashboard() {
        assert_eq!(
            InventoryDashboard::from_ingredients(&[]),
            InventoryDashboard::default()
        );
    }

    #[test]
    fn test_adjustment_delta() {
        let delta = adjustment_delta(Quantity::from_units(3), Quantity::from_milli(2_500));
        assert_eq!(delta.milli(), -500);
    }
}
