//! # Recipe Preparation
//!
//! Planning a batch: how much of each ingredient a preparation consumes and
//! whether the pantry can cover it.
//!
//! ## Preparation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "Prepare 2 × Arroz con pollo"                                          │
//! │                                                                         │
//! │  recipe items (per unit)      × 2        available    sufficient?       │
//! │  ─────────────────────────    ─────      ─────────    ───────────       │
//! │  Rice     0.25 kg          →  0.5 kg     3 kg         ✔                 │
//! │  Chicken  0.4 kg           →  0.8 kg     0.6 kg       ✘                 │
//! │                                                                         │
//! │  PreparationPlan::check() → InsufficientIngredient(Chicken) before      │
//! │  any write. When every line is sufficient the database layer deducts    │
//! │  ingredients, logs `recipe_used`, and bumps the linked product stock.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::quantity::Quantity;
use crate::types::{Recipe, RecipeItemDetail};
use crate::validation::validate_multiplier;

/// One ingredient line of a preparation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Requirement {
    pub ingredient_id: String,
    pub ingredient_name: String,
    pub unit: String,
    pub required: Quantity,
    pub available: Quantity,
    pub sufficient: bool,
}

/// A planned preparation of `multiplier` units of a recipe.
///
/// Serves as the read-only preview as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PreparationPlan {
    pub recipe_id: String,
    pub recipe_name: String,
    pub recipe_active: bool,
    pub multiplier: i64,
    pub requirements: Vec<Requirement>,
}

impl PreparationPlan {
    /// Computes requirements for `multiplier` units, one per ingredient.
    ///
    /// Fails on a bad multiplier or a recipe with no lines. An inactive recipe
    /// still gets a plan so the preview can show it; [`check`](Self::check)
    /// rejects it.
    pub fn build(
        recipe: &Recipe,
        items: &[RecipeItemDetail],
        multiplier: i64,
    ) -> CoreResult<PreparationPlan> {
        validate_multiplier(multiplier)?;
        if items.is_empty() {
            return Err(CoreError::RecipeHasNoItems(recipe.name.clone()));
        }

        let too_large = || ValidationError::OutOfRange {
            field: "multiplier".to_string(),
            min: 1,
            max: crate::MAX_PREPARATION_MULTIPLIER,
        };

        // Lines naming the same ingredient draw on one stock figure
        let mut requirements: Vec<Requirement> = Vec::with_capacity(items.len());
        for item in items {
            let required = item.quantity().checked_scale(multiplier).ok_or_else(too_large)?;

            match requirements
                .iter_mut()
                .find(|r| r.ingredient_id == item.ingredient_id)
            {
                Some(existing) => {
                    existing.required = existing
                        .required
                        .checked_add(required)
                        .ok_or_else(too_large)?;
                    existing.sufficient = existing.available >= existing.required;
                }
                None => requirements.push(Requirement {
                    ingredient_id: item.ingredient_id.clone(),
                    ingredient_name: item.ingredient_name.clone(),
                    unit: item.unit.clone(),
                    required,
                    available: item.available(),
                    sufficient: item.available() >= required,
                }),
            }
        }

        Ok(PreparationPlan {
            recipe_id: recipe.id.clone(),
            recipe_name: recipe.name.clone(),
            recipe_active: recipe.is_active,
            multiplier,
            requirements,
        })
    }

    pub fn is_feasible(&self) -> bool {
        self.recipe_active && self.requirements.iter().all(|r| r.sufficient)
    }

    /// Rejects inactive recipes and the first short ingredient.
    pub fn check(&self) -> CoreResult<()> {
        if !self.recipe_active {
            return Err(CoreError::RecipeInactive(self.recipe_name.clone()));
        }
        match self.requirements.iter().find(|r| !r.sufficient) {
            Some(short) => Err(short.shortage()),
            None => Ok(()),
        }
    }

    /// Inventory log note for every entry this preparation writes.
    pub fn log_note(&self) -> String {
        preparation_note(self.multiplier)
    }
}

impl Requirement {
    /// The error reported when this line cannot be covered.
    pub fn shortage(&self) -> CoreError {
        CoreError::InsufficientIngredient {
            ingredient: self.ingredient_name.clone(),
            unit: self.unit.clone(),
            required: self.required,
            available: self.available,
        }
    }
}

/// `Prepared order (N unit(s))`
pub fn preparation_note(multiplier: i64) -> String {
    format!("Prepared order ({} unit(s))", multiplier)
}

/// What one ingredient looked like after a preparation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Consumption {
    pub ingredient_id: String,
    pub ingredient_name: String,
    pub unit: String,
    pub consumed: Quantity,
    pub remaining: Quantity,
}

/// Product stock added by a preparation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProducedStock {
    pub product_id: String,
    pub product_name: String,
    pub new_stock: i64,
}

/// Result of a completed preparation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PreparationOutcome {
    pub recipe_id: String,
    pub recipe_name: String,
    pub multiplier: i64,
    pub consumed: Vec<Consumption>,
    /// `None` when no product is linked to the recipe.
    pub produced: Option<ProducedStock>,
}
