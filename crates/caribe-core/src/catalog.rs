//! # Catalog
//!
//! Turns the flat product listing into the menu the cashier taps through.
//!
//! ```text
//!  products ⋈ categories                          Catalog
//!  (ordered by category, name)                    ───────
//!  ┌──────────┬───────────────┐         ┌─ Drinks ─────────────────────┐
//!  │ Drinks   │ Jugo de parcha│  ───►   │  Jugo de parcha   Malta [low]│
//!  │ Drinks   │ Malta         │         ├─ Mains ──────────────────────┤
//!  │ Mains    │ Mofongo       │         │  Mofongo                     │
//!  │ (none)   │ Agua          │         ├─ Other ──────────────────────┤
//!  └──────────┴───────────────┘         │  Agua [out]                  │
//!                                       └──────────────────────────────┘
//!  active_category = "Drinks" (first group)
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Product, ProductListing};
use crate::UNCATEGORIZED;

/// Badge shown on a menu button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockBadge {
    None,
    LowStock,
    OutOfStock,
}

impl StockBadge {
    pub fn for_product(product: &Product) -> Self {
        if product.is_out_of_stock() {
            StockBadge::OutOfStock
        } else if product.is_low_stock() {
            StockBadge::LowStock
        } else {
            StockBadge::None
        }
    }
}

/// One menu button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogItem {
    pub product: Product,
    pub badge: StockBadge,
    pub out_of_stock: bool,
    pub low_stock: bool,
}

impl From<Product> for CatalogItem {
    fn from(product: Product) -> Self {
        let badge = StockBadge::for_product(&product);
        CatalogItem {
            out_of_stock: badge == StockBadge::OutOfStock,
            low_stock: badge == StockBadge::LowStock,
            badge,
            product,
        }
    }
}

/// One menu tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogGroup {
    pub category: String,
    pub items: Vec<CatalogItem>,
}

/// The whole menu.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Catalog {
    pub groups: Vec<CatalogGroup>,
    /// Tab selected when the menu opens: the first group unless the caller
    /// asked for another.
    pub active_category: Option<String>,
}

impl Catalog {
    /// Groups listings by category name, keeping the input order.
    ///
    /// Inactive products are skipped. Listings without a category go to the
    /// [`UNCATEGORIZED`] group.
    pub fn build(listings: impl IntoIterator<Item = ProductListing>) -> Self {
        let mut groups: Vec<CatalogGroup> = Vec::new();

        for listing in listings {
            if !listing.product.is_active {
                continue;
            }
            let category = listing
                .category_name
                .unwrap_or_else(|| UNCATEGORIZED.to_string());

            match groups.iter_mut().find(|g| g.category == category) {
                Some(group) => group.items.push(listing.product.into()),
                None => groups.push(CatalogGroup {
                    category,
                    items: vec![listing.product.into()],
                }),
            }
        }

        let active_category = groups.first().map(|g| g.category.clone());
        Catalog {
            groups,
            active_category,
        }
    }

    pub fn group(&self, category: &str) -> Option<&CatalogGroup> {
        self.groups.iter().find(|g| g.category == category)
    }

    pub fn product_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }
}
