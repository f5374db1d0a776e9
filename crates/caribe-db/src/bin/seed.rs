//! # Seed Data Generator
//!
//! Populates a development database with a small Caribbean menu.
//!
//! ## Usage
//! ```bash
//! # Seed ./caribe_dev.db (default)
//! cargo run -p caribe-db --bin seed
//!
//! # Specify database path
//! cargo run -p caribe-db --bin seed -- --db ./data/caribe.db
//! ```
//!
//! ## Generated Data
//! - Categories: Platos, Frituras, Bebidas, Postres
//! - Ingredients with stock, minimums and unit cost
//! - Recipes built from those ingredients
//! - Products: prepared dishes linked to a recipe, plus stocked drinks and
//!   desserts that are sold straight from stock

use std::collections::HashMap;
use std::env;

use caribe_core::{IngredientInput, ProductInput, RecipeInput, RecipeItemInput};
use caribe_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

const CATEGORIES: &[&str] = &["Platos", "Frituras", "Bebidas", "Postres"];

/// (name, unit, current milli, min milli, cost per unit in cents)
const INGREDIENTS: &[(&str, &str, i64, i64, i64)] = &[
    ("Arroz", "kg", 25_000, 5_000, 180),
    ("Habichuelas", "kg", 10_000, 2_000, 320),
    ("Pollo", "kg", 15_000, 4_000, 650),
    ("Cerdo", "kg", 8_000, 3_000, 780),
    ("Plátano verde", "unit", 60_000, 20_000, 45),
    ("Yuca", "kg", 12_000, 3_000, 150),
    ("Aceite", "l", 10_000, 2_000, 400),
    ("Sofrito", "kg", 3_000, 1_000, 900),
];

/// (recipe, price cents, category, [(ingredient, milli per unit)])
const RECIPES: &[(&str, i64, &str, &[(&str, i64)])] = &[
    (
        "Arroz con pollo",
        1_250,
        "Platos",
        &[("Arroz", 250), ("Pollo", 300), ("Sofrito", 40), ("Aceite", 20)],
    ),
    (
        "Pernil con habichuelas",
        1_450,
        "Platos",
        &[("Cerdo", 350), ("Habichuelas", 150), ("Arroz", 200), ("Sofrito", 30)],
    ),
    (
        "Tostones",
        550,
        "Frituras",
        &[("Plátano verde", 2_000), ("Aceite", 50)],
    ),
    ("Yuca frita", 500, "Frituras", &[("Yuca", 300), ("Aceite", 50)]),
];

/// (name, price cents, category, stock)
const STOCKED: &[(&str, i64, &str, i64)] = &[
    ("Malta", 250, "Bebidas", 48),
    ("Jugo de parcha", 300, "Bebidas", 24),
    ("Coco frío", 350, "Bebidas", 6),
    ("Agua", 150, "Bebidas", 0),
    ("Flan de queso", 400, "Postres", 12),
    ("Tembleque", 375, "Postres", 8),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./caribe_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Parada Caribe Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./caribe_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Parada Caribe Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut categories = HashMap::new();
    for name in CATEGORIES {
        let category = db.categories().create(name).await?;
        categories.insert(*name, category.id);
    }
    println!("✓ {} categories", categories.len());

    let mut ingredients = HashMap::new();
    for (name, unit, current, min, cost) in INGREDIENTS {
        let ingredient = db
            .ingredients()
            .create(&IngredientInput {
                name: name.to_string(),
                description: None,
                unit: Some(unit.to_string()),
                current_quantity_milli: *current,
                min_quantity_milli: *min,
                cost_per_unit_cents: *cost,
            })
            .await?;
        ingredients.insert(*name, ingredient.id);
    }
    println!("✓ {} ingredients", ingredients.len());

    let mut products = 0;
    for (name, price_cents, category, lines) in RECIPES {
        let items = lines
            .iter()
            .map(|(ingredient, milli)| RecipeItemInput {
                ingredient_id: ingredients.get(ingredient).cloned(),
                quantity_milli: *milli,
            })
            .collect();
        let recipe = db
            .recipes()
            .create(&RecipeInput {
                name: name.to_string(),
                description: None,
                price_cents: *price_cents,
                items,
            })
            .await?;

        db.products()
            .create(&ProductInput {
                name: name.to_string(),
                description: None,
                price_cents: *price_cents,
                category_id: categories[category].clone(),
                recipe_id: Some(recipe.id),
                current_stock: 0,
                min_stock: 5,
            })
            .await?;
        products += 1;
    }
    println!("✓ {} recipes", RECIPES.len());

    for (name, price_cents, category, stock) in STOCKED {
        db.products()
            .create(&ProductInput {
                name: name.to_string(),
                description: None,
                price_cents: *price_cents,
                category_id: categories[category].clone(),
                recipe_id: None,
                current_stock: *stock,
                min_stock: 10,
            })
            .await?;
        products += 1;
    }
    println!("✓ {} products", products);

    let low = db.ingredients().low_stock().await?;
    println!();
    println!("Low stock ingredients: {}", low.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
