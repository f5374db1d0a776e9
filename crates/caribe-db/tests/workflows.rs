//! End-to-end register workflows against an in-memory database.

use caribe_core::order::OrderBuilder;
use caribe_core::{
    CoreError, IngredientInput, Money, MovementType, ProductInput, Quantity, RecipeInput,
    RecipeItemInput,
};
use caribe_db::{Database, DbConfig, DbError};

async fn setup() -> (Database, String) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let category = db.categories().create("Platos").await.unwrap();
    (db, category.id)
}

fn product_input(name: &str, category_id: &str, price_cents: i64, stock: i64) -> ProductInput {
    ProductInput {
        name: name.to_string(),
        description: None,
        price_cents,
        category_id: category_id.to_string(),
        recipe_id: None,
        current_stock: stock,
        min_stock: 10,
    }
}

/// One ingredient, one recipe using `per_unit_milli` of it, optionally linked
/// to a product. Returns (recipe_id, ingredient_id, product_id).
async fn recipe_fixture(
    db: &Database,
    category_id: &str,
    stock_milli: i64,
    per_unit_milli: i64,
    linked: bool,
) -> (String, String, Option<String>) {
    let ingredient = db
        .ingredients()
        .create(&IngredientInput {
            name: "Plátano verde".to_string(),
            description: None,
            unit: Some("unit".to_string()),
            current_quantity_milli: stock_milli,
            min_quantity_milli: 0,
            cost_per_unit_cents: 45,
        })
        .await
        .unwrap();
    let recipe = db
        .recipes()
        .create(&RecipeInput {
            name: "Tostones".to_string(),
            description: None,
            price_cents: 550,
            items: vec![RecipeItemInput {
                ingredient_id: Some(ingredient.id.clone()),
                quantity_milli: per_unit_milli,
            }],
        })
        .await
        .unwrap();

    let product_id = if linked {
        let mut input = product_input("Tostones", category_id, 550, 0);
        input.recipe_id = Some(recipe.id.clone());
        Some(db.products().create(&input).await.unwrap().id)
    } else {
        None
    };

    (recipe.id, ingredient.id, product_id)
}

#[tokio::test]
async fn checkout_updates_session_stock_and_log() {
    let (db, category_id) = setup().await;
    let session = db.cash_sessions().open(Money::from_cents(2_000)).await.unwrap();
    assert_eq!(session.total_orders, 0);
    assert_eq!(session.total_sales_cents, 0);

    let a = db.products().create(&product_input("Malta", &category_id, 500, 20)).await.unwrap();
    let b = db.products().create(&product_input("Flan", &category_id, 300, 20)).await.unwrap();

    let mut order = OrderBuilder::new();
    order.add_product(&a).unwrap();
    order.add_product(&a).unwrap();
    order.add_product(&b).unwrap();
    assert_eq!(order.total(), Money::from_cents(1_300));

    let placed = db.orders().place_order(&session.id, order.lines()).await.unwrap();
    assert_eq!(placed.total_cents, 1_300);

    let session = db.cash_sessions().current().await.unwrap().unwrap();
    assert_eq!(session.total_orders, 1);
    assert_eq!(session.total_sales_cents, 1_300);
    assert_eq!(session.expected_balance(), Money::from_cents(3_300));

    let a = db.products().get_by_id(&a.id).await.unwrap().unwrap();
    assert_eq!(a.current_stock, 18);

    let logs = db.inventory_logs().recent(10).await.unwrap();
    assert_eq!(logs.len(), 2);
    assert!(logs.iter().all(|l| l.movement_type == MovementType::Sale));
    assert!(logs.iter().all(|l| l.order_id.as_deref() == Some(placed.id.as_str())));
    let sale_a = logs.iter().find(|l| l.product_id.as_deref() == Some(a.id.as_str())).unwrap();
    assert_eq!(sale_a.quantity_milli, 2_000);

    let history = db.orders().list_for_session(&session.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].items.len(), 2);
}

#[tokio::test]
async fn checkout_clamps_stock_at_zero() {
    let (db, category_id) = setup().await;
    let session = db.cash_sessions().open(Money::zero()).await.unwrap();
    let coco = db.products().create(&product_input("Coco", &category_id, 350, 3)).await.unwrap();

    let mut line = caribe_core::OrderLine::from_product(&coco);
    line.quantity = 5;
    db.orders().place_order(&session.id, &[line]).await.unwrap();

    let coco = db.products().get_by_id(&coco.id).await.unwrap().unwrap();
    assert_eq!(coco.current_stock, 0);
}

#[tokio::test]
async fn checkout_after_close_rolls_back() {
    let (db, category_id) = setup().await;
    let session = db.cash_sessions().open(Money::zero()).await.unwrap();
    let malta = db.products().create(&product_input("Malta", &category_id, 250, 10)).await.unwrap();

    let mut order = OrderBuilder::new();
    order.add_product(&malta).unwrap();

    db.cash_sessions().close(Money::zero()).await.unwrap();

    let err = db.orders().place_order(&session.id, order.lines()).await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(CoreError::SessionClosed)));

    let malta = db.products().get_by_id(&malta.id).await.unwrap().unwrap();
    assert_eq!(malta.current_stock, 10);
    assert!(db.orders().list_for_session(&session.id).await.unwrap().is_empty());
    assert_eq!(db.inventory_logs().count().await.unwrap(), 0);

    let closed = db.cash_sessions().get_by_id(&session.id).await.unwrap().unwrap();
    assert_eq!(closed.total_orders, 0);
}

#[tokio::test]
async fn out_of_stock_product_cannot_be_ordered() {
    let (db, category_id) = setup().await;
    let agua = db.products().create(&product_input("Agua", &category_id, 150, 0)).await.unwrap();

    let mut order = OrderBuilder::new();
    let err = order.add_product(&agua).unwrap_err();
    assert!(err.to_string().contains("stock unavailable"));
    assert!(order.is_empty());
}

#[tokio::test]
async fn preparation_shortage_writes_nothing() {
    let (db, category_id) = setup().await;
    let (recipe_id, ingredient_id, product_id) =
        recipe_fixture(&db, &category_id, 1_000, 2_000, true).await;

    let err = db.preparations().prepare(&recipe_id, 1).await.unwrap_err();
    match err {
        DbError::Domain(CoreError::InsufficientIngredient {
            ingredient,
            required,
            available,
            ..
        }) => {
            assert_eq!(ingredient, "Plátano verde");
            assert_eq!(required, Quantity::from_units(2));
            assert_eq!(available, Quantity::from_units(1));
        }
        other => panic!("expected shortage, got {other:?}"),
    }

    let ingredient = db.ingredients().get_by_id(&ingredient_id).await.unwrap().unwrap();
    assert_eq!(ingredient.current_quantity_milli, 1_000);
    let product = db.products().get_by_id(&product_id.unwrap()).await.unwrap().unwrap();
    assert_eq!(product.current_stock, 0);
    assert_eq!(db.inventory_logs().count().await.unwrap(), 0);
}

#[tokio::test]
async fn preparation_deducts_and_produces() {
    let (db, category_id) = setup().await;
    let (recipe_id, ingredient_id, product_id) =
        recipe_fixture(&db, &category_id, 5_000, 2_000, true).await;
    let product_id = product_id.unwrap();

    let outcome = db.preparations().prepare(&recipe_id, 2).await.unwrap();
    assert_eq!(outcome.multiplier, 2);
    assert_eq!(outcome.consumed.len(), 1);
    assert_eq!(outcome.consumed[0].consumed, Quantity::from_units(4));
    assert_eq!(outcome.consumed[0].remaining, Quantity::from_units(1));
    let produced = outcome.produced.unwrap();
    assert_eq!(produced.product_id, product_id);
    assert_eq!(produced.new_stock, 2);

    let ingredient = db.ingredients().get_by_id(&ingredient_id).await.unwrap().unwrap();
    assert_eq!(ingredient.current_quantity_milli, 1_000);
    let product = db.products().get_by_id(&product_id).await.unwrap().unwrap();
    assert_eq!(product.current_stock, 2);

    let logs = db.inventory_logs().for_recipe(&recipe_id, 10).await.unwrap();
    assert_eq!(logs.len(), 2);
    let used = logs.iter().find(|l| l.movement_type == MovementType::RecipeUsed).unwrap();
    assert_eq!(used.quantity_milli, 4_000);
    assert_eq!(used.notes.as_deref(), Some("Prepared order (2 unit(s))"));
    let made = logs.iter().find(|l| l.movement_type == MovementType::RecipeProduced).unwrap();
    assert_eq!(made.quantity_milli, 2_000);
    assert_eq!(made.product_id.as_deref(), Some(product_id.as_str()));
}

#[tokio::test]
async fn prepared_product_sells_with_zero_stock() {
    let (db, category_id) = setup().await;
    let (_, _, product_id) = recipe_fixture(&db, &category_id, 5_000, 2_000, true).await;
    let tostones = db.products().get_by_id(&product_id.unwrap()).await.unwrap().unwrap();
    assert_eq!(tostones.current_stock, 0);

    let mut order = OrderBuilder::new();
    order.add_product(&tostones).unwrap();
    order.add_product(&tostones).unwrap();
    assert_eq!(order.total_quantity(), 2);
}

#[tokio::test]
async fn session_lifecycle() {
    let (db, _) = setup().await;
    db.cash_sessions().open(Money::from_cents(10_000)).await.unwrap();

    let second = db.cash_sessions().open(Money::zero()).await.unwrap_err();
    assert!(matches!(second.as_domain(), Some(CoreError::SessionAlreadyOpen)));

    let closed = db.cash_sessions().close(Money::from_cents(10_250)).await.unwrap();
    assert_eq!(closed.closing_balance_cents, Some(10_250));
    assert!(closed.closed_at.is_some());
    assert_eq!(closed.difference(), Some(Money::from_cents(250)));
    assert!(db.cash_sessions().current().await.unwrap().is_none());

    let again = db.cash_sessions().close(Money::zero()).await.unwrap_err();
    assert!(matches!(again.as_domain(), Some(CoreError::NoOpenSession)));
}
