//! Command dispatch and the line protocol, end to end.

use serde_json::{json, Value};

use caribe_db::{Database, DbConfig};
use caribe_register::commands::dispatch;
use caribe_register::error::ErrorCode;
use caribe_register::server::serve;
use caribe_register::state::{AppConfig, AppState};

async fn state() -> AppState {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    AppState::new(db, AppConfig::with_db_path(":memory:"))
}

/// Creates a category and a stocked product, returning the product id.
async fn stocked_product(state: &AppState, name: &str, price_cents: i64, stock: i64) -> String {
    let category = dispatch(state, "create_category", json!({ "name": "Bebidas" }))
        .await
        .unwrap();
    let product = dispatch(
        state,
        "create_product",
        json!({
            "name": name,
            "price_cents": price_cents,
            "category_id": category["id"],
            "current_stock": stock,
        }),
    )
    .await
    .unwrap();
    product["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn add_to_order_requires_open_session() {
    let state = state().await;
    let product_id = stocked_product(&state, "Malta", 250, 10).await;

    let err = dispatch(&state, "add_to_order", json!({ "productId": product_id }))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::SessionClosed);
    let order = dispatch(&state, "get_order", Value::Null).await.unwrap();
    assert_eq!(order["item_count"], 0);
}

#[tokio::test]
async fn checkout_returns_receipt_and_clears_order() {
    let state = state().await;
    let product_id = stocked_product(&state, "Malta", 250, 10).await;

    dispatch(&state, "open_cash", json!({ "openingBalanceCents": 5000 }))
        .await
        .unwrap();
    dispatch(&state, "add_to_order", json!({ "productId": product_id }))
        .await
        .unwrap();
    let order = dispatch(
        &state,
        "update_order_item",
        json!({ "productId": product_id, "quantity": 3 }),
    )
    .await
    .unwrap();
    assert_eq!(order["total_cents"], 750);

    let result = dispatch(&state, "checkout", Value::Null).await.unwrap();

    assert_eq!(result["order"]["total_cents"], 750);
    let copies = result["receipt"]["copies"].as_array().unwrap();
    assert_eq!(copies.len(), 2);
    assert_eq!(copies[0]["business_name"], "Parada Caribe");
    assert_eq!(copies[0]["total_cents"], 750);

    let order = dispatch(&state, "get_order", Value::Null).await.unwrap();
    assert_eq!(order["item_count"], 0);

    let status = dispatch(&state, "get_cash_status", Value::Null).await.unwrap();
    assert_eq!(status["is_open"], true);
    assert_eq!(status["session"]["total_orders"], 1);
    assert_eq!(status["expected_balance_cents"], 5750);

    let products = dispatch(&state, "list_products", json!({ "query": "malta" }))
        .await
        .unwrap();
    assert_eq!(products[0]["current_stock"], 7);
}

#[tokio::test]
async fn checkout_of_empty_order_is_rejected() {
    let state = state().await;
    dispatch(&state, "open_cash", json!({ "openingBalanceCents": 0 }))
        .await
        .unwrap();

    let err = dispatch(&state, "checkout", Value::Null).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderError);
}

#[tokio::test]
async fn close_cash_reports_difference() {
    let state = state().await;
    dispatch(&state, "open_cash", json!({ "openingBalanceCents": 2000 }))
        .await
        .unwrap();

    let report = dispatch(&state, "close_cash", json!({ "closingBalanceCents": 1900 }))
        .await
        .unwrap();
    assert_eq!(report["expected_balance_cents"], 2000);
    assert_eq!(report["difference_cents"], -100);

    let err = dispatch(&state, "get_session_summary", Value::Null)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NoOpenSession);
}

#[tokio::test]
async fn unknown_command_and_bad_args() {
    let state = state().await;

    let err = dispatch(&state, "void_sale", Value::Null).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::UnknownCommand);

    let err = dispatch(&state, "open_cash", json!({ "opening": "lots" }))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn get_config_exposes_business_name() {
    let state = state().await;
    let config = dispatch(&state, "get_config", Value::Null).await.unwrap();
    assert_eq!(config["businessName"], "Parada Caribe");
    assert_eq!(config["currencySymbol"], "$");
}

#[tokio::test]
async fn serve_answers_each_line() {
    let state = state().await;
    let input = concat!(
        "{\"id\":1,\"command\":\"get_cash_status\"}\n",
        "\n",
        "not json\n",
        "{\"id\":\"b\",\"command\":\"get_session_summary\"}\n",
    );
    let mut output = Vec::new();

    serve(&state, input.as_bytes(), &mut output).await.unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(responses.len(), 3);

    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["ok"], true);
    assert_eq!(responses[0]["data"]["is_open"], false);

    assert_eq!(responses[1]["id"], Value::Null);
    assert_eq!(responses[1]["ok"], false);
    assert_eq!(responses[1]["error"]["code"], "INVALID_REQUEST");

    assert_eq!(responses[2]["id"], "b");
    assert_eq!(responses[2]["error"]["code"], "NO_OPEN_SESSION");
    assert!(responses[2].get("data").is_none());
}

#[tokio::test]
async fn raising_quantity_of_deleted_product_is_not_found() {
    let state = state().await;
    let product_id = stocked_product(&state, "Morir soñando", 300, 10).await;

    dispatch(&state, "open_cash", json!({ "openingBalanceCents": 0 }))
        .await
        .unwrap();
    dispatch(&state, "add_to_order", json!({ "productId": product_id }))
        .await
        .unwrap();
    dispatch(&state, "delete_product", json!({ "id": product_id }))
        .await
        .unwrap();

    let err = dispatch(
        &state,
        "update_order_item",
        json!({ "productId": product_id, "quantity": 2 }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    let order = dispatch(&state, "get_order", Value::Null).await.unwrap();
    assert_eq!(order["items"][0]["quantity"], 1);

    // Removing the stale line still works
    let order = dispatch(
        &state,
        "update_order_item",
        json!({ "productId": product_id, "quantity": 0 }),
    )
    .await
    .unwrap();
    assert_eq!(order["item_count"], 0);
}

#[tokio::test]
async fn price_above_ceiling_is_rejected() {
    let state = state().await;
    let category = dispatch(&state, "create_category", json!({ "name": "Platos" }))
        .await
        .unwrap();

    let err = dispatch(
        &state,
        "create_product",
        json!({
            "name": "Langosta",
            "price_cents": 4_611_686_018_427_387_904_i64,
            "category_id": category["id"],
            "current_stock": 10,
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

#[tokio::test]
async fn cash_status_previews_counted_difference() {
    let state = state().await;
    dispatch(&state, "open_cash", json!({ "openingBalanceCents": 3000 }))
        .await
        .unwrap();

    let status = dispatch(&state, "get_cash_status", json!({ "countedBalanceCents": 2950 }))
        .await
        .unwrap();
    assert_eq!(status["expected_balance_cents"], 3000);
    assert_eq!(status["counted_difference_cents"], -50);
    assert_eq!(status["is_open"], true);

    let status = dispatch(&state, "get_cash_status", Value::Null).await.unwrap();
    assert_eq!(status["counted_difference_cents"], Value::Null);

    let err = dispatch(&state, "get_cash_status", json!({ "countedBalanceCents": -1 }))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

#[tokio::test]
async fn catalog_reopens_on_requested_tab() {
    let state = state().await;
    stocked_product(&state, "Malta", 250, 10).await;
    let platos = dispatch(&state, "create_category", json!({ "name": "Platos" }))
        .await
        .unwrap();
    dispatch(
        &state,
        "create_product",
        json!({
            "name": "Mofongo",
            "price_cents": 900,
            "category_id": platos["id"],
            "current_stock": 5,
        }),
    )
    .await
    .unwrap();

    let catalog = dispatch(&state, "get_catalog", json!({ "category": "Platos" }))
        .await
        .unwrap();
    assert_eq!(catalog["active_category"], "Platos");

    let catalog = dispatch(&state, "get_catalog", json!({ "category": "Postres" }))
        .await
        .unwrap();
    assert_eq!(catalog["active_category"], catalog["groups"][0]["category"]);
}

#[tokio::test]
async fn adjust_ingredient_accepts_decimal_quantities() {
    let state = state().await;
    let ingredient = dispatch(
        &state,
        "create_ingredient",
        json!({ "name": "Arroz", "current_quantity_milli": 1000 }),
    )
    .await
    .unwrap();

    let adjusted = dispatch(
        &state,
        "adjust_ingredient",
        json!({ "id": ingredient["id"], "currentQuantity": "2.5", "minQuantityMilli": 500 }),
    )
    .await
    .unwrap();
    assert_eq!(adjusted["current_quantity_milli"], 2500);
    assert_eq!(adjusted["min_quantity_milli"], 500);

    let err = dispatch(
        &state,
        "adjust_ingredient",
        json!({ "id": ingredient["id"], "currentQuantity": "2.5555", "minQuantity": "1" }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let err = dispatch(
        &state,
        "adjust_ingredient",
        json!({ "id": ingredient["id"], "currentQuantity": "3" }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}
