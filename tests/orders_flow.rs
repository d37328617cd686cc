mod common;

use std::sync::Arc;

use rust_decimal_macros::dec;
use sea_orm::{ConnectionTrait, Statement};
use storefront_api::{
    db::{create_orm_conn, run_migrations},
    dto::products::CreateProductRequest,
    models::{OrderStatus, Role},
    services::{admin_service, cart_service, order_service, product_service},
    state::AppState,
    store::OrmStore,
    validation::ShippingForm,
};

use common::{session_for, state_with};

// Full checkout against Postgres: seller lists, buyer checks out, admin ships.
#[tokio::test]
async fn checkout_and_admin_status_flow_on_postgres() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run the Postgres flow test."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;
    let seller = session_for(&state, Role::Seller).await;
    let buyer = session_for(&state, Role::Buyer).await;
    let admin = session_for(&state, Role::Admin).await;

    let product = product_service::create_product(
        &state,
        &seller,
        CreateProductRequest {
            title: "Test Potjie".into(),
            description: Some("A product for testing".into()),
            category: Some("home".into()),
            image_url: None,
            price: dec!(250.00),
            stock: 10,
        },
    )
    .await?;

    cart_service::add_to_cart(&state, &buyer, product.id, 1).await?;
    let cart = cart_service::add_to_cart(&state, &buyer, product.id, 1).await?;
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.lines()[0].quantity, 2);

    let placed = order_service::place_order(
        &state,
        &buyer,
        ShippingForm {
            full_name: "Test Buyer".into(),
            street: "1 Main Road".into(),
            city: "Durban".into(),
            province: "KwaZulu-Natal".into(),
            postal_code: "4001".into(),
            phone: "0315550100".into(),
        },
    )
    .await?;
    // 500.00 is not strictly above the free-shipping threshold.
    assert_eq!(placed.order.total_amount, dec!(674.00));
    assert!(cart_service::load_cart(&state, &buyer).await?.is_empty());

    let stored = order_service::get_order(&state, &buyer, placed.order.id).await?;
    assert_eq!(stored.items.len(), 1);
    assert_eq!(stored.items[0].price, dec!(250.00));

    let updated =
        admin_service::update_order_status(&state, &admin, placed.order.id, OrderStatus::Shipped).await?;
    assert_eq!(updated.status, OrderStatus::Shipped);

    let sales = product_service::list_seller_sales(&state, &seller).await?;
    assert_eq!(sales.len(), 1);

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let conn = create_orm_conn(database_url).await?;
    run_migrations(&conn).await?;

    let backend = conn.get_database_backend();
    conn.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE order_items, orders, cart, wishlist, reviews, products, profiles RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(state_with(Arc::new(OrmStore::new(conn))))
}
