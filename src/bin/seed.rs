use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use storefront_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    models::{Product, Role},
    services::identity_service::{self, SessionTokens},
    state::AppState,
    store::OrmStore,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let conn = create_orm_conn(config.database_url()?).await?;
    run_migrations(&conn).await?;
    let state = AppState::new(
        Arc::new(OrmStore::new(conn)),
        SessionTokens::new(&config.jwt_secret, config.session_ttl_hours),
    );

    let admin_id = ensure_account(&state, "admin@example.com", "admin12345", "Site Admin", Role::Admin).await?;
    let seller_id = ensure_account(&state, "seller@example.com", "seller12345", "Thandi Mokoena", Role::Seller).await?;
    let buyer_id = ensure_account(&state, "buyer@example.com", "buyer12345", "Pieter Botha", Role::Buyer).await?;
    seed_products(&state, seller_id).await?;

    println!("Seed completed. Admin ID: {admin_id}, Seller ID: {seller_id}, Buyer ID: {buyer_id}");
    Ok(())
}

async fn ensure_account(
    state: &AppState,
    email: &str,
    password: &str,
    full_name: &str,
    role: Role,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = state.store.find_account_by_email(email).await? {
        println!("Account {email} already exists");
        return Ok(existing.profile.id);
    }

    let profile = identity_service::create_account(state, email, password, full_name, role).await?;
    println!("Created {email} (role={role})");
    Ok(profile.id)
}

async fn seed_products(state: &AppState, seller_id: Uuid) -> anyhow::Result<()> {
    let products: [(&str, &str, &str, Decimal, i32); 5] = [
        ("Rooibos Tea 80 bags", "Cederberg red bush tea", "groceries", dec!(45.00), 120),
        ("Beaded Necklace", "Handmade Ndebele beadwork", "fashion", dec!(350.00), 12),
        ("Springbok Jersey", "Official supporters jersey", "sport", dec!(1299.00), 30),
        ("Biltong 500g", "Karoo beef biltong", "groceries", dec!(189.90), 40),
        ("Enamel Potjie No. 3", "Cast iron three-legged pot", "home", dec!(749.00), 8),
    ];

    let existing = state.store.list_products().await?;
    for (title, description, category, price, stock) in products {
        if existing.iter().any(|p| p.title == title) {
            continue;
        }
        let product = Product::new(
            Uuid::new_v4(),
            title.to_string(),
            Some(description.to_string()),
            Some(category.to_string()),
            None,
            price,
            stock,
            seller_id,
            Utc::now(),
        )?;
        state.store.insert_product(product).await?;
    }

    println!("Seeded products");
    Ok(())
}
