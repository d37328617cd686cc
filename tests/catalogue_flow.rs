mod common;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use storefront_api::{
    dto::{
        products::{CreateProductRequest, UpdateProductRequest},
        reviews::AddReviewRequest,
    },
    error::AppError,
    models::{OrderStatus, Role},
    routes::params::ProductQuery,
    services::{
        admin_service, cart_service, order_service, product_service, review_service,
        wishlist_service,
    },
    session::Session,
    validation::ShippingForm,
};

use common::{add_product, memory_state, session_for};

fn new_product(title: &str) -> CreateProductRequest {
    CreateProductRequest {
        title: title.into(),
        description: Some("Hand thrown in Hermanus".into()),
        category: Some("home".into()),
        image_url: None,
        price: dec!(320.00),
        stock: 4,
    }
}

#[tokio::test]
async fn sellers_manage_only_their_own_products() -> anyhow::Result<()> {
    let state = memory_state();
    let owner = session_for(&state, Role::Seller).await;
    let other = session_for(&state, Role::Seller).await;
    let buyer = session_for(&state, Role::Buyer).await;

    let product = product_service::create_product(&state, &owner, new_product("Clay Bowl")).await?;
    assert_eq!(product.seller_id, owner.user().unwrap().user_id);

    let err = product_service::create_product(&state, &buyer, new_product("Fake Bowl"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let err = product_service::update_product(
        &state,
        &other,
        product.id,
        UpdateProductRequest {
            stock: Some(0),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let err = product_service::update_product(
        &state,
        &owner,
        product.id,
        UpdateProductRequest {
            price: Some(dec!(-1)),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::ValidationFailed(_)));

    assert_eq!(product_service::list_seller_products(&state, &owner).await?.len(), 1);
    assert!(product_service::list_seller_products(&state, &other).await?.is_empty());

    product_service::delete_product(&state, &owner, product.id).await?;
    let err = product_service::get_product(&state, product.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn catalogue_listing_paginates_filtered_results() -> anyhow::Result<()> {
    let state = memory_state();
    let seller = session_for(&state, Role::Seller).await;
    for title in ["Clay Bowl", "Clay Jug", "Clay Plate"] {
        product_service::create_product(&state, &seller, new_product(title)).await?;
    }
    add_product(&state, seller.user().unwrap().user_id, "Biltong", dec!(189.90), 3).await;

    let query = ProductQuery {
        q: Some("clay".into()),
        per_page: Some(2),
        ..Default::default()
    };
    let (page, total) = product_service::list_products(&state, &query).await?;
    assert_eq!(total, 3);
    assert_eq!(page.len(), 2);

    let categories = product_service::list_categories(&state).await?;
    assert_eq!(categories, ["groceries", "home"]);
    Ok(())
}

#[tokio::test]
async fn page_far_past_the_end_is_empty() -> anyhow::Result<()> {
    let state = memory_state();
    let seller = session_for(&state, Role::Seller).await;
    product_service::create_product(&state, &seller, new_product("Clay Bowl")).await?;

    let query = ProductQuery {
        page: Some(i64::MAX),
        per_page: Some(100),
        ..Default::default()
    };
    let (page, total) = product_service::list_products(&state, &query).await?;
    assert!(page.is_empty());
    assert_eq!(total, 1);
    Ok(())
}

#[tokio::test]
async fn product_prices_must_fit_two_decimal_places() -> anyhow::Result<()> {
    let state = memory_state();
    let seller = session_for(&state, Role::Seller).await;

    for price in [Decimal::MAX, dec!(10000000000.00), dec!(10.001)] {
        let err = product_service::create_product(
            &state,
            &seller,
            CreateProductRequest {
                price,
                ..new_product("Clay Bowl")
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::ValidationFailed(_)), "{price} accepted");
    }

    let product = product_service::create_product(&state, &seller, new_product("Clay Bowl")).await?;
    let err = product_service::update_product(
        &state,
        &seller,
        product.id,
        UpdateProductRequest {
            price: Some(Decimal::MAX),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::ValidationFailed(_)));
    Ok(())
}

#[tokio::test]
async fn reviews_are_summarized_and_deduplicated() -> anyhow::Result<()> {
    let state = memory_state();
    let seller = session_for(&state, Role::Seller).await;
    let first = session_for(&state, Role::Buyer).await;
    let second = session_for(&state, Role::Buyer).await;
    let product = product_service::create_product(&state, &seller, new_product("Clay Bowl")).await?;

    let review = |rating| AddReviewRequest {
        rating,
        comment: Some("  Lovely glaze ".into()),
    };
    let saved = review_service::add_review(&state, &first, product.id, review(5)).await?;
    assert_eq!(saved.comment.as_deref(), Some("Lovely glaze"));
    review_service::add_review(&state, &second, product.id, review(4)).await?;

    let err = review_service::add_review(&state, &first, product.id, review(3))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationFailed(_)));

    let err = review_service::add_review(&state, &seller, product.id, review(5))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let err = review_service::add_review(&state, &second, product.id, review(6))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationFailed(_)));

    let detail = product_service::get_product(&state, product.id).await?;
    assert_eq!(detail.reviews.count, 2);
    assert_eq!(detail.reviews.average_rating, Some(dec!(4.5)));
    Ok(())
}

#[tokio::test]
async fn wishlist_toggle_flips_membership() -> anyhow::Result<()> {
    let state = memory_state();
    let buyer = session_for(&state, Role::Buyer).await;
    let product = add_product(&state, uuid::Uuid::new_v4(), "Rooibos Tea", dec!(45.00), 10).await;

    assert!(wishlist_service::toggle(&state, &buyer, product.id).await?);
    let items = wishlist_service::list_wishlist(&state, &buyer).await?;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, product.id);

    assert!(!wishlist_service::toggle(&state, &buyer, product.id).await?);
    assert!(wishlist_service::list_wishlist(&state, &buyer).await?.is_empty());

    let err = wishlist_service::list_wishlist(&state, &Session::anonymous())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthenticated));
    Ok(())
}

#[tokio::test]
async fn admin_moves_orders_through_statuses() -> anyhow::Result<()> {
    let state = memory_state();
    let admin = session_for(&state, Role::Admin).await;
    let buyer = session_for(&state, Role::Buyer).await;
    let seller = session_for(&state, Role::Seller).await;
    let product = add_product(&state, seller.user().unwrap().user_id, "Biltong", dec!(189.90), 5).await;

    cart_service::add_to_cart(&state, &buyer, product.id, 1).await?;
    let placed = order_service::place_order(
        &state,
        &buyer,
        ShippingForm {
            full_name: "Pieter Botha".into(),
            street: "7 Church Street".into(),
            city: "Stellenbosch".into(),
            province: "Western Cape".into(),
            postal_code: "7600".into(),
            phone: "+27215550123".into(),
        },
    )
    .await?;

    let shipped =
        admin_service::update_order_status(&state, &admin, placed.order.id, OrderStatus::Shipped).await?;
    assert_eq!(shipped.status, OrderStatus::Shipped);

    let pending = admin_service::list_all_orders(&state, &admin, Some(OrderStatus::Pending)).await?;
    assert!(pending.is_empty());
    let all = admin_service::list_all_orders(&state, &admin, None).await?;
    assert_eq!(all.len(), 1);

    let sales = product_service::list_seller_sales(&state, &seller).await?;
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].price, dec!(189.90));

    let err = admin_service::remove_product(&state, &admin, product.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::RemoteWriteFailed(_)));

    let err = admin_service::list_profiles(&state, &buyer).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    assert_eq!(admin_service::list_profiles(&state, &admin).await?.len(), 3);
    Ok(())
}
