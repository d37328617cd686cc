use std::collections::BTreeSet;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    access::{self, Area},
    dto::products::{CreateProductRequest, ProductDetail, UpdateProductRequest},
    error::{AppError, AppResult},
    models::{OrderItem, Product, ProductFields},
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
    services::review_service,
    session::Session,
    state::AppState,
};

/// Applies the catalogue filters and ordering to an already loaded list.
pub fn filter_products(products: Vec<Product>, query: &ProductQuery) -> Vec<Product> {
    let search = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);
    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let mut items: Vec<Product> = products
        .into_iter()
        .filter(|p| match &search {
            Some(needle) => {
                p.title.to_lowercase().contains(needle)
                    || p
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(needle))
            }
            None => true,
        })
        .filter(|p| match category {
            Some(c) => p.category.as_deref().is_some_and(|pc| pc.eq_ignore_ascii_case(c)),
            None => true,
        })
        .filter(|p| query.min_price.is_none_or(|min| p.price >= min))
        .filter(|p| query.max_price.is_none_or(|max| p.price <= max))
        .filter(|p| !query.in_stock.unwrap_or(false) || p.in_stock())
        .collect();

    let sort_by = query.sort_by.unwrap_or(ProductSortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(match sort_by {
        ProductSortBy::CreatedAt => SortOrder::Desc,
        _ => SortOrder::Asc,
    });
    items.sort_by(|a, b| {
        let ord = match sort_by {
            ProductSortBy::CreatedAt => a.created_at.cmp(&b.created_at),
            ProductSortBy::Price => a.price.cmp(&b.price),
            ProductSortBy::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        };
        match sort_order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
    items
}

/// Returns one page of the filtered catalogue and the filtered total.
pub async fn list_products(state: &AppState, query: &ProductQuery) -> AppResult<(Vec<Product>, i64)> {
    let (_, limit, offset) = query.pagination().normalize();
    let filtered = filter_products(state.store.list_products().await?, query);
    let total = i64::try_from(filtered.len()).unwrap_or(i64::MAX);
    let page = filtered
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .collect();
    Ok((page, total))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ProductDetail> {
    let product = state.store.find_product(id).await?.ok_or(AppError::NotFound)?;
    let reviews = state.store.list_reviews(id).await?;
    Ok(ProductDetail {
        product,
        reviews: review_service::summarize(&reviews),
    })
}

pub async fn list_categories(state: &AppState) -> AppResult<Vec<String>> {
    let categories: BTreeSet<String> = state
        .store
        .list_products()
        .await?
        .into_iter()
        .filter_map(|p| p.category)
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    Ok(categories.into_iter().collect())
}

pub async fn create_product(
    state: &AppState,
    session: &Session,
    payload: CreateProductRequest,
) -> AppResult<Product> {
    let user = access::require(session, Area::SellerDashboard)?;
    let product = Product::new(
        Uuid::new_v4(),
        payload.title.trim().to_string(),
        payload.description,
        payload.category,
        payload.image_url,
        payload.price,
        payload.stock,
        user.user_id,
        Utc::now(),
    )?;
    let product = state.store.insert_product(product).await?;

    tracing::info!(product_id = %product.id, seller_id = %user.user_id, "product created");
    Ok(product)
}

async fn owned_product(state: &AppState, seller_id: Uuid, id: Uuid) -> AppResult<Product> {
    let product = state.store.find_product(id).await?.ok_or(AppError::NotFound)?;
    if product.seller_id != seller_id {
        return Err(AppError::Forbidden);
    }
    Ok(product)
}

pub async fn update_product(
    state: &AppState,
    session: &Session,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<Product> {
    let user = access::require(session, Area::SellerDashboard)?;
    let existing = owned_product(state, user.user_id, id).await?;

    let fields = ProductFields {
        title: payload.title.map(|t| t.trim().to_string()).unwrap_or(existing.title.clone()),
        description: payload.description.or(existing.description.clone()),
        category: payload.category.or(existing.category.clone()),
        image_url: payload.image_url.or(existing.image_url.clone()),
        price: payload.price.unwrap_or(existing.price),
        stock: payload.stock.unwrap_or(existing.stock),
    };
    fields.check()?;

    let product = Product {
        title: fields.title,
        description: fields.description,
        category: fields.category,
        image_url: fields.image_url,
        price: fields.price,
        stock: fields.stock,
        ..existing
    };
    let product = state
        .store
        .update_product(product)
        .await?
        .ok_or(AppError::NotFound)?;

    tracing::info!(product_id = %product.id, "product updated");
    Ok(product)
}

pub async fn delete_product(state: &AppState, session: &Session, id: Uuid) -> AppResult<()> {
    let user = access::require(session, Area::SellerDashboard)?;
    owned_product(state, user.user_id, id).await?;
    remove(state, id).await?;
    tracing::info!(product_id = %id, seller_id = %user.user_id, "product deleted");
    Ok(())
}

/// Shared by seller deletion and admin moderation.
pub(crate) async fn remove(state: &AppState, id: Uuid) -> AppResult<()> {
    if !state.store.delete_product(id).await? {
        return Err(AppError::NotFound);
    }
    Ok(())
}

pub async fn list_seller_products(state: &AppState, session: &Session) -> AppResult<Vec<Product>> {
    let user = access::require(session, Area::SellerDashboard)?;
    Ok(state
        .store
        .list_products()
        .await?
        .into_iter()
        .filter(|p| p.seller_id == user.user_id)
        .collect())
}

/// Order lines that sold one of the caller's products.
pub async fn list_seller_sales(state: &AppState, session: &Session) -> AppResult<Vec<OrderItem>> {
    let user = access::require(session, Area::SellerDashboard)?;
    state.store.list_order_items_for_seller(user.user_id).await
}
