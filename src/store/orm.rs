use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use sea_orm::JoinType;
use uuid::Uuid;

use super::{CartRow, StorefrontStore};
use crate::{
    entity::{
        cart::{self, ActiveModel as CartActive, Column as CartCol, Entity as CartEntity},
        order_items::{self, ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{self, ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        products::{self, ActiveModel as ProductActive, Column as ProdCol, Entity as Products},
        profiles::{self, ActiveModel as ProfileActive, Column as ProfileCol, Entity as Profiles},
        reviews::{self, ActiveModel as ReviewActive, Column as ReviewCol, Entity as Reviews},
        wishlist::{ActiveModel as WishlistActive, Column as WishlistCol, Entity as Wishlist},
    },
    error::{AppError, AppResult},
    models::{Account, CartLine, Order, OrderItem, OrderStatus, Product, Profile, Review, Role},
};

/// Postgres-backed store.
#[derive(Clone)]
pub struct OrmStore {
    conn: DatabaseConnection,
}

impl OrmStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl StorefrontStore for OrmStore {
    async fn insert_account(&self, profile: Profile, password_hash: String) -> AppResult<Profile> {
        let model = ProfileActive {
            id: Set(profile.id),
            email: Set(profile.email),
            full_name: Set(profile.full_name),
            password_hash: Set(password_hash),
            role: Set(profile.role.to_string()),
            created_at: Set(profile.created_at.into()),
        }
        .insert(&self.conn)
        .await
        .map_err(AppError::write_failed)?;
        Ok(account_from_entity(model)?.profile)
    }

    async fn find_account_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        Profiles::find()
            .filter(ProfileCol::Email.eq(email))
            .one(&self.conn)
            .await?
            .map(account_from_entity)
            .transpose()
    }

    async fn find_profile(&self, id: Uuid) -> AppResult<Option<Profile>> {
        let account = Profiles::find_by_id(id)
            .one(&self.conn)
            .await?
            .map(account_from_entity)
            .transpose()?;
        Ok(account.map(|a| a.profile))
    }

    async fn list_profiles(&self) -> AppResult<Vec<Profile>> {
        Profiles::find()
            .order_by_asc(ProfileCol::CreatedAt)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|model| account_from_entity(model).map(|a| a.profile))
            .collect()
    }

    async fn list_products(&self) -> AppResult<Vec<Product>> {
        Products::find()
            .order_by_desc(ProdCol::CreatedAt)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect()
    }

    async fn find_product(&self, id: Uuid) -> AppResult<Option<Product>> {
        Products::find_by_id(id)
            .one(&self.conn)
            .await?
            .map(product_from_entity)
            .transpose()
    }

    async fn insert_product(&self, product: Product) -> AppResult<Product> {
        let model = ProductActive {
            id: Set(product.id),
            title: Set(product.title),
            description: Set(product.description),
            category: Set(product.category),
            image_url: Set(product.image_url),
            price: Set(product.price),
            stock: Set(product.stock),
            seller_id: Set(product.seller_id),
            created_at: Set(product.created_at.into()),
        }
        .insert(&self.conn)
        .await
        .map_err(AppError::write_failed)?;
        product_from_entity(model)
    }

    async fn update_product(&self, product: Product) -> AppResult<Option<Product>> {
        let existing = match Products::find_by_id(product.id).one(&self.conn).await? {
            Some(p) => p,
            None => return Ok(None),
        };

        let mut active: ProductActive = existing.into();
        active.title = Set(product.title);
        active.description = Set(product.description);
        active.category = Set(product.category);
        active.image_url = Set(product.image_url);
        active.price = Set(product.price);
        active.stock = Set(product.stock);
        let updated = active
            .update(&self.conn)
            .await
            .map_err(AppError::write_failed)?;
        product_from_entity(updated).map(Some)
    }

    async fn delete_product(&self, id: Uuid) -> AppResult<bool> {
        let result = Products::delete_by_id(id)
            .exec(&self.conn)
            .await
            .map_err(AppError::write_failed)?;
        Ok(result.rows_affected > 0)
    }

    async fn fetch_cart(&self, user_id: Uuid) -> AppResult<Vec<CartLine>> {
        let rows = CartEntity::find()
            .filter(CartCol::UserId.eq(user_id))
            .order_by_asc(CartCol::CreatedAt)
            .find_also_related(Products)
            .all(&self.conn)
            .await?;

        let mut lines = Vec::with_capacity(rows.len());
        for (row, product) in rows {
            // Cart rows cascade with their product, so a missing join is a
            // row deleted between the two halves of the query.
            let Some(product) = product else { continue };
            lines.push(CartLine::new(
                row.id,
                row.user_id,
                product_from_entity(product)?,
                row.quantity,
            )?);
        }
        Ok(lines)
    }

    async fn find_cart_row(&self, user_id: Uuid, product_id: Uuid) -> AppResult<Option<CartRow>> {
        let row = CartEntity::find()
            .filter(
                Condition::all()
                    .add(CartCol::UserId.eq(user_id))
                    .add(CartCol::ProductId.eq(product_id)),
            )
            .one(&self.conn)
            .await?;
        Ok(row.map(cart_row_from_entity))
    }

    async fn insert_cart_row(&self, row: CartRow) -> AppResult<()> {
        CartActive {
            id: Set(row.id),
            user_id: Set(row.user_id),
            product_id: Set(row.product_id),
            quantity: Set(row.quantity),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.conn)
        .await
        .map_err(AppError::write_failed)?;
        Ok(())
    }

    async fn set_cart_quantity(&self, user_id: Uuid, line_id: Uuid, quantity: i32) -> AppResult<bool> {
        let result = CartEntity::update_many()
            .col_expr(CartCol::Quantity, Expr::value(quantity))
            .filter(
                Condition::all()
                    .add(CartCol::Id.eq(line_id))
                    .add(CartCol::UserId.eq(user_id)),
            )
            .exec(&self.conn)
            .await
            .map_err(AppError::write_failed)?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_cart_row(&self, user_id: Uuid, line_id: Uuid) -> AppResult<bool> {
        let result = CartEntity::delete_many()
            .filter(
                Condition::all()
                    .add(CartCol::Id.eq(line_id))
                    .add(CartCol::UserId.eq(user_id)),
            )
            .exec(&self.conn)
            .await
            .map_err(AppError::write_failed)?;
        Ok(result.rows_affected > 0)
    }

    async fn clear_cart(&self, user_id: Uuid) -> AppResult<u64> {
        let result = CartEntity::delete_many()
            .filter(CartCol::UserId.eq(user_id))
            .exec(&self.conn)
            .await
            .map_err(AppError::write_failed)?;
        Ok(result.rows_affected)
    }

    async fn insert_order(&self, order: Order) -> AppResult<Order> {
        let model = OrderActive {
            id: Set(order.id),
            user_id: Set(order.user_id),
            total_amount: Set(order.total_amount),
            shipping_address: Set(order.shipping_address),
            status: Set(order.status.to_string()),
            created_at: Set(order.created_at.into()),
        }
        .insert(&self.conn)
        .await
        .map_err(AppError::write_failed)?;
        order_from_entity(model)
    }

    async fn insert_order_items(&self, items: Vec<OrderItem>) -> AppResult<Vec<OrderItem>> {
        let txn = self.conn.begin().await.map_err(AppError::write_failed)?;

        let mut inserted = Vec::with_capacity(items.len());
        for item in items {
            let model = OrderItemActive {
                id: Set(item.id),
                order_id: Set(item.order_id),
                product_id: Set(item.product_id),
                quantity: Set(item.quantity),
                price: Set(item.price),
            }
            .insert(&txn)
            .await
            .map_err(AppError::write_failed)?;
            inserted.push(order_item_from_entity(model)?);
        }

        txn.commit().await.map_err(AppError::write_failed)?;
        Ok(inserted)
    }

    async fn delete_order(&self, order_id: Uuid) -> AppResult<bool> {
        let result = Orders::delete_by_id(order_id)
            .exec(&self.conn)
            .await
            .map_err(AppError::write_failed)?;
        Ok(result.rows_affected > 0)
    }

    async fn list_orders(&self, user_id: Option<Uuid>) -> AppResult<Vec<Order>> {
        let mut finder = Orders::find();
        if let Some(user_id) = user_id {
            finder = finder.filter(OrderCol::UserId.eq(user_id));
        }
        finder
            .order_by_desc(OrderCol::CreatedAt)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(order_from_entity)
            .collect()
    }

    async fn find_order(&self, order_id: Uuid) -> AppResult<Option<Order>> {
        Orders::find_by_id(order_id)
            .one(&self.conn)
            .await?
            .map(order_from_entity)
            .transpose()
    }

    async fn list_order_items(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
        OrderItems::find()
            .filter(OrderItemCol::OrderId.eq(order_id))
            .all(&self.conn)
            .await?
            .into_iter()
            .map(order_item_from_entity)
            .collect()
    }

    async fn list_order_items_for_seller(&self, seller_id: Uuid) -> AppResult<Vec<OrderItem>> {
        OrderItems::find()
            .join(JoinType::InnerJoin, order_items::Relation::Products.def())
            .join(JoinType::InnerJoin, order_items::Relation::Orders.def())
            .filter(ProdCol::SellerId.eq(seller_id))
            .order_by_desc(OrderCol::CreatedAt)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(order_item_from_entity)
            .collect()
    }

    async fn set_order_status(&self, order_id: Uuid, status: OrderStatus) -> AppResult<Option<Order>> {
        let existing = match Orders::find_by_id(order_id).one(&self.conn).await? {
            Some(o) => o,
            None => return Ok(None),
        };

        let mut active: OrderActive = existing.into();
        active.status = Set(status.to_string());
        let order = active
            .update(&self.conn)
            .await
            .map_err(AppError::write_failed)?;
        order_from_entity(order).map(Some)
    }

    async fn wishlist_contains(&self, user_id: Uuid, product_id: Uuid) -> AppResult<bool> {
        let row = Wishlist::find()
            .filter(
                Condition::all()
                    .add(WishlistCol::UserId.eq(user_id))
                    .add(WishlistCol::ProductId.eq(product_id)),
            )
            .one(&self.conn)
            .await?;
        Ok(row.is_some())
    }

    async fn add_to_wishlist(&self, user_id: Uuid, product_id: Uuid) -> AppResult<()> {
        WishlistActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            product_id: Set(product_id),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.conn)
        .await
        .map_err(AppError::write_failed)?;
        Ok(())
    }

    async fn remove_from_wishlist(&self, user_id: Uuid, product_id: Uuid) -> AppResult<bool> {
        let result = Wishlist::delete_many()
            .filter(
                Condition::all()
                    .add(WishlistCol::UserId.eq(user_id))
                    .add(WishlistCol::ProductId.eq(product_id)),
            )
            .exec(&self.conn)
            .await
            .map_err(AppError::write_failed)?;
        Ok(result.rows_affected > 0)
    }

    async fn wishlist_products(&self, user_id: Uuid) -> AppResult<Vec<Product>> {
        Products::find()
            .join(JoinType::InnerJoin, products::Relation::Wishlist.def())
            .filter(WishlistCol::UserId.eq(user_id))
            .order_by_desc(WishlistCol::CreatedAt)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect()
    }

    async fn insert_review(&self, review: Review) -> AppResult<Review> {
        let model = ReviewActive {
            id: Set(review.id),
            product_id: Set(review.product_id),
            user_id: Set(review.user_id),
            rating: Set(review.rating),
            comment: Set(review.comment),
            created_at: Set(review.created_at.into()),
        }
        .insert(&self.conn)
        .await
        .map_err(AppError::write_failed)?;
        Ok(review_from_entity(model))
    }

    async fn list_reviews(&self, product_id: Uuid) -> AppResult<Vec<Review>> {
        Ok(Reviews::find()
            .filter(ReviewCol::ProductId.eq(product_id))
            .order_by_desc(ReviewCol::CreatedAt)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(review_from_entity)
            .collect())
    }
}

fn account_from_entity(model: profiles::Model) -> AppResult<Account> {
    let role = Role::from_str(&model.role)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("unknown role `{}` on profile {}", model.role, model.id)))?;
    Ok(Account {
        profile: Profile {
            id: model.id,
            email: model.email,
            full_name: model.full_name,
            role,
            created_at: model.created_at.with_timezone(&Utc),
        },
        password_hash: model.password_hash,
    })
}

fn product_from_entity(model: products::Model) -> AppResult<Product> {
    Product::new(
        model.id,
        model.title,
        model.description,
        model.category,
        model.image_url,
        model.price,
        model.stock,
        model.seller_id,
        model.created_at.with_timezone(&Utc),
    )
}

fn cart_row_from_entity(model: cart::Model) -> CartRow {
    CartRow {
        id: model.id,
        user_id: model.user_id,
        product_id: model.product_id,
        quantity: model.quantity,
    }
}

fn order_from_entity(model: orders::Model) -> AppResult<Order> {
    let status = OrderStatus::from_str(&model.status)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("unknown status `{}` on order {}", model.status, model.id)))?;
    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        total_amount: model.total_amount,
        shipping_address: model.shipping_address,
        status,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

fn order_item_from_entity(model: order_items::Model) -> AppResult<OrderItem> {
    OrderItem::new(
        model.id,
        model.order_id,
        model.product_id,
        model.quantity,
        model.price,
    )
}

fn review_from_entity(model: reviews::Model) -> Review {
    Review {
        id: model.id,
        product_id: model.product_id,
        user_id: model.user_id,
        rating: model.rating,
        comment: model.comment,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
