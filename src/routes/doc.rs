use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    access::{Access, Area},
    dto::{
        admin::{ProfileList, UpdateOrderStatusRequest},
        auth::{SignInRequest, SignInResponse, SignOutResponse, SignUpRequest},
        cart::{AddToCartRequest, CartView, UpdateCartLineRequest},
        orders::{OrderList, OrderWithItems, PlacedOrder},
        products::{
            CategoryList, CreateProductRequest, ProductDetail, ProductList, RemovedProduct,
            SalesList, UpdateProductRequest,
        },
        reviews::{AddReviewRequest, ReviewList},
        wishlist::{WishlistProductList, WishlistToggle},
    },
    models::{CartLine, Order, OrderItem, OrderStatus, Product, Profile, Review, ReviewSummary, Role},
    pricing::CheckoutSummary,
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, health, orders, params, products, seller, wishlist},
    validation::ShippingForm,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::sign_up,
        auth::sign_in,
        auth::sign_out,
        auth::me,
        auth::check_access,
        products::list_products,
        products::list_categories,
        products::get_product,
        products::list_reviews,
        products::add_review,
        cart::cart_list,
        cart::add_to_cart,
        cart::update_quantity,
        cart::remove_from_cart,
        orders::list_orders,
        orders::checkout,
        orders::get_order,
        wishlist::list_wishlist,
        wishlist::toggle_wishlist,
        seller::list_own_products,
        seller::create_product,
        seller::update_product,
        seller::delete_product,
        seller::list_sales,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::update_order_status,
        admin::list_users,
        admin::remove_product
    ),
    components(
        schemas(
            Role,
            OrderStatus,
            Profile,
            Product,
            CartLine,
            Order,
            OrderItem,
            Review,
            ReviewSummary,
            CheckoutSummary,
            Area,
            Access,
            auth::AccessDecision,
            SignUpRequest,
            SignInRequest,
            SignInResponse,
            SignOutResponse,
            AddToCartRequest,
            UpdateCartLineRequest,
            CartView,
            ShippingForm,
            PlacedOrder,
            OrderList,
            OrderWithItems,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            ProductDetail,
            CategoryList,
            RemovedProduct,
            SalesList,
            AddReviewRequest,
            ReviewList,
            WishlistToggle,
            WishlistProductList,
            UpdateOrderStatusRequest,
            ProfileList,
            params::ProductQuery,
            params::OrderListQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CartView>,
            ApiResponse<PlacedOrder>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Sign up, sign in and session endpoints"),
        (name = "Products", description = "Catalogue browsing"),
        (name = "Reviews", description = "Product reviews"),
        (name = "Cart", description = "Buyer cart"),
        (name = "Orders", description = "Checkout and order history"),
        (name = "Wishlist", description = "Buyer wishlist"),
        (name = "Seller", description = "Seller dashboard"),
        (name = "Admin", description = "Admin dashboard"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
