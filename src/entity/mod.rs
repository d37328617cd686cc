pub mod cart;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod profiles;
pub mod reviews;
pub mod wishlist;

pub use cart::Entity as Cart;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
pub use profiles::Entity as Profiles;
pub use reviews::Entity as Reviews;
pub use wishlist::Entity as Wishlist;
