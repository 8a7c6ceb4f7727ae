// storefront/src/models/mod.rs

//! Data structures for the store's collections.

pub mod address;
pub mod category;
pub mod order;
pub mod order_item;
pub mod product;
pub mod profile;
pub mod user;

pub use address::ShippingAddress;
pub use category::{Category, Subcategory};
pub use order::{NewOrder, Order, OrderStatus, OrderWithItems, PaymentMethod, PaymentStatus};
pub use order_item::{NewOrderItem, OrderItem};
pub use product::{NewProduct, Product, ProductUpdate};
pub use profile::{Profile, Role};
pub use user::UserCredentials;
