//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the `dishes`, `orders` and `order_details` tables.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod dish;
pub mod order;
pub mod order_detail;

// Re-export specific types to avoid conflicts
pub use dish::{Column as DishColumn, Entity as Dish, Model as DishModel};
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel};
pub use order_detail::{
    Column as OrderDetailColumn, Entity as OrderDetail, Model as OrderDetailModel,
};
