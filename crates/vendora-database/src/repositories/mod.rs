//! Concrete sqlx repository implementations of the store traits.

pub mod inventory;
pub mod notification;
pub mod order;
pub mod product;
pub mod user;

pub use inventory::InventoryRepository;
pub use notification::NotificationRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use user::UserRepository;
