//! Order entity, embedded line items, and status enums.

pub mod model;
pub mod status;

pub use model::{
    CustomerInfo, NewOrder, NewOrderItem, Order, OrderDetails, OrderItem, OrderItemDetails,
    SellerOrderView,
};
pub use status::{OrderStatus, PaymentStatus};
