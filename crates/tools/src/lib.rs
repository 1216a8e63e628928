//! Mock business lookups
//!
//! Deterministic responders for the router's non-RAG branches. Both are
//! pure functions of their identifier: same input, same answer, no I/O.

pub mod order;
pub mod product;

pub use order::{order_status, OrderStatus, OrderStatusReport};
pub use product::{product_info, Product, ProductAnswer, CATALOG};
