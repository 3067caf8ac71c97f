//! Database models split into domain-specific modules.

pub mod build;
pub mod category;
pub mod chat;
pub mod common;
pub mod order;
pub mod product;
pub mod service;
pub mod service_feedback;
pub mod service_order;
pub mod supplier;
pub mod user;

pub use build::*;
pub use category::*;
pub use chat::*;
pub use common::*;
pub use order::*;
pub use product::*;
pub use service::*;
pub use service_feedback::*;
pub use service_order::*;
pub use supplier::*;
pub use user::*;
