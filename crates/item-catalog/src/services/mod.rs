//! Business rules on top of the item repository.

pub mod error;
pub mod item_service;

pub use error::*;
pub use item_service::*;
