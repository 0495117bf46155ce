//! Domain types for the item catalog.

pub mod item;

pub use item::*;
