//! # Item Catalog
//!
//! A small catalog service: CRUD over items kept in one JSON file, plus a side-by-side
//! comparison of 2 to 5 items.
//!
//! - [`model`] - [`Item`](model::Item) and its create/update payloads
//! - [`item_repository`] - the item entity wired into the record framework
//! - [`comparison`] - price, rating and specification analysis
//! - [`services`] - [`ItemService`](services::ItemService), the business rules
//! - [`http`] - axum routes
//! - [`config`] - environment configuration
//! - [`lifecycle`] - [`CatalogSystem`](lifecycle::CatalogSystem), startup and shutdown

pub mod comparison;
pub mod config;
pub mod http;
pub mod item_repository;
pub mod lifecycle;
pub mod model;
pub mod services;
