//! Katalog client
//!
//! Data access and view state for the Flug and Spiel catalogs of a REST backend.

pub mod cache;
pub mod client;
pub mod config;
pub mod errors;
pub mod events;
pub mod guard;
pub mod models;
pub mod routes;
pub mod service;
pub mod views;

pub use client::CatalogClient;
pub use config::Config;
pub use errors::ClientError;
pub use events::ErrorSignal;
pub use service::CatalogService;
