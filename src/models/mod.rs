//! Data models for the Flug and Spiel catalogs.
//!
//! Field names on the wire match the backend's JSON exactly (`titel`, `verlag`,
//! `schlagwoerter`, ...), Rust-side names follow them.

mod catalog;
mod chart;
mod criteria;
mod form;
mod record;

pub use catalog::*;
pub use chart::*;
pub use criteria::*;
pub use form::*;
pub use record::*;
