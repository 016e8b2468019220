//! # Domain Models
//!
//! This crate contains pure domain types with a single dependency (`serde`).
//! Keep it lean: no I/O, networking, or heavy logic. Just data, constants and
//! the query contracts the persistence layer has to fulfil.

pub mod config;
pub mod constants;
pub mod models;
pub mod store;
