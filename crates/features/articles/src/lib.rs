//! Articles feature: the full listing, and single-article reads limited per session by a
//! page view quota.

mod error;
pub mod policy;
pub mod server;

pub use crate::error::{ArticlesError, ArticlesErrorExt};
pub use policy::{ViewOutcome, ViewPolicy};
pub use server::router;
