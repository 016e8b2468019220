//! Identity feature: binds a user to the client session by username.
//!
//! There is no credential check; whoever knows a username can log in as that user.

mod error;
pub mod server;
pub mod service;

pub use crate::error::{IdentityError, IdentityErrorExt};
pub use server::router;
