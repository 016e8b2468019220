mod error;
mod health;
mod router;
mod session;
mod state;

pub use error::{ApiError, ApiErrorExt, ErrorResponse};
pub use router::system_router;
pub use session::{Session, SessionRecord, SessionStore, session_layer};
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateInner};
