//! REST API

mod auth;
mod handlers;
mod router;
mod state;

pub use auth::{CallerAuthor, USER_ID_HEADER, USER_ROLE_HEADER};
pub use router::create_router;
pub use state::AppState;
