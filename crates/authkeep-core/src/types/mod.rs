//! Core authkeep types.
//!
//! These types enforce their invariants at construction time, so a
//! logged-in state without a token cannot be built.

mod api_url;
mod session;

pub use api_url::ApiUrl;
pub use session::{SessionRecord, SessionState};
