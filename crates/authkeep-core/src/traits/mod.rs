//! Traits at the seams of the session store.

mod gateway;
mod storage;

pub use gateway::{Gateway, GatewayResponse};
pub use storage::SessionStorage;
