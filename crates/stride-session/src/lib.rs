//! Per-visitor session state for the Stride storefront.
//!
//! Each visitor gets a `Session` holding their display name, shopping bag,
//! assistant transcript and a one-shot notice. Sessions live in a
//! process-local `SessionStore` keyed by the id carried in the session cookie.

pub mod bag;
pub mod error;
pub mod session;
pub mod store;

pub use bag::Bag;
pub use error::SessionError;
pub use session::Session;
pub use store::{SessionAccess, SessionStore};
