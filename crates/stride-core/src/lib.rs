pub mod config;
pub mod error;
pub mod types;

pub use config::StrideConfig;
pub use error::{Result, StrideError};
pub use types::*;
