//! Budget ML - Rust библиотека

pub mod error;
pub mod models;
pub mod preprocessing;
pub mod types;

pub use error::EngineError;
pub use models::*;
pub use preprocessing::*;
pub use types::*;
