//! deer-park/crates/dpd-core/src/lib.rs
//!
//! The central domain model and interface definitions for the board.

pub mod error;
pub mod models;
pub mod projection;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use projection::project;
pub use traits::*;
