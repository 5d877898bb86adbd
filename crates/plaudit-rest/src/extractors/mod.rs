//! Custom Axum extractors.

mod caller;

pub use caller::*;
