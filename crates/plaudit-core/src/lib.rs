//! # Plaudit Core
//!
//! Core types, identifiers, and error definitions shared by every layer of
//! Plaudit: the durable like store, the count cache, the like engine and the
//! HTTP boundary.

pub mod domain;
pub mod error;
pub mod id;
pub mod result;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use result::*;
