//! Like service implementations.
//!
//! Trait definitions live in the parent module (`like_service.rs`).

pub mod like_service_impl;

pub use like_service_impl::{CachePolicy, LikeServiceImpl};
