//! # Plaudit Server Library
//!
//! Wiring for the Plaudit server: explicit construction of the like store,
//! count cache, like engine and HTTP router, plus startup utilities.

pub mod app;
pub mod startup;
