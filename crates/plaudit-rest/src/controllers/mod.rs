//! REST API controllers.

pub mod health_controller;
pub mod like_controller;

pub use health_controller::*;
