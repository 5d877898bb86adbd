//! Data Transfer Objects (DTOs).

mod like_dto;

pub use like_dto::*;
