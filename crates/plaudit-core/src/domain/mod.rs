//! Domain model.

pub mod article_like;

pub use article_like::ArticleLikeRecord;
