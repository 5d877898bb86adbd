//! MySQL repository implementations.

mod article_like_repository;

pub use article_like_repository::MySqlArticleLikeRepository;
