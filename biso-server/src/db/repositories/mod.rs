mod post_repository;
mod favorite_repository;

pub use post_repository::PostRepository;
pub use favorite_repository::FavoriteRepository;
