//! User aggregate

pub mod model;
pub mod repository;

pub use model::{NewUser, User, UserFilter};
pub use repository::UserRepository;
