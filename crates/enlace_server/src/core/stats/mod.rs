pub mod route;
pub mod summary;
