pub mod models;
pub mod movies;
pub mod status;
pub mod store;
