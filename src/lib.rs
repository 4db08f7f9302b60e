pub mod cache;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod filters;
pub mod mapper;
pub mod models;
pub mod remote;
pub mod store;
pub mod tmdb;

pub use cache::MovieCache;
pub use db::Storage;
pub use models::{Movie, MovieFilter, Review, Video};
pub use store::{MovieStore, StoreState};
pub use tmdb::TmdbClient;
