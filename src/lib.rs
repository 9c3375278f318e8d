pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod github;
pub mod handlers;
pub mod models;
pub mod wizard;

pub use db::create_pool;
