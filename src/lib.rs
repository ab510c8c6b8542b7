pub mod aggregate;
pub mod api;
pub mod auth;
pub mod calc;
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod range;
pub mod store;
