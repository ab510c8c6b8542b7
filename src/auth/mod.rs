pub mod auth;
pub mod visibility;
