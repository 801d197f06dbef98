//! HTTP request handlers.

pub mod admin;
pub mod games;
pub mod health;
pub mod play;
pub mod users;
