//! Playforge HTTP API service.
//!
//! This crate provides the HTTP API for the Playforge game marketplace:
//!
//! - Registration, login, and session tokens
//! - Balance top-up and the purchase flow
//! - Game catalog management and genre recommendations
//! - Purchase ledger queries
//! - Play-time tracking and staged game-content serving
//!
//! # Authentication
//!
//! End users authenticate with an HS256 session token minted at login.
//! Admin endpoints additionally require the admin role on the user record.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers stay async for signature consistency

pub mod auth;
pub mod config;
pub mod content;
pub mod error;
pub mod handlers;
pub mod locks;
pub mod mailer;
pub mod password;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use locks::KeyedLocks;
pub use mailer::{Mailer, MailerError};
pub use routes::create_router;
pub use state::AppState;
