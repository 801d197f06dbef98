//! Core types and utilities for the Playforge marketplace.
//!
//! This crate provides the foundational types used throughout the platform:
//!
//! - **Identifiers**: `UserId`, `GameId`, `TransactionId`
//! - **Users**: `User`, `Role`
//! - **Games**: `Game` plus genre-list helpers
//! - **Ledger**: `LedgerEntry`, the immutable record of one completed purchase
//! - **Play time**: `PlayRecord`, the per-(user, game) accumulator
//! - **Recommendations**: genre tally and selection functions
//!
//! # Money
//!
//! All monetary amounts are stored as `i64` integer cents to avoid floating
//! point precision issues. A game with no price is priced at 0.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod game;
pub mod ids;
pub mod ledger;
pub mod recommend;
pub mod usage;
pub mod user;

pub use game::{join_genres, parse_genres, Game};
pub use ids::{GameId, IdError, TransactionId, UserId};
pub use ledger::LedgerEntry;
pub use recommend::{genre_tally, recommend, top_genres, TOP_GENRE_COUNT};
pub use usage::PlayRecord;
pub use user::{Role, User};
