//! Green Wally Core - Shared types library.
//!
//! This crate provides the domain types used by every Green Wally component:
//! - `storefront` - The grocery web shop
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP. The optional `sqlite` feature adds `sqlx` encode/decode support
//! for the ID newtypes.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, usernames, emails, prices and quantities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
