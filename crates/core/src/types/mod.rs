//! Core types for Green Wally Grocers.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod username;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError, Quantity, QuantityError};
pub use username::{Username, UsernameError};
