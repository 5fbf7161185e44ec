//! Core types and trait definitions for the barkeep cocktail catalog.
//!
//! This crate holds the normalization rules (name keys, order keys, the
//! wide-format reshaper and the merge decision tables) and is free of CSV and
//! database dependencies. The staging reader and the SQLite store both build
//! on it.

// Native `async fn` in traits; the store trait spells out `Send` futures.
#![allow(async_fn_in_trait)]

pub mod catalog;
pub mod error;
pub mod merge;
pub mod name;
pub mod order;
pub mod reshape;
pub mod source;
pub mod store;

pub use error::{Error, Result};
