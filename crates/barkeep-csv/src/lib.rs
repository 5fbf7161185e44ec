//! CSV readers for the barkeep staging loader.
//!
//! Turns the two export layouts into [`barkeep_core::reshape`] source rows.
//! Pure synchronous; no database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! let file = std::fs::File::open("all_drinks.csv").unwrap();
//! for row in barkeep_csv::read_wide(file).unwrap() {
//!   let row = row.unwrap();
//!   println!("{}: {} lines", row.drink, barkeep_core::reshape::reshape_wide(&row).len());
//! }
//! ```

pub mod error;
mod long;
mod wide;

pub use error::{Error, Result};
pub use long::read_long;
pub use wide::read_wide;
