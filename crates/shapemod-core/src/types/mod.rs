//! Type system utilities and aliases.
//!
//! ## Modules
//!
//! - [`aliases`]: Identifier aliases and `Arc<Mutex<T>>` helpers.

pub mod aliases;

pub use aliases::*;
