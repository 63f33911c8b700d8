//! Core definitions (error type, result alias and verification macros) shared by
//! all longbits-* crates.

pub mod error;
pub mod macros;
pub mod result;

pub use result::Result;
