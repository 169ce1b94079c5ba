//! # deposit-core
//!
//! Core types, traits, and abstractions for the deposit metadata form.
//!
//! This crate provides the data structures exchanged with the search
//! endpoints and the form renderer, plus the collaborator traits the
//! `deposit-form` crate is written against.

pub mod defaults;
pub mod error;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
