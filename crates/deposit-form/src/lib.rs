//! # deposit-form
//!
//! Backend of the deposit metadata form.
//!
//! This crate provides:
//! - A generic autocomplete adapter ([`autocomplete::lookup`])
//! - License, keyword and author suggestion sources
//! - A session-scoped category and type catalog
//! - Routing of backend validation errors onto form fields
//! - A [`FormSession`] tying these to one deposit record
//! - A `reqwest` implementation of the HTTP collaborator
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use deposit_form::{FormConfig, FormSession, ReqwestFetcher};
//! use deposit_core::{DepositRecord, FieldSignal};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = FormConfig::load().unwrap();
//!     let (tx, _rx) = tokio::sync::mpsc::unbounded_channel::<FieldSignal>();
//!     let session = FormSession::new(
//!         Arc::new(ReqwestFetcher::with_timeout(config.http_timeout)),
//!         DepositRecord::new("1f2c"),
//!         &config,
//!         Arc::new(tx),
//!     );
//!     let authors = session
//!         .autocomplete_authors(&config.authors(), "Smith, John: CERN")
//!         .await
//!         .unwrap();
//!     println!("{} candidates", authors.len());
//! }
//! ```

pub mod authors;
pub mod autocomplete;
pub mod categories;
pub mod config;
pub mod http;
pub mod keywords;
pub mod licenses;
pub mod session;
pub mod validation;

// Re-export core types
pub use deposit_core::*;

pub use authors::{parse_author_query, AuthorSource};
pub use autocomplete::{lookup, prepend_user_input, SuggestionSource};
pub use categories::{CategoryCatalog, CategorySet};
pub use config::{ConfigError, ConfigResult, FormConfig};
pub use http::{encode_params, ReqwestFetcher};
pub use keywords::KeywordSource;
pub use licenses::LicenseSource;
pub use session::{register_templates, FormDefaults, FormSession, ModelOptions};
pub use validation::{FieldErrorState, ValidationRouter};
