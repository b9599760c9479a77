//! dtmapi - A Rust client for the IOM Displacement Tracking Matrix API.
//!
//! # Overview
//!
//! The Displacement Tracking Matrix (DTM) gathers and analyses data on the
//! displacement and mobility of populations. This crate wraps the public DTM
//! API behind typed helpers: each call issues a single HTTP GET with optional
//! query filters, checks the success flag in the JSON response envelope, and
//! returns the `result` payload either as raw schema-less records or
//! reshaped into a tabular [`RecordSet`].
//!
//! # Quick example
//!
//! ```no_run
//! use dtmapi::{DtmClient, IdpFilters};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = DtmClient::new();
//!
//! // Countries with publicly available DTM data.
//! let countries = client.get_all_countries().await?;
//! println!("{} countries", countries.len());
//!
//! // Country-level IDP figures for Ethiopia, rounds 1 through 4.
//! let filters = IdpFilters {
//!     country_name: Some("Ethiopia".to_string()),
//!     from_round_number: Some(1),
//!     to_round_number: Some(4),
//!     ..Default::default()
//! };
//! let idps = client.get_idp_admin0_data(&filters).await?;
//! for row in idps.rows() {
//!     println!("{row:?}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`client`]: The [`DtmClient`] and its endpoint methods
//! - [`idp`]: Optional filters for the IDP admin-level datasets
//! - [`tabular`]: Schema-less records and their tabular view
//! - [`error`]: Transport, rejection, and malformed-response errors

pub mod client;
pub mod error;
pub mod idp;
pub mod tabular;

pub use client::DtmClient;
pub use error::Error;
pub use idp::IdpFilters;
pub use tabular::{Record, RecordSet};
