//! Catalogue core library — domain types, settings, errors.
//!
//! Public API surface:
//! - [`types`] — [`Record`], [`RecordId`], [`Batch`] and friends
//! - [`settings`] — [`Settings`] built once at process start
//! - [`error`] — [`RecordError`], [`ConfigError`]

pub mod error;
pub mod settings;
pub mod types;

pub use error::{ConfigError, RecordError};
pub use settings::{EodhSettings, Settings};
pub use types::{Batch, ProcessLink, Record, RecordId, RecordType, CATALOG_DESCRIPTOR};
