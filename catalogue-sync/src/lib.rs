//! # catalogue-sync
//!
//! Record synchronization protocol for the EODH workflow catalogue: given a
//! batch of local record files and deletion IDs, reconcile the remote
//! catalogue service and execution backend to match, collecting per-item
//! outcomes instead of aborting on the first problem.
//!
//! Call [`pipeline::run`] with a [`Transport`] and the application
//! [`catalogue_core::Settings`].

pub mod ades;
pub mod auth;
pub mod error;
pub mod http;
pub mod outcome;
pub mod pipeline;
pub mod publish;
pub mod registrar;
pub mod testing;

pub use error::{AuthError, SyncError, TransportError};
pub use http::{HttpRequest, HttpResponse, Method, RequestBody, Transport, UreqTransport};
pub use outcome::{Outcome, OutcomeStatus, RunReport, Stage};
pub use pipeline::{run, RunOptions};
