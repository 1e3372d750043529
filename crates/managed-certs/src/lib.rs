//! # managed-certs
//!
//! Lifecycle management for Compute Engine managed SSL certificates.
//!
//! Mutating calls (insert, delete) return a global `Operation` that has to be
//! polled until it is `DONE`. [`CertificateManager`] hides that behind
//! awaitable `create`/`delete` calls that can be cancelled through a
//! [`WaitContext`], and classifies terminal failures into an
//! [`OperationError`] (with a dedicated quota-exceeded check).
//!
//! ## Layers
//!
//! - [`api`] - the `ComputeApi` trait the rest of the crate is written against
//! - [`client`] - `ComputeClient`, the reqwest implementation of that trait
//! - [`waiter`] - the operation polling loop
//! - [`manager`] - create/delete/exists/get/list bound to a single project
//! - [`config`] - TOML profiles for project, endpoint and credentials
//!
//! ## Example
//!
//! ```rust,ignore
//! use managed_certs::{CertificateManager, ComputeClient, WaitContext};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let client = ComputeClient::builder().access_token(token).build()?;
//! let manager = CertificateManager::new(Arc::new(client), "my-project");
//!
//! let ctx = WaitContext::new().with_timeout(Duration::from_secs(600));
//! match manager.create(&ctx, "cert-a", &["example.com".to_string()]).await {
//!     Ok(()) => println!("created"),
//!     Err(e) if e.is_quota_exceeded() => println!("out of certificate quota"),
//!     Err(e) => return Err(e.into()),
//! }
//! ```

pub mod api;
pub mod certificate;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod manager;
pub mod operation;
pub mod progress;
pub mod waiter;

#[cfg(test)]
pub(crate) mod testing;

pub use api::ComputeApi;
pub use certificate::{Certificate, CertificateList, CertificateType, ManagedCertificate};
pub use client::{ComputeClient, ComputeClientBuilder, DEFAULT_API_URL};
pub use context::WaitContext;
pub use error::{ApiError, CoreError, OperationError, Result};
pub use manager::{CertificateManager, ManagedCertificates};
pub use operation::{Operation, OperationErrorDetail, OperationErrorEntry};
pub use progress::{ProgressCallback, ProgressEvent, tracing_progress};
pub use waiter::{DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL, OperationWaiter};
