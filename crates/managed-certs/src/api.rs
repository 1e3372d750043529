//! The Compute API surface this crate depends on
//!
//! [`ComputeClient`](crate::ComputeClient) implements it over HTTP; tests and
//! embedders can supply their own implementation.

use async_trait::async_trait;

use crate::certificate::{Certificate, CertificateList};
use crate::error::ApiError;
use crate::operation::Operation;

/// SSL certificate and global operation RPCs, each scoped to a project
#[async_trait]
pub trait ComputeApi: Send + Sync {
    /// `sslCertificates.insert`
    async fn insert_ssl_certificate(
        &self,
        project: &str,
        certificate: &Certificate,
    ) -> Result<Operation, ApiError>;

    /// `sslCertificates.delete`
    async fn delete_ssl_certificate(&self, project: &str, name: &str)
    -> Result<Operation, ApiError>;

    /// `sslCertificates.get`
    async fn get_ssl_certificate(&self, project: &str, name: &str)
    -> Result<Certificate, ApiError>;

    /// `sslCertificates.list`
    async fn list_ssl_certificates(&self, project: &str) -> Result<CertificateList, ApiError>;

    /// `globalOperations.get`
    async fn get_global_operation(&self, project: &str, name: &str)
    -> Result<Operation, ApiError>;
}

/// Returns true if `err` means the requested resource does not exist
pub fn is_not_found(err: &ApiError) -> bool {
    err.is_not_found()
}
