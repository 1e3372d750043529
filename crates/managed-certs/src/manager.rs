//! Managed certificate lifecycle bound to one project

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::api::{self, ComputeApi};
use crate::certificate::Certificate;
use crate::config::Profile;
use crate::context::WaitContext;
use crate::error::{CoreError, Result};
use crate::progress::ProgressCallback;
use crate::waiter::OperationWaiter;

/// Certificate operations as seen by controllers
///
/// Implemented by [`CertificateManager`]; controllers can depend on this
/// trait and substitute a fake in their own tests.
#[async_trait]
pub trait ManagedCertificates: Send + Sync {
    async fn create(&self, ctx: &WaitContext, name: &str, domains: &[String]) -> Result<()>;
    async fn delete(&self, ctx: &WaitContext, name: &str) -> Result<()>;
    async fn exists(&self, name: &str) -> Result<bool>;
    async fn get(&self, name: &str) -> Result<Certificate>;
    async fn list(&self) -> Result<Vec<Certificate>>;
}

/// Creates, deletes and reads managed SSL certificates of a single project
///
/// Holds no mutable state; share it freely between tasks.
#[derive(Clone)]
pub struct CertificateManager {
    api: Arc<dyn ComputeApi>,
    project_id: String,
    waiter: OperationWaiter,
}

impl CertificateManager {
    pub fn new(api: Arc<dyn ComputeApi>, project_id: impl Into<String>) -> Self {
        let project_id = project_id.into();
        let waiter = OperationWaiter::new(api.clone(), project_id.clone());
        Self {
            api,
            project_id,
            waiter,
        }
    }

    /// Build a manager talking HTTP to the endpoint configured in `profile`
    pub fn from_profile(profile: &Profile) -> Result<Self> {
        let client = profile.compute_client()?;
        Ok(Self::new(Arc::new(client), profile.project_id.clone())
            .with_poll_interval(profile.poll_interval()))
    }

    /// Set the time between operation status fetches, never below [`MIN_POLL_INTERVAL`]
    ///
    /// [`MIN_POLL_INTERVAL`]: crate::MIN_POLL_INTERVAL
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.waiter = self.waiter.with_interval(interval);
        self
    }

    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.waiter = self.waiter.with_progress(callback);
        self
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn poll_interval(&self) -> Duration {
        self.waiter.interval()
    }

    /// Create a managed certificate for `domains` and wait for the operation
    ///
    /// # Errors
    ///
    /// [`CoreError::Api`] if the insert request is rejected (bad name,
    /// duplicate, auth, transport); otherwise whatever the wait returns.
    pub async fn create(&self, ctx: &WaitContext, name: &str, domains: &[String]) -> Result<()> {
        info!(
            project = %self.project_id,
            certificate = %name,
            ?domains,
            "Creating managed certificate"
        );

        let certificate = Certificate::managed(name, domains);
        let operation = self
            .api
            .insert_ssl_certificate(&self.project_id, &certificate)
            .await?;

        self.waiter.wait(ctx, &operation.name).await
    }

    /// Delete a certificate and wait for the operation
    ///
    /// # Errors
    ///
    /// [`CoreError::Api`] if the delete request is rejected, including when
    /// the certificate does not exist; otherwise whatever the wait returns.
    pub async fn delete(&self, ctx: &WaitContext, name: &str) -> Result<()> {
        info!(project = %self.project_id, certificate = %name, "Deleting certificate");

        let operation = self
            .api
            .delete_ssl_certificate(&self.project_id, name)
            .await?;

        self.waiter.wait(ctx, &operation.name).await
    }

    /// Returns false only when the service says the certificate does not exist
    ///
    /// Any other failure is returned as an error, never as "absent".
    pub async fn exists(&self, name: &str) -> Result<bool> {
        match self.api.get_ssl_certificate(&self.project_id, name).await {
            Ok(_) => Ok(true),
            Err(e) if api::is_not_found(&e) => {
                debug!(certificate = %name, "Certificate not found");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch a certificate; request errors are returned unchanged as [`CoreError::Api`]
    pub async fn get(&self, name: &str) -> Result<Certificate> {
        Ok(self.api.get_ssl_certificate(&self.project_id, name).await?)
    }

    /// All certificates in the project
    pub async fn list(&self) -> Result<Vec<Certificate>> {
        let list = self.api.list_ssl_certificates(&self.project_id).await?;
        Ok(list.items)
    }
}

#[async_trait]
impl ManagedCertificates for CertificateManager {
    async fn create(&self, ctx: &WaitContext, name: &str, domains: &[String]) -> Result<()> {
        CertificateManager::create(self, ctx, name, domains).await
    }

    async fn delete(&self, ctx: &WaitContext, name: &str) -> Result<()> {
        CertificateManager::delete(self, ctx, name).await
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        CertificateManager::exists(self, name).await
    }

    async fn get(&self, name: &str) -> Result<Certificate> {
        CertificateManager::get(self, name).await
    }

    async fn list(&self) -> Result<Vec<Certificate>> {
        CertificateManager::list(self).await
    }
}

impl std::fmt::Debug for CertificateManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificateManager")
            .field("project_id", &self.project_id)
            .field("poll_interval", &self.waiter.interval())
            .finish_non_exhaustive()
    }
}
