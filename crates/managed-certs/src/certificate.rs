//! SSL certificate resources

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Certificate type tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateType {
    /// Provisioned and renewed by the provider
    Managed,
    /// Certificate and key uploaded by the user
    SelfManaged,
    #[default]
    #[serde(other)]
    TypeUnspecified,
}

/// An `sslCertificates` resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub name: String,
    #[serde(rename = "type", default)]
    pub cert_type: CertificateType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed: Option<ManagedCertificate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subject_alternative_names: Vec<String>,
}

/// Managed part of a certificate: requested domains and provisioning state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedCertificate {
    #[serde(default)]
    pub domains: Vec<String>,
    /// `PROVISIONING`, `ACTIVE`, `PROVISIONING_FAILED`, ... (set by the service)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub domain_status: HashMap<String, String>,
}

impl Certificate {
    /// Request body for a new managed certificate
    pub fn managed(name: impl Into<String>, domains: &[String]) -> Self {
        Self {
            name: name.into(),
            cert_type: CertificateType::Managed,
            managed: Some(ManagedCertificate {
                domains: domains.to_vec(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// Domains covered by a managed certificate, empty otherwise
    pub fn domains(&self) -> &[String] {
        self.managed
            .as_ref()
            .map(|m| m.domains.as_slice())
            .unwrap_or_default()
    }
}

/// One page of `sslCertificates.list`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateList {
    #[serde(default)]
    pub items: Vec<Certificate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}
