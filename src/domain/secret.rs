use serde::{Deserialize, Serialize};

/// Where a candidate secret came from. The master secret is configured by
/// the operator; account secrets are enrolled through the provisioning CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretOrigin {
    Master,
    Account,
}

/// One opaque shared key in its exchanged base32 form. Raw key bytes only
/// exist transiently, inside the verifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Secret {
    pub origin: SecretOrigin,
    pub material: String,
}

impl Secret {
    pub fn master(material: impl Into<String>) -> Self {
        Self {
            origin: SecretOrigin::Master,
            material: material.into(),
        }
    }

    pub fn account(material: impl Into<String>) -> Self {
        Self {
            origin: SecretOrigin::Account,
            material: material.into(),
        }
    }
}
