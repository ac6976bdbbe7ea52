use std::sync::Arc;

use crate::config::AccessConfig;
use crate::infra::secrets::SecretStore;
use crate::security::signer::UrlSigner;

#[derive(Clone)]
pub struct AppState {
    pub config: AccessConfig,
    pub secrets: SecretStore,
    pub signer: Option<UrlSigner>,
}

impl AppState {
    pub fn new(config: AccessConfig, secrets: SecretStore, signer: Option<UrlSigner>) -> Arc<Self> {
        Arc::new(Self {
            config,
            secrets,
            signer,
        })
    }
}
