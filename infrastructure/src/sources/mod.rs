//! Source adapters
//!
//! One adapter per [`SourceKind`], each wrapping a single external system.
//! [`SourceRegistry`] builds the full set from the loaded configuration.

pub mod alienvault;
pub mod amass;
pub mod censys;
pub mod crtsh;
pub mod http;
pub mod sublist3r;

pub use alienvault::AlienVaultSource;
pub use amass::{AmassCliEngine, AmassSource, EnumerationConfig, EnumerationEngine};
pub use censys::CensysSource;
pub use crtsh::{CertificateDbConfig, CertificateStore, CrtShSource, PgCertificateStore};
pub use sublist3r::Sublist3rSource;

use crate::config::FileConfig;
use std::collections::BTreeMap;
use std::sync::Arc;
use subharvest_application::{CredentialProvider, SourceAdapter, SourceError};
use subharvest_domain::SourceKind;

/// Every configured source adapter, keyed by kind
#[derive(Clone)]
pub struct SourceRegistry {
    adapters: BTreeMap<SourceKind, Arc<dyn SourceAdapter>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            adapters: BTreeMap::new(),
        }
    }

    /// Build all five adapters from configuration
    pub fn from_config(
        config: &FileConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, SourceError> {
        let client = http::build_client(&config.http.user_agent)?;

        let crtsh = CrtShSource::postgres(&CertificateDbConfig {
            host: config.crtsh.host.clone(),
            port: config.crtsh.port,
            user: config.crtsh.user.clone(),
            database: config.crtsh.database.clone(),
        });

        let amass = AmassSource::new(Arc::new(AmassCliEngine::new(&config.amass.binary)))
            .with_template(
                EnumerationConfig::for_domain("")
                    .with_active(config.amass.active)
                    .with_timeout_minutes(config.amass.timeout_minutes)
                    .with_seed(config.amass.seed)
                    .with_resolvers(config.amass.resolvers.clone()),
            );

        let alienvault =
            AlienVaultSource::with_base_url(client.clone(), &config.http.alienvault_url);
        let sublist3r = Sublist3rSource::with_base_url(client.clone(), &config.http.sublist3r_url);
        let censys = CensysSource::new(
            client,
            credentials,
            config.censys.api_key_path.clone().unwrap_or_default(),
        )
        .with_base_url(&config.http.censys_url);

        Ok(Self::new()
            .with(Arc::new(crtsh))
            .with(Arc::new(amass))
            .with(Arc::new(alienvault))
            .with(Arc::new(sublist3r))
            .with(Arc::new(censys)))
    }

    /// Register an adapter, replacing any existing one of the same kind
    pub fn with(mut self, adapter: Arc<dyn SourceAdapter>) -> Self {
        self.adapters.insert(adapter.kind(), adapter);
        self
    }

    pub fn get(&self, kind: SourceKind) -> Option<Arc<dyn SourceAdapter>> {
        self.adapters.get(&kind).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SourceKind, &Arc<dyn SourceAdapter>)> {
        self.adapters.iter().map(|(kind, adapter)| (*kind, adapter))
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
