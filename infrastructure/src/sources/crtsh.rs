//! crt.sh certificate transparency source
//!
//! Queries the public `certwatch` Postgres database for every DNS-type
//! certificate identity under the domain.

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::{Connection, PgConnection};
use std::sync::Arc;
use subharvest_application::{SourceAdapter, SourceError};
use subharvest_domain::{DomainQuery, SourceKind};
use tracing::debug;

/// Matches names ending in `.<domain>` using the reversed-name index
const DNS_NAME_QUERY: &str = "SELECT DISTINCT name_value FROM certificate_identity ci \
     WHERE ci.name_type = 'dNSName' \
     AND reverse(lower(ci.name_value)) LIKE reverse(lower('%.' || $1))";

/// Read access to certificate identities
#[async_trait]
pub trait CertificateStore: Send + Sync {
    /// Every DNS name whose certificate identity sits under `domain`
    async fn dns_names_under(&self, domain: &str) -> Result<Vec<String>, SourceError>;
}

/// Connection details for the certificate database
#[derive(Debug, Clone)]
pub struct CertificateDbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub database: String,
}

impl Default for CertificateDbConfig {
    fn default() -> Self {
        Self {
            host: "crt.sh".to_string(),
            port: 5432,
            user: "guest".to_string(),
            database: "certwatch".to_string(),
        }
    }
}

/// [`CertificateStore`] backed by a fresh Postgres connection per lookup
pub struct PgCertificateStore {
    options: PgConnectOptions,
}

impl PgCertificateStore {
    pub fn new(config: &CertificateDbConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .database(&config.database)
            .ssl_mode(PgSslMode::Disable);
        Self { options }
    }
}

#[async_trait]
impl CertificateStore for PgCertificateStore {
    async fn dns_names_under(&self, domain: &str) -> Result<Vec<String>, SourceError> {
        let mut conn = PgConnection::connect_with(&self.options)
            .await
            .map_err(|e| SourceError::Connection(e.to_string()))?;

        conn.ping()
            .await
            .map_err(|e| SourceError::Connection(format!("liveness check failed: {}", e)))?;

        sqlx::query("SET SESSION CHARACTERISTICS AS TRANSACTION READ ONLY")
            .execute(&mut conn)
            .await
            .map_err(|e| SourceError::Connection(format!("failed to open read-only session: {}", e)))?;

        let names: Vec<String> = sqlx::query_scalar(DNS_NAME_QUERY)
            .bind(domain)
            .fetch_all(&mut conn)
            .await
            .map_err(|e| SourceError::Query(e.to_string()))?;

        if let Err(e) = conn.close().await {
            debug!("Error closing certificate database connection: {}", e);
        }

        Ok(names)
    }
}

pub struct CrtShSource {
    store: Arc<dyn CertificateStore>,
}

impl CrtShSource {
    pub fn new(store: Arc<dyn CertificateStore>) -> Self {
        Self { store }
    }

    pub fn postgres(config: &CertificateDbConfig) -> Self {
        Self::new(Arc::new(PgCertificateStore::new(config)))
    }
}

#[async_trait]
impl SourceAdapter for CrtShSource {
    fn kind(&self) -> SourceKind {
        SourceKind::CrtSh
    }

    async fn fetch(&self, query: &DomainQuery) -> Result<Vec<String>, SourceError> {
        debug!(domain = %query, "Querying certificate transparency store");
        self.store.dns_names_under(query.as_str()).await
    }
}
