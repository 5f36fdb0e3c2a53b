//! Certificate expiry checker
//!
//! Performs a TLS handshake against `host:port` with the system root store
//! (or the bundled webpki roots when configured), reads the leaf certificate
//! presented by the server and classifies the result. Handshake failures
//! where the peer did not answer with a TLS record are reported separately
//! from every other transport failure.

use crate::config::{CheckSettings, TrustStore};
use crate::models::LeafCertificate;
use crate::utils::CheckError;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::error::Elapsed;
use tokio_rustls::TlsConnector;
use x509_parser::prelude::*;

const HOURS_PER_DAY: i64 = 24;

/// Something that can check the certificate served by a host
#[async_trait]
pub trait DomainChecker: Send + Sync {
    async fn check(&self, host: &str) -> Result<LeafCertificate, CheckError>;
}

/// TLS certificate checker
pub struct CertificateChecker {
    settings: CheckSettings,
    connector: TlsConnector,
}

impl CertificateChecker {
    /// Create a new certificate checker with the given settings, trusting the
    /// roots selected by `settings.trust_store`
    pub fn new(settings: CheckSettings) -> Self {
        let root_store = load_root_store(settings.trust_store);
        Self::with_root_store(settings, root_store)
    }

    /// Create a certificate checker that trusts exactly `root_store`
    pub fn with_root_store(settings: CheckSettings, root_store: RootCertStore) -> Self {
        // Ensure a default crypto provider is installed (needed when multiple
        // providers are compiled in, e.g. through reqwest)
        let _ = rustls::crypto::ring::default_provider().install_default();

        let config = ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        Self {
            settings,
            connector: TlsConnector::from(Arc::new(config)),
        }
    }

    /// Check the certificate served by `host` on the configured port.
    ///
    /// A single handshake is attempted. The connection is shut down before
    /// returning once it has been established.
    pub async fn check(&self, host: &str) -> Result<LeafCertificate, CheckError> {
        let addr = format!("{}:{}", host, self.settings.port);

        let server_name = ServerName::try_from(host.to_string())
            .map_err(|_| CheckError::other(format!("Invalid server name: {}", host)))?;

        let stream = with_optional_timeout(
            self.settings.connect_timeout(),
            TcpStream::connect(addr.as_str()),
        )
        .await
        .map_err(|_| CheckError::other(format!("Connection to {} timed out", addr)))?
        .map_err(|e| CheckError::other(format!("Failed to connect to {}: {}", addr, e)))?;

        let mut tls_stream = with_optional_timeout(
            self.settings.handshake_timeout(),
            self.connector.connect(server_name, stream),
        )
        .await
        .map_err(|_| CheckError::other(format!("TLS handshake with {} timed out", addr)))?
        .map_err(classify_handshake_error)?;

        let (_, connection) = tls_stream.get_ref();
        let result = inspect_chain(
            connection.peer_certificates().unwrap_or_default(),
            Utc::now(),
            self.settings.expiry_threshold_days,
        );

        if let Err(e) = tls_stream.shutdown().await {
            tracing::debug!(host, error = %e, "TLS shutdown failed");
        }

        result
    }
}

#[async_trait]
impl DomainChecker for CertificateChecker {
    async fn check(&self, host: &str) -> Result<LeafCertificate, CheckError> {
        CertificateChecker::check(self, host).await
    }
}

/// Build the root certificate store for `trust_store`.
///
/// Unreadable system certificates are skipped with a warning. An empty system
/// store is not an error, every handshake then fails verification.
pub fn load_root_store(trust_store: TrustStore) -> RootCertStore {
    match trust_store {
        TrustStore::Webpki => {
            RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned())
        }
        TrustStore::System => {
            let native = rustls_native_certs::load_native_certs();
            for e in &native.errors {
                tracing::warn!("Failed to load system root certificates: {}", e);
            }

            let mut root_store = RootCertStore::empty();
            let (added, ignored) = root_store.add_parsable_certificates(native.certs);
            tracing::debug!(added, ignored, "Loaded system root certificates");
            if added == 0 {
                tracing::warn!("No usable root certificates found in the system store");
            }
            root_store
        }
    }
}

/// Inspect the leaf (first) certificate of a presented chain.
///
/// Fails with `CertificateExpiringSoon` when the whole days remaining are at
/// or below `threshold_days`, expired certificates included.
pub fn inspect_chain<C: AsRef<[u8]>>(
    chain: &[C],
    now: DateTime<Utc>,
    threshold_days: i64,
) -> Result<LeafCertificate, CheckError> {
    let leaf = chain
        .first()
        .ok_or_else(|| CheckError::other("Server presented no certificates"))?;

    let (_, cert) = X509Certificate::from_der(leaf.as_ref())
        .map_err(|e| CheckError::other(format!("Failed to parse leaf certificate: {:?}", e)))?;

    let not_after = asn1_time_to_datetime(cert.validity().not_after)?;
    let days_remaining = days_until(not_after, now);

    if days_remaining <= threshold_days {
        return Err(CheckError::CertificateExpiringSoon {
            days_remaining: Some(days_remaining),
        });
    }

    Ok(LeafCertificate {
        subject: cert.subject().to_string(),
        not_after,
        days_remaining,
    })
}

/// Whole days between `now` and `expiry`: whole hours divided by 24,
/// truncated toward zero. Negative once the certificate has expired.
pub fn days_until(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    expiry.signed_duration_since(now).num_hours() / HOURS_PER_DAY
}

/// tokio-rustls surfaces rustls errors as `io::Error` with the rustls error inside
fn classify_handshake_error(err: std::io::Error) -> CheckError {
    let rustls_error = err
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<rustls::Error>());

    match rustls_error {
        Some(rustls::Error::InvalidMessage(_)) => CheckError::TlsConnectionFailed {
            message: err.to_string(),
        },
        _ => CheckError::other(format!("TLS handshake failed: {}", err)),
    }
}

async fn with_optional_timeout<F: Future>(
    limit: Option<Duration>,
    fut: F,
) -> Result<F::Output, Elapsed> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut).await,
        None => Ok(fut.await),
    }
}

fn asn1_time_to_datetime(time: ASN1Time) -> Result<DateTime<Utc>, CheckError> {
    let timestamp = time.timestamp();
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .ok_or_else(|| CheckError::other("Invalid timestamp in certificate"))
}
