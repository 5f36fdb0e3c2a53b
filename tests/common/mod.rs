//! Local stand-ins for the network peers a run talks to

#![allow(dead_code)]

use async_trait::async_trait;
use cert_watchdog::checks::{inspect_chain, DomainChecker};
use cert_watchdog::models::LeafCertificate;
use cert_watchdog::CheckError;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use rcgen::{BasicConstraints, CertificateParams, IsCa, KeyPair};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::{RootCertStore, ServerConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio_rustls::TlsAcceptor;

/// notAfter of tests/fixtures/leaf-cert.pem
pub fn fixture_not_after() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2036, 10, 16, 15, 55, 40).unwrap()
}

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// DER bytes of the fixture leaf certificate
pub fn fixture_leaf_der() -> Vec<u8> {
    let pem = std::fs::read(fixtures_dir().join("leaf-cert.pem")).expect("Failed to read fixture");
    let (_, pem) = x509_parser::pem::parse_x509_pem(&pem).expect("Failed to parse fixture PEM");
    pem.contents
}

/// A request received by the fake webhook
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("webhook body is not JSON")
    }
}

/// Start an HTTP server answering every request with `status`.
///
/// Returns the webhook URL and a channel yielding each captured request.
pub async fn spawn_webhook(status: u16) -> (String, mpsc::UnboundedReceiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(request) = read_request(&mut socket).await {
                    let _ = tx.send(request);
                }
                let response = format!(
                    "HTTP/1.1 {} {}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                    status,
                    if status == 200 { "OK" } else { "Error" }
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://127.0.0.1:{}/services/TEST/WEBHOOK", port), rx)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..end]).to_string();
        let mut lines = head.split("\r\n");
        let request_line = lines.next().unwrap_or_default().to_string();
        let headers: Vec<(String, String)> = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect();
        let content_length = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.parse::<usize>().ok())
            .unwrap_or(0);

        let body_start = end + 4;
        if buf.len() >= body_start + content_length {
            let body =
                String::from_utf8_lossy(&buf[body_start..body_start + content_length]).to_string();
            return Some(CapturedRequest {
                request_line,
                headers,
                body,
            });
        }
    }
}

/// Start a server that accepts TCP connections but answers with plain HTTP.
///
/// Returns the port it listens on.
pub async fn spawn_plaintext_server() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(b"HTTP/1.1 400 Bad Request\r\ncontent-length: 0\r\n\r\n")
                    .await;
                // Hold the connection until the client gives up
                while let Ok(n) = socket.read(&mut buf).await {
                    if n == 0 {
                        break;
                    }
                }
            });
        }
    });

    port
}

/// Start a server that accepts connections and never writes anything
pub async fn spawn_silent_server() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(30)).await;
                drop(socket);
            });
        }
    });

    port
}

/// A port on localhost with nothing listening
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Checker that evaluates the fixture certificate at a per-host point in time
pub struct FixtureChecker {
    pub now_by_host: HashMap<String, DateTime<Utc>>,
}

#[async_trait]
impl DomainChecker for FixtureChecker {
    async fn check(&self, host: &str) -> Result<LeafCertificate, CheckError> {
        let now = self
            .now_by_host
            .get(host)
            .copied()
            .ok_or_else(|| CheckError::other(format!("Failed to connect to {}:443", host)))?;
        inspect_chain(&[fixture_leaf_der()], now, 30)
    }
}

/// A throwaway CA and a `localhost` leaf certificate it signed
pub struct TestPki {
    pub ca_der: CertificateDer<'static>,
    pub ca_pem: String,
    pub leaf_der: CertificateDer<'static>,
    pub leaf_key: PrivateKeyDer<'static>,
}

impl TestPki {
    /// Issue a leaf for `localhost` that expires `valid_for` from now
    pub fn issue(valid_for: time::Duration) -> Self {
        let now = time::OffsetDateTime::now_utc();

        let mut ca_params = CertificateParams::new(Vec::<String>::new()).unwrap();
        ca_params
            .distinguished_name
            .push(rcgen::DnType::CommonName, "cert-watchdog test CA");
        ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        ca_params.not_before = now - time::Duration::days(1);
        ca_params.not_after = now + time::Duration::days(365);
        let ca_key = KeyPair::generate().unwrap();
        let ca_cert = ca_params.self_signed(&ca_key).unwrap();

        let mut leaf_params = CertificateParams::new(vec!["localhost".to_string()]).unwrap();
        leaf_params
            .distinguished_name
            .push(rcgen::DnType::CommonName, "localhost");
        leaf_params.not_before = now - time::Duration::days(1);
        leaf_params.not_after = now + valid_for;
        let leaf_key = KeyPair::generate().unwrap();
        let leaf_cert = leaf_params
            .signed_by(&leaf_key, &ca_cert, &ca_key)
            .unwrap();

        Self {
            ca_der: ca_cert.der().clone(),
            ca_pem: ca_cert.pem(),
            leaf_der: leaf_cert.der().clone(),
            leaf_key: PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(leaf_key.serialize_der())),
        }
    }

    /// Root store trusting only the test CA
    pub fn root_store(&self) -> RootCertStore {
        let mut roots = RootCertStore::empty();
        roots.add(self.ca_der.clone()).unwrap();
        roots
    }
}

/// Start a TLS server presenting the leaf and CA of `pki` to one client.
///
/// The receiver resolves once the client is gone: `true` when it sent
/// close_notify, `false` when the connection ended any other way.
pub async fn spawn_tls_server(pki: &TestPki) -> (u16, oneshot::Receiver<bool>) {
    let _ = rustls::crypto::ring::default_provider().install_default();

    let config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(
            vec![pki.leaf_der.clone(), pki.ca_der.clone()],
            pki.leaf_key.clone_key(),
        )
        .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let Ok((socket, _)) = listener.accept().await else {
            return;
        };
        let closed_cleanly = match acceptor.accept(socket).await {
            Ok(mut tls) => {
                let mut buf = Vec::new();
                // Ok(_) only after a close_notify, a bare TCP close is UnexpectedEof
                tls.read_to_end(&mut buf).await.is_ok()
            }
            Err(_) => false,
        };
        let _ = tx.send(closed_cleanly);
    });

    (port, rx)
}
