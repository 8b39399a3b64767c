#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::get,
};
use keybox_checker::config::Config;
use openssl::asn1::Asn1Time;
use openssl::bn::BigNum;
use openssl::ec::{EcGroup, EcKey};
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::PKey;
use openssl::x509::{X509Builder, X509NameBuilder};

/// Scripted stand-in for the attestation status endpoint.
pub struct FakeFeed {
    responses: Mutex<VecDeque<(StatusCode, String)>>,
    fallback: (StatusCode, String),
    hits: AtomicUsize,
    headers: Mutex<Vec<HeaderMap>>,
}

impl FakeFeed {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_headers(&self) -> Option<HeaderMap> {
        self.headers.lock().unwrap().last().cloned()
    }
}

async fn status(State(feed): State<Arc<FakeFeed>>, headers: HeaderMap) -> (StatusCode, String) {
    feed.hits.fetch_add(1, Ordering::SeqCst);
    feed.headers.lock().unwrap().push(headers);

    feed.responses
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| feed.fallback.clone())
}

/// Serve `responses` in order, then `fallback` forever. Returns the feed URL.
pub async fn spawn_feed(
    responses: Vec<(StatusCode, &str)>,
    fallback: (StatusCode, &str),
) -> (String, Arc<FakeFeed>) {
    let feed = Arc::new(FakeFeed {
        responses: Mutex::new(
            responses
                .into_iter()
                .map(|(status, body)| (status, body.to_string()))
                .collect(),
        ),
        fallback: (fallback.0, fallback.1.to_string()),
        hits: AtomicUsize::new(0),
        headers: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/attestation/status", get(status))
        .with_state(feed.clone());

    // Use a random OS port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("failed to run fake feed");
    });

    (format!("http://{addr}/attestation/status"), feed)
}

/// Configuration pointing at `feed_url` and `dir`, with millisecond backoff.
pub fn test_config(feed_url: &str, dir: &Path, max_attempts: u32) -> Config {
    let mut vars = HashMap::new();
    vars.insert("feed.url".to_string(), feed_url.to_string());
    vars.insert("feed.timeout_secs".to_string(), "5".to_string());
    vars.insert("feed.max_attempts".to_string(), max_attempts.to_string());
    vars.insert("feed.initial_backoff_ms".to_string(), "1".to_string());
    vars.insert("feed.max_backoff_ms".to_string(), "4".to_string());
    vars.insert(
        "bundles.directory".to_string(),
        dir.to_string_lossy().into_owned(),
    );
    vars.insert(
        "report.output".to_string(),
        dir.join("status.csv").to_string_lossy().into_owned(),
    );

    Config::load_with_sources(Some(vars)).unwrap()
}

/// Self-signed P-256 certificate with the given hexadecimal serial, as PEM.
pub fn certificate_pem(serial_hex: &str) -> String {
    let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).unwrap();
    let key = PKey::from_ec_key(EcKey::generate(&group).unwrap()).unwrap();

    let mut name = X509NameBuilder::new().unwrap();
    name.append_entry_by_text("CN", "Test Attestation Key").unwrap();
    let name = name.build();

    let serial = BigNum::from_hex_str(serial_hex)
        .unwrap()
        .to_asn1_integer()
        .unwrap();

    let mut builder = X509Builder::new().unwrap();
    builder.set_version(2).unwrap();
    builder.set_serial_number(&serial).unwrap();
    builder.set_subject_name(&name).unwrap();
    builder.set_issuer_name(&name).unwrap();
    builder.set_pubkey(&key).unwrap();
    builder
        .set_not_before(&Asn1Time::days_from_now(0).unwrap())
        .unwrap();
    builder
        .set_not_after(&Asn1Time::days_from_now(365).unwrap())
        .unwrap();
    builder.sign(&key, MessageDigest::sha256()).unwrap();

    String::from_utf8(builder.build().to_pem().unwrap()).unwrap()
}

/// A keybox declaring `count` certificates, with one PEM entry per serial.
pub fn keybox_xml(count: usize, serials: &[&str]) -> String {
    let certs: String = serials
        .iter()
        .map(|serial| {
            format!(
                "            <Certificate format=\"pem\">\n{}            </Certificate>\n",
                certificate_pem(serial)
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0"?>
<AndroidAttestation>
    <NumberOfKeyboxes>1</NumberOfKeyboxes>
    <Keybox DeviceID="integration">
        <Key algorithm="ecdsa">
            <CertificateChain>
                <NumberOfCertificates>{count}</NumberOfCertificates>
{certs}            </CertificateChain>
        </Key>
    </Keybox>
</AndroidAttestation>
"#
    )
}
