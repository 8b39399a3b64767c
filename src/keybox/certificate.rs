use x509_parser::pem::parse_x509_pem;

use super::errors::{BundleError, BundleResult};
use super::types::AttestationBundle;
use crate::serial::serial_from_be_bytes;

const CERTIFICATE_LABEL: &str = "CERTIFICATE";

/// Extract the canonical serial number of the bundle's leaf certificate.
pub fn leaf_serial(bundle: &AttestationBundle) -> BundleResult<String> {
    let leaf = bundle
        .leaf()
        .ok_or(BundleError::EmptyCertificate { index: 0 })?;

    // Keybox files often indent the armoured lines
    let normalized = leaf
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let (_, pem) = parse_x509_pem(normalized.as_bytes())
        .map_err(|e| BundleError::Pem(format!("{e:?}")))?;

    if pem.label != CERTIFICATE_LABEL {
        return Err(BundleError::Pem(format!(
            "unexpected PEM label {:?}",
            pem.label
        )));
    }

    let cert = pem.parse_x509().map_err(|e| BundleError::Certificate(e.into()))?;
    Ok(serial_from_be_bytes(&cert.tbs_certificate.serial.to_bytes_be()))
}
