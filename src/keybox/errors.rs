use thiserror::Error;
use x509_parser::prelude::X509Error;

/// Reasons a single bundle cannot be classified.
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed XML: {0}")]
    MalformedMarkup(String),

    #[error("NumberOfCertificates element not found")]
    MissingCertificateCount,

    #[error("Invalid NumberOfCertificates value: {0:?}")]
    InvalidCertificateCount(String),

    #[error("NumberOfCertificates is zero")]
    EmptyChain,

    #[error("Declared {declared} certificates but only {available} PEM certificates present")]
    InsufficientCertificates { declared: usize, available: usize },

    #[error("PEM certificate #{index} is empty")]
    EmptyCertificate { index: usize },

    #[error("Invalid PEM encoding: {0}")]
    Pem(String),

    #[error("X.509 error: {0}")]
    Certificate(#[from] X509Error),
}

/// Convenient Result type alias
pub type BundleResult<T> = Result<T, BundleError>;
