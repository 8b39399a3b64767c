use serde::Serialize;

/// Status written for every bundle that is not revoked.
pub const VALID_MARKER: &str = "✅";

/// The certificate chain declared by one keybox file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationBundle {
    /// File name, used as the bundle identifier in logs and the report.
    pub name: String,
    /// Value of the first `NumberOfCertificates` element.
    pub certificate_count: usize,
    /// The first `certificate_count` PEM certificates, in document order.
    pub certificates: Vec<String>,
}

impl AttestationBundle {
    /// The leaf certificate is the first one of the declared chain.
    pub fn leaf(&self) -> Option<&str> {
        self.certificates.first().map(String::as_str)
    }
}

/// One report row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationResult {
    #[serde(rename = "File")]
    pub file: String,
    #[serde(rename = "Status")]
    pub status: String,
}

impl EvaluationResult {
    pub fn valid(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            status: VALID_MARKER.to_string(),
        }
    }
}

/// Outcome of classifying a bundle that parsed successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid(EvaluationResult),
    Revoked { file: String, serial: String },
}

impl Verdict {
    /// The report row contributed by this verdict, if any.
    pub fn into_result(self) -> Option<EvaluationResult> {
        match self {
            Verdict::Valid(result) => Some(result),
            Verdict::Revoked { .. } => None,
        }
    }
}
