//! Keybox bundle evaluation
//!
//! A keybox is an XML file packaging the certificate chains of a hardware
//! attestation key. Only the leaf of the declared chain is checked: its serial
//! number must not appear in the revocation set.

mod certificate;
mod errors;
mod evaluator;
mod parser;
mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use certificate::leaf_serial;
pub use errors::{BundleError, BundleResult};
pub use evaluator::BundleEvaluator;
pub use parser::parse_bundle;
pub use types::{AttestationBundle, EvaluationResult, VALID_MARKER, Verdict};
