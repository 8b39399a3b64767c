use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::errors::{BundleError, BundleResult};
use super::types::AttestationBundle;

const COUNT_ELEMENT: &[u8] = b"NumberOfCertificates";
const CERTIFICATE_ELEMENT: &[u8] = b"Certificate";
const PEM_FORMAT: &str = "pem";

enum CaptureKind {
    Count,
    Certificate,
}

/// Text collected for the element opened at `depth`.
struct Capture {
    kind: CaptureKind,
    depth: usize,
    text: String,
}

/// Parse a keybox document into its declared certificate chain.
///
/// The first `NumberOfCertificates` element gives the chain length and the
/// chain is the first that many `Certificate` elements with `format="pem"`,
/// wherever they appear in the document. The document must be well-formed:
/// exactly one root element, every element closed, no text outside the root.
pub fn parse_bundle(name: &str, xml: &str) -> BundleResult<AttestationBundle> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut count_text: Option<String> = None;
    let mut pem_entries: Vec<String> = Vec::new();
    let mut capture: Option<Capture> = None;
    let mut depth = 0usize;
    let mut root_seen = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if depth == 0 {
                    enter_root(&mut root_seen)?;
                }
                depth += 1;

                if capture.is_none() {
                    let local = e.local_name();
                    let kind = if local.as_ref() == COUNT_ELEMENT && count_text.is_none() {
                        Some(CaptureKind::Count)
                    } else if local.as_ref() == CERTIFICATE_ELEMENT && is_pem(&e)? {
                        Some(CaptureKind::Certificate)
                    } else {
                        None
                    };
                    capture = kind.map(|kind| Capture {
                        kind,
                        depth,
                        text: String::new(),
                    });
                }
            }
            Event::Empty(e) => {
                if depth == 0 {
                    enter_root(&mut root_seen)?;
                }

                if capture.is_none() {
                    let local = e.local_name();
                    if local.as_ref() == COUNT_ELEMENT && count_text.is_none() {
                        count_text = Some(String::new());
                    } else if local.as_ref() == CERTIFICATE_ELEMENT && is_pem(&e)? {
                        pem_entries.push(String::new());
                    }
                }
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                if depth == 0 {
                    if !text.trim().is_empty() {
                        return Err(BundleError::MalformedMarkup(
                            "text outside the root element".to_string(),
                        ));
                    }
                } else if let Some(c) = capture.as_mut().filter(|c| c.depth == depth) {
                    c.text.push_str(&text);
                }
            }
            Event::CData(c) => {
                if depth == 0 {
                    return Err(BundleError::MalformedMarkup(
                        "CDATA outside the root element".to_string(),
                    ));
                }
                if let Some(cap) = capture.as_mut().filter(|cap| cap.depth == depth) {
                    cap.text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::End(_) => {
                if depth == 0 {
                    return Err(BundleError::MalformedMarkup(
                        "closing tag without an open element".to_string(),
                    ));
                }
                if let Some(Capture { kind, text, .. }) = capture.take_if(|c| c.depth == depth) {
                    match kind {
                        CaptureKind::Count => count_text = Some(text),
                        CaptureKind::Certificate => pem_entries.push(text.trim().to_string()),
                    }
                }
                depth -= 1;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(BundleError::MalformedMarkup(format!(
            "{depth} element(s) left unclosed"
        )));
    }
    if !root_seen {
        return Err(BundleError::MalformedMarkup(
            "no root element".to_string(),
        ));
    }

    let count_text = count_text.ok_or(BundleError::MissingCertificateCount)?;
    let declared: usize = count_text
        .trim()
        .parse()
        .map_err(|_| BundleError::InvalidCertificateCount(count_text.trim().to_string()))?;

    if declared == 0 {
        return Err(BundleError::EmptyChain);
    }
    if pem_entries.len() < declared {
        return Err(BundleError::InsufficientCertificates {
            declared,
            available: pem_entries.len(),
        });
    }

    pem_entries.truncate(declared);
    if let Some(index) = pem_entries.iter().position(String::is_empty) {
        return Err(BundleError::EmptyCertificate { index });
    }

    Ok(AttestationBundle {
        name: name.to_string(),
        certificate_count: declared,
        certificates: pem_entries,
    })
}

fn enter_root(root_seen: &mut bool) -> BundleResult<()> {
    if *root_seen {
        return Err(BundleError::MalformedMarkup(
            "more than one root element".to_string(),
        ));
    }
    *root_seen = true;
    Ok(())
}

fn is_pem(element: &BytesStart<'_>) -> BundleResult<bool> {
    let format = element
        .try_get_attribute("format")
        .map_err(quick_xml::Error::from)?;

    match format {
        Some(attr) => Ok(attr.unescape_value()? == PEM_FORMAT),
        None => Ok(false),
    }
}
