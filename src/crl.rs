use chrono::{DateTime, Utc};
use tracing::debug;
use x509_parser::pem::parse_x509_pem;
use x509_parser::prelude::FromDer;
use x509_parser::revocation_list::CertificateRevocationList;

use crate::error::ParseError;

/// Wire encoding of a fetched CRL, derived from content only. DER is the
/// default; PEM is claimed only on positive evidence of the boundary marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrlEncoding {
    Der,
    Pem,
}

/// The decoded CRL, reduced to the one field the probe cares about.
#[derive(Debug, Clone, Copy)]
pub struct ParsedCrl {
    /// The CRL's `nextUpdate`, always an absolute UTC instant. CRLs without
    /// one are rejected at parse time.
    pub next_update: DateTime<Utc>,
}

const PEM_MARKER: &[u8] = b"BEGIN X509 CRL";

/// Classify raw bytes as DER or PEM by scanning for the standard
/// `-----BEGIN X509 CRL-----` boundary marker.
pub fn detect_encoding(bytes: &[u8]) -> CrlEncoding {
    if bytes.windows(PEM_MARKER.len()).any(|w| w == PEM_MARKER) {
        CrlEncoding::Pem
    } else {
        CrlEncoding::Der
    }
}

/// Decode the CRL per the detected encoding and pull out `nextUpdate`.
pub fn parse_crl(bytes: &[u8], encoding: CrlEncoding) -> Result<ParsedCrl, ParseError> {
    let next_update = match encoding {
        CrlEncoding::Der => next_update_from_der(bytes)?,
        CrlEncoding::Pem => {
            let (_, pem) = parse_x509_pem(bytes).map_err(|e| ParseError::Pem(e.to_string()))?;
            if pem.label != "X509 CRL" {
                return Err(ParseError::PemLabel(pem.label));
            }
            next_update_from_der(&pem.contents)?
        }
    };

    debug!(?encoding, %next_update, "parsed CRL");

    Ok(ParsedCrl { next_update })
}

fn next_update_from_der(der: &[u8]) -> Result<DateTime<Utc>, ParseError> {
    let (_, crl) =
        CertificateRevocationList::from_der(der).map_err(|e| ParseError::Der(e.to_string()))?;
    // nextUpdate is OPTIONAL in RFC 5280 but mandatory for this probe.
    let next_update = crl.next_update().ok_or(ParseError::MissingNextUpdate)?;
    DateTime::from_timestamp(next_update.timestamp(), 0).ok_or(ParseError::InvalidNextUpdate)
}
